use serde::Serialize;
use serde_json::Value;

use super::severity::Severity;

/// Outcome of one action invocation, before the framework stamps the action id on it.
///
/// `Outcome::default()` is a plain success; an action that has nothing to report
/// returns it unchanged.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outcome {
    pub severity: Severity,
    pub error_id: Option<String>,
    pub message: String,
    pub diagnostics: Option<Value>,
}

impl Outcome {
    #[must_use]
    pub fn success() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn new(severity: Severity, error_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            error_id: Some(error_id.into()),
            message: message.into(),
            diagnostics: None,
        }
    }

    #[must_use]
    pub fn error(error_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, error_id, message)
    }

    #[must_use]
    pub fn warning(error_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, error_id, message)
    }

    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Value) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }
}

/// Immutable record of a finished action.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActionResult {
    pub action_id: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_id: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<Value>,
}

impl ActionResult {
    #[must_use]
    pub fn from_outcome(action_id: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            action_id: action_id.into(),
            severity: outcome.severity,
            error_id: outcome.error_id,
            message: outcome.message,
            diagnostics: outcome.diagnostics,
        }
    }
}
