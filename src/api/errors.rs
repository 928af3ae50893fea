use std::panic::{catch_unwind, AssertUnwindSafe};

use thiserror::Error;

use crate::types::errors::{panic_message, Error};

// Stable run-level identifiers; emitted on phase facts and kept in SCREAMING_SNAKE_CASE.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorId {
    E_SETUP,
    E_CHECKS,
    E_DECLINED,
    E_CONVERSION,
    E_FINALIZE,
    E_ROLLBACK,
}

#[must_use]
pub const fn id_str(id: ErrorId) -> &'static str {
    match id {
        ErrorId::E_SETUP => "E_SETUP",
        ErrorId::E_CHECKS => "E_CHECKS",
        ErrorId::E_DECLINED => "E_DECLINED",
        ErrorId::E_CONVERSION => "E_CONVERSION",
        ErrorId::E_FINALIZE => "E_FINALIZE",
        ErrorId::E_ROLLBACK => "E_ROLLBACK",
    }
}

/// A phase step that did not complete.
#[derive(Debug, Clone, Error)]
#[error("{step}: {msg}")]
pub struct StepError {
    pub id: ErrorId,
    pub step: &'static str,
    pub msg: String,
}

impl StepError {
    pub fn new(id: ErrorId, step: &'static str, msg: impl Into<String>) -> Self {
        Self {
            id,
            step,
            msg: msg.into(),
        }
    }

    /// Adapter for `map_err` on collaborator results.
    pub fn tag(id: ErrorId, step: &'static str) -> impl Fn(Error) -> StepError {
        move |e| StepError::new(id, step, e.msg)
    }

    pub(crate) fn missing(id: ErrorId, collaborator: &'static str) -> Self {
        Self::new(id, collaborator, format!("no {collaborator} collaborator configured"))
    }
}

/// Run one phase step with a panic turned into a `StepError` tagged `id`.
pub(crate) fn guarded<T>(
    id: ErrorId,
    step: &'static str,
    f: impl FnOnce() -> Result<T, StepError>,
) -> Result<T, StepError> {
    catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        Err(StepError::new(
            id,
            step,
            format!("unhandled failure: {}", panic_message(payload.as_ref())),
        ))
    })
}
