use serde::{Deserialize, Serialize};

/// Classification of a finding's blocking-ness, ordered from least to most blocking.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    #[default]
    Success,
    Info,
    Warning,
    Skip,
    Overridable,
    Error,
}

impl Severity {
    /// Every severity, most blocking first. Used when grouping report output.
    pub const DESCENDING: [Severity; 6] = [
        Severity::Error,
        Severity::Overridable,
        Severity::Skip,
        Severity::Warning,
        Severity::Info,
        Severity::Success,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "SUCCESS",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Skip => "SKIP",
            Severity::Overridable => "OVERRIDABLE",
            Severity::Error => "ERROR",
        }
    }

    /// Log level a finding of this severity is reported at.
    #[must_use]
    pub const fn log_level(&self) -> log::Level {
        match self {
            Severity::Success | Severity::Info => log::Level::Info,
            Severity::Warning | Severity::Skip => log::Level::Warn,
            Severity::Overridable | Severity::Error => log::Level::Error,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
