use crate::constants::ANALYSIS_ENV;

/// What the run is for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Activity {
    #[default]
    Conversion,
    /// Run the checks, report, and always unwind. Never crosses the point of no return.
    Analysis,
}

impl Activity {
    /// Analysis is selected by a non-empty `DISTROSWAP_EXPERIMENTAL_ANALYSIS`.
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var(ANALYSIS_ENV) {
            Ok(v) if !v.trim().is_empty() => Activity::Analysis,
            _ => Activity::Conversion,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Activity::Conversion => "conversion",
            Activity::Analysis => "analysis",
        }
    }
}

/// Operator options resolved during bootstrap.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToolOptions {
    pub activity: Activity,
    /// Answer yes to the confirmation prompt.
    pub assume_yes: bool,
    /// Reboot once the conversion finishes.
    pub restart: bool,
}

impl ToolOptions {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            activity: Activity::from_env(),
            ..Self::default()
        }
    }
}
