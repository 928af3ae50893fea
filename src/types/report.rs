use super::phase::ConversionPhase;
use super::result::ActionResult;

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// Conversion finished and finalization succeeded.
    Completed,
    /// Analysis activity ran the checks and unwound; nothing failed.
    AnalysisComplete,
    /// A pre-PONR failure or decline; rollback was run.
    RolledBack,
    /// A failure at or after the PONR; no rollback was attempted.
    Undetermined,
}

impl Disposition {
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Disposition::Completed | Disposition::AnalysisComplete => 0,
            Disposition::RolledBack | Disposition::Undetermined => 1,
        }
    }
}

/// Result of the best-effort unwind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RollbackSummary {
    /// Step names in the order they were attempted.
    pub attempted: Vec<String>,
    /// `(step, error)` for every step that failed.
    pub failed: Vec<(String, String)>,
}

impl RollbackSummary {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Everything the caller of `Converter::run` gets back.
#[derive(Clone, Debug)]
pub struct RunOutcome {
    pub disposition: Disposition,
    pub final_phase: ConversionPhase,
    pub results: Vec<ActionResult>,
    pub rollback: Option<RollbackSummary>,
    pub errors: Vec<String>,
}

impl RunOutcome {
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.disposition.exit_code()
    }
}
