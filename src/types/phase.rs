//! Conversion phases and the one-way PONR gate.
use serde::Serialize;

/// Phases of a conversion run, in the order a successful run visits them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionPhase {
    Initializing,
    PrePonrChecks,
    AwaitingConfirmation,
    PonrCrossed,
    PostPonrConversion,
    Finalizing,
    Complete,
    RolledBack,
    Undetermined,
}

impl ConversionPhase {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConversionPhase::Initializing => "initializing",
            ConversionPhase::PrePonrChecks => "pre_ponr_checks",
            ConversionPhase::AwaitingConfirmation => "awaiting_confirmation",
            ConversionPhase::PonrCrossed => "ponr_crossed",
            ConversionPhase::PostPonrConversion => "post_ponr_conversion",
            ConversionPhase::Finalizing => "finalizing",
            ConversionPhase::Complete => "complete",
            ConversionPhase::RolledBack => "rolled_back",
            ConversionPhase::Undetermined => "undetermined",
        }
    }

    /// True for phases at or after the point of no return.
    #[must_use]
    pub const fn past_ponr(&self) -> bool {
        matches!(
            self,
            ConversionPhase::PonrCrossed
                | ConversionPhase::PostPonrConversion
                | ConversionPhase::Finalizing
                | ConversionPhase::Complete
                | ConversionPhase::Undetermined
        )
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            ConversionPhase::Complete | ConversionPhase::RolledBack | ConversionPhase::Undetermined
        )
    }

    /// Whether `self -> next` is a legal transition.
    #[must_use]
    pub const fn can_transition_to(&self, next: ConversionPhase) -> bool {
        use ConversionPhase::*;
        matches!(
            (*self, next),
            (Initializing, PrePonrChecks)
                | (Initializing, RolledBack)
                | (PrePonrChecks, AwaitingConfirmation)
                | (PrePonrChecks, RolledBack)
                | (AwaitingConfirmation, PonrCrossed)
                | (AwaitingConfirmation, RolledBack)
                | (PonrCrossed, PostPonrConversion)
                | (PonrCrossed, Undetermined)
                | (PostPonrConversion, Finalizing)
                | (PostPonrConversion, Undetermined)
                | (Finalizing, Complete)
                | (Finalizing, Undetermined)
        )
    }
}

impl std::fmt::Display for ConversionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("illegal phase transition {from} -> {to}")]
pub struct PhaseError {
    pub from: ConversionPhase,
    pub to: ConversionPhase,
}

/// Tracks the current phase of a run and guards the PONR gate.
#[derive(Debug)]
pub struct PhaseTracker {
    current: ConversionPhase,
    ponr_crossed: bool,
    history: Vec<ConversionPhase>,
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self {
            current: ConversionPhase::Initializing,
            ponr_crossed: false,
            history: vec![ConversionPhase::Initializing],
        }
    }
}

impl PhaseTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn current(&self) -> ConversionPhase {
        self.current
    }

    #[must_use]
    pub fn history(&self) -> &[ConversionPhase] {
        &self.history
    }

    #[must_use]
    pub const fn ponr_crossed(&self) -> bool {
        self.ponr_crossed
    }

    /// Automatic rollback is only permitted while the PONR gate is still closed.
    #[must_use]
    pub const fn may_rollback(&self) -> bool {
        !self.ponr_crossed
    }

    /// Move to `next`.
    ///
    /// # Errors
    /// Returns `PhaseError` when the transition is not part of the state machine.
    pub fn advance(&mut self, next: ConversionPhase) -> Result<(), PhaseError> {
        if !self.current.can_transition_to(next) {
            return Err(PhaseError {
                from: self.current,
                to: next,
            });
        }
        if next == ConversionPhase::PonrCrossed {
            self.ponr_crossed = true;
        }
        self.current = next;
        self.history.push(next);
        Ok(())
    }
}
