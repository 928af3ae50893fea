//! Conversion phase controller.
//!
//! [`Converter::run`] walks the phases of a run and owns the PONR gate. Before the
//! gate every failure unwinds through the [`RollbackOrchestrator`]; from the gate on
//! nothing is unwound and failures end the run as undetermined.
//!
//! Side-effects:
//! - Emits a `phase` fact per transition and per failed step, `action` facts per
//!   check result, an `actions.summary`, and `rollback`/`rollback.summary` facts when
//!   an unwind runs.
//! - The last audit line of every run is one of the canonical final messages.

use log::Level;
use serde_json::json;

use crate::actions::{find_actions_of_severity, ActionRegistry};
use crate::adapters::{
    Bootstrap, Confirmation, ConversionSteps, DefaultBootstrap, FileLockManager, Finalization, LockManager,
    Preparation, StdinPrompt,
};
use crate::constants::{MSG_CONVERSION_FAILED, MSG_CONVERSION_SUCCESSFUL, MSG_NO_CHANGES, MSG_ROLLBACK_INCOMPLETE, MSG_UNDETERMINED};
use crate::logging::audit::{AuditCtx, AuditMode};
use crate::logging::{ts_for_mode, AuditSink, FactsEmitter, StageLogger};
use crate::policy::{Activity, Policy};
use crate::rollback::RollbackOrchestrator;
use crate::types::ids::new_run_id;
use crate::types::{ActionResult, ConversionPhase, Disposition, PhaseTracker, RollbackSummary, RunOutcome};

mod checks;
mod conversion;
pub mod errors;
mod finalize;
mod rollback;
mod setup;

use errors::{guarded, id_str, ErrorId, StepError};

pub struct Converter<E: FactsEmitter, A: AuditSink> {
    facts: E,
    audit: A,
    policy: Policy,
    registry: ActionRegistry,
    bootstrap: Option<Box<dyn Bootstrap>>, // DefaultBootstrap from the policy paths when unset
    preparation: Option<Box<dyn Preparation>>,
    confirmation: Option<Box<dyn Confirmation>>, // StdinPrompt when unset
    conversion: Option<Box<dyn ConversionSteps>>,
    finalization: Option<Box<dyn Finalization>>,
    rollback: RollbackOrchestrator,
    lock: Option<Box<dyn LockManager>>, // FileLockManager on policy.lock_path when unset
}

impl<E: FactsEmitter, A: AuditSink> Converter<E, A> {
    pub fn new(facts: E, audit: A, policy: Policy, registry: ActionRegistry) -> Self {
        Self {
            facts,
            audit,
            policy,
            registry,
            bootstrap: None,
            preparation: None,
            confirmation: None,
            conversion: None,
            finalization: None,
            rollback: RollbackOrchestrator::new(),
            lock: None,
        }
    }

    pub fn with_bootstrap(mut self, bootstrap: Box<dyn Bootstrap>) -> Self {
        self.bootstrap = Some(bootstrap);
        self
    }

    pub fn with_preparation(mut self, preparation: Box<dyn Preparation>) -> Self {
        self.preparation = Some(preparation);
        self
    }

    pub fn with_confirmation(mut self, confirmation: Box<dyn Confirmation>) -> Self {
        self.confirmation = Some(confirmation);
        self
    }

    pub fn with_conversion(mut self, conversion: Box<dyn ConversionSteps>) -> Self {
        self.conversion = Some(conversion);
        self
    }

    pub fn with_finalization(mut self, finalization: Box<dyn Finalization>) -> Self {
        self.finalization = Some(finalization);
        self
    }

    pub fn with_rollback(mut self, rollback: RollbackOrchestrator) -> Self {
        self.rollback = rollback;
        self
    }

    pub fn with_lock_manager(mut self, lock: Box<dyn LockManager>) -> Self {
        self.lock = Some(lock);
        self
    }

    #[must_use]
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn rollback_mut(&mut self) -> &mut RollbackOrchestrator {
        &mut self.rollback
    }

    /// Execute one run. Every outcome, including failures, is reported through the
    /// returned `RunOutcome`; `RunOutcome::exit_code` is the process exit status.
    ///
    /// A panicking collaborator is handled like one returning an error for its phase.
    pub fn run(&mut self) -> RunOutcome {
        let mut s = Session::new(&self.facts, &self.audit);

        // Initializing
        let default_lock;
        let lock: &dyn LockManager = match self.lock.as_deref() {
            Some(l) => l,
            None => {
                default_lock = FileLockManager::new(self.policy.lock_path.clone());
                &default_lock
            }
        };
        let timeout_ms = self.policy.lock_timeout_ms;
        let _guard = match guarded(ErrorId::E_SETUP, "lock", || setup::acquire_lock(lock, timeout_ms, s.audit)) {
            Ok(g) => g,
            Err(e) => {
                s.fail(&e);
                return s.roll_back(&mut self.rollback);
            }
        };
        let default_bootstrap;
        let bootstrap: &dyn Bootstrap = match self.bootstrap.as_deref() {
            Some(b) => b,
            None => {
                default_bootstrap =
                    DefaultBootstrap::new(self.policy.log_dir.clone(), self.policy.eula_path.clone());
                &default_bootstrap
            }
        };
        let options = match guarded(ErrorId::E_SETUP, "bootstrap", || setup::run(bootstrap, s.audit)) {
            Ok(o) => o,
            Err(e) => {
                s.fail(&e);
                return s.roll_back(&mut self.rollback);
            }
        };
        s.set_analysis(options.activity == Activity::Analysis);

        // PrePonrChecks
        s.enter(ConversionPhase::PrePonrChecks);
        let Some(prep) = self.preparation.as_deref() else {
            s.fail(&StepError::missing(ErrorId::E_CHECKS, "preparation"));
            return s.roll_back(&mut self.rollback);
        };
        let backups = self.rollback.backups_mut();
        backups.set_backup_dir(self.policy.backup_dir.clone());
        let system = match guarded(ErrorId::E_CHECKS, "preparation", || checks::prepare(prep, backups, s.audit)) {
            Ok(system) => system,
            Err(e) => {
                s.fail(&e);
                return s.roll_back(&mut self.rollback);
            }
        };
        let (registry, policy) = (&self.registry, &self.policy);
        let results = guarded(ErrorId::E_CHECKS, "checks", || {
            Ok(checks::run(registry, policy, &system, s.audit, &s.slog()))
        });
        s.results = match results {
            Ok(results) => results,
            Err(e) => {
                s.fail(&e);
                return s.roll_back(&mut self.rollback);
            }
        };

        if s.analysis {
            s.audit.log(Level::Info, "Analysis finished. Rolling back as no conversion is performed.");
            return s.roll_back(&mut self.rollback);
        }
        let blocking: Vec<&str> = find_actions_of_severity(&s.results, self.policy.block_threshold)
            .iter()
            .map(|r| r.action_id.as_str())
            .collect();
        if !blocking.is_empty() {
            let e = StepError::new(
                ErrorId::E_CHECKS,
                "checks",
                format!(
                    "findings at or above {} in: {}",
                    self.policy.block_threshold,
                    blocking.join(", ")
                ),
            );
            s.fail(&e);
            s.audit.critical(MSG_CONVERSION_FAILED);
            return s.roll_back(&mut self.rollback);
        }

        // AwaitingConfirmation
        s.enter(ConversionPhase::AwaitingConfirmation);
        let default_prompt = StdinPrompt;
        let confirmation: &dyn Confirmation = self.confirmation.as_deref().unwrap_or(&default_prompt);
        let answer = guarded(ErrorId::E_DECLINED, "ask_to_continue", || {
            confirmation
                .ask_to_continue(&options)
                .map_err(StepError::tag(ErrorId::E_DECLINED, "ask_to_continue"))
        });
        match answer {
            Ok(true) => {}
            Ok(false) => {
                s.fail(&StepError::new(ErrorId::E_DECLINED, "ask_to_continue", "declined by the operator"));
                return s.roll_back(&mut self.rollback);
            }
            Err(e) => {
                s.fail(&e);
                return s.roll_back(&mut self.rollback);
            }
        }

        // PonrCrossed
        s.enter(ConversionPhase::PonrCrossed);
        s.audit.log(
            Level::Warn,
            "The point of no return has been crossed. Changes from now on will not be rolled back.",
        );
        let finalization = self.finalization.as_deref();

        // PostPonrConversion
        s.enter(ConversionPhase::PostPonrConversion);
        let converted = match self.conversion.as_deref() {
            Some(steps) => guarded(ErrorId::E_CONVERSION, "conversion", || conversion::run(steps, &system, s.audit)),
            None => Err(StepError::missing(ErrorId::E_CONVERSION, "conversion")),
        };
        if let Err(e) = converted {
            s.fail(&e);
            return s.undetermined(finalization, false);
        }

        // Finalizing
        s.enter(ConversionPhase::Finalizing);
        let Some(fin) = finalization else {
            s.fail(&StepError::missing(ErrorId::E_FINALIZE, "finalization"));
            return s.undetermined(None, false);
        };
        let mut facts_attempted = false;
        let finalized = guarded(ErrorId::E_FINALIZE, "finalization", || {
            finalize::run(fin, &system, &options, &mut facts_attempted)
        });
        if let Err(e) = finalized {
            s.fail(&e);
            return s.undetermined(Some(fin), facts_attempted);
        }

        s.enter(ConversionPhase::Complete);
        s.audit.log(Level::Info, MSG_CONVERSION_SUCCESSFUL);
        s.finish(Disposition::Completed, None)
    }
}

/// Per-run state threaded through the phases.
struct Session<'a> {
    ctx: AuditCtx<'a>,
    audit: &'a dyn AuditSink,
    phases: PhaseTracker,
    analysis: bool,
    results: Vec<ActionResult>,
    errors: Vec<String>,
}

impl<'a> Session<'a> {
    fn new(facts: &'a dyn FactsEmitter, audit: &'a dyn AuditSink) -> Self {
        let ctx = AuditCtx::new(
            facts,
            new_run_id().to_string(),
            ts_for_mode(false),
            AuditMode::default(),
        );
        Self {
            ctx,
            audit,
            phases: PhaseTracker::new(),
            analysis: false,
            results: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn slog(&self) -> StageLogger<'_> {
        StageLogger::new(&self.ctx)
    }

    fn set_analysis(&mut self, analysis: bool) {
        self.analysis = analysis;
        self.ctx.mode = AuditMode {
            analysis,
            redact: analysis,
        };
        self.ctx.ts = ts_for_mode(analysis);
    }

    fn enter(&mut self, next: ConversionPhase) {
        let from = self.phases.current();
        match self.phases.advance(next) {
            Ok(()) => {
                self.audit.log(Level::Debug, &format!("Phase {from} -> {next}."));
                self.slog()
                    .phase()
                    .field("phase", json!(next.as_str()))
                    .field("from", json!(from.as_str()))
                    .emit_success();
            }
            Err(e) => {
                self.audit.log(Level::Error, &e.to_string());
                self.errors.push(e.to_string());
            }
        }
    }

    fn fail(&mut self, e: &StepError) {
        self.audit.log(Level::Error, &format!("{} failed: {}", e.step, e.msg));
        self.slog()
            .phase()
            .field("phase", json!(self.phases.current().as_str()))
            .field("step", json!(e.step))
            .field("error_id", json!(id_str(e.id)))
            .field("error", json!(e.msg))
            .emit_failure();
        self.errors.push(e.to_string());
    }

    /// Unwind and end the run before the PONR.
    fn roll_back(mut self, orch: &mut RollbackOrchestrator) -> RunOutcome {
        if !self.phases.may_rollback() {
            self.audit.log(Level::Error, "Rollback requested after the point of no return; refusing.");
            return self.undetermined(None, true);
        }
        let summary = rollback::run(orch, self.audit, &self.slog());
        // An analysis run that could not undo its own preparation is a failure.
        let disposition = if self.analysis && self.errors.is_empty() && summary.is_clean() {
            Disposition::AnalysisComplete
        } else {
            Disposition::RolledBack
        };
        self.enter(ConversionPhase::RolledBack);
        if summary.is_clean() {
            self.audit.log(Level::Info, MSG_NO_CHANGES);
        } else {
            for (step, err) in &summary.failed {
                self.errors.push(format!("{}: rollback of {step} failed: {err}", id_str(ErrorId::E_ROLLBACK)));
            }
            self.audit.critical(MSG_ROLLBACK_INCOMPLETE);
        }
        self.finish(disposition, Some(summary))
    }

    /// End the run at or after the PONR without unwinding.
    fn undetermined(mut self, fin: Option<&dyn Finalization>, facts_attempted: bool) -> RunOutcome {
        if !facts_attempted {
            let updated = fin.map(|f| {
                guarded(ErrorId::E_FINALIZE, "update_custom_facts", || {
                    f.update_custom_facts()
                        .map_err(StepError::tag(ErrorId::E_FINALIZE, "update_custom_facts"))
                })
            });
            if let Some(Err(e)) = updated {
                self.audit.log(Level::Warn, &format!("Unable to update custom facts: {}", e.msg));
            }
        }
        self.enter(ConversionPhase::Undetermined);
        self.audit.critical(MSG_UNDETERMINED);
        self.finish(Disposition::Undetermined, None)
    }

    fn finish(self, disposition: Disposition, rollback: Option<RollbackSummary>) -> RunOutcome {
        RunOutcome {
            disposition,
            final_phase: self.phases.current(),
            results: self.results,
            rollback,
            errors: self.errors,
        }
    }
}
