//! `PrePonrChecks`: resolve the system, prepare, run the actions and report.
use log::Level;
use serde_json::json;

use super::errors::{ErrorId, StepError};
use crate::actions::{report, run_actions, ActionContext, ActionRegistry};
use crate::adapters::Preparation;
use crate::backup::BackupController;
use crate::logging::{AuditSink, StageLogger};
use crate::policy::Policy;
use crate::types::{ActionResult, Severity, SystemInfo};

pub(super) fn prepare(
    prep: &dyn Preparation,
    backups: &mut BackupController,
    audit: &dyn AuditSink,
) -> Result<SystemInfo, StepError> {
    let tag = |step: &'static str| StepError::tag(ErrorId::E_CHECKS, step);
    let system = prep.resolve_system_info().map_err(tag("resolve_system_info"))?;
    audit.log(Level::Info, &system.describe());
    prep.clean_metadata().map_err(tag("clean_metadata"))?;
    prep.clear_versionlock(backups).map_err(tag("clear_versionlock"))?;
    Ok(system)
}

pub(super) fn run(
    registry: &ActionRegistry,
    policy: &Policy,
    system: &SystemInfo,
    audit: &dyn AuditSink,
    slog: &StageLogger<'_>,
) -> Vec<ActionResult> {
    audit.log(Level::Info, &format!("Running {} pre-conversion checks.", registry.len()));
    let ctx = ActionContext::new(system, audit);
    let results = run_actions(registry, &ctx, policy.parallel_actions);

    for r in &results {
        let fact = slog
            .action()
            .action_id(r.action_id.clone())
            .field("severity", json!(r.severity.as_str()))
            .field("error_id", json!(r.error_id))
            .field("message", json!(r.message));
        let fact = match &r.diagnostics {
            Some(d) => fact.field("diagnostics", d.clone()),
            None => fact,
        };
        match r.severity {
            Severity::Success | Severity::Info => fact.emit_success(),
            s if s >= policy.block_threshold => fact.emit_failure(),
            _ => fact.emit_warn(),
        }
    }

    let count = |s: Severity| results.iter().filter(|r| r.severity == s).count();
    let blocking = results.iter().filter(|r| r.severity >= policy.block_threshold).count();
    let summary = slog.actions_summary().field("check_set_id", json!(registry.check_set_id().to_string())).merge(json!({
        "total": results.len(),
        "errors": count(Severity::Error),
        "overridable": count(Severity::Overridable),
        "skipped": count(Severity::Skip),
        "warnings": count(Severity::Warning),
        "blocking": blocking,
        "block_threshold": policy.block_threshold.as_str(),
    }));
    if blocking == 0 {
        summary.emit_success();
    } else {
        summary.emit_failure();
    }

    report::summary(&results, audit);
    results
}
