use serde_json::json;

use super::errors::{id_str, ErrorId};
use crate::logging::{AuditSink, StageLogger};
use crate::rollback::{RollbackOrchestrator, RollbackStep};
use crate::types::RollbackSummary;

/// Run the orchestrator and emit one `rollback` fact per attempted step plus the summary.
pub(super) fn run(orch: &mut RollbackOrchestrator, audit: &dyn AuditSink, slog: &StageLogger<'_>) -> RollbackSummary {
    let summary = orch.rollback_changes(audit);
    for step in RollbackStep::ORDER {
        let name = step.as_str();
        if !summary.attempted.iter().any(|s| s == name) {
            continue;
        }
        let fact = slog.rollback().field("step", json!(name));
        match summary.failed.iter().find(|(s, _)| s == name) {
            Some((_, err)) => fact
                .field("error", json!(err))
                .field("error_id", json!(id_str(ErrorId::E_ROLLBACK)))
                .emit_failure(),
            None => fact.emit_success(),
        }
    }
    let fact = slog.rollback_summary().merge(json!({
        "attempted": summary.attempted,
        "failed": summary.failed.iter().map(|(s, _)| s.as_str()).collect::<Vec<_>>(),
    }));
    if summary.is_clean() {
        fact.emit_success();
    } else {
        fact.field("error_id", json!(id_str(ErrorId::E_ROLLBACK))).emit_failure();
    }
    summary
}
