//! Best-effort unwind of everything changed before the point of no return.
//!
//! Restore collaborators are registered per [`RollbackStep`]; the generic backup stack
//! sits between the certificate and vars-directory steps. `rollback_changes` walks the
//! steps in [`RollbackStep::ORDER`], regardless of when the changes were recorded.
use std::collections::BTreeMap;

use log::Level;

use crate::backup::{restore_guarded, BackupController, RestorableChange};
use crate::logging::AuditSink;
use crate::types::RollbackSummary;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RollbackStep {
    Packages,
    RepoFiles,
    Subscription,
    Versionlock,
    Certificate,
    BackupStack,
    VarsDir,
}

impl RollbackStep {
    pub const ORDER: [RollbackStep; 7] = [
        RollbackStep::Packages,
        RollbackStep::RepoFiles,
        RollbackStep::Subscription,
        RollbackStep::Versionlock,
        RollbackStep::Certificate,
        RollbackStep::BackupStack,
        RollbackStep::VarsDir,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            RollbackStep::Packages => "packages",
            RollbackStep::RepoFiles => "repo_files",
            RollbackStep::Subscription => "subscription",
            RollbackStep::Versionlock => "versionlock",
            RollbackStep::Certificate => "certificate",
            RollbackStep::BackupStack => "backup_stack",
            RollbackStep::VarsDir => "varsdir",
        }
    }
}

impl std::fmt::Display for RollbackStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Default)]
pub struct RollbackOrchestrator {
    collaborators: BTreeMap<RollbackStep, Box<dyn RestorableChange>>,
    backups: BackupController,
}

impl RollbackOrchestrator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the restore collaborator for `step`, replacing any previous one.
    /// Changes registered for `BackupStack` are pushed onto the backup stack instead.
    pub fn register(&mut self, step: RollbackStep, change: Box<dyn RestorableChange>) {
        if step == RollbackStep::BackupStack {
            self.backups.record(change);
        } else {
            self.collaborators.insert(step, change);
        }
    }

    #[must_use]
    pub fn with_step(mut self, step: RollbackStep, change: Box<dyn RestorableChange>) -> Self {
        self.register(step, change);
        self
    }

    #[must_use]
    pub fn backups(&self) -> &BackupController {
        &self.backups
    }

    pub fn backups_mut(&mut self) -> &mut BackupController {
        &mut self.backups
    }

    /// Run every step once, in the fixed order. Failures are logged and collected;
    /// this never fails. Restored collaborators are consumed, so a second call only
    /// sees what was registered in between.
    pub fn rollback_changes(&mut self, audit: &dyn AuditSink) -> RollbackSummary {
        audit.log(Level::Warn, "Rolling back changes made during the conversion.");
        let mut summary = RollbackSummary::default();
        let mut pending = std::mem::take(&mut self.collaborators);

        for step in RollbackStep::ORDER {
            if step == RollbackStep::BackupStack {
                if self.backups.is_empty() {
                    audit.log(Level::Debug, "Nothing to restore for backup_stack.");
                    continue;
                }
                summary.attempted.push(step.to_string());
                let failed: Vec<String> = self
                    .backups
                    .pop_all(audit)
                    .into_iter()
                    .filter_map(|r| r.error.map(|e| format!("{}: {e}", r.name)))
                    .collect();
                if !failed.is_empty() {
                    summary.failed.push((step.to_string(), failed.join("; ")));
                }
                continue;
            }

            let Some(mut change) = pending.remove(&step) else {
                audit.log(Level::Debug, &format!("Nothing to restore for {step}."));
                continue;
            };
            summary.attempted.push(step.to_string());
            match restore_guarded(change.as_mut()) {
                Ok(()) => audit.log(Level::Info, &format!("Restored {}.", change.name())),
                Err(e) => {
                    audit.log(Level::Warn, &format!("Unable to restore {}: {e}", change.name()));
                    summary.failed.push((step.to_string(), e));
                }
            }
        }

        if summary.is_clean() {
            audit.log(Level::Info, "Rollback complete.");
        } else {
            let names: Vec<&str> = summary.failed.iter().map(|(s, _)| s.as_str()).collect();
            audit.log(
                Level::Error,
                &format!("Rollback finished with failures in: {}", names.join(", ")),
            );
        }
        summary
    }
}
