//! Backup stack: reversible changes recorded as they happen and unwound LIFO.
//!
//! Collaborators that modify the host call [`BackupController::record`] right after a
//! change succeeds. [`BackupController::pop_all`] drains the stack in reverse order,
//! calling each entry's `restore` once; a failing entry is logged and the unwind carries on.

pub mod files;
pub mod packages;

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use log::Level;

use crate::constants::DEFAULT_BACKUP_DIR;
use crate::logging::AuditSink;
use crate::types::{panic_message, Error, ErrorKind, Result};

pub use files::RestorableFile;
pub use packages::{InstalledPackage, PackageRemover};

/// A reversible change. `restore` must be idempotent.
pub trait RestorableChange: Send {
    fn name(&self) -> &str;
    fn restore(&mut self) -> Result<()>;
}

/// Outcome of restoring one entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RestoreReport {
    pub name: String,
    pub error: Option<String>,
}

/// Run `restore` with panics turned into errors.
pub(crate) fn restore_guarded(change: &mut dyn RestorableChange) -> std::result::Result<(), String> {
    match catch_unwind(AssertUnwindSafe(|| change.restore())) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(e.msg),
        Err(payload) => Err(format!("panicked: {}", panic_message(payload.as_ref()))),
    }
}

pub struct BackupController {
    stack: Vec<Box<dyn RestorableChange>>,
    backup_dir: PathBuf,
}

impl Default for BackupController {
    fn default() -> Self {
        Self::in_dir(DEFAULT_BACKUP_DIR)
    }
}

impl std::fmt::Debug for BackupController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackupController")
            .field("entries", &self.stack.iter().map(|c| c.name()).collect::<Vec<_>>())
            .field("backup_dir", &self.backup_dir)
            .finish()
    }
}

impl BackupController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Controller whose file snapshots go under `backup_dir`.
    #[must_use]
    pub fn in_dir(backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            stack: Vec::new(),
            backup_dir: backup_dir.into(),
        }
    }

    pub fn set_backup_dir(&mut self, backup_dir: impl Into<PathBuf>) {
        self.backup_dir = backup_dir.into();
    }

    #[must_use]
    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    pub fn record(&mut self, change: Box<dyn RestorableChange>) {
        self.stack.push(change);
    }

    /// Snapshot `path` into the backup directory and record it. Call before the file
    /// is modified.
    ///
    /// # Errors
    /// Returns an `Io` error when the snapshot cannot be written; nothing is recorded then.
    pub fn snapshot_file(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let snapshot = RestorableFile::backup(path, &self.backup_dir)?;
        self.record(Box::new(snapshot));
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Drain the stack newest first, restoring every entry exactly once.
    pub fn pop_all(&mut self, audit: &dyn AuditSink) -> Vec<RestoreReport> {
        let mut reports = Vec::with_capacity(self.stack.len());
        while let Some(mut change) = self.stack.pop() {
            let name = change.name().to_string();
            match restore_guarded(change.as_mut()) {
                Ok(()) => {
                    audit.log(Level::Info, &format!("Restored {name}."));
                    reports.push(RestoreReport { name, error: None });
                }
                Err(e) => {
                    audit.log(Level::Warn, &format!("Unable to restore {name}: {e}"));
                    reports.push(RestoreReport {
                        name,
                        error: Some(e),
                    });
                }
            }
        }
        reports
    }
}

/// Several restorables handled as one rollback step (e.g. every repository file).
/// Members are restored newest first; failures are collected, not short-circuited.
pub struct ChangeSet {
    name: String,
    members: Vec<Box<dyn RestorableChange>>,
}

impl ChangeSet {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    pub fn push(&mut self, change: Box<dyn RestorableChange>) {
        self.members.push(change);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl RestorableChange for ChangeSet {
    fn name(&self) -> &str {
        &self.name
    }

    fn restore(&mut self) -> Result<()> {
        let mut failed = Vec::new();
        for member in self.members.iter_mut().rev() {
            if let Err(e) = restore_guarded(member.as_mut()) {
                failed.push(format!("{}: {e}", member.name()));
            }
        }
        if failed.is_empty() {
            Ok(())
        } else {
            Err(Error::new(ErrorKind::Io, failed.join("; ")))
        }
    }
}
