use std::path::PathBuf;

use crate::constants::{
    DEFAULT_BACKUP_DIR, DEFAULT_EULA_PATH, DEFAULT_LOCK_PATH, DEFAULT_LOCK_TIMEOUT_MS,
};
use crate::types::Severity;

/// Policy governs how check findings gate a conversion and where run state lives.
#[derive(Clone, Debug)]
pub struct Policy {
    /// Findings at or above this severity block the conversion.
    pub block_threshold: Severity,
    /// Run independent checks of one dependency wave on separate threads.
    pub parallel_actions: bool,
    /// Where `BackupController::snapshot_file` copies files before they are modified.
    pub backup_dir: PathBuf,
    pub log_dir: PathBuf,
    pub eula_path: PathBuf,
    /// Run lock taken by `Converter::run` unless a lock manager is injected.
    pub lock_path: PathBuf,
    pub lock_timeout_ms: u64,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            block_threshold: Severity::Error,
            parallel_actions: true,
            backup_dir: PathBuf::from(DEFAULT_BACKUP_DIR),
            log_dir: PathBuf::from("/var/log/distroswap"),
            eula_path: PathBuf::from(DEFAULT_EULA_PATH),
            lock_path: PathBuf::from(DEFAULT_LOCK_PATH),
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
        }
    }
}

impl Policy {
    /// Construct a Policy with the recommended **production defaults**.
    ///
    /// Tightens the gate so that `Overridable` findings also block; an operator who
    /// has reviewed them lowers the threshold back to `Error` explicitly.
    ///
    /// # Example
    /// ```rust
    /// use distroswap::policy::Policy;
    /// use distroswap::types::Severity;
    ///
    /// let mut policy = Policy::production_preset();
    /// assert_eq!(policy.block_threshold, Severity::Overridable);
    /// policy.block_threshold = Severity::Error; // findings reviewed
    /// ```
    #[must_use]
    pub fn production_preset() -> Self {
        let mut p = Self::default();
        p.apply_production_preset();
        p
    }

    /// Mutate this Policy to apply the recommended **production defaults**.
    pub fn apply_production_preset(&mut self) -> &mut Self {
        self.block_threshold = Severity::Overridable;
        self.parallel_actions = true;
        self
    }

    /// Policy rooted under a scratch directory, for tests and dry runs on a copy of a host.
    #[must_use]
    pub fn rooted_at(root: &std::path::Path) -> Self {
        Self {
            backup_dir: root.join("backup"),
            log_dir: root.join("log"),
            eula_path: root.join("GPLv3.txt"),
            lock_path: root.join("distroswap.lock"),
            ..Self::default()
        }
    }
}
