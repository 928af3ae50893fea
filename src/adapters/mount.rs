//! Mount table inspection.

use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MountFlags {
    pub read_only: bool,
    pub no_exec: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MountError {
    #[error("unable to read the mount table: {0}")]
    Unreadable(String),
}

pub trait MountInspector: Send + Sync {
    /// Flags of the filesystem mounted exactly at `mount_point`, or `None` when nothing is
    /// mounted there.
    ///
    /// # Errors
    ///
    /// Returns a `MountError` if the mount table cannot be read.
    fn mounted_at(&self, mount_point: &Path) -> Result<Option<MountFlags>, MountError>;
}

/// Production inspector parsing `/proc/self/mounts`.
#[derive(Debug, Copy, Clone, Default)]
pub struct ProcMountsInspector;

impl MountInspector for ProcMountsInspector {
    fn mounted_at(&self, mount_point: &Path) -> Result<Option<MountFlags>, MountError> {
        let content = std::fs::read_to_string("/proc/self/mounts")
            .map_err(|e| MountError::Unreadable(e.to_string()))?;
        Ok(flags_from_table(&content, mount_point))
    }
}

/// Look up `mount_point` in a mount table. The last matching line wins, since later
/// mounts shadow earlier ones.
#[must_use]
pub fn flags_from_table(content: &str, mount_point: &Path) -> Option<MountFlags> {
    let mut found = None;
    for line in content.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let (Some(mnt), Some(opts)) = (parts.get(1), parts.get(3)) else {
            continue;
        };
        if Path::new(mnt) != mount_point {
            continue;
        }
        let opts = opts.to_ascii_lowercase();
        found = Some(MountFlags {
            read_only: opts.split(',').any(|o| o == "ro"),
            no_exec: opts.split(',').any(|o| o == "noexec"),
        });
    }
    found
}
