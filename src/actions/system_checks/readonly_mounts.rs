//! The package transaction writes below `/mnt` and `/sys`; neither may be mounted
//! read-only.
use std::path::Path;
use std::sync::Arc;

use log::Level;

use crate::actions::{Action, ActionContext};
use crate::adapters::MountInspector;
use crate::types::{Error, ErrorKind, Outcome, Result};

pub const MNT_DIR_READONLY_MOUNT: &str = "MNT_DIR_READONLY_MOUNT";
pub const SYS_DIR_READONLY_MOUNT: &str = "SYS_DIR_READONLY_MOUNT";

const CHECKED: [(&str, &str); 2] = [("/mnt", MNT_DIR_READONLY_MOUNT), ("/sys", SYS_DIR_READONLY_MOUNT)];

pub struct ReadonlyMounts {
    mounts: Arc<dyn MountInspector>,
}

impl ReadonlyMounts {
    pub const ID: &'static str = "readonly_mounts";

    #[must_use]
    pub fn new(mounts: Arc<dyn MountInspector>) -> Self {
        Self { mounts }
    }
}

impl Action for ReadonlyMounts {
    fn id(&self) -> &str {
        Self::ID
    }

    fn run(&self, ctx: &ActionContext<'_>) -> Result<Outcome> {
        for (dir, error_id) in CHECKED {
            let flags = self
                .mounts
                .mounted_at(Path::new(dir))
                .map_err(|e| Error::new(ErrorKind::Io, e.to_string()))?;
            if flags.is_some_and(|f| f.read_only) {
                return Ok(Outcome::error(
                    error_id,
                    format!(
                        "Stopping conversion due to read-only mount to {dir} directory.\n\
                         Mount at a subdirectory of {dir} to have {dir} writeable."
                    ),
                ));
            }
            ctx.log(Level::Debug, &format!("{dir} mount point is not read-only."));
        }
        Ok(Outcome::success())
    }
}
