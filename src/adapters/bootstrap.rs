//! Default environment setup for a conversion run.
use std::path::PathBuf;

use super::steps::Bootstrap;
use crate::policy::ToolOptions;
use crate::types::{Error, ErrorKind, Result};

/// Root check via `geteuid`, log directory creation, options from the environment
/// and the license text from disk.
#[derive(Debug, Clone)]
pub struct DefaultBootstrap {
    pub log_dir: PathBuf,
    pub eula_path: PathBuf,
}

impl DefaultBootstrap {
    #[must_use]
    pub fn new(log_dir: PathBuf, eula_path: PathBuf) -> Self {
        Self { log_dir, eula_path }
    }
}

impl Bootstrap for DefaultBootstrap {
    fn require_root(&self) -> Result<()> {
        if rustix::process::geteuid().is_root() {
            Ok(())
        } else {
            Err(Error::new(
                ErrorKind::Policy,
                "The tool needs to be run under the root user.",
            ))
        }
    }

    fn initialize_logger(&self) -> Result<()> {
        std::fs::create_dir_all(&self.log_dir).map_err(|e| {
            Error::new(
                ErrorKind::Io,
                format!("Unable to create log directory {}: {e}", self.log_dir.display()),
            )
        })
    }

    fn parse_cli(&self) -> Result<ToolOptions> {
        Ok(ToolOptions::from_env())
    }

    fn show_eula(&self) -> Result<()> {
        let text = std::fs::read_to_string(&self.eula_path).map_err(|_| {
            Error::new(
                ErrorKind::Io,
                format!("EULA file not found at {}.", self.eula_path.display()),
            )
        })?;
        log::info!(target: "distroswap", "{}", text.trim_end());
        Ok(())
    }
}
