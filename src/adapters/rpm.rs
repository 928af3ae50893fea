use std::path::PathBuf;
use std::process::Command;

use crate::backup::packages::PackageRemover;
use crate::types::{Error, ErrorKind, Result};

/// Removes packages with `rpm -e --nodeps`, leaving dependency handling to the
/// caller that recorded the install.
#[derive(Debug, Clone)]
pub struct RpmRemover {
    program: PathBuf,
}

impl Default for RpmRemover {
    fn default() -> Self {
        Self {
            program: PathBuf::from("rpm"),
        }
    }
}

impl RpmRemover {
    #[must_use]
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl PackageRemover for RpmRemover {
    fn remove(&self, name: &str) -> Result<()> {
        let output = Command::new(&self.program)
            .args(["-e", "--nodeps", name])
            .output()
            .map_err(|e| Error::new(ErrorKind::Command, format!("unable to run {}: {e}", self.program.display())))?;
        if output.status.success() {
            Ok(())
        } else {
            Err(Error::new(
                ErrorKind::Command,
                format!(
                    "rpm -e {name} failed: {}",
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ))
        }
    }
}
