use std::sync::Arc;

use super::RestorableChange;
use crate::types::Result;

/// Uninstalls a single package by name.
pub trait PackageRemover: Send + Sync {
    fn remove(&self, name: &str) -> Result<()>;
}

/// A package this run installed; undoing it removes the package again.
pub struct InstalledPackage {
    package: String,
    name: String,
    remover: Arc<dyn PackageRemover>,
    removed: bool,
}

impl InstalledPackage {
    #[must_use]
    pub fn new(package: impl Into<String>, remover: Arc<dyn PackageRemover>) -> Self {
        let package = package.into();
        Self {
            name: format!("installed package {package}"),
            package,
            remover,
            removed: false,
        }
    }
}

impl RestorableChange for InstalledPackage {
    fn name(&self) -> &str {
        &self.name
    }

    fn restore(&mut self) -> Result<()> {
        if self.removed {
            return Ok(());
        }
        self.remover.remove(&self.package)?;
        self.removed = true;
        Ok(())
    }
}
