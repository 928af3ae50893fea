//! Built-in pre-conversion checks.
use std::sync::Arc;

use super::{Action, ActionRegistry, RegistryError};
use crate::adapters::{Firmware, MountInspector};

pub mod efi;
pub mod readonly_mounts;

pub use efi::Efi;
pub use readonly_mounts::ReadonlyMounts;

/// The checks a conversion runs by default.
///
/// # Errors
/// Only on a registration fault, which would be a bug in this list.
pub fn default_registry(
    firmware: Arc<dyn Firmware>,
    mounts: Arc<dyn MountInspector>,
) -> Result<ActionRegistry, RegistryError> {
    let actions: Vec<Box<dyn Action>> = vec![Box::new(Efi::new(firmware)), Box::new(ReadonlyMounts::new(mounts))];
    ActionRegistry::new(actions)
}
