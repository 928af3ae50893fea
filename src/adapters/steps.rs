//! Phase collaborators consumed by the conversion controller.
//!
//! Each trait covers the external work of one phase. The controller calls every
//! method at most once per run and decides what a failure means based on which
//! side of the point of no return it happened on.
use crate::backup::BackupController;
use crate::policy::ToolOptions;
use crate::types::{Result, SystemInfo};

/// Environment setup performed while the run is `Initializing`.
pub trait Bootstrap {
    fn require_root(&self) -> Result<()>;
    fn initialize_logger(&self) -> Result<()>;
    fn parse_cli(&self) -> Result<ToolOptions>;
    fn show_eula(&self) -> Result<()>;
}

/// Pre-PONR preparation. Any change made here must be recorded in `backups`
/// so rollback can undo it.
pub trait Preparation {
    fn resolve_system_info(&self) -> Result<SystemInfo> {
        SystemInfo::detect()
    }
    fn clean_metadata(&self) -> Result<()>;
    fn clear_versionlock(&self, backups: &mut BackupController) -> Result<()>;
}

/// The single operator-cancellable point of a run.
pub trait Confirmation {
    /// `Ok(true)` to continue past the point of no return.
    fn ask_to_continue(&self, options: &ToolOptions) -> Result<bool>;
}

/// Irreversible steps, run strictly in declaration order.
pub trait ConversionSteps {
    fn preserve_only_target_kernel(&self) -> Result<()>;
    fn run_transaction(&self) -> Result<()>;
    /// Packages from the original vendor that survived the transaction.
    fn list_foreign_packages_left(&self) -> Result<Vec<String>>;
    fn set_efi_configuration(&self, system: &SystemInfo) -> Result<()>;
    fn patch_package_manager_config(&self) -> Result<()>;
    fn lock_releasever(&self, system: &SystemInfo) -> Result<()>;
}

/// Post-conversion cleanup and reporting.
pub trait Finalization {
    fn modified_files_diff(&self) -> Result<()>;
    fn check_kernel_boot_files(&self) -> Result<()>;
    fn update_bootloader(&self, system: &SystemInfo) -> Result<()>;
    fn remove_tmp_dir(&self) -> Result<()>;
    fn update_custom_facts(&self) -> Result<()>;
    fn restart_system(&self, options: &ToolOptions) -> Result<()>;
}
