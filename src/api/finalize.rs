//! `Finalizing`: cleanup and reporting after a successful conversion.
use super::errors::{ErrorId, StepError};
use crate::adapters::Finalization;
use crate::policy::ToolOptions;
use crate::types::SystemInfo;

/// Run the finalization steps. `facts_attempted` is set once the custom facts update
/// has been tried, so a later failure does not retry it.
pub(super) fn run(
    fin: &dyn Finalization,
    system: &SystemInfo,
    options: &ToolOptions,
    facts_attempted: &mut bool,
) -> Result<(), StepError> {
    let tag = |step: &'static str| StepError::tag(ErrorId::E_FINALIZE, step);
    fin.modified_files_diff().map_err(tag("modified_files_diff"))?;
    fin.check_kernel_boot_files().map_err(tag("check_kernel_boot_files"))?;
    fin.update_bootloader(system).map_err(tag("update_bootloader"))?;
    fin.remove_tmp_dir().map_err(tag("remove_tmp_dir"))?;
    *facts_attempted = true;
    fin.update_custom_facts().map_err(tag("update_custom_facts"))?;
    fin.restart_system(options).map_err(tag("restart_system"))?;
    Ok(())
}
