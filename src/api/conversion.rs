//! `PostPonrConversion`: the irreversible steps, strictly one after another.
use log::Level;

use super::errors::{ErrorId, StepError};
use crate::adapters::ConversionSteps;
use crate::logging::AuditSink;
use crate::types::SystemInfo;

pub(super) fn run(steps: &dyn ConversionSteps, system: &SystemInfo, audit: &dyn AuditSink) -> Result<(), StepError> {
    let tag = |step: &'static str| StepError::tag(ErrorId::E_CONVERSION, step);

    audit.log(Level::Info, "Preserving only the target vendor kernel.");
    steps.preserve_only_target_kernel().map_err(tag("preserve_only_target_kernel"))?;

    audit.log(Level::Info, "Running the package transaction.");
    steps.run_transaction().map_err(tag("run_transaction"))?;

    let left = steps
        .list_foreign_packages_left()
        .map_err(tag("list_foreign_packages_left"))?;
    if !left.is_empty() {
        audit.log(
            Level::Warn,
            &format!(
                "The following packages from the original vendor were not replaced: {}",
                left.join(", ")
            ),
        );
    }

    steps.set_efi_configuration(system).map_err(tag("set_efi_configuration"))?;
    steps
        .patch_package_manager_config()
        .map_err(tag("patch_package_manager_config"))?;
    steps.lock_releasever(system).map_err(tag("lock_releasever"))?;
    Ok(())
}
