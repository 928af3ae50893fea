//! `Initializing`: lock, privileges, logger, options and license.
use log::Level;

use super::errors::{ErrorId, StepError};
use crate::adapters::{Bootstrap, LockGuard, LockManager};
use crate::logging::AuditSink;
use crate::policy::ToolOptions;

pub(super) fn acquire_lock(
    lock: &dyn LockManager,
    timeout_ms: u64,
    audit: &dyn AuditSink,
) -> Result<Box<dyn LockGuard>, StepError> {
    let guard = lock
        .acquire_run_lock(timeout_ms)
        .map_err(StepError::tag(ErrorId::E_SETUP, "lock"))?;
    audit.log(Level::Debug, "Run lock acquired.");
    Ok(guard)
}

pub(super) fn run(bootstrap: &dyn Bootstrap, audit: &dyn AuditSink) -> Result<ToolOptions, StepError> {
    let tag = |step: &'static str| StepError::tag(ErrorId::E_SETUP, step);
    bootstrap.require_root().map_err(tag("require_root"))?;
    bootstrap.initialize_logger().map_err(tag("initialize_logger"))?;
    let options = bootstrap.parse_cli().map_err(tag("parse_cli"))?;
    audit.log(Level::Info, &format!("Activity: {}.", options.activity.as_str()));
    bootstrap.show_eula().map_err(tag("show_eula"))?;
    Ok(options)
}
