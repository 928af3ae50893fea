//! Action execution framework.
//!
//! An [`Action`] is one read-only pre-flight check. Actions are registered once in an
//! [`ActionRegistry`], which validates ids and dependencies and plans execution waves;
//! [`run_actions`] executes the waves and returns exactly one [`ActionResult`] per
//! action, in wave order.
//!
//! [`ActionResult`]: crate::types::ActionResult

pub mod registry;
pub mod report;
pub mod runner;
pub mod system_checks;

use log::Level;

use crate::logging::AuditSink;
use crate::types::{Outcome, Result, SystemInfo};

pub use registry::{ActionRegistry, RegistryError};
pub use runner::{find_actions_of_severity, run_actions, SKIP_ID, UNEXPECTED_ERROR_ID};

/// Everything an action may look at. Deliberately read-only: actions never see the
/// backup stack.
#[derive(Clone, Copy)]
pub struct ActionContext<'a> {
    pub system: &'a SystemInfo,
    pub audit: &'a dyn AuditSink,
}

impl<'a> ActionContext<'a> {
    #[must_use]
    pub fn new(system: &'a SystemInfo, audit: &'a dyn AuditSink) -> Self {
        Self { system, audit }
    }

    pub fn log(&self, level: Level, msg: &str) {
        self.audit.log(level, msg);
    }
}

/// A single pre-flight check.
///
/// `run` inspects the host and reports one [`Outcome`]; returning `Outcome::default()`
/// means success. An `Err` or a panic is turned into an `UNEXPECTED_ERROR` result by
/// the runner.
pub trait Action: Send + Sync {
    fn id(&self) -> &str;

    /// Ids of actions that must finish before this one starts.
    fn dependencies(&self) -> &[&str] {
        &[]
    }

    fn run(&self, ctx: &ActionContext<'_>) -> Result<Outcome>;
}
