pub mod file;
use crate::types::errors::Result;

pub trait LockGuard: Send {}

/// Guarantees a single conversion run per host.
pub trait LockManager: Send + Sync {
    /// Acquire the run lock with the specified timeout.
    /// # Errors
    /// Returns an error if the lock cannot be acquired within the timeout period.
    fn acquire_run_lock(&self, timeout_ms: u64) -> Result<Box<dyn LockGuard>>;
}
