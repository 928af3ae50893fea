pub mod bootstrap;
pub mod firmware;
pub mod lock;
pub mod mount;
pub mod prompt;
pub mod rpm;
pub mod steps;

pub use bootstrap::DefaultBootstrap;
pub use firmware::{Firmware, SysFirmware};
pub use lock::file::FileLockManager;
pub use lock::{LockGuard, LockManager};
pub use mount::{MountFlags, MountInspector, ProcMountsInspector};
pub use prompt::StdinPrompt;
pub use rpm::RpmRemover;
pub use steps::{Bootstrap, Confirmation, ConversionSteps, Finalization, Preparation};
