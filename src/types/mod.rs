pub mod boot;
pub mod errors;
pub mod ids;
pub mod phase;
pub mod report;
pub mod result;
pub mod severity;
pub mod system;

pub use boot::*;
pub use errors::*;
pub use phase::*;
pub use report::*;
pub use result::*;
pub use severity::*;
pub use system::*;
