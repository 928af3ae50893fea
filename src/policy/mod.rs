//! Policy configuration and operator options.
//!
//! Consumers typically construct a [`Policy`](crate::policy::Policy) via
//! `Policy::default()` or `Policy::production_preset()` and then customize fields
//! before creating a [`Converter`](crate::Converter).

pub mod config;
pub mod types;

pub use config::Policy;
pub use types::{Activity, ToolOptions};
