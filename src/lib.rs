#![forbid(unsafe_code)]
//! distroswap: in-place conversion of a running Linux distribution to another vendor build.
//!
//! Run model highlights:
//! - Read-only pre-flight checks (`actions`) run in dependency waves and produce one
//!   severity-classified result each; findings at or above the policy threshold block.
//! - Every reversible change made before the point of no return (PONR) is recorded and
//!   unwound best-effort, in a fixed order, on any pre-PONR failure (`backup`, `rollback`).
//! - The phase controller (`api::Converter`) crosses the PONR at most once; failures after
//!   it are reported as an undetermined state and never rolled back.
//! - This crate forbids `unsafe` and uses `rustix` for the few syscalls it needs.

pub mod actions;
pub mod adapters;
pub mod api;
pub mod backup;
pub mod constants;
pub mod logging;
pub mod policy;
pub mod rollback;
pub mod types;

pub use api::*;
