//! AWS-oriented adapters and handlers for triggered task dispatch.
//!
//! This crate owns runtime integration details (the Lambda handler and the
//! networking/orchestration adapter seams) on top of the pure primitives in
//! `task_dispatch_core`.

pub mod adapters;
pub mod handlers;
pub mod logging;
