//! Shared task-dispatch domain primitives.
//!
//! This crate owns trigger parsing, placement resolution rules, and the
//! launch request/response contracts. It intentionally excludes AWS SDK and
//! Lambda runtime concerns, which live in `task_dispatch_lambda`.

pub mod config;
pub mod error;
pub mod launch;
pub mod placement;
pub mod response;
pub mod trigger;
