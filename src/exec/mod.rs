// src/exec/mod.rs

//! Backup engine execution layer.
//!
//! - [`invocation`] turns a requested operation into engine command lines.
//! - [`backend`] provides the `EngineBackend` trait and the process-based
//!   `CommandEngine` used in production.
//! - [`executor`] owns the operation ordering and short-circuit policy.

pub mod backend;
pub mod executor;
pub mod invocation;

pub use backend::{CommandEngine, EngineBackend};
pub use executor::OperationExecutor;
pub use invocation::{plan, EngineOptions, Invocation};
