//! Application service layer for the fin analyzer.
//!
//! Front-ends drive a [`Session`]: it owns the parameter model, runs the
//! solver off the calling thread through a single-flight [`ExecutionGuard`],
//! and keeps the last successful result as a snapshot for export.

pub mod config;
pub mod error;
pub mod guard;
pub mod session;

pub use config::FinConfig;
pub use error::{AppError, AppResult};
pub use guard::{ExecutionGuard, GuardState, SolveEvent, SubmitOutcome};
pub use session::Session;
