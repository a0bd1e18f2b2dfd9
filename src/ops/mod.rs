//! High-level operations.

pub mod dispatch;

pub use dispatch::{dispatch, error_exit_code, plan, DispatchOptions, DispatchOutcome, RunRecord};
