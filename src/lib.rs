//! docmake - A make-style front end for Sphinx documentation builds
//!
//! This crate maps target names to documentation generator command lines
//! and runs them, replacing the conventional documentation `Makefile`.

pub mod core;
pub mod ops;
pub mod util;

/// Test utilities for docmake unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides an executor that records invocations
/// instead of spawning processes.
#[cfg(test)]
pub mod test_support;

pub use core::{invocation::Invocation, target::Target};
pub use ops::dispatch::{dispatch, DispatchOptions, DispatchOutcome, Executor, SystemExecutor};
pub use util::config::{Config, Settings};
