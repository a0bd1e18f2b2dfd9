//! Test utilities for docmake unit tests.
//!
//! Provides an [`Executor`] that records invocations instead of spawning
//! processes, so dispatch behavior can be checked without a real generator.
//!
//! # Example
//!
//! ```rust,ignore
//! use docmake::test_support::RecordingExecutor;
//!
//! let mut exec = RecordingExecutor::new();
//! exec.exit_with("linkcheck", 1);
//! // dispatch(..., &mut exec, ...)
//! assert_eq!(exec.calls(), &["sphinx-build -M linkcheck . _build"]);
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::invocation::Invocation;
use crate::ops::dispatch::Executor;

/// Executor that records every invocation and returns scripted exit codes.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    exit_codes: HashMap<String, u8>,
    calls: Vec<String>,
    working_dirs: Vec<Option<PathBuf>>,
}

impl RecordingExecutor {
    /// Create an executor where every invocation succeeds.
    pub fn new() -> Self {
        RecordingExecutor::default()
    }

    /// Make invocations whose arguments contain `arg` exit with `code`.
    pub fn exit_with(&mut self, arg: &str, code: u8) -> &mut Self {
        self.exit_codes.insert(arg.to_string(), code);
        self
    }

    /// Get all command lines that were run, in order.
    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    /// Get the working directory passed with each call.
    pub fn working_dirs(&self) -> &[Option<PathBuf>] {
        &self.working_dirs
    }
}

impl Executor for RecordingExecutor {
    fn run(&mut self, invocation: &Invocation, working_dir: Option<&Path>) -> Result<u8> {
        self.calls.push(invocation.display());
        self.working_dirs.push(working_dir.map(Path::to_path_buf));

        let code = invocation
            .args
            .iter()
            .find_map(|arg| self.exit_codes.get(arg))
            .copied()
            .unwrap_or(0);
        Ok(code)
    }
}
