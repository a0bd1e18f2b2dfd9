//! Dispatch targets to the documentation generator.
//!
//! Each target becomes one synchronous subprocess. Targets run in the order
//! given; the first failure stops the sequence unless `keep_going` is set,
//! mirroring `make` and `make -k`.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::invocation::Invocation;
use crate::core::target::Target;
use crate::util::config::Settings;
use crate::util::process::{self, ProcessError};

/// Runs planned invocations.
pub trait Executor {
    /// Run `invocation` to completion and return its exit code.
    fn run(&mut self, invocation: &Invocation, working_dir: Option<&Path>) -> Result<u8>;
}

/// Executor that spawns real processes with inherited stdio.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn run(&mut self, invocation: &Invocation, working_dir: Option<&Path>) -> Result<u8> {
        let status = invocation.to_process(working_dir).status()?;
        Ok(process::exit_code(status))
    }
}

/// Options for dispatching.
#[derive(Debug, Clone, Default)]
pub struct DispatchOptions {
    /// Targets to run, in order. Empty means `help`.
    pub targets: Vec<Target>,

    /// Arguments appended verbatim to every invocation.
    pub passthrough: Vec<String>,

    /// Print the command lines instead of running them.
    pub dry_run: bool,

    /// Keep running remaining targets after a failure.
    pub keep_going: bool,

    /// Working directory for the spawned tools.
    pub working_dir: Option<PathBuf>,
}

/// What happened to one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRecord {
    /// The target that was dispatched.
    pub target: Target,

    /// The command line it was mapped to.
    pub invocation: Invocation,

    /// Exit code, or `None` for a dry run.
    pub exit_code: Option<u8>,
}

/// Result of a dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Exit code docmake should report.
    pub exit_code: u8,

    /// Per-target records, in execution order.
    pub runs: Vec<RunRecord>,
}

impl DispatchOutcome {
    /// Whether every dispatched target succeeded.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Plan every target up front, so a bad option string fails before anything runs.
pub fn plan(settings: &Settings, options: &DispatchOptions) -> Result<Vec<(Target, Invocation)>> {
    let default_targets = [Target::default()];
    let targets = if options.targets.is_empty() {
        &default_targets[..]
    } else {
        &options.targets[..]
    };

    targets
        .iter()
        .map(|target| {
            let invocation = Invocation::plan(target, settings, &options.passthrough)
                .with_context(|| format!("failed to plan target `{}`", target))?;
            Ok((target.clone(), invocation))
        })
        .collect()
}

/// Dispatch the requested targets.
///
/// Dry runs write each command line to `out`; real runs hand each invocation
/// to `executor`.
pub fn dispatch(
    settings: &Settings,
    options: &DispatchOptions,
    executor: &mut dyn Executor,
    out: &mut dyn Write,
) -> Result<DispatchOutcome> {
    let planned = plan(settings, options)?;
    let working_dir = options.working_dir.as_deref();
    let mut outcome = DispatchOutcome::default();

    for (target, invocation) in planned {
        if options.dry_run {
            writeln!(out, "{}", invocation.display())?;
            outcome.runs.push(RunRecord {
                target,
                invocation,
                exit_code: None,
            });
            continue;
        }

        tracing::debug!("dispatching `{}` -> {}", target, invocation);
        let code = executor.run(&invocation, working_dir)?;
        if code != 0 {
            tracing::debug!("`{}` exited with code {}", target, code);
        }

        outcome.runs.push(RunRecord {
            target,
            invocation,
            exit_code: Some(code),
        });

        if code != 0 && outcome.exit_code == 0 {
            outcome.exit_code = code;
        }
        if code != 0 && !options.keep_going {
            break;
        }
    }

    Ok(outcome)
}

/// Exit code for an error that escaped dispatch.
pub fn error_exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ProcessError>())
        .map(ProcessError::exit_code)
        .unwrap_or(1)
}
