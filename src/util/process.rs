//! Subprocess execution utilities.

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use thiserror::Error;

/// Exit code a shell reports when a command cannot be found.
pub const EXIT_NOT_FOUND: u8 = 127;

/// Exit code a shell reports when a command is found but cannot be executed.
pub const EXIT_NOT_EXECUTABLE: u8 = 126;

/// Failure to start a subprocess.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("`{program}`: command not found")]
    NotFound { program: String },

    #[error("`{program}`: permission denied")]
    NotExecutable { program: String },

    #[error("failed to execute `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

impl ProcessError {
    /// The exit code a shell would report for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            ProcessError::NotFound { .. } => EXIT_NOT_FOUND,
            ProcessError::NotExecutable { .. } => EXIT_NOT_EXECUTABLE,
            ProcessError::Spawn { .. } => 1,
        }
    }

    fn from_io(program: &Path, source: io::Error) -> Self {
        let program = program.display().to_string();
        match source.kind() {
            io::ErrorKind::NotFound => ProcessError::NotFound { program },
            io::ErrorKind::PermissionDenied => ProcessError::NotExecutable { program },
            _ => ProcessError::Spawn { program, source },
        }
    }
}

/// Builder for subprocess execution.
///
/// The child inherits stdin, stdout and stderr, so the tool's own output and
/// diagnostics reach the terminal untouched.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Get the program path.
    pub fn get_program(&self) -> &Path {
        &self.program
    }

    /// Get the arguments.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Resolve the program to an executable path.
    ///
    /// Bare names are searched on `PATH` (relative to the working directory
    /// if one is set); anything containing a path separator is used as given.
    pub fn resolve_program(&self) -> Result<PathBuf, ProcessError> {
        let has_separator = self
            .program
            .to_string_lossy()
            .chars()
            .any(std::path::is_separator);
        if has_separator {
            return Ok(self.program.clone());
        }

        let found = match &self.cwd {
            Some(cwd) => which::which_in(&self.program, std::env::var_os("PATH"), cwd),
            None => which::which(&self.program),
        };
        found.map_err(|_| ProcessError::NotFound {
            program: self.program.display().to_string(),
        })
    }

    /// Build the Command.
    fn build_command(&self, program: &Path) -> Command {
        let mut cmd = Command::new(program);
        cmd.args(&self.args);

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    /// Execute the command with inherited stdio and wait for it to finish.
    pub fn status(&self) -> Result<ExitStatus, ProcessError> {
        let program = self.resolve_program()?;
        tracing::debug!("running `{}`", self.display_command());

        self.build_command(&program)
            .status()
            .map_err(|e| ProcessError::from_io(&self.program, e))
    }

    /// Display the command for error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Map a finished process's status to the exit code a shell would report.
pub fn exit_code(status: ExitStatus) -> u8 {
    if let Some(code) = status.code() {
        // Shells only ever see the low byte.
        return (code & 0xff) as u8;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128u8.wrapping_add((signal & 0x7f) as u8);
        }
    }

    1
}
