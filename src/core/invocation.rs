//! Planning the external command line for a target.

use std::fmt;
use std::path::Path;

use crate::core::target::Target;
use crate::util::config::Settings;
use crate::util::process::ProcessBuilder;
use crate::util::words::{self, WordsError};

/// Flag selecting the generator's make mode.
pub const MAKE_MODE_FLAG: &str = "-M";

/// Parallel jobs used by the auto-rebuilding server.
pub const AUTOBUILD_JOBS: u32 = 4;

/// Port offset handed to the auto-rebuilding server.
pub const AUTOBUILD_PORT_OFFSET: u16 = 4444;

/// Auto-builder flag requesting a full rebuild when a file changes.
pub const AUTOBUILD_REBUILD_FLAG: &str = "-B";

/// One fully expanded external command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program to run (a bare name is looked up on `PATH`).
    pub program: String,
    /// Arguments, in order.
    pub args: Vec<String>,
}

impl Invocation {
    /// Plan the command line for `target`.
    ///
    /// `passthrough` arguments are appended verbatim, after everything else.
    pub fn plan(
        target: &Target,
        settings: &Settings,
        passthrough: &[String],
    ) -> Result<Invocation, WordsError> {
        let mut invocation = match target.build_mode() {
            Some(mode) => {
                let mut invocation = Invocation::from_command(&settings.sphinx_build)?;
                invocation.args.push(MAKE_MODE_FLAG.to_string());
                invocation.args.push(mode.to_string());
                invocation.args.push(settings.source_dir.clone());
                invocation.args.push(settings.build_dir.clone());
                invocation.args.extend(words::split(&settings.sphinx_opts)?);
                invocation.args.extend(words::split(&settings.extra_opts)?);
                invocation
            }
            None => {
                let mut invocation = Invocation::from_command(&settings.sphinx_autobuild)?;
                invocation.args.extend(autobuild_flags());
                invocation.args.push(settings.source_dir.clone());
                invocation.args.push(settings.build_dir.clone());
                invocation
            }
        };

        invocation.args.extend(passthrough.iter().cloned());
        Ok(invocation)
    }

    /// Split a tool command such as `python -m sphinx` into program and
    /// leading arguments.
    pub fn from_command(command: &str) -> Result<Invocation, WordsError> {
        let mut parts = words::split(command)?.into_iter();
        let program = parts.next().ok_or(WordsError::EmptyCommand)?;
        Ok(Invocation {
            program,
            args: parts.collect(),
        })
    }

    /// Render the command line the way a shell would accept it.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(words::quote)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Turn this plan into a runnable process.
    pub fn to_process(&self, working_dir: Option<&Path>) -> ProcessBuilder {
        let pb = ProcessBuilder::new(&self.program).args(&self.args);
        match working_dir {
            Some(dir) => pb.cwd(dir),
            None => pb,
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// The fixed auto-builder flags: `-j4 -B -p4444`.
pub fn autobuild_flags() -> [String; 3] {
    [
        format!("-j{}", AUTOBUILD_JOBS),
        AUTOBUILD_REBUILD_FLAG.to_string(),
        format!("-p{}", AUTOBUILD_PORT_OFFSET),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(target: &str, settings: &Settings) -> Invocation {
        Invocation::plan(&Target::parse(target), settings, &[]).unwrap()
    }

    #[test]
    fn test_html_with_defaults() {
        let inv = plan("html", &Settings::default());
        assert_eq!(inv.program, "sphinx-build");
        assert_eq!(inv.args, vec!["-M", "html", ".", "_build"]);
        assert_eq!(inv.display(), "sphinx-build -M html . _build");
    }

    #[test]
    fn test_any_name_is_forwarded_verbatim() {
        for name in ["latexpdf", "linkcheck", "Help", "weird name", ""] {
            let inv = plan(name, &Settings::default());
            assert_eq!(inv.program, "sphinx-build");
            assert_eq!(inv.args, vec!["-M", name, ".", "_build"]);
        }
    }

    #[test]
    fn test_help_matches_generic_path() {
        let settings = Settings {
            sphinx_opts: "-q".into(),
            ..Settings::default()
        };
        let help = plan("help", &settings);
        let generic = Invocation::plan(&Target::Mode("help".into()), &settings, &[]).unwrap();
        assert_eq!(help, generic);
        assert_eq!(help.args, vec!["-M", "help", ".", "_build", "-q"]);
    }

    #[test]
    fn test_autobuild_flags() {
        let inv = plan("autobuild", &Settings::default());
        assert_eq!(inv.program, "sphinx-autobuild");
        assert_eq!(inv.args, vec!["-j4", "-B", "-p4444", ".", "_build"]);
    }

    #[test]
    fn test_autobuild_ignores_sphinxopts() {
        let settings = Settings {
            sphinx_opts: "-W".into(),
            extra_opts: "-q".into(),
            ..Settings::default()
        };
        let inv = plan("autobuild", &settings);
        assert_eq!(inv.args, vec!["-j4", "-B", "-p4444", ".", "_build"]);
    }

    #[test]
    fn test_extra_options_follow_directories() {
        let settings = Settings {
            sphinx_opts: "-W --keep-going -D 'project=My Docs'".into(),
            extra_opts: "-j auto".into(),
            ..Settings::default()
        };
        let passthrough = vec!["-E".to_string()];
        let inv = Invocation::plan(&Target::parse("html"), &settings, &passthrough).unwrap();
        assert_eq!(
            inv.args,
            vec![
                "-M",
                "html",
                ".",
                "_build",
                "-W",
                "--keep-going",
                "-D",
                "project=My Docs",
                "-j",
                "auto",
                "-E"
            ]
        );
        assert_eq!(
            inv.display(),
            "sphinx-build -M html . _build -W --keep-going -D 'project=My Docs' -j auto -E"
        );
    }

    #[test]
    fn test_directories_change_only_their_argument() {
        let base = Settings::default();
        let moved = Settings {
            source_dir: "docs source".into(),
            build_dir: "/tmp/out".into(),
            ..Settings::default()
        };

        for target in ["html", "help", "autobuild"] {
            let before = plan(target, &base);
            let after = plan(target, &moved);
            assert_eq!(before.program, after.program);
            assert_eq!(before.args.len(), after.args.len());

            let changed: Vec<_> = before
                .args
                .iter()
                .zip(&after.args)
                .filter(|(a, b)| a != b)
                .map(|(_, b)| b.as_str())
                .collect();
            assert_eq!(changed, vec!["docs source", "/tmp/out"]);
        }
    }

    #[test]
    fn test_tool_command_with_leading_args() {
        let settings = Settings {
            sphinx_build: "python3 -m sphinx".into(),
            ..Settings::default()
        };
        let inv = plan("html", &settings);
        assert_eq!(inv.program, "python3");
        assert_eq!(inv.args, vec!["-m", "sphinx", "-M", "html", ".", "_build"]);
    }

    #[test]
    fn test_empty_tool_is_an_error() {
        let settings = Settings {
            sphinx_build: "   ".into(),
            ..Settings::default()
        };
        let err = Invocation::plan(&Target::parse("html"), &settings, &[]).unwrap_err();
        assert_eq!(err, WordsError::EmptyCommand);
    }

    #[test]
    fn test_bad_quoting_in_options_is_an_error() {
        let settings = Settings {
            sphinx_opts: "-D 'unterminated".into(),
            ..Settings::default()
        };
        let err = Invocation::plan(&Target::parse("html"), &settings, &[]).unwrap_err();
        assert!(matches!(err, WordsError::UnterminatedQuote { .. }));
    }

    #[test]
    fn test_to_process() {
        let inv = plan("html", &Settings::default());
        let pb = inv.to_process(None);
        assert_eq!(pb.get_program(), Path::new("sphinx-build"));
        assert_eq!(pb.get_args(), inv.args.as_slice());
    }
}
