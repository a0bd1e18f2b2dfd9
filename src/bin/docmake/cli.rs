//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser};
use clap_complete::Shell;

/// docmake - A make-style front end for Sphinx documentation builds
///
/// Every TARGET other than `help` and `autobuild` is forwarded to
/// `sphinx-build -M`. Make variables can be set as NAME=VALUE arguments.
#[derive(Parser)]
#[command(name = "docmake")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Print the resolved settings as TOML instead of building
    #[arg(long, conflicts_with = "completions")]
    pub print_config: bool,

    /// Print shell completions for SHELL instead of building
    #[arg(long, value_name = "SHELL")]
    pub completions: Option<Shell>,

    #[command(flatten)]
    pub run: RunArgs,
}

/// Options that decide the resolved settings.
#[derive(Args)]
pub struct SettingsArgs {
    /// Run as if started in DIR
    #[arg(short = 'C', long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Project configuration file (defaults to docmake.toml)
    #[arg(long, value_name = "FILE", env = "DOCMAKE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Documentation source directory (SOURCEDIR)
    #[arg(long, value_name = "DIR")]
    pub source_dir: Option<String>,

    /// Build output directory (BUILDDIR)
    #[arg(long, value_name = "DIR")]
    pub build_dir: Option<String>,

    /// Generator command (SPHINXBUILD)
    #[arg(long, value_name = "COMMAND")]
    pub sphinx_build: Option<String>,

    /// Auto-rebuild server command (SPHINXAUTOBUILD)
    #[arg(long, value_name = "COMMAND")]
    pub sphinx_autobuild: Option<String>,

    /// Options for the generator, replacing SPHINXOPTS
    #[arg(long, value_name = "OPTIONS", allow_hyphen_values = true)]
    pub opts: Option<String>,
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Targets to build, or NAME=VALUE variable assignments
    #[arg(value_name = "TARGET")]
    pub targets: Vec<String>,

    /// Extra arguments appended to every invocation
    #[arg(last = true, value_name = "EXTRA")]
    pub passthrough: Vec<String>,

    /// Print the commands that would run, without running them
    #[arg(short = 'n', long, visible_alias = "just-print")]
    pub dry_run: bool,

    /// Keep running remaining targets after one fails
    #[arg(short, long)]
    pub keep_going: bool,
}
