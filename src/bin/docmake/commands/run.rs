//! Dispatching targets and printing the resolved settings

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};

use crate::cli::{RunArgs, SettingsArgs};
use docmake::ops::dispatch::{dispatch, DispatchOptions, SystemExecutor};
use docmake::util::config::{
    global_config_path, load_config, parse_assignment, project_config_path, Config, Settings,
};
use docmake::Target;

pub fn execute(args: RunArgs) -> Result<ExitCode> {
    let (settings, targets) = resolve(&args)?;

    let options = DispatchOptions {
        targets,
        passthrough: args.passthrough,
        dry_run: args.dry_run,
        keep_going: args.keep_going,
        working_dir: args.settings.directory.clone(),
    };

    let outcome = dispatch(&settings, &options, &mut SystemExecutor, &mut io::stdout())?;
    Ok(ExitCode::from(outcome.exit_code))
}

/// Print the resolved settings as TOML. Target names are ignored.
pub fn print_config(args: RunArgs) -> Result<()> {
    let (settings, _) = resolve(&args)?;
    print!("{}", toml::to_string_pretty(&settings)?);
    Ok(())
}

/// Resolve settings and split the positional words into targets.
///
/// `NAME=VALUE` arguments sit between the environment and the flags.
fn resolve(args: &RunArgs) -> Result<(Settings, Vec<Target>)> {
    let mut settings = resolve_settings(&args.settings)?;

    let mut targets = Vec::new();
    for arg in &args.targets {
        match parse_assignment(arg) {
            Some((name, value)) => assign(&mut settings, name, value),
            None => targets.push(Target::parse(arg)),
        }
    }
    apply_flags(&mut settings, &args.settings);

    Ok((settings, targets))
}

/// Resolve settings from config files and the environment.
fn resolve_settings(args: &SettingsArgs) -> Result<Settings> {
    let root = match &args.directory {
        Some(dir) => {
            let metadata = std::fs::metadata(dir)
                .with_context(|| format!("{}: No such file or directory", dir.display()))?;
            if !metadata.is_dir() {
                bail!("{}: Not a directory", dir.display());
            }
            dir.clone()
        }
        None => std::env::current_dir().context("failed to determine current directory")?,
    };

    let global = global_config_path();
    let config = match &args.config {
        Some(path) => {
            let path: PathBuf = root.join(path);
            let mut config = global
                .as_deref()
                .map(Config::load_or_default)
                .unwrap_or_default();
            config.merge(Config::load(&path)?);
            config
        }
        None => load_config(global.as_deref(), &project_config_path(&root)),
    };

    let mut settings = Settings::from_config(&config);
    settings.apply_env(|name| std::env::var(name).ok());
    Ok(settings)
}

/// Apply a `NAME=VALUE` argument.
fn assign(settings: &mut Settings, name: &str, value: &str) {
    if settings.assign(name, value) {
        tracing::debug!("{} set on command line: {:?}", name, value);
    } else {
        tracing::warn!("ignoring unknown variable `{}`", name);
    }
}

/// Apply explicit flags, which take precedence over everything else.
fn apply_flags(settings: &mut Settings, args: &SettingsArgs) {
    let overrides = [
        (&args.source_dir, &mut settings.source_dir),
        (&args.build_dir, &mut settings.build_dir),
        (&args.sphinx_build, &mut settings.sphinx_build),
        (&args.sphinx_autobuild, &mut settings.sphinx_autobuild),
        (&args.opts, &mut settings.sphinx_opts),
    ];
    for (flag, slot) in overrides {
        if let Some(value) = flag {
            *slot = value.clone();
        }
    }
}
