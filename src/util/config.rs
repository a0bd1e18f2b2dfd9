//! Configuration file support and settings resolution.
//!
//! docmake reads two optional configuration files:
//! - Global: `~/.docmake/config.toml` - User-wide defaults
//! - Project: `docmake.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. On top of the files,
//! the familiar make variables (`SPHINXBUILD`, `SOURCEDIR`, ...) are honored
//! from the environment and from `NAME=VALUE` arguments, in that order.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default documentation generator command.
pub const DEFAULT_SPHINX_BUILD: &str = "sphinx-build";

/// Default auto-rebuilding server command.
pub const DEFAULT_SPHINX_AUTOBUILD: &str = "sphinx-autobuild";

/// Default documentation source directory.
pub const DEFAULT_SOURCE_DIR: &str = ".";

/// Default build output directory.
pub const DEFAULT_BUILD_DIR: &str = "_build";

/// Name of the project configuration file.
pub const PROJECT_CONFIG_FILE: &str = "docmake.toml";

/// Variable names understood in the environment and as `NAME=VALUE` arguments.
pub const VARIABLES: &[&str] = &[
    "SPHINXBUILD",
    "SPHINXAUTOBUILD",
    "SOURCEDIR",
    "BUILDDIR",
    "SPHINXOPTS",
    "O",
];

/// docmake configuration file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Source and output locations
    pub paths: PathsConfig,

    /// External tool commands
    pub tools: ToolsConfig,

    /// Extra generator options
    pub options: OptionsConfig,
}

/// Source and output locations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Documentation source directory (SOURCEDIR)
    pub source: Option<String>,

    /// Build output directory (BUILDDIR)
    pub build: Option<String>,
}

/// External tool commands. Each may include leading arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ToolsConfig {
    /// Generator command (SPHINXBUILD)
    pub sphinx_build: Option<String>,

    /// Auto-rebuild server command (SPHINXAUTOBUILD)
    pub sphinx_autobuild: Option<String>,
}

/// Extra generator options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionsConfig {
    /// Options appended to every generator run (SPHINXOPTS)
    pub sphinxopts: Option<String>,

    /// Additional options appended after `sphinxopts` (O)
    pub o: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.paths.source.is_some() {
            self.paths.source = other.paths.source;
        }
        if other.paths.build.is_some() {
            self.paths.build = other.paths.build;
        }

        if other.tools.sphinx_build.is_some() {
            self.tools.sphinx_build = other.tools.sphinx_build;
        }
        if other.tools.sphinx_autobuild.is_some() {
            self.tools.sphinx_autobuild = other.tools.sphinx_autobuild;
        }

        if other.options.sphinxopts.is_some() {
            self.options.sphinxopts = other.options.sphinxopts;
        }
        if other.options.o.is_some() {
            self.options.o = other.options.o;
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (docmake.toml)
/// 2. Global config (~/.docmake/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global docmake config directory (~/.docmake).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".docmake"))
}

/// Get the global config path (~/.docmake/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (docmake.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_CONFIG_FILE)
}

/// Fully resolved settings for one docmake run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    /// Generator command (SPHINXBUILD)
    pub sphinx_build: String,

    /// Auto-rebuild server command (SPHINXAUTOBUILD)
    pub sphinx_autobuild: String,

    /// Documentation source directory (SOURCEDIR)
    pub source_dir: String,

    /// Build output directory (BUILDDIR)
    pub build_dir: String,

    /// Options appended to every generator run (SPHINXOPTS)
    pub sphinx_opts: String,

    /// Additional options appended after `sphinx_opts` (O)
    pub extra_opts: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            sphinx_build: DEFAULT_SPHINX_BUILD.to_string(),
            sphinx_autobuild: DEFAULT_SPHINX_AUTOBUILD.to_string(),
            source_dir: DEFAULT_SOURCE_DIR.to_string(),
            build_dir: DEFAULT_BUILD_DIR.to_string(),
            sphinx_opts: String::new(),
            extra_opts: String::new(),
        }
    }
}

impl Settings {
    /// Start from the defaults and apply a configuration file's values.
    pub fn from_config(config: &Config) -> Self {
        let defaults = Settings::default();
        let pick = |value: &Option<String>, default: String| value.clone().unwrap_or(default);

        Settings {
            sphinx_build: pick(&config.tools.sphinx_build, defaults.sphinx_build),
            sphinx_autobuild: pick(&config.tools.sphinx_autobuild, defaults.sphinx_autobuild),
            source_dir: pick(&config.paths.source, defaults.source_dir),
            build_dir: pick(&config.paths.build, defaults.build_dir),
            sphinx_opts: pick(&config.options.sphinxopts, defaults.sphinx_opts),
            extra_opts: pick(&config.options.o, defaults.extra_opts),
        }
    }

    /// Apply make variables found through `lookup` (normally the environment).
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for name in VARIABLES {
            if let Some(value) = lookup(name) {
                tracing::debug!("{} from environment: {:?}", name, value);
                self.assign(name, &value);
            }
        }
    }

    /// Set a make variable by name. Returns false if the name is not one
    /// docmake understands.
    pub fn assign(&mut self, name: &str, value: &str) -> bool {
        let slot = match name {
            "SPHINXBUILD" => &mut self.sphinx_build,
            "SPHINXAUTOBUILD" => &mut self.sphinx_autobuild,
            "SOURCEDIR" => &mut self.source_dir,
            "BUILDDIR" => &mut self.build_dir,
            "SPHINXOPTS" => &mut self.sphinx_opts,
            "O" => &mut self.extra_opts,
            _ => return false,
        };
        *slot = value.to_string();
        true
    }
}

/// Split a `NAME=VALUE` argument, if it is one.
///
/// Like make, only arguments whose part before `=` is a plain identifier are
/// assignments; everything else is a target name.
pub fn parse_assignment(arg: &str) -> Option<(&str, &str)> {
    let (name, value) = arg.split_once('=')?;
    let mut chars = name.chars();
    let first = chars.next()?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return None;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    Some((name, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use tempfile::TempDir;

    #[test]
    fn test_parse_config_file() {
        let config: Config = toml::from_str(
            r#"
[paths]
source = "docs"
build = "docs/_build"

[tools]
sphinx-build = "python -m sphinx"

[options]
sphinxopts = "-W --keep-going"
"#,
        )
        .unwrap();

        assert_eq!(config.paths.source.as_deref(), Some("docs"));
        assert_eq!(config.paths.build.as_deref(), Some("docs/_build"));
        assert_eq!(config.tools.sphinx_build.as_deref(), Some("python -m sphinx"));
        assert_eq!(config.tools.sphinx_autobuild, None);
        assert_eq!(config.options.sphinxopts.as_deref(), Some("-W --keep-going"));
        assert_eq!(config.options.o, None);
    }

    #[test]
    fn test_merge_prefers_other() {
        let mut base = Config::default();
        base.paths.source = Some("global-src".into());
        base.paths.build = Some("global-build".into());

        let mut project = Config::default();
        project.paths.source = Some("docs".into());

        base.merge(project);
        assert_eq!(base.paths.source.as_deref(), Some("docs"));
        assert_eq!(base.paths.build.as_deref(), Some("global-build"));
    }

    #[test]
    fn test_load_config_layers_files() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("global.toml");
        let project = tmp.path().join(PROJECT_CONFIG_FILE);
        std::fs::write(&global, "[paths]\nsource = \"g\"\nbuild = \"gb\"\n").unwrap();
        std::fs::write(&project, "[paths]\nsource = \"p\"\n").unwrap();

        let config = load_config(Some(&global), &project);
        assert_eq!(config.paths.source.as_deref(), Some("p"));
        assert_eq!(config.paths.build.as_deref(), Some("gb"));
    }

    #[test]
    fn test_invalid_implicit_file_falls_back() {
        let tmp = TempDir::new().unwrap();
        let project = tmp.path().join(PROJECT_CONFIG_FILE);
        std::fs::write(&project, "[paths\nsource = ").unwrap();

        assert!(Config::load(&project).is_err());
        assert_eq!(load_config(None, &project), Config::default());
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::from_config(&Config::default());
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.sphinx_build, "sphinx-build");
        assert_eq!(settings.sphinx_autobuild, "sphinx-autobuild");
        assert_eq!(settings.source_dir, ".");
        assert_eq!(settings.build_dir, "_build");
        assert!(settings.sphinx_opts.is_empty());
        assert!(settings.extra_opts.is_empty());
    }

    #[test]
    fn test_env_overrides_config() {
        let mut config = Config::default();
        config.paths.source = Some("docs".into());
        config.paths.build = Some("out".into());

        let env: HashMap<&str, &str> = [("BUILDDIR", "env-out"), ("PATH", "/bin")].into();
        let mut settings = Settings::from_config(&config);
        settings.apply_env(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(settings.source_dir, "docs");
        assert_eq!(settings.build_dir, "env-out");
    }

    #[test]
    fn test_assign() {
        let mut settings = Settings::default();
        assert!(settings.assign("SPHINXOPTS", "-W"));
        assert!(settings.assign("O", "-q"));
        assert!(!settings.assign("CC", "gcc"));
        assert_eq!(settings.sphinx_opts, "-W");
        assert_eq!(settings.extra_opts, "-q");
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(parse_assignment("BUILDDIR=out"), Some(("BUILDDIR", "out")));
        assert_eq!(parse_assignment("SPHINXOPTS="), Some(("SPHINXOPTS", "")));
        assert_eq!(parse_assignment("O=-D a=b"), Some(("O", "-D a=b")));
        assert_eq!(parse_assignment("html"), None);
        assert_eq!(parse_assignment("=x"), None);
        assert_eq!(parse_assignment("1X=y"), None);
        assert_eq!(parse_assignment("a-b=c"), None);
    }
}
