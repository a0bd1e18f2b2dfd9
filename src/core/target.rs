//! Target names and their meaning.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Name of the target that lists the generator's build modes.
pub const HELP: &str = "help";

/// Name of the target that runs the auto-rebuilding server.
pub const AUTOBUILD: &str = "autobuild";

/// A target selected on the command line.
///
/// Every name is a valid target: anything other than the two special names
/// is forwarded to the generator as a build mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Target {
    /// List the generator's build modes.
    #[default]
    Help,
    /// Continuously rebuild and serve the documentation.
    Autobuild,
    /// Any other build mode (html, latexpdf, linkcheck, ...), kept verbatim.
    Mode(String),
}

impl Target {
    /// Parse a target name. Never fails; matching is case-sensitive.
    pub fn parse(name: &str) -> Self {
        match name {
            HELP => Target::Help,
            AUTOBUILD => Target::Autobuild,
            other => Target::Mode(other.to_string()),
        }
    }

    /// The name as the user typed it.
    pub fn name(&self) -> &str {
        match self {
            Target::Help => HELP,
            Target::Autobuild => AUTOBUILD,
            Target::Mode(name) => name,
        }
    }

    /// The build mode handed to `sphinx-build -M`, if this target uses it.
    pub fn build_mode(&self) -> Option<&str> {
        match self {
            Target::Autobuild => None,
            other => Some(other.name()),
        }
    }
}

impl FromStr for Target {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Target::parse(s))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
