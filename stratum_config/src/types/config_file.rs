//! Marker type for the configuration file path field.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Path to the configuration file.
///
/// A schema may declare at most one field of this type. Its value is
/// resolved from the command line, the environment or its default before
/// any other field, and names the JSON or YAML file layered between the
/// defaults and the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigFile(PathBuf);

impl ConfigFile {
    /// Wrap a path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// Borrow the path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Returns `true` when no path was configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.as_os_str().is_empty()
    }
}

impl AsRef<Path> for ConfigFile {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl From<PathBuf> for ConfigFile {
    fn from(path: PathBuf) -> Self {
        Self(path)
    }
}

impl fmt::Display for ConfigFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}
