//! Configuration files written to a temporary directory.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A file named `name` inside a fresh temporary directory.
///
/// The directory and file are removed when the value is dropped. The file
/// name is kept as given so that extension-based format detection sees it.
///
/// # Examples
/// ```
/// use stratum_config_test_helpers::files::TempConfig;
///
/// let config = TempConfig::new("app.yaml", "port: 1\n");
/// assert!(config.path().ends_with("app.yaml"));
/// ```
#[derive(Debug)]
pub struct TempConfig {
    _dir: TempDir,
    path: PathBuf,
}

impl TempConfig {
    /// Write `contents` to `name`.
    ///
    /// # Panics
    ///
    /// Panics when the directory or file cannot be created.
    #[expect(clippy::expect_used, reason = "test helper; failures should abort the test")]
    #[must_use]
    pub fn new(name: &str, contents: &str) -> Self {
        Self::try_new(name, contents).expect("create temporary config file")
    }

    /// Fallible form of [`TempConfig::new`].
    ///
    /// # Errors
    ///
    /// Returns I/O errors from creating the directory or writing the file.
    pub fn try_new(name: &str, contents: &str) -> io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(name);
        std::fs::write(&path, contents)?;
        Ok(Self { _dir: dir, path })
    }

    /// Absolute path of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
