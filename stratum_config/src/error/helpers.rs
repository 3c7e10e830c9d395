//! Helpers for classifying and constructing errors.

use std::error::Error;
use std::path::Path;

use clap::Error as ClapError;

use super::{ConfigError, FieldViolation, ValidationErrors};

impl ConfigError {
    /// Returns `true` when the error describes a broken schema rather than
    /// bad user input.
    ///
    /// Authoring errors surface on every run regardless of the supplied
    /// values, so applications typically treat them as bugs.
    #[must_use]
    pub const fn is_authoring_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedTag { .. }
                | Self::DuplicateName { .. }
                | Self::DuplicateShort { .. }
                | Self::ReservedName { .. }
                | Self::DuplicateConfigFile { .. }
                | Self::UnsupportedType { .. }
                | Self::InvalidDefault { .. }
                | Self::InvalidConstraint { .. }
        )
    }

    /// Build a [`ConfigError::Validation`] from collected violations.
    ///
    /// Returns `None` when `violations` is empty.
    #[must_use]
    pub fn validation(violations: Vec<FieldViolation>) -> Option<Self> {
        if violations.is_empty() {
            None
        } else {
            Some(Self::Validation(Box::new(ValidationErrors::new(violations))))
        }
    }

    /// Construct a [`ConfigError::File`] for a configuration path.
    pub(crate) fn file(path: &Path, err: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self::File {
            path: path.to_path_buf(),
            source: err.into(),
        }
    }
}

impl From<ClapError> for ConfigError {
    fn from(err: ClapError) -> Self {
        Self::CliParsing(Box::new(err))
    }
}
