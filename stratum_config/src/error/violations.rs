//! Aggregation of constraint violations reported by the validator.

use std::{error::Error, fmt};

/// A single constraint violation attached to a configuration key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    key: String,
    message: String,
}

impl FieldViolation {
    /// Create a violation for `key` with a human-readable `message`.
    #[must_use]
    pub fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Configuration key that failed validation. Elements reached through
    /// `dive` carry an index suffix such as `ports[1]`.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Message describing the failure.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Collection of [`FieldViolation`]s produced by a single resolution.
///
/// Displays as the messages joined by `", "`, which is the text that
/// follows `validation failed; ` in [`crate::ConfigError::Validation`].
///
/// # Examples
///
/// ```
/// use stratum_config::{ConfigError, FieldViolation};
/// let err = ConfigError::validation(vec![
///     FieldViolation::new("port", "port is required"),
///     FieldViolation::new("host", "host is required"),
/// ])
/// .expect("non-empty violations");
/// assert_eq!(
///     err.to_string(),
///     "validation failed; port is required, host is required"
/// );
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldViolation>);

impl ValidationErrors {
    /// Create a new aggregation from a vector of violations.
    #[must_use]
    pub const fn new(violations: Vec<FieldViolation>) -> Self {
        Self(violations)
    }

    /// Iterate over the contained violations.
    #[must_use = "iterators should be consumed to inspect violations"]
    pub fn iter(&self) -> std::slice::Iter<'_, FieldViolation> {
        self.0.iter()
    }

    /// Number of violations in the aggregation.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when no violations were recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up the first violation recorded for `key`.
    #[must_use]
    pub fn for_key(&self, key: &str) -> Option<&FieldViolation> {
        self.0.iter().find(|violation| violation.key == key)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl Error for ValidationErrors {}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldViolation;
    type IntoIter = std::slice::Iter<'a, FieldViolation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for ValidationErrors {
    type Item = FieldViolation;
    type IntoIter = std::vec::IntoIter<FieldViolation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
