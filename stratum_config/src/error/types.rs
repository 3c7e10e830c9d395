//! Primary error enum for configuration resolution.

use std::error::Error;
use std::path::PathBuf;

use thiserror::Error;

use super::ValidationErrors;
use crate::params::ValueSource;

/// Errors that can occur while resolving configuration.
///
/// Variants fall into two groups. Authoring errors describe a schema that
/// can never resolve (see [`ConfigError::is_authoring_error`]); the rest are
/// caused by the values a user supplied.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A member's tag string could not be parsed.
    #[error("error parsing tags for field {field}: {reason}")]
    MalformedTag {
        /// Member whose tags were rejected.
        field: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// Two fields share the same canonical name.
    #[error("duplicate configuration name: {name}")]
    DuplicateName {
        /// Canonical name registered twice.
        name: String,
    },

    /// Two fields claim the same short alias.
    #[error("short flag -{short} for {name} is already used by {existing}")]
    DuplicateShort {
        /// Field declaring the alias second.
        name: String,
        /// Contested alias.
        short: char,
        /// Field that registered the alias first.
        existing: String,
    },

    /// A field uses a name or alias reserved for built-in flags.
    #[error("configuration name {name} is reserved for a built-in flag")]
    ReservedName {
        /// Reserved name or alias.
        name: String,
    },

    /// More than one config-file marker was declared.
    #[error("only one config file field is allowed: found {second} after {first}")]
    DuplicateConfigFile {
        /// First marker field.
        first: String,
        /// Offending second marker field.
        second: String,
    },

    /// A leaf's type has no registered handler.
    #[error("unsupported type for field {field}: {type_name}")]
    UnsupportedType {
        /// Canonical name of the field.
        field: String,
        /// Rust type name of the field.
        type_name: &'static str,
    },

    /// A declared default could not be parsed by the field's handler.
    #[error("error setting default value {value:?} for field {field}: {reason}")]
    InvalidDefault {
        /// Canonical name of the field.
        field: String,
        /// Declared default text.
        value: String,
        /// Handler diagnostic.
        reason: String,
    },

    /// A validation expression names an unknown rule or misuses one.
    #[error("invalid validation constraint on {field}: {reason}")]
    InvalidConstraint {
        /// Canonical name of the field.
        field: String,
        /// Diagnostic.
        reason: String,
    },

    /// Error parsing command-line arguments.
    #[error("failed to parse command-line arguments: {0}")]
    CliParsing(#[from] Box<clap::Error>),

    /// A command-line argument is not valid UTF-8.
    #[error("command-line argument {argument:?} is not valid UTF-8")]
    NonUnicodeArgument {
        /// The argument with invalid sequences replaced.
        argument: String,
    },

    /// A source supplied text the field's handler rejected.
    #[error("invalid value {value:?} for {name} from {origin}: {reason}")]
    InvalidValue {
        /// Canonical name of the field.
        name: String,
        /// Offending text.
        value: String,
        /// Source that supplied the text.
        origin: ValueSource,
        /// Handler diagnostic.
        reason: String,
    },

    /// A value was addressed to a parameter that does not exist.
    #[error("unknown flag: {name}")]
    UnknownParameter {
        /// Requested parameter name.
        name: String,
    },

    /// A configuration file contains a key that matches no field.
    #[error("unknown configuration file field: {name}")]
    UnknownField {
        /// Canonical name derived from the file key path.
        name: String,
    },

    /// The configuration file extension is not recognised.
    #[error("unsupported config file type: {path}; supported types are .json, .yml and .yaml")]
    UnsupportedFileType {
        /// Offending path.
        path: PathBuf,
    },

    /// Error originating from a configuration file.
    #[error("configuration file error in '{path}': {source}")]
    File {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying error reported by the loader.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },

    /// A resolved value landed in a slot of a different type.
    #[error("field {name} cannot hold a value of type {expected}")]
    TypeMismatch {
        /// Canonical name of the field.
        name: String,
        /// Type the slot expected.
        expected: &'static str,
    },

    /// One or more fields violate their constraints.
    #[error("validation failed; {0}")]
    Validation(Box<ValidationErrors>),
}
