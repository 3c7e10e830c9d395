//! Error types produced while resolving configuration.

mod helpers;
mod types;
mod violations;

pub use types::ConfigError;
pub use violations::{FieldViolation, ValidationErrors};

/// Convenience alias for results returned by the resolution pipeline.
pub type ConfigResult<T> = Result<T, ConfigError>;
