//! Library facade for the `hello_stratum` demo so integration tests can
//! reuse its configuration types.

pub mod config;
pub mod greeting;
