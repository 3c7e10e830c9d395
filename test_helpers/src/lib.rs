//! Test helpers shared across the workspace crates.

pub mod env;
pub mod figment;
pub mod files;
