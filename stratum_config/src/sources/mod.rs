//! Value sources layered over the defaults: the configuration file and
//! the environment. Command-line values are applied by
//! [`crate::ParamSet`] itself.

pub(crate) mod env;
pub(crate) mod file;

#[cfg(test)]
mod tests;
