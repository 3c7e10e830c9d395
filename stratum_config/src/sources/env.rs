//! Environment variables named `PREFIX` + the shouty-snake canonical name.

use std::collections::HashMap;

use figment::providers::Env;
use tracing::{debug, trace};

use crate::error::ConfigResult;
use crate::naming;
use crate::params::{ParamSet, ValueSource};

/// Prefixed environment variables captured once per resolution.
#[derive(Debug, Default)]
pub(crate) struct EnvSnapshot {
    prefix: String,
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    /// Capture every variable whose name starts with `prefix`, comparing
    /// case-sensitively. Names keep their case. An empty prefix captures
    /// nothing.
    pub(crate) fn capture(prefix: &str) -> Self {
        if prefix.is_empty() {
            return Self::default();
        }
        let vars = Env::raw()
            .iter()
            .filter(|(key, _)| key.as_str().starts_with(prefix))
            .map(|(key, value)| (key.as_str().to_owned(), value))
            .collect();
        Self {
            prefix: prefix.to_owned(),
            vars,
        }
    }

    /// Non-empty value of exactly `PREFIX` + the shouty name of
    /// `canonical`, with the variable name.
    pub(crate) fn lookup(&self, canonical: &str) -> Option<(String, &str)> {
        let var = naming::env_var_name(&self.prefix, canonical);
        let value = self.vars.get(&var).filter(|value| !value.is_empty())?;
        Some((var, value.as_str()))
    }

    pub(crate) fn is_active(&self) -> bool {
        !self.prefix.is_empty()
    }
}

/// Apply a value to every field-backed parameter with a non-empty variable.
///
/// Returns the number of parameters set.
pub(crate) fn apply(snapshot: &EnvSnapshot, params: &mut ParamSet) -> ConfigResult<usize> {
    if !snapshot.is_active() {
        return Ok(0);
    }
    let names: Vec<String> = params
        .iter()
        .filter(|param| !param.is_internal())
        .map(|param| param.name().to_owned())
        .collect();
    let mut applied = 0;
    for name in names {
        if let Some((var, value)) = snapshot.lookup(&name) {
            trace!(field = %name, var = %var, "applying environment variable");
            params.set(&name, value, ValueSource::Env(var))?;
            applied += 1;
        }
    }
    debug!(applied, prefix = %snapshot.prefix, "applied environment variables");
    Ok(applied)
}
