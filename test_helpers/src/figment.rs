//! Running test bodies inside a [`figment::Jail`].

use std::cell::RefCell;

use anyhow::{Result, anyhow};
use figment::Jail;

/// Run `f` inside a jail, returning its output.
///
/// The jail gives the closure a scratch working directory and restores the
/// environment afterwards. Errors of any type can be propagated with `?`.
///
/// # Errors
///
/// Returns the closure's error, or an error when the jail cannot be set up.
pub fn with_jail<F, T>(f: F) -> Result<T>
where
    F: FnOnce(&mut Jail) -> Result<T>,
{
    let outcome: RefCell<Option<Result<T>>> = RefCell::new(None);
    Jail::try_with(|jail| {
        outcome.replace(Some(f(jail)));
        Ok(())
    })
    .map_err(|err| anyhow!(err.to_string()))?;
    outcome
        .into_inner()
        .unwrap_or_else(|| Err(anyhow!("jail closure did not run")))
}
