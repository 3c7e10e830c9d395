//! Resolution driver: defaults, file, environment and arguments, in that
//! order of increasing precedence, followed by validation.

mod configuration;
mod options;

use std::io::Write as _;

use tracing::{debug, trace};

use crate::error::{ConfigError, ConfigResult};
use crate::params::{PRINT_ENV_TEMPLATE, PRINT_YAML_TEMPLATE, Param, ParamSet};
use crate::schema::{Flow, Schema, walk};
use crate::sources::env::{self, EnvSnapshot};
use crate::sources::file::{self, ConfigFileField};
use crate::types::TypeRegistry;
use crate::{template, validate};

pub use configuration::Configuration;
pub use options::Options;

/// Result of a resolution that did not fail.
#[derive(Debug)]
pub enum Outcome<T> {
    /// Every source was applied and the values validated.
    Resolved(Configuration<T>),
    /// `--help` was given; carries the usage text.
    Help(String),
    /// A template flag was given; carries the template.
    Template(String),
}

/// Resolve `T` without touching the process.
///
/// Starts from `T::default()`, applies declared defaults, the configuration
/// file, environment variables and command-line arguments, then validates.
///
/// # Errors
///
/// Returns a [`ConfigError`]. Authoring mistakes in the schema surface before
/// any source is read; see [`ConfigError::is_authoring_error`].
pub fn try_configure<T>(options: &Options) -> ConfigResult<Outcome<T>>
where
    T: Schema + Default,
{
    let mut config = T::default();
    let mut params = ParamSet::new(options.program(), options.short_help());
    params.insert(Param::internal(
        PRINT_ENV_TEMPLATE,
        "Print environment variable template and exit",
        options.templates_hidden(),
    ))?;
    params.insert(Param::internal(
        PRINT_YAML_TEMPLATE,
        "Print YAML configuration template and exit",
        options.templates_hidden(),
    ))?;
    let config_file = register(&mut config, options.type_registry(), &mut params)?;
    debug!(params = params.len(), "registered configuration fields");

    let args = options.arguments()?;
    let parsed = params.parse_args(&args)?;
    if parsed.help {
        return Ok(Outcome::Help(options.render_usage(&params)));
    }

    let snapshot = EnvSnapshot::capture(options.prefix());
    if let Some(field) = &config_file
        && let Some(location) = file::locate(field, &parsed, &snapshot)
    {
        debug!(path = %location.path.display(), explicit = location.explicit, "configuration file chosen");
        file::load(&location, &mut params)?;
    }
    let from_env = env::apply(&snapshot, &mut params)?;
    let from_args = params.apply_args(&parsed)?;
    debug!(from_env, from_args, "applied environment and arguments");

    assign(&mut config, &mut params, options.optionals_stay_none())?;

    if params.flag(PRINT_ENV_TEMPLATE) {
        let text = template::env_template(&mut config, &params, options.prefix(), &args)?;
        return Ok(Outcome::Template(text));
    }
    if params.flag(PRINT_YAML_TEMPLATE) {
        let text = template::yaml_template(&mut config, &params, &args)?;
        return Ok(Outcome::Template(text));
    }

    let checks = validate::collect(&mut config, &params)?;
    validate::validate(&checks, options.rules(), options.requires_no_defaults())?;
    Ok(Outcome::Resolved(Configuration::new(config, parsed.positional)))
}

/// Resolve `T` for a command-line program.
///
/// Help and templates are written to standard output and the process exits
/// with status 0. Failures are written to standard error as
/// `error parsing configuration: <error>` and the process exits with
/// status 1.
#[must_use]
pub fn configure<T>(options: &Options) -> Configuration<T>
where
    T: Schema + Default,
{
    match try_configure(options) {
        Ok(Outcome::Resolved(config)) => config,
        Ok(Outcome::Help(text) | Outcome::Template(text)) => {
            let mut stdout = std::io::stdout().lock();
            let status = i32::from(stdout.write_all(text.as_bytes()).is_err());
            std::process::exit(status)
        }
        Err(err) => {
            let mut stderr = std::io::stderr().lock();
            if writeln!(stderr, "error parsing configuration: {err}").is_err() {
                std::process::exit(2)
            }
            std::process::exit(1)
        }
    }
}

/// Create a parameter for every field and find the config-file marker.
fn register(
    schema: &mut dyn Schema,
    types: &TypeRegistry,
    params: &mut ParamSet,
) -> ConfigResult<Option<ConfigFileField>> {
    let mut config_file: Option<ConfigFileField> = None;
    walk(schema, &mut |field, _slot| {
        let handler = types
            .handler_for(field.type_key)
            .ok_or_else(|| ConfigError::UnsupportedType {
                field: field.name.clone(),
                type_name: field.type_key.name(),
            })?;
        if field.is_config_file() {
            if let Some(first) = &config_file {
                return Err(ConfigError::DuplicateConfigFile {
                    first: first.name.clone(),
                    second: field.name.clone(),
                });
            }
            config_file = Some(ConfigFileField::from(field));
        }
        params.insert(Param::for_field(field, handler)?)?;
        Ok(Flow::Continue)
    })?;
    Ok(config_file)
}

/// Move each parameter's final value into its field.
///
/// Optional fields left without a value receive the type's zero value
/// unless `stay_none` is set.
fn assign(schema: &mut dyn Schema, params: &mut ParamSet, stay_none: bool) -> ConfigResult<()> {
    walk(schema, &mut |field, slot| {
        let Some(param) = params.lookup_mut(&field.name) else {
            return Ok(Flow::Continue);
        };
        let value = match param.take_value() {
            Some(value) => Some(value),
            None if slot.is_optional() && !stay_none => param.handler().zero(),
            None => None,
        };
        if let Some(value) = value {
            trace!(field = %field.name, source = %param.source(), "assigning value");
            slot.assign(value).map_err(|_| ConfigError::TypeMismatch {
                name: field.name.clone(),
                expected: field.type_key.name(),
            })?;
        }
        Ok(Flow::Continue)
    })?;
    Ok(())
}

#[cfg(test)]
mod tests;
