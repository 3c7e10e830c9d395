//! Parameter registry: one entry per field plus the built-in flags.
//!
//! Every source writes into the registry by canonical name, so the
//! precedence between defaults, the file, the environment and the command
//! line is simply the order in which sources call [`ParamSet::set`].

mod cli;

use std::any::Any;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{ConfigError, ConfigResult};
use crate::schema::FieldDescriptor;
use crate::types::handler::{AnyValue, ErasedHandler};
use crate::types::{FieldValue, Shape};

pub(crate) use cli::ParsedArgs;

/// Name of the built-in help flag.
pub const HELP: &str = "help";
/// Name of the flag printing the environment template.
pub const PRINT_ENV_TEMPLATE: &str = "print_env_template";
/// Name of the flag printing the YAML template.
pub const PRINT_YAML_TEMPLATE: &str = "print_yaml_template";

/// Where a parameter's current value came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ValueSource {
    /// Declared default or zero value.
    #[default]
    Default,
    /// Configuration file at the given path.
    File(PathBuf),
    /// Environment variable with the given name.
    Env(String),
    /// Command-line arguments.
    Args,
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("default"),
            Self::File(path) => write!(f, "config file {}", path.display()),
            Self::Env(var) => write!(f, "environment variable {var}"),
            Self::Args => f.write_str("command line"),
        }
    }
}

/// A registered parameter.
pub struct Param {
    name: String,
    short: Option<char>,
    usage: String,
    default_text: Option<String>,
    hidden: bool,
    internal: bool,
    changed: bool,
    source: ValueSource,
    handler: Arc<dyn ErasedHandler>,
    value: Option<AnyValue>,
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Param")
            .field("name", &self.name)
            .field("short", &self.short)
            .field("type", &self.handler.label())
            .field("changed", &self.changed)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl Param {
    /// Parameter for a schema field, seeded with its parsed default.
    pub(crate) fn for_field(
        field: &FieldDescriptor,
        handler: Arc<dyn ErasedHandler>,
    ) -> ConfigResult<Self> {
        let value = match field.default.as_deref() {
            None => None,
            Some("") => handler.zero(),
            Some(text) => Some(handler.parse(text).map_err(|err| ConfigError::InvalidDefault {
                field: field.name.clone(),
                value: text.to_owned(),
                reason: err.to_string(),
            })?),
        };
        let usage = if field.choices.is_empty() && !handler.choices().is_empty() {
            format!("{} ({})", field.description, handler.choices().join("|"))
        } else {
            field.usage()
        };
        Ok(Self {
            name: field.name.clone(),
            short: field.short,
            usage,
            default_text: field.default.clone().filter(|text| !text.is_empty()),
            hidden: field.hidden,
            internal: false,
            changed: false,
            source: ValueSource::Default,
            handler,
            value,
        })
    }

    /// Built-in boolean flag that is not backed by a field.
    pub(crate) fn internal(name: &str, usage: &str, hidden: bool) -> Self {
        Self {
            name: name.to_owned(),
            short: None,
            usage: usage.to_owned(),
            default_text: None,
            hidden,
            internal: true,
            changed: false,
            source: ValueSource::Default,
            handler: crate::types::flag_handler(),
            value: None,
        }
    }

    /// Canonical name, also the long flag name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Single-character alias.
    #[must_use]
    pub const fn short(&self) -> Option<char> {
        self.short
    }

    /// Help text.
    #[must_use]
    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// Value placeholder shown in help, such as `u16` or `[]string`.
    #[must_use]
    pub fn type_label(&self) -> &str {
        self.handler.label()
    }

    /// Declared default text.
    #[must_use]
    pub fn default_text(&self) -> Option<&str> {
        self.default_text.as_deref()
    }

    /// Returns `true` when the parameter is omitted from help output.
    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Returns `true` for built-in flags with no backing field.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        self.internal
    }

    /// Returns `true` once any source has supplied a value.
    #[must_use]
    pub const fn is_changed(&self) -> bool {
        self.changed
    }

    /// Source of the current value.
    #[must_use]
    pub const fn source(&self) -> &ValueSource {
        &self.source
    }

    /// How the parameter is written and accumulated.
    #[must_use]
    pub fn shape(&self) -> Shape {
        self.handler.shape()
    }

    /// Current value rendered as text; empty when there is none.
    #[must_use]
    pub fn value_text(&self) -> String {
        self.value
            .as_deref()
            .map(|value| self.handler.format(value))
            .unwrap_or_default()
    }

    /// Current value as a [`FieldValue`].
    #[must_use]
    pub fn field_value(&self) -> FieldValue {
        self.value
            .as_deref()
            .map_or(FieldValue::Absent, |value| self.handler.inspect(value))
    }

    pub(crate) fn handler(&self) -> &dyn ErasedHandler {
        self.handler.as_ref()
    }

    pub(crate) fn take_value(&mut self) -> Option<AnyValue> {
        self.value.take()
    }

    fn value_as<T: Any>(&self) -> Option<&T> {
        self.value
            .as_deref()
            .and_then(|value| value.downcast_ref::<T>())
    }
}

/// Ordered set of parameters addressed by canonical name.
#[derive(Debug)]
pub struct ParamSet {
    program: String,
    short_help: bool,
    params: Vec<Param>,
}

impl ParamSet {
    /// Empty set for `program`. When `short_help` is set, `-h` is reserved
    /// for `--help`.
    #[must_use]
    pub fn new(program: impl Into<String>, short_help: bool) -> Self {
        Self {
            program: program.into(),
            short_help,
            params: Vec::new(),
        }
    }

    /// Program name shown in help.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Register `param`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReservedName`] for names or aliases claimed by
    /// built-in flags, and [`ConfigError::DuplicateName`] or
    /// [`ConfigError::DuplicateShort`] for clashes with earlier parameters.
    pub(crate) fn insert(&mut self, param: Param) -> ConfigResult<()> {
        if param.name == HELP {
            return Err(ConfigError::ReservedName { name: param.name });
        }
        if self.short_help && param.short == Some('h') {
            return Err(ConfigError::ReservedName { name: "h".to_owned() });
        }
        if let Some(existing) = self.lookup(&param.name) {
            return Err(if existing.internal {
                ConfigError::ReservedName { name: param.name }
            } else {
                ConfigError::DuplicateName { name: param.name }
            });
        }
        if let Some(short) = param.short {
            if let Some(existing) = self.params.iter().find(|p| p.short == Some(short)) {
                return Err(ConfigError::DuplicateShort {
                    name: param.name,
                    short,
                    existing: existing.name.clone(),
                });
            }
        }
        self.params.push(param);
        Ok(())
    }

    /// Parameter named `name`.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|param| param.name == name)
    }

    /// Field-backed parameter named `name`; built-in flags are skipped.
    #[must_use]
    pub fn lookup_field(&self, name: &str) -> Option<&Param> {
        self.lookup(name).filter(|param| !param.internal)
    }

    pub(crate) fn lookup_mut(&mut self, name: &str) -> Option<&mut Param> {
        self.params.iter_mut().find(|param| param.name == name)
    }

    /// Parameters in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Param> {
        self.params.iter()
    }

    /// Number of registered parameters, built-in flags included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns `true` when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Returns `true` when a source has supplied a value for `name`.
    #[must_use]
    pub fn is_changed(&self, name: &str) -> bool {
        self.lookup(name).is_some_and(Param::is_changed)
    }

    /// Parse `raw` and make it the current value of `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownParameter`] when `name` is not
    /// registered and [`ConfigError::InvalidValue`] when the handler rejects
    /// `raw`.
    pub fn set(&mut self, name: &str, raw: &str, source: ValueSource) -> ConfigResult<()> {
        self.set_all(name, &[raw], source)
    }

    /// Parse every occurrence in `raws` and make their combination the
    /// current value of `name`. Scalars keep the last occurrence; lists and
    /// maps accumulate.
    ///
    /// # Errors
    ///
    /// As for [`ParamSet::set`].
    pub fn set_all<S: AsRef<str>>(
        &mut self,
        name: &str,
        raws: &[S],
        source: ValueSource,
    ) -> ConfigResult<()> {
        let param = self
            .lookup_mut(name)
            .ok_or_else(|| ConfigError::UnknownParameter {
                name: name.to_owned(),
            })?;
        let mut combined: Option<AnyValue> = None;
        for raw in raws {
            let text = raw.as_ref();
            let parsed = param
                .handler
                .parse(text)
                .map_err(|err| ConfigError::InvalidValue {
                    name: name.to_owned(),
                    value: text.to_owned(),
                    origin: source.clone(),
                    reason: err.to_string(),
                })?;
            combined = Some(match combined {
                Some(earlier) => param.handler.combine(earlier, parsed),
                None => parsed,
            });
        }
        if let Some(value) = combined {
            param.value = Some(value);
            param.changed = true;
            param.source = source;
        }
        Ok(())
    }

    /// Value of a boolean flag; `false` when unset or not a flag.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        self.lookup(name)
            .and_then(Param::value_as::<bool>)
            .copied()
            .unwrap_or(false)
    }
}
