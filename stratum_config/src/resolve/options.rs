//! Builder for resolution options.

use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{ConfigError, ConfigResult};
use crate::params::ParamSet;
use crate::types::TypeRegistry;
use crate::validate::Validator;

type UsageFn = dyn Fn(&ParamSet) -> String + Send + Sync;

/// Options controlling one resolution.
///
/// # Examples
///
/// ```rust
/// use stratum_config::Options;
///
/// let options = Options::new()
///     .env_prefix("APP_")
///     .args(["--port", "8080"])
///     .program_name("app")
///     .require_no_defaults(true);
/// assert_eq!(options.prefix(), "APP_");
/// ```
#[derive(Clone, Default)]
pub struct Options {
    env_prefix: String,
    args: Option<Vec<String>>,
    program_name: Option<String>,
    nil_optionals: bool,
    usage: Option<Arc<UsageFn>>,
    show_internal_flags: bool,
    no_short_help: bool,
    require_no_defaults: bool,
    types: TypeRegistry,
    validator: Validator,
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("env_prefix", &self.env_prefix)
            .field("args", &self.args)
            .field("program_name", &self.program_name)
            .field("nil_optionals", &self.nil_optionals)
            .field("custom_usage", &self.usage.is_some())
            .field("show_internal_flags", &self.show_internal_flags)
            .field("no_short_help", &self.no_short_help)
            .field("require_no_defaults", &self.require_no_defaults)
            .finish_non_exhaustive()
    }
}

impl Options {
    /// Options reading the process arguments with no environment prefix.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix for environment variables, such as `APP_`. Variables are not
    /// consulted when the prefix is empty.
    #[must_use]
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Arguments to parse instead of the process arguments, program name
    /// excluded.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = Some(args.into_iter().map(Into::into).collect());
        self
    }

    /// Program name shown in help.
    #[must_use]
    pub fn program_name(mut self, name: impl Into<String>) -> Self {
        self.program_name = Some(name.into());
        self
    }

    /// Leave optional fields `None` when no source and no default supplied
    /// a value.
    #[must_use]
    pub const fn nil_optionals(mut self, enabled: bool) -> Self {
        self.nil_optionals = enabled;
        self
    }

    /// Replace the rendered help with the output of `usage`.
    #[must_use]
    pub fn usage<F>(mut self, usage: F) -> Self
    where
        F: Fn(&ParamSet) -> String + Send + Sync + 'static,
    {
        self.usage = Some(Arc::new(usage));
        self
    }

    /// List the template flags in help.
    #[must_use]
    pub const fn show_internal_flags(mut self, enabled: bool) -> Self {
        self.show_internal_flags = enabled;
        self
    }

    /// Leave `-h` free for fields.
    #[must_use]
    pub const fn no_short_help(mut self, enabled: bool) -> Self {
        self.no_short_help = enabled;
        self
    }

    /// Report fields without a default that no source set.
    #[must_use]
    pub const fn require_no_defaults(mut self, enabled: bool) -> Self {
        self.require_no_defaults = enabled;
        self
    }

    /// Use `types` to convert field values.
    #[must_use]
    pub fn types(mut self, types: TypeRegistry) -> Self {
        self.types = types;
        self
    }

    /// Use `validator` for `validate` expressions.
    #[must_use]
    pub fn validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    /// Add types to the current registry.
    #[must_use]
    pub fn register_types(mut self, register: impl FnOnce(&mut TypeRegistry)) -> Self {
        register(&mut self.types);
        self
    }

    /// Add rules to the current validator.
    #[must_use]
    pub fn register_rules(mut self, register: impl FnOnce(&mut Validator)) -> Self {
        register(&mut self.validator);
        self
    }

    /// Environment prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.env_prefix
    }

    /// Explicit arguments, or the process arguments after the program name.
    pub(crate) fn arguments(&self) -> ConfigResult<Vec<String>> {
        self.args.as_ref().map_or_else(
            || unicode_arguments(std::env::args_os().skip(1)),
            |args| Ok(args.clone()),
        )
    }

    pub(crate) fn program(&self) -> String {
        self.program_name.clone().unwrap_or_else(|| {
            std::env::args_os()
                .next()
                .as_deref()
                .and_then(|arg0| Path::new(arg0).file_name())
                .map_or_else(|| "app".to_owned(), |name| name.to_string_lossy().into_owned())
        })
    }

    pub(crate) const fn short_help(&self) -> bool {
        !self.no_short_help
    }

    pub(crate) const fn templates_hidden(&self) -> bool {
        !self.show_internal_flags
    }

    pub(crate) const fn optionals_stay_none(&self) -> bool {
        self.nil_optionals
    }

    pub(crate) const fn requires_no_defaults(&self) -> bool {
        self.require_no_defaults
    }

    pub(crate) const fn type_registry(&self) -> &TypeRegistry {
        &self.types
    }

    pub(crate) const fn rules(&self) -> &Validator {
        &self.validator
    }

    pub(crate) fn render_usage(&self, params: &ParamSet) -> String {
        self.usage
            .as_ref()
            .map_or_else(|| params.render_help(), |usage| usage(params))
    }
}

/// Convert raw arguments, rejecting the first one that is not UTF-8.
pub(crate) fn unicode_arguments<I>(raw: I) -> ConfigResult<Vec<String>>
where
    I: IntoIterator<Item = OsString>,
{
    raw.into_iter()
        .map(|arg| {
            arg.into_string()
                .map_err(|bad| ConfigError::NonUnicodeArgument {
                    argument: bad.to_string_lossy().into_owned(),
                })
        })
        .collect()
}
