//! The type registry: how text becomes typed field values.
//!
//! Every leaf field is dispatched on its Rust type. The registry maps a
//! [`TypeKey`] to a handler that parses text, renders values back to text
//! and describes them to the validator. Applications extend it with
//! [`TypeRegistry::add_type`], [`TypeRegistry::add_from_str`],
//! [`TypeRegistry::register`] and [`TypeRegistry::add_map_value_type`];
//! each custom scalar also gains a `Vec` form.

mod builtin;
mod collections;
mod config_file;
pub mod csv;
mod duration;
pub(crate) mod handler;
mod map_value;
mod net;
mod value;

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

pub use config_file::ConfigFile;
pub use duration::{format_duration, parse_duration};
pub use net::{IpMask, IpNetwork};
pub use value::FieldValue;

use collections::list_of;
use handler::{ErasedHandler, TypedHandler};

/// Error produced when text cannot be converted to a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValueError {
    message: String,
}

impl ValueError {
    /// Create an error carrying `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Identity of a Rust type used to look up handlers.
#[derive(Debug, Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Key for `T`.
    #[must_use]
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Rust type name, for diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl std::hash::Hash for TypeKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// How a field's values are written on the command line and accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Boolean flag; `--name` alone means `true`.
    Flag,
    /// Single value; the last occurrence wins.
    Scalar,
    /// List; occurrences accumulate.
    List,
    /// String-keyed map; occurrences accumulate.
    Map,
}

/// A value type the application teaches the resolver to read.
///
/// ```
/// use stratum_config::{ConfigValue, TypeRegistry, ValueError};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Percent(u8);
///
/// impl ConfigValue for Percent {
///     fn parse_value(raw: &str) -> Result<Self, ValueError> {
///         let digits = raw.strip_suffix('%').unwrap_or(raw);
///         digits
///             .parse()
///             .map(Percent)
///             .map_err(|_| ValueError::new(format!("invalid percentage: {raw}")))
///     }
///
///     fn render(&self) -> String {
///         format!("{}%", self.0)
///     }
///
///     fn type_label() -> String {
///         "percent".to_owned()
///     }
/// }
///
/// let mut types = TypeRegistry::new();
/// types.add_type::<Percent>();
/// assert!(types.contains::<Percent>());
/// assert!(types.contains::<Vec<Percent>>());
/// ```
pub trait ConfigValue: Sized + 'static {
    /// Parse text into a value.
    ///
    /// # Errors
    ///
    /// Returns a [`ValueError`] describing why `raw` was rejected.
    fn parse_value(raw: &str) -> Result<Self, ValueError>;

    /// Render the value as text that [`ConfigValue::parse_value`] accepts.
    fn render(&self) -> String;

    /// Placeholder shown in help output.
    fn type_label() -> String;

    /// Value given to an optional field that received nothing, when
    /// optional fields are not left empty. `None` keeps the field empty.
    fn zero() -> Option<Self> {
        None
    }
}

/// Registry of value handlers keyed by Rust type.
///
/// Custom registrations shadow builtin ones for the same type.
#[derive(Clone)]
pub struct TypeRegistry {
    builtin: HashMap<TypeKey, Arc<dyn ErasedHandler>>,
    custom: HashMap<TypeKey, Arc<dyn ErasedHandler>>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("builtin", &self.builtin.len())
            .field("custom", &self.custom.len())
            .finish()
    }
}

impl TypeRegistry {
    /// Registry with every builtin handler installed.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        builtin::install(&mut registry);
        registry
    }

    /// Registry with no handlers at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            builtin: HashMap::new(),
            custom: HashMap::new(),
        }
    }

    /// Register `T` and `Vec<T>` through their [`ConfigValue`] impl.
    pub fn add_type<T: ConfigValue>(&mut self) -> &mut Self {
        let handler =
            TypedHandler::<T>::new(T::type_label(), T::parse_value, T::render).maybe_zero(T::zero);
        self.install_custom_with_list(handler);
        self
    }

    /// Register `T` and `Vec<T>` through [`FromStr`] and [`fmt::Display`].
    pub fn add_from_str<T>(&mut self, label: &str) -> &mut Self
    where
        T: FromStr + fmt::Display + 'static,
        T::Err: fmt::Display,
    {
        self.install_custom_with_list(builtin::from_str::<T>(label));
        self
    }

    /// Register `T` and `Vec<T>` from a parse and a format function.
    pub fn register<T, P, F>(&mut self, label: &str, parse: P, format: F) -> &mut Self
    where
        T: 'static,
        P: Fn(&str) -> Result<T, ValueError> + Send + Sync + 'static,
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.install_custom_with_list(TypedHandler::<T>::new(label, parse, format));
        self
    }

    /// Register `T` as a set of named values, such as log levels.
    ///
    /// Text is matched against the keys ignoring ASCII case. An empty
    /// `type_name` labels the type by the last segment of its Rust path.
    /// The keys become the field's allowed choices in help output.
    ///
    /// ```
    /// use stratum_config::TypeRegistry;
    ///
    /// #[derive(Clone, Debug, PartialEq)]
    /// enum Mode { Fast, Safe }
    ///
    /// let mut types = TypeRegistry::new();
    /// types.add_map_value_type("Mode", [("fast", Mode::Fast), ("safe", Mode::Safe)]);
    /// assert!(types.contains::<Mode>());
    /// ```
    pub fn add_map_value_type<T, K, I>(&mut self, type_name: &str, mapping: I) -> &mut Self
    where
        T: Clone + PartialEq + Send + Sync + 'static,
        K: Into<String>,
        I: IntoIterator<Item = (K, T)>,
    {
        let pairs = mapping.into_iter().map(|(k, v)| (k.into(), v)).collect();
        self.install_custom_with_list(map_value::named_values(type_name, pairs));
        self
    }

    /// Returns `true` when a handler exists for `T`.
    #[must_use]
    pub fn contains<T: Any>(&self) -> bool {
        self.handler_for(TypeKey::of::<T>()).is_some()
    }

    /// Rust type names of every registered type, sorted.
    #[must_use]
    pub fn supported_types(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self
            .builtin
            .keys()
            .chain(self.custom.keys())
            .map(TypeKey::name)
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    pub(crate) fn handler_for(&self, key: TypeKey) -> Option<Arc<dyn ErasedHandler>> {
        self.custom
            .get(&key)
            .or_else(|| self.builtin.get(&key))
            .map(Arc::clone)
    }

    pub(crate) fn install_builtin<T: 'static>(&mut self, handler: TypedHandler<T>) {
        self.builtin.insert(TypeKey::of::<T>(), Arc::new(handler));
    }

    pub(crate) fn install_builtin_with_list<T: 'static>(&mut self, handler: TypedHandler<T>) {
        self.install_builtin(list_of(&handler));
        self.install_builtin(handler);
    }

    fn install_custom_with_list<T: 'static>(&mut self, handler: TypedHandler<T>) {
        self.custom
            .insert(TypeKey::of::<Vec<T>>(), Arc::new(list_of(&handler)));
        self.custom.insert(TypeKey::of::<T>(), Arc::new(handler));
    }
}

/// Handler for the built-in boolean flags, independent of any registry.
pub(crate) fn flag_handler() -> Arc<dyn ErasedHandler> {
    Arc::new(builtin::boolean())
}
