//! Type-erased value handlers.
//!
//! A handler knows how to turn text into a value of one Rust type, how to
//! render it back, and how to describe it to the validator. Handlers are
//! built typed and stored behind [`ErasedHandler`] so the registry can key
//! them by [`std::any::TypeId`].

use std::any::Any;
use std::sync::Arc;

use super::{FieldValue, Shape, ValueError};

/// Boxed value produced by a handler.
pub(crate) type AnyValue = Box<dyn Any>;

type ParseFn<T> = Arc<dyn Fn(&str) -> Result<T, ValueError> + Send + Sync>;
type FormatFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;
type InspectFn<T> = Arc<dyn Fn(&T) -> FieldValue + Send + Sync>;
type ZeroFn<T> = Arc<dyn Fn() -> Option<T> + Send + Sync>;

/// Operations the resolver needs from a handler, independent of its type.
pub(crate) trait ErasedHandler: Send + Sync {
    fn label(&self) -> &str;
    fn shape(&self) -> Shape;
    fn choices(&self) -> &[String];
    fn parse(&self, raw: &str) -> Result<AnyValue, ValueError>;
    fn format(&self, value: &dyn Any) -> String;
    fn inspect(&self, value: &dyn Any) -> FieldValue;
    fn zero(&self) -> Option<AnyValue>;
    /// Merge a later occurrence from the same source into an earlier one.
    fn combine(&self, earlier: AnyValue, later: AnyValue) -> AnyValue;
}

/// Handler for values of type `T`.
pub(crate) struct TypedHandler<T> {
    label: String,
    shape: Shape,
    choices: Vec<String>,
    parse: ParseFn<T>,
    format: FormatFn<T>,
    inspect: InspectFn<T>,
    zero: Option<ZeroFn<T>>,
    extend: Option<fn(&mut T, T)>,
}

impl<T> Clone for TypedHandler<T> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            shape: self.shape,
            choices: self.choices.clone(),
            parse: Arc::clone(&self.parse),
            format: Arc::clone(&self.format),
            inspect: Arc::clone(&self.inspect),
            zero: self.zero.clone(),
            extend: self.extend,
        }
    }
}

impl<T: 'static> TypedHandler<T> {
    /// Scalar handler whose inspection renders through `format`.
    pub(crate) fn new<P, F>(label: impl Into<String>, parse: P, format: F) -> Self
    where
        P: Fn(&str) -> Result<T, ValueError> + Send + Sync + 'static,
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        let format: FormatFn<T> = Arc::new(format);
        let render = Arc::clone(&format);
        Self {
            label: label.into(),
            shape: Shape::Scalar,
            choices: Vec::new(),
            parse: Arc::new(parse),
            format,
            inspect: Arc::new(move |value| FieldValue::Text(render(value))),
            zero: None,
            extend: None,
        }
    }

    pub(crate) const fn shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    pub(crate) fn choices(mut self, choices: Vec<String>) -> Self {
        self.choices = choices;
        self
    }

    pub(crate) fn inspect<I>(mut self, inspect: I) -> Self
    where
        I: Fn(&T) -> FieldValue + Send + Sync + 'static,
    {
        self.inspect = Arc::new(inspect);
        self
    }

    pub(crate) fn zero<Z>(mut self, zero: Z) -> Self
    where
        Z: Fn() -> T + Send + Sync + 'static,
    {
        self.zero = Some(Arc::new(move || Some(zero())));
        self
    }

    pub(crate) fn maybe_zero<Z>(mut self, zero: Z) -> Self
    where
        Z: Fn() -> Option<T> + Send + Sync + 'static,
    {
        self.zero = Some(Arc::new(zero));
        self
    }

    pub(crate) const fn extend(mut self, extend: fn(&mut T, T)) -> Self {
        self.extend = Some(extend);
        self
    }

    pub(crate) fn label_text(&self) -> &str {
        &self.label
    }

    pub(crate) fn parse_typed(&self, raw: &str) -> Result<T, ValueError> {
        (self.parse)(raw)
    }

    pub(crate) fn format_typed(&self, value: &T) -> String {
        (self.format)(value)
    }

    pub(crate) fn inspect_typed(&self, value: &T) -> FieldValue {
        (self.inspect)(value)
    }
}

impl<T: 'static> ErasedHandler for TypedHandler<T> {
    fn label(&self) -> &str {
        &self.label
    }

    fn shape(&self) -> Shape {
        self.shape
    }

    fn choices(&self) -> &[String] {
        &self.choices
    }

    fn parse(&self, raw: &str) -> Result<AnyValue, ValueError> {
        (self.parse)(raw).map(|value| Box::new(value) as AnyValue)
    }

    fn format(&self, value: &dyn Any) -> String {
        value
            .downcast_ref::<T>()
            .map(|typed| (self.format)(typed))
            .unwrap_or_default()
    }

    fn inspect(&self, value: &dyn Any) -> FieldValue {
        value
            .downcast_ref::<T>()
            .map_or(FieldValue::Absent, |typed| (self.inspect)(typed))
    }

    fn zero(&self) -> Option<AnyValue> {
        self.zero
            .as_ref()
            .and_then(|zero| zero())
            .map(|value| Box::new(value) as AnyValue)
    }

    fn combine(&self, earlier: AnyValue, later: AnyValue) -> AnyValue {
        let Some(extend) = self.extend else {
            return later;
        };
        match (earlier.downcast::<T>(), later.downcast::<T>()) {
            (Ok(mut acc), Ok(next)) => {
                extend(&mut acc, *next);
                acc as AnyValue
            }
            (_, Ok(next)) => next as AnyValue,
            (_, Err(next)) => next,
        }
    }
}
