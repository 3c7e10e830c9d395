//! Type-independent view of a resolved field value.

use std::time::Duration;

/// Shape-preserving snapshot of a field's value, used by the validator and
/// the YAML template.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Optional field with no value.
    Absent,
    /// Boolean.
    Bool(bool),
    /// Any integer type.
    Integer(i128),
    /// Any floating-point type.
    Float(f64),
    /// Text and anything rendered as text.
    Text(String),
    /// Duration.
    Duration(Duration),
    /// Ordered list of elements.
    List(Vec<FieldValue>),
    /// Key/value entries sorted by key.
    Map(Vec<(String, FieldValue)>),
}

impl FieldValue {
    /// Returns `true` for the zero value of the shape: absent, `false`, `0`,
    /// empty text, a zero duration or an empty collection.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Absent => true,
            Self::Bool(b) => !b,
            Self::Integer(i) => *i == 0,
            Self::Float(f) => *f == 0.0,
            Self::Text(s) => s.is_empty(),
            Self::Duration(d) => d.is_zero(),
            Self::List(items) => items.is_empty(),
            Self::Map(entries) => entries.is_empty(),
        }
    }

    /// Text content, if this is a [`FieldValue::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Plain rendering used in messages and `oneof` comparisons.
    #[must_use]
    pub fn display_text(&self) -> String {
        match self {
            Self::Absent => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Integer(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => s.clone(),
            Self::Duration(d) => super::format_duration(d),
            Self::List(items) => items
                .iter()
                .map(Self::display_text)
                .collect::<Vec<_>>()
                .join(","),
            Self::Map(entries) => entries
                .iter()
                .map(|(k, v)| format!("{k}={}", v.display_text()))
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}
