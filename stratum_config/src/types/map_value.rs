//! Handlers for named values, such as log levels, that map
//! case-insensitive text onto values of an arbitrary type.

use super::ValueError;
use super::handler::TypedHandler;

/// Label for `T` when none is supplied: the last path segment of its type
/// name.
pub(crate) fn short_type_name<T>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_owned()
}

/// Build a handler from `(text, value)` pairs.
///
/// Lookups ignore ASCII case. Rendering picks the first key whose value
/// equals the current one; insertion order therefore decides which alias
/// is shown.
pub(crate) fn named_values<T>(label: &str, mapping: Vec<(String, T)>) -> TypedHandler<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    let label = if label.is_empty() {
        short_type_name::<T>()
    } else {
        label.to_owned()
    };
    let keys: Vec<String> = mapping.iter().map(|(key, _)| key.clone()).collect();
    let lookup = mapping.clone();
    let error_label = label.clone();
    TypedHandler::<T>::new(
        label,
        move |raw| {
            lookup
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(raw.trim()))
                .map(|(_, value)| value.clone())
                .ok_or_else(|| ValueError::new(format!("invalid {error_label}: {raw:?}")))
        },
        move |value: &T| {
            mapping
                .iter()
                .find(|(_, candidate)| candidate == value)
                .map(|(key, _)| key.clone())
                .unwrap_or_default()
        },
    )
    .choices(keys)
}
