//! Handlers for lists and string-keyed maps.
//!
//! Both use CSV text: a list is one record of elements, a map is one record
//! of `key=value` entries. Repeated occurrences from one source accumulate.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use super::csv::{read_record, write_record};
use super::handler::TypedHandler;
use super::{FieldValue, Shape, ValueError};

fn extend_vec<E>(acc: &mut Vec<E>, next: Vec<E>) {
    acc.extend(next);
}

/// Derive a `Vec<E>` handler from the element handler.
pub(crate) fn list_of<E: 'static>(element: &TypedHandler<E>) -> TypedHandler<Vec<E>> {
    let parse_elem = element.clone();
    let format_elem = element.clone();
    let inspect_elem = element.clone();
    TypedHandler::<Vec<E>>::new(
        format!("[]{}", element.label_text()),
        move |raw| {
            read_record(raw)?
                .iter()
                .map(|field| parse_elem.parse_typed(field))
                .collect()
        },
        move |items: &Vec<E>| {
            let fields: Vec<String> = items
                .iter()
                .map(|item| format_elem.format_typed(item))
                .collect();
            write_record(&fields)
        },
    )
    .shape(Shape::List)
    .inspect(move |items| {
        FieldValue::List(items.iter().map(|item| inspect_elem.inspect_typed(item)).collect())
    })
    .zero(Vec::new)
    .extend(extend_vec::<E>)
}

/// Split map text into `(key, value)` pairs.
fn parse_entries(raw: &str) -> Result<Vec<(String, String)>, ValueError> {
    read_record(raw)?
        .into_iter()
        .map(|entry| {
            entry
                .split_once('=')
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .ok_or_else(|| ValueError::new(format!("{entry} must be formatted as key=value")))
        })
        .collect()
}

/// Map containers the builtin handlers support.
pub(crate) trait StringMap<V>: Default + 'static {
    fn insert_entry(&mut self, key: String, value: V);
    fn sorted_entries(&self) -> Vec<(&String, &V)>;
}

impl<V: 'static> StringMap<V> for BTreeMap<String, V> {
    fn insert_entry(&mut self, key: String, value: V) {
        self.insert(key, value);
    }

    fn sorted_entries(&self) -> Vec<(&String, &V)> {
        self.iter().collect()
    }
}

impl<V: 'static, S: BuildHasher + Default + 'static> StringMap<V> for HashMap<String, V, S> {
    fn insert_entry(&mut self, key: String, value: V) {
        self.insert(key, value);
    }

    fn sorted_entries(&self) -> Vec<(&String, &V)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

fn merge_maps<M, V>(acc: &mut M, next: M)
where
    M: StringMap<V> + IntoIterator<Item = (String, V)>,
{
    for (key, value) in next {
        acc.insert_entry(key, value);
    }
}

/// Handler for a string-keyed map whose values use `value`.
pub(crate) fn map_of<M, V>(label: &str, value: &TypedHandler<V>) -> TypedHandler<M>
where
    M: StringMap<V> + IntoIterator<Item = (String, V)>,
    V: 'static,
{
    let parse_value = value.clone();
    let format_value = value.clone();
    let inspect_value = value.clone();
    TypedHandler::<M>::new(
        label,
        move |raw| {
            let mut map = M::default();
            for (key, text) in parse_entries(raw)? {
                let parsed = parse_value.parse_typed(&text)?;
                map.insert_entry(key, parsed);
            }
            Ok(map)
        },
        move |map: &M| {
            let fields: Vec<String> = map
                .sorted_entries()
                .into_iter()
                .map(|(k, v)| format!("{k}={}", format_value.format_typed(v)))
                .collect();
            write_record(&fields)
        },
    )
    .shape(Shape::Map)
    .inspect(move |map| {
        FieldValue::Map(
            map.sorted_entries()
                .into_iter()
                .map(|(k, v)| (k.clone(), inspect_value.inspect_typed(v)))
                .collect(),
        )
    })
    .zero(M::default)
    .extend(merge_maps::<M, V>)
}
