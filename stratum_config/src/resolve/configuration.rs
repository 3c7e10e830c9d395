//! Resolved configuration handle with retrieval of substructures by type.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::ops::Deref;

use crate::schema::Schema;

/// A populated schema plus the positional arguments left after parsing.
///
/// Dereferences to the schema. [`Configuration::get`] finds the first
/// substructure of a given type, searching depth-first in declaration
/// order.
#[derive(Debug)]
pub struct Configuration<T> {
    inner: T,
    positional: Vec<String>,
    index: HashMap<TypeId, Vec<usize>>,
}

impl<T: Schema> Configuration<T> {
    pub(crate) fn new(inner: T, positional: Vec<String>) -> Self {
        let mut index = HashMap::new();
        index_schema(&inner, &mut Vec::new(), &mut index);
        Self {
            inner,
            positional,
            index,
        }
    }

    /// First structure of type `U` in the tree, the root included.
    #[must_use]
    pub fn get<U: Any>(&self) -> Option<&U> {
        let path = self.index.get(&TypeId::of::<U>())?;
        let mut node: &dyn Schema = &self.inner;
        for &position in path {
            node = node.substructures().into_iter().nth(position)?;
        }
        let any: &dyn Any = node;
        any.downcast_ref::<U>()
    }

    /// Arguments that did not belong to any flag.
    #[must_use]
    pub fn positional_args(&self) -> &[String] {
        &self.positional
    }

    /// Unwrap the schema.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> Deref for Configuration<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

fn index_schema(
    node: &dyn Schema,
    path: &mut Vec<usize>,
    index: &mut HashMap<TypeId, Vec<usize>>,
) {
    let any: &dyn Any = node;
    index.entry(any.type_id()).or_insert_with(|| path.clone());
    for (position, child) in node.substructures().into_iter().enumerate() {
        path.push(position);
        index_schema(child, path, index);
        path.pop();
    }
}
