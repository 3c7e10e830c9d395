//! Schema description and traversal.
//!
//! A configuration structure implements [`Schema`], normally through
//! `#[derive(Schema)]`, to list its members. Each member is a leaf holding
//! a value, a nested structure whose name prefixes its fields, or an
//! embedded structure whose fields are promoted into the parent.

mod descriptor;
mod slot;
mod walk;

use std::any::Any;

pub use descriptor::FieldDescriptor;
pub use slot::Slot;
pub use walk::{Flow, descriptors, find_field, walk};

/// Structure that can be populated by the resolver.
pub trait Schema: Any {
    /// Members in declaration order.
    fn members(&mut self) -> Vec<Member<'_>>;

    /// Nested and embedded structures in declaration order.
    fn substructures(&self) -> Vec<&dyn Schema> {
        Vec::new()
    }
}

/// What a member contributes to the schema.
pub enum MemberKind<'a> {
    /// Leaf field.
    Leaf(Slot<'a>),
    /// Nested structure; its name prefixes every field beneath it.
    Nested(&'a mut dyn Schema),
    /// Embedded structure; its fields are promoted into the parent.
    Embedded(&'a mut dyn Schema),
}

/// A single member of a schema: name, raw tag string and kind.
pub struct Member<'a> {
    name: &'a str,
    tags: &'a str,
    kind: MemberKind<'a>,
}

impl<'a> Member<'a> {
    /// Leaf member writing through `slot`.
    #[must_use]
    pub const fn leaf(name: &'a str, tags: &'a str, slot: Slot<'a>) -> Self {
        Self {
            name,
            tags,
            kind: MemberKind::Leaf(slot),
        }
    }

    /// Nested structure member.
    #[must_use]
    pub fn nested(name: &'a str, tags: &'a str, schema: &'a mut dyn Schema) -> Self {
        Self {
            name,
            tags,
            kind: MemberKind::Nested(schema),
        }
    }

    /// Embedded structure member.
    #[must_use]
    pub fn embedded(name: &'a str, tags: &'a str, schema: &'a mut dyn Schema) -> Self {
        Self {
            name,
            tags,
            kind: MemberKind::Embedded(schema),
        }
    }

    /// Member name as declared.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name
    }

    /// Raw tag string.
    #[must_use]
    pub const fn tags(&self) -> &str {
        self.tags
    }

    pub(crate) fn into_parts(self) -> (&'a str, &'a str, MemberKind<'a>) {
        (self.name, self.tags, self.kind)
    }
}

#[cfg(test)]
mod tests;
