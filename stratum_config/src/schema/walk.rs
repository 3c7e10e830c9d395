//! Depth-first traversal of a schema's leaf fields.

use tracing::trace;

use crate::error::{ConfigError, ConfigResult};
use crate::naming;
use crate::tags::Tags;

use super::{FieldDescriptor, MemberKind, Schema, Slot};

/// Whether a traversal should continue after visiting a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Visit the next field.
    Continue,
    /// End the traversal.
    Stop,
}

/// Visit every non-ignored leaf of `schema` in declaration order.
///
/// Nested structures push their snake-cased name (or the `name` tag
/// override) onto the ancestor list; an empty `name` tag and embedded
/// structures add nothing. Returns [`Flow::Stop`] when the visitor ended
/// the walk early.
///
/// # Errors
///
/// Returns [`ConfigError::MalformedTag`] for unparseable tags and any error
/// produced by `visit`.
pub fn walk<F>(schema: &mut dyn Schema, visit: &mut F) -> ConfigResult<Flow>
where
    F: FnMut(&FieldDescriptor, &mut Slot<'_>) -> ConfigResult<Flow>,
{
    let mut ancestors = Vec::new();
    walk_members(schema, &mut ancestors, visit)
}

fn walk_members<F>(
    schema: &mut dyn Schema,
    ancestors: &mut Vec<String>,
    visit: &mut F,
) -> ConfigResult<Flow>
where
    F: FnMut(&FieldDescriptor, &mut Slot<'_>) -> ConfigResult<Flow>,
{
    for member in schema.members() {
        let (name, raw_tags, kind) = member.into_parts();
        let tags = Tags::parse(raw_tags).map_err(|err| ConfigError::MalformedTag {
            field: name.to_owned(),
            reason: err.to_string(),
        })?;
        if tags.has("ignore") {
            trace!(member = name, "skipping ignored member");
            continue;
        }
        let flow = match kind {
            MemberKind::Embedded(inner) => walk_members(inner, ancestors, visit)?,
            MemberKind::Nested(inner) => match tags.get("name").unwrap_or(name) {
                "" => walk_members(inner, ancestors, visit)?,
                segment => {
                    ancestors.push(naming::segment(segment));
                    let flow = walk_members(inner, ancestors, visit);
                    ancestors.pop();
                    flow?
                }
            },
            MemberKind::Leaf(mut slot) => {
                let descriptor = FieldDescriptor::build(name, &tags, ancestors, &slot)?;
                visit(&descriptor, &mut slot)?
            }
        };
        if flow == Flow::Stop {
            return Ok(Flow::Stop);
        }
    }
    Ok(Flow::Continue)
}

/// Descriptors of every field in traversal order.
///
/// # Errors
///
/// Returns [`ConfigError::MalformedTag`] for unparseable tags.
pub fn descriptors(schema: &mut dyn Schema) -> ConfigResult<Vec<FieldDescriptor>> {
    let mut fields = Vec::new();
    walk(schema, &mut |field, _| {
        fields.push(field.clone());
        Ok(Flow::Continue)
    })?;
    Ok(fields)
}

/// Descriptor of the field with canonical name `name`, stopping the walk
/// as soon as it is found.
///
/// # Errors
///
/// Returns [`ConfigError::MalformedTag`] for unparseable tags met before
/// the field.
pub fn find_field(schema: &mut dyn Schema, name: &str) -> ConfigResult<Option<FieldDescriptor>> {
    let mut found = None;
    walk(schema, &mut |field, _| {
        if field.name == name {
            found = Some(field.clone());
            return Ok(Flow::Stop);
        }
        Ok(Flow::Continue)
    })?;
    Ok(found)
}
