//! Environment and YAML templates seeded with the resolved values.
//!
//! Both emitters walk the populated schema, so the output reflects whatever
//! defaults, files, variables and arguments produced the configuration. A
//! YAML template fed back as the configuration file reproduces the same
//! values.

use serde_json::Value as JsonValue;

use crate::error::ConfigResult;
use crate::naming;
use crate::params::ParamSet;
use crate::schema::{Flow, Schema, walk};
use crate::types::{FieldValue, format_duration};

const INDENT: &str = "  ";

fn header(args: &[String]) -> String {
    format!("# Generated with\n# {}\n\n", args.join(" "))
}

/// Render `KEY="value"` lines for every visible field.
///
/// # Errors
///
/// Propagates errors from walking `schema`.
pub(crate) fn env_template(
    schema: &mut dyn Schema,
    params: &ParamSet,
    prefix: &str,
    args: &[String],
) -> ConfigResult<String> {
    let mut out = header(args);
    walk(schema, &mut |field, slot| {
        let Some(param) = params.lookup_field(&field.name) else {
            return Ok(Flow::Continue);
        };
        if field.hidden {
            return Ok(Flow::Continue);
        }
        let text = slot
            .current()
            .map(|value| param.handler().format(value))
            .unwrap_or_default();
        out.push_str(&format!(
            "# {}\n{}=\"{}\"\n\n",
            param.usage(),
            naming::env_var_name(prefix, &field.name),
            text.replace('"', "\\\"")
        ));
        Ok(Flow::Continue)
    })?;
    Ok(out)
}

/// Render a YAML document nesting fields under their ancestor segments.
///
/// # Errors
///
/// Propagates errors from walking `schema`.
pub(crate) fn yaml_template(
    schema: &mut dyn Schema,
    params: &ParamSet,
    args: &[String],
) -> ConfigResult<String> {
    let mut out = header(args);
    let mut opened: Vec<String> = Vec::new();
    walk(schema, &mut |field, slot| {
        if field.hidden || field.is_config_file() {
            return Ok(Flow::Continue);
        }
        let Some(param) = params.lookup_field(&field.name) else {
            return Ok(Flow::Continue);
        };
        let shared = opened
            .iter()
            .zip(&field.ancestors)
            .take_while(|(open, ancestor)| open == ancestor)
            .count();
        opened.truncate(shared);
        for (depth, segment) in field.ancestors.iter().enumerate().skip(shared) {
            out.push_str(&format!("{}{segment}:\n\n", INDENT.repeat(depth)));
            opened.push(segment.clone());
        }
        let indent = INDENT.repeat(field.ancestors.len());
        let value = slot
            .current()
            .map_or(FieldValue::Absent, |current| param.handler().inspect(current));
        out.push_str(&format!(
            "{indent}# {}\n{indent}{}:{}\n\n",
            param.usage(),
            yaml_key(field.leaf_key()),
            block(&value, &indent)
        ));
        Ok(Flow::Continue)
    })?;
    Ok(out)
}

/// Value text following `key:`, including the separating space or the
/// line breaks of a block collection.
fn block(value: &FieldValue, indent: &str) -> String {
    match value {
        FieldValue::List(items) if !items.is_empty() => items
            .iter()
            .map(|item| format!("\n{indent}{INDENT}- {}", inline(item)))
            .collect(),
        FieldValue::Map(entries) if !entries.is_empty() => entries
            .iter()
            .map(|(key, item)| format!("\n{indent}{INDENT}{}: {}", yaml_key(key), inline(item)))
            .collect(),
        _ => format!(" {}", inline(value)),
    }
}

/// Flow-style rendering of a single value.
fn inline(value: &FieldValue) -> String {
    match value {
        FieldValue::Absent => "null".to_owned(),
        FieldValue::Bool(b) => b.to_string(),
        FieldValue::Integer(i) => i.to_string(),
        FieldValue::Float(f) if f.is_finite() => f.to_string(),
        FieldValue::Float(f) => quoted(&f.to_string()),
        FieldValue::Text(text) => quoted(text),
        FieldValue::Duration(d) => quoted(&format_duration(d)),
        FieldValue::List(items) => {
            let parts: Vec<String> = items.iter().map(inline).collect();
            format!("[{}]", parts.join(", "))
        }
        FieldValue::Map(entries) => {
            let parts: Vec<String> = entries
                .iter()
                .map(|(key, item)| format!("{}: {}", yaml_key(key), inline(item)))
                .collect();
            format!("{{{}}}", parts.join(", "))
        }
    }
}

fn quoted(text: &str) -> String {
    JsonValue::String(text.to_owned()).to_string()
}

fn yaml_key(key: &str) -> String {
    let plain = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if plain {
        key.to_owned()
    } else {
        quoted(key)
    }
}
