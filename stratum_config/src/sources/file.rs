//! Configuration file location and loading.
//!
//! The file is a JSON or YAML mapping whose key paths mirror the schema:
//! nested mappings descend into nested structures, and a mapping whose
//! joined name is a map-typed field becomes that field's value. Every
//! value is converted back to text and passed through the field's handler,
//! so file values follow the same rules as environment variables.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value as JsonValue};
use tracing::{debug, trace};

use super::env::EnvSnapshot;
use crate::error::{ConfigError, ConfigResult};
use crate::naming;
use crate::params::{ParamSet, ParsedArgs, ValueSource};
use crate::schema::FieldDescriptor;
use crate::types::Shape;
use crate::types::csv::write_record;

/// The config-file marker field, as needed before the main pass.
#[derive(Debug, Clone)]
pub(crate) struct ConfigFileField {
    pub(crate) name: String,
    pub(crate) default: Option<String>,
}

impl From<&FieldDescriptor> for ConfigFileField {
    fn from(field: &FieldDescriptor) -> Self {
        Self {
            name: field.name.clone(),
            default: field.default.clone(),
        }
    }
}

/// File chosen by the bootstrap pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Location {
    pub(crate) path: PathBuf,
    /// Named by an argument or variable rather than the tag default.
    pub(crate) explicit: bool,
}

/// Pick the configuration file: command line, then environment, then the
/// declared default.
pub(crate) fn locate(
    field: &ConfigFileField,
    args: &ParsedArgs,
    env: &EnvSnapshot,
) -> Option<Location> {
    if let Some(path) = args.last_value(&field.name).filter(|p| !p.is_empty()) {
        return Some(Location {
            path: PathBuf::from(path),
            explicit: true,
        });
    }
    if let Some((_, path)) = env.lookup(&field.name) {
        return Some(Location {
            path: PathBuf::from(path),
            explicit: true,
        });
    }
    field
        .default
        .as_deref()
        .filter(|p| !p.is_empty())
        .map(|path| Location {
            path: PathBuf::from(path),
            explicit: false,
        })
}

/// Load `location` into `params`. A missing default file is skipped.
///
/// Returns `true` when a file was read.
pub(crate) fn load(location: &Location, params: &mut ParamSet) -> ConfigResult<bool> {
    let path = &location.path;
    if !location.explicit && !path.exists() {
        debug!(path = %path.display(), "default configuration file not found; skipping");
        return Ok(false);
    }
    let contents = std::fs::read_to_string(path).map_err(|err| ConfigError::file(path, err))?;
    let document = parse_document(path, &contents)?;
    apply_document(&document, path, params)?;
    debug!(path = %path.display(), "applied configuration file");
    Ok(true)
}

/// Parse file contents according to the file extension.
pub(crate) fn parse_document(path: &Path, contents: &str) -> ConfigResult<JsonValue> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("json") => {
            serde_json::from_str(contents).map_err(|err| ConfigError::file(path, err))
        }
        Some("yaml" | "yml") => parse_yaml(path, contents),
        _ => Err(ConfigError::UnsupportedFileType {
            path: path.to_path_buf(),
        }),
    }
}

#[cfg(feature = "yaml")]
fn parse_yaml(path: &Path, contents: &str) -> ConfigResult<JsonValue> {
    serde_saphyr::from_str_with_options(
        contents,
        serde_saphyr::Options {
            strict_booleans: true,
            ..serde_saphyr::Options::default()
        },
    )
    .map_err(|err| ConfigError::file(path, err.to_string()))
}

#[cfg(not(feature = "yaml"))]
fn parse_yaml(path: &Path, _contents: &str) -> ConfigResult<JsonValue> {
    Err(ConfigError::file(
        path,
        std::io::Error::other(
            "yaml feature disabled: enable the 'yaml' feature to support this file format",
        ),
    ))
}

/// Walk a parsed document, setting every field it names.
pub(crate) fn apply_document(
    document: &JsonValue,
    path: &Path,
    params: &mut ParamSet,
) -> ConfigResult<()> {
    let origin = ValueSource::File(path.to_path_buf());
    match document {
        JsonValue::Null => Ok(()),
        JsonValue::Object(map) => apply_mapping(map, &mut Vec::new(), params, &origin),
        _ => Err(ConfigError::file(
            path,
            "expected a mapping at the top level of the configuration file",
        )),
    }
}

fn apply_mapping(
    map: &Map<String, JsonValue>,
    ancestors: &mut Vec<String>,
    params: &mut ParamSet,
    origin: &ValueSource,
) -> ConfigResult<()> {
    for (key, value) in map {
        let segment = naming::segment(key);
        let name = naming::join(ancestors, &segment);
        let shape = params.lookup_field(&name).map(|param| param.shape());
        match (value, shape) {
            (JsonValue::Object(entries), Some(Shape::Map)) => {
                params.set(&name, &map_literal(entries), origin.clone())?;
            }
            (JsonValue::Object(_), Some(_)) => {
                return Err(ConfigError::InvalidValue {
                    name,
                    value: value.to_string(),
                    origin: origin.clone(),
                    reason: "expected a single value, found a mapping".to_owned(),
                });
            }
            (JsonValue::Object(nested), None) => {
                ancestors.push(segment);
                let applied = apply_mapping(nested, ancestors, params, origin);
                ancestors.pop();
                applied?;
            }
            (_, None) => return Err(ConfigError::UnknownField { name }),
            (JsonValue::Null, Some(_)) => {
                trace!(field = %name, "null in configuration file; leaving unset");
            }
            (JsonValue::Array(items), Some(_)) => {
                let fields: Vec<String> = items.iter().map(scalar_text).collect();
                params.set(&name, &join_fields(&fields), origin.clone())?;
            }
            (scalar, Some(_)) => {
                params.set(&name, &scalar_text(scalar), origin.clone())?;
            }
        }
    }
    Ok(())
}

/// Text of a scalar as a field handler expects it.
fn scalar_text(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(text) => text.clone(),
        JsonValue::Bool(_) | JsonValue::Number(_) | JsonValue::Array(_) | JsonValue::Object(_) => {
            value.to_string()
        }
    }
}

/// Join list items, quoting as CSV only when an item needs it.
fn join_fields(fields: &[String]) -> String {
    if fields.iter().any(|field| field.contains([',', '"'])) {
        write_record(fields)
    } else {
        fields.join(",")
    }
}

/// `key=value` text for a mapping assigned to a map-typed field.
fn map_literal(entries: &Map<String, JsonValue>) -> String {
    let fields: Vec<String> = entries
        .iter()
        .map(|(key, value)| format!("{key}={}", scalar_text(value)))
        .collect();
    join_fields(&fields)
}
