//! Metadata for a single leaf field.

use crate::error::{ConfigError, ConfigResult};
use crate::naming;
use crate::tags::Tags;
use crate::types::{ConfigFile, TypeKey};

use super::Slot;

/// Everything the resolver knows about a leaf field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Canonical name, such as `server_port`.
    pub name: String,
    /// Member name as declared.
    pub member: String,
    /// Canonical segments of the enclosing nested structures.
    pub ancestors: Vec<String>,
    /// Value type; `T` for an `Option<T>` field.
    pub type_key: TypeKey,
    /// Description from the `desc` tag, or the name with spaces.
    pub description: String,
    /// Single-character alias.
    pub short: Option<char>,
    /// Declared default text; `Some("")` means an explicit empty default.
    pub default: Option<String>,
    /// Allowed values from the `enum` tag, in declaration order.
    pub choices: Vec<String>,
    /// Validation expression from the `validate` tag.
    pub constraints: Option<String>,
    /// Omitted from help and templates.
    pub hidden: bool,
    /// Declared as `Option<T>`.
    pub optional: bool,
}

impl FieldDescriptor {
    pub(crate) fn build(
        member: &str,
        tags: &Tags,
        ancestors: &[String],
        slot: &Slot<'_>,
    ) -> ConfigResult<Self> {
        let own = tags.get("name").filter(|n| !n.is_empty()).unwrap_or(member);
        let name = naming::canonical_name(own, ancestors);
        let short = match tags.get("short") {
            None | Some("") => None,
            Some(text) => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(c),
                    _ => {
                        return Err(ConfigError::MalformedTag {
                            field: member.to_owned(),
                            reason: format!("short flag must be a single character, got {text:?}"),
                        });
                    }
                }
            }
        };
        let choices = tags
            .get("enum")
            .filter(|list| !list.is_empty())
            .map(|list| list.split(',').map(str::to_owned).collect())
            .unwrap_or_default();
        Ok(Self {
            description: tags
                .get("desc")
                .map_or_else(|| name.replace('_', " "), str::to_owned),
            member: member.to_owned(),
            ancestors: ancestors.to_vec(),
            type_key: slot.type_key(),
            short,
            default: tags.get("default").map(str::to_owned),
            choices,
            constraints: tags
                .get("validate")
                .filter(|expr| !expr.is_empty())
                .map(str::to_owned),
            hidden: tags.has("hidden"),
            optional: slot.is_optional(),
            name,
        })
    }

    /// Returns `true` for the config-file marker field.
    #[must_use]
    pub fn is_config_file(&self) -> bool {
        self.type_key == TypeKey::of::<ConfigFile>()
    }

    /// Returns `true` when the validation expression contains `required`.
    #[must_use]
    pub fn has_required_constraint(&self) -> bool {
        self.constraints
            .as_deref()
            .is_some_and(|expr| expr.split(',').any(|rule| rule.trim() == "required"))
    }

    /// Usage text: the description, followed by the allowed values when an
    /// `enum` tag is present.
    #[must_use]
    pub fn usage(&self) -> String {
        if self.choices.is_empty() {
            self.description.clone()
        } else {
            format!("{} ({})", self.description, self.choices.join("|"))
        }
    }

    /// Key relative to the enclosing nested structure.
    #[must_use]
    pub fn leaf_key(&self) -> &str {
        naming::leaf_key(&self.name, &self.ancestors)
    }
}
