//! Attribute parsing for `#[derive(Schema)]`.

use syn::{Attribute, Expr, ExprLit, Field, Lit, Meta};

mod literals;
#[cfg(test)]
mod tests;
mod type_utils;

use literals::{default_text, lit_char, lit_str};
pub(crate) use type_utils::option_inner;

/// Struct-level attributes.
#[derive(Default)]
pub(crate) struct StructAttrs {
    /// Overrides the generated crate path, `stratum_config` by default.
    pub crate_path: Option<syn::Path>,
}

/// How a field takes part in the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum FieldKind {
    #[default]
    Leaf,
    Nested,
    Flatten,
    Ignored,
}

/// Field-level attributes.
#[derive(Debug, Default)]
pub(crate) struct FieldAttrs {
    pub kind: FieldKind,
    pub desc: Option<String>,
    pub default: Option<String>,
    pub short: Option<char>,
    pub choices: Option<String>,
    pub validate: Option<String>,
    pub name: Option<String>,
    pub hidden: bool,
}

fn stratum_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs.iter().filter(|attr| attr.path().is_ident("stratum"))
}

pub(crate) fn parse_struct_attrs(attrs: &[Attribute]) -> syn::Result<StructAttrs> {
    let mut out = StructAttrs::default();
    for attr in stratum_attrs(attrs) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("crate") {
                let path = lit_str(&meta, "crate")?;
                out.crate_path = Some(path.parse()?);
                Ok(())
            } else {
                Err(meta.error("unknown stratum struct attribute"))
            }
        })?;
    }
    Ok(out)
}

fn set_kind(kind: &mut FieldKind, next: FieldKind, meta: &syn::meta::ParseNestedMeta) -> syn::Result<()> {
    if *kind != FieldKind::Leaf {
        return Err(meta.error("only one of nested, flatten and ignore may be given"));
    }
    *kind = next;
    Ok(())
}

pub(crate) fn parse_field_attrs(field: &Field) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    for attr in stratum_attrs(&field.attrs) {
        attr.parse_nested_meta(|meta| {
            let Some(key) = meta.path.get_ident().map(ToString::to_string) else {
                return Err(meta.error("expected a stratum attribute name"));
            };
            match key.as_str() {
                "desc" => out.desc = Some(lit_str(&meta, "desc")?.value()),
                "default" => out.default = Some(default_text(&meta)?),
                "short" => out.short = Some(lit_char(&meta, "short")?),
                "choices" => out.choices = Some(lit_str(&meta, "choices")?.value()),
                "validate" => out.validate = Some(lit_str(&meta, "validate")?.value()),
                "name" => out.name = Some(lit_str(&meta, "name")?.value()),
                "hidden" => out.hidden = true,
                "nested" => set_kind(&mut out.kind, FieldKind::Nested, &meta)?,
                "flatten" => set_kind(&mut out.kind, FieldKind::Flatten, &meta)?,
                "ignore" => set_kind(&mut out.kind, FieldKind::Ignored, &meta)?,
                _ => return Err(meta.error(format!("unknown stratum attribute `{key}`"))),
            }
            Ok(())
        })?;
    }
    if matches!(out.kind, FieldKind::Nested | FieldKind::Flatten) {
        let leaf_only = out.default.is_some()
            || out.short.is_some()
            || out.choices.is_some()
            || out.validate.is_some()
            || out.hidden;
        if leaf_only {
            return Err(syn::Error::new_spanned(
                field,
                "nested fields accept only `name` and `desc`",
            ));
        }
    }
    if out.desc.is_none() {
        out.desc = doc_text(&field.attrs);
    }
    Ok(out)
}

/// Doc comment lines joined with spaces, if any.
pub(crate) fn doc_text(attrs: &[Attribute]) -> Option<String> {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(s), ..
                }) => Some(s.value().trim().to_owned()),
                _ => None,
            },
            _ => None,
        })
        .filter(|line| !line.is_empty())
        .collect();
    (!lines.is_empty()).then(|| lines.join(" "))
}

/// Render attributes as the tag string read at runtime.
///
/// Values are double-quoted with `\`, `"`, newline, tab and carriage return
/// escaped.
pub(crate) fn tag_string(attrs: &FieldAttrs) -> String {
    let mut pairs: Vec<(&str, String)> = Vec::new();
    if let Some(name) = &attrs.name {
        pairs.push(("name", name.clone()));
    }
    if let Some(desc) = &attrs.desc {
        pairs.push(("desc", desc.clone()));
    }
    if let Some(default) = &attrs.default {
        pairs.push(("default", default.clone()));
    }
    if let Some(short) = attrs.short {
        pairs.push(("short", short.to_string()));
    }
    if let Some(choices) = &attrs.choices {
        pairs.push(("enum", choices.clone()));
    }
    if let Some(validate) = &attrs.validate {
        pairs.push(("validate", validate.clone()));
    }
    if attrs.hidden {
        pairs.push(("hidden", String::new()));
    }
    pairs
        .iter()
        .map(|(key, value)| format!("{key}:{}", quote_value(value)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn quote_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}
