//! Procedural macros for `stratum_config`.
//!
//! `#[derive(Schema)]` implements `stratum_config::Schema` for a struct with
//! named fields. Field attributes are written as `#[stratum(...)]`:
//!
//! - `desc = "..."`: usage text; doc comments are used when absent.
//! - `default = <literal>`: default value text, such as `8080`, `-1`,
//!   `"info"` or `true`.
//! - `short = 'c'`: single-character flag alias.
//! - `choices = "a,b"`: allowed values, in display order.
//! - `validate = "..."`: validation expression.
//! - `name = "..."`: override the derived name; an empty name on a nested
//!   field flattens it.
//! - `hidden`, `ignore`: hide the flag, or leave the field out entirely.
//! - `nested`, `flatten`: the field is itself a schema, either prefixed
//!   with its name or merged into the parent's namespace.
//!
//! The struct attribute `#[stratum(crate = "path")]` changes the path used
//! to reach `stratum_config` in generated code.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod derive;

/// Derive `stratum_config::Schema`.
#[proc_macro_derive(Schema, attributes(stratum))]
pub fn derive_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
