//! Unit tests for attribute parsing.

use rstest::rstest;
use syn::{Expr, Field, parse_quote};

use super::literals::literal_text;
use super::{FieldKind, doc_text, parse_field_attrs, tag_string};

#[rstest]
#[case(parse_quote!(8080), "8080")]
#[case(parse_quote!(-1), "-1")]
#[case(parse_quote!(-2.5), "-2.5")]
#[case(parse_quote!(1_000), "1000")]
#[case(parse_quote!("info"), "info")]
#[case(parse_quote!(true), "true")]
fn default_literals_render_as_text(#[case] expr: Expr, #[case] expected: &str) {
    assert_eq!(literal_text(&expr).ok().as_deref(), Some(expected));
}

#[rstest]
#[case(parse_quote!(-"x"))]
#[case(parse_quote!(some_fn()))]
fn default_rejects_non_literals(#[case] expr: Expr) {
    assert!(literal_text(&expr).is_err());
}

#[test]
fn doc_comments_supply_the_description() {
    let field: Field = parse_quote! {
        /// First line
        ///
        /// second line
        #[stratum(hidden)]
        pub secret: String
    };
    let attrs = parse_field_attrs(&field).expect("attributes parse");
    assert_eq!(attrs.desc.as_deref(), Some("First line second line"));
    assert!(attrs.hidden);
    assert_eq!(attrs.kind, FieldKind::Leaf);
}

#[test]
fn explicit_desc_wins_over_docs() {
    let field: Field = parse_quote! {
        /// ignored
        #[stratum(desc = "Used", choices = "a,b", validate = "required")]
        pub mode: String
    };
    let attrs = parse_field_attrs(&field).expect("attributes parse");
    assert_eq!(
        tag_string(&attrs),
        r#"desc:"Used" enum:"a,b" validate:"required""#
    );
}

#[test]
fn tag_values_are_escaped() {
    let field: Field = parse_quote! {
        #[stratum(default = "say \"hi\"\\n")]
        pub greeting: String
    };
    let attrs = parse_field_attrs(&field).expect("attributes parse");
    assert_eq!(tag_string(&attrs), r#"default:"say \"hi\"\\n""#);
}

#[test]
fn kinds_are_exclusive() {
    let field: Field = parse_quote! {
        #[stratum(nested, flatten)]
        pub db: Db
    };
    assert!(parse_field_attrs(&field).is_err());
}

#[test]
fn empty_docs_are_absent() {
    let field: Field = parse_quote! { pub plain: u8 };
    assert_eq!(doc_text(&field.attrs), None);
}
