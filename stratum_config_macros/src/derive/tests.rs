//! Expansion tests for `#[derive(Schema)]`.

use anyhow::{Result, anyhow};
use rstest::rstest;
use syn::{DeriveInput, parse_quote};

use super::expand;

fn expanded(input: &DeriveInput) -> Result<String> {
    expand(input)
        .map(|tokens| tokens.to_string())
        .map_err(|err| anyhow!(err.to_string()))
}

#[test]
fn leaves_become_members_with_tags() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        struct App {
            /// Listening port
            #[stratum(default = 8080, short = 'p')]
            port: u16,
            label: Option<String>,
            #[stratum(ignore)]
            cache: Vec<u8>,
        }
    };
    let out = expanded(&input)?;
    assert!(out.contains(r#"Member :: leaf ("port" , "desc:\"Listening port\" default:\"8080\" short:\"p\"""#), "{out}");
    assert!(out.contains("Slot :: optional (& mut self . label)"), "{out}");
    assert!(!out.contains("cache"), "{out}");
    assert!(!out.contains("fn substructures"), "{out}");
    Ok(())
}

#[test]
fn nested_and_flattened_fields_are_substructures() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        #[stratum(crate = "crate")]
        struct App {
            #[stratum(nested, name = "")]
            db: Db,
            #[stratum(flatten)]
            common: Common,
        }
    };
    let out = expanded(&input)?;
    assert!(out.contains(r#"crate :: Member :: nested ("db" , "name:\"\"" , & mut self . db)"#), "{out}");
    assert!(out.contains(r#"crate :: Member :: embedded ("common" , "" , & mut self . common)"#), "{out}");
    assert!(out.contains("& self . db as & dyn crate :: Schema"), "{out}");
    Ok(())
}

#[test]
fn raw_identifiers_are_unescaped() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        struct App {
            r#type: String,
        }
    };
    let out = expanded(&input)?;
    assert!(out.contains(r#"Member :: leaf ("type" , """#), "{out}");
    Ok(())
}

#[rstest]
#[case::tuple(parse_quote! { struct App(u8); }, "named fields")]
#[case::enumeration(parse_quote! { enum App { A } }, "only be derived for structs")]
#[case::optional_nested(
    parse_quote! { struct App { #[stratum(nested)] db: Option<Db> } },
    "cannot be optional"
)]
#[case::nested_default(
    parse_quote! { struct App { #[stratum(nested, default = 1)] db: Db } },
    "accept only"
)]
#[case::unknown_key(parse_quote! { struct App { #[stratum(colour = "red")] a: u8 } }, "unknown stratum attribute")]
#[case::bad_short(parse_quote! { struct App { #[stratum(short = "p")] a: u8 } }, "short must be a character")]
fn rejects_invalid_input(#[case] input: DeriveInput, #[case] message: &str) {
    let err = expand(&input).err().map(|err| err.to_string()).unwrap_or_default();
    assert!(err.contains(message), "{err}");
}
