//! Crate path used by generated code.

use proc_macro2::TokenStream;
use quote::quote;

/// `::stratum_config` unless `#[stratum(crate = "...")]` names another path.
pub(crate) fn resolve(crate_path: Option<&syn::Path>) -> TokenStream {
    crate_path.map_or_else(|| quote! { ::stratum_config }, |path| quote! { #path })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::default(None, ":: stratum_config")]
    #[case::custom(Some("my_alias"), "my_alias")]
    #[case::nested(Some("deps::stratum_config"), "deps :: stratum_config")]
    fn resolve_produces_expected_tokens(#[case] input: Option<&str>, #[case] expected: &str) {
        let parsed = input.map(|s| syn::parse_str::<syn::Path>(s).expect("valid path"));
        assert_eq!(resolve(parsed.as_ref()).to_string(), expected);
    }
}
