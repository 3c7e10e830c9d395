//! Canonical naming rules shared by every source.
//!
//! A field's canonical name is the snake-cased member name prefixed by the
//! snake-cased names of its enclosing nested structures, joined with `_`.
//! Flag names, file key paths and environment variable names all derive
//! from it.

use heck::{ToShoutySnakeCase, ToSnakeCase};

/// Snake-case a single name segment.
///
/// ```
/// assert_eq!(stratum_config::naming::segment("MaxConns"), "max_conns");
/// ```
#[must_use]
pub fn segment(name: &str) -> String {
    name.to_snake_case()
}

/// Join already-normalised ancestor segments with a leaf segment.
#[must_use]
pub fn join(ancestors: &[String], leaf: &str) -> String {
    if ancestors.is_empty() {
        return leaf.to_owned();
    }
    let mut name = ancestors.join("_");
    name.push('_');
    name.push_str(leaf);
    name
}

/// Canonical name for a member called `member` nested under `ancestors`.
///
/// ```
/// use stratum_config::naming::canonical_name;
/// let ancestors = vec!["server".to_owned()];
/// assert_eq!(canonical_name("ListenAddr", &ancestors), "server_listen_addr");
/// ```
#[must_use]
pub fn canonical_name(member: &str, ancestors: &[String]) -> String {
    join(ancestors, &segment(member))
}

/// Environment variable consulted for `canonical` under `prefix`.
///
/// ```
/// use stratum_config::naming::env_var_name;
/// assert_eq!(env_var_name("APP_", "db_max_conns"), "APP_DB_MAX_CONNS");
/// ```
#[must_use]
pub fn env_var_name(prefix: &str, canonical: &str) -> String {
    format!("{prefix}{}", canonical.to_shouty_snake_case())
}

/// Name of a leaf relative to its ancestors, used as a YAML key.
#[must_use]
pub fn leaf_key<'a>(canonical: &'a str, ancestors: &[String]) -> &'a str {
    if ancestors.is_empty() {
        return canonical;
    }
    let prefix_len = ancestors.iter().map(|a| a.len() + 1).sum::<usize>();
    canonical.get(prefix_len..).unwrap_or(canonical)
}
