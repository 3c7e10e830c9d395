//! Parsing of member tag strings.
//!
//! Tags use the `key:"value"` grammar: pairs are separated by spaces and
//! values are double-quoted with backslash escapes for `"`, `\\`, `\n`,
//! `\t` and `\r`. A key may appear at most once.

use thiserror::Error;

/// Reasons a tag string is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    /// A key was empty or contained forbidden characters.
    #[error("bad syntax for tag key")]
    Key,
    /// A key was not followed by `:"`.
    #[error("bad syntax for tag pair")]
    Pair,
    /// A value was unterminated or used an unknown escape.
    #[error("bad syntax for tag value")]
    Value,
    /// A key was repeated.
    #[error("duplicate tag key: {0}")]
    Duplicate(String),
}

/// Parsed tag pairs in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags {
    pairs: Vec<(String, String)>,
}

impl Tags {
    /// Parse a raw tag string.
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_config::Tags;
    /// let tags = Tags::parse(r#"desc:"Listen port" default:"8080""#).expect("valid tags");
    /// assert_eq!(tags.get("default"), Some("8080"));
    /// assert!(!tags.has("hidden"));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a [`TagError`] when the string is not well formed or repeats
    /// a key.
    pub fn parse(raw: &str) -> Result<Self, TagError> {
        let mut pairs: Vec<(String, String)> = Vec::new();
        let mut rest = raw;
        loop {
            rest = rest.trim_start_matches(' ');
            if rest.is_empty() {
                break;
            }
            let key_end = rest
                .find(|c: char| c <= ' ' || c == ':' || c == '"' || c == '\u{7f}')
                .unwrap_or(rest.len());
            if key_end == 0 {
                return Err(TagError::Key);
            }
            let (key, after_key) = rest.split_at(key_end);
            let quoted = after_key
                .strip_prefix(':')
                .and_then(|s| s.strip_prefix('"'))
                .ok_or(TagError::Pair)?;
            let (value, remainder) = unquote(quoted)?;
            if pairs.iter().any(|(existing, _)| existing == key) {
                return Err(TagError::Duplicate(key.to_owned()));
            }
            pairs.push((key.to_owned(), value));
            rest = remainder;
        }
        Ok(Self { pairs })
    }

    /// Value recorded for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` when `key` is present, whatever its value.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate over `(key, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Read a quoted value up to its closing quote, returning the decoded text
/// and the unconsumed input.
fn unquote(input: &str) -> Result<(String, &str), TagError> {
    let mut value = String::new();
    let mut chars = input.char_indices();
    while let Some((idx, ch)) = chars.next() {
        match ch {
            '"' => return Ok((value, input.get(idx + 1..).unwrap_or_default())),
            '\\' => {
                let (_, escaped) = chars.next().ok_or(TagError::Value)?;
                value.push(match escaped {
                    '"' => '"',
                    '\\' => '\\',
                    '\'' => '\'',
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    _ => return Err(TagError::Value),
                });
            }
            '\n' => return Err(TagError::Value),
            other => value.push(other),
        }
    }
    Err(TagError::Value)
}

/// Quote `value` so that [`Tags::parse`] reads it back unchanged.
#[must_use]
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
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

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{TagError, Tags, quote};

    #[test]
    fn parses_pairs_in_order() {
        let tags = Tags::parse(r#"desc:"Port to use" default:"8080" short:"p""#)
            .expect("tags should parse");
        let pairs: Vec<_> = tags.iter().collect();
        assert_eq!(
            pairs,
            vec![("desc", "Port to use"), ("default", "8080"), ("short", "p")]
        );
    }

    #[test]
    fn decodes_escapes() {
        let tags = Tags::parse(r#"desc:"say \"hi\"\tnow""#).expect("tags should parse");
        assert_eq!(tags.get("desc"), Some("say \"hi\"\tnow"));
    }

    #[test]
    fn empty_value_counts_as_present() {
        let tags = Tags::parse(r#"hidden:"" name:"""#).expect("tags should parse");
        assert!(tags.has("hidden"));
        assert_eq!(tags.get("name"), Some(""));
    }

    #[rstest]
    #[case(r#"desc"x""#, TagError::Pair)]
    #[case(r#"desc:x"#, TagError::Pair)]
    #[case(r#":"x""#, TagError::Key)]
    #[case(r#"desc:"unterminated"#, TagError::Value)]
    #[case(r#"desc:"bad \q escape""#, TagError::Value)]
    #[case(r#"desc:"a" desc:"b""#, TagError::Duplicate("desc".into()))]
    fn rejects_malformed_tags(#[case] raw: &str, #[case] expected: TagError) {
        assert_eq!(Tags::parse(raw), Err(expected));
    }

    #[rstest]
    #[case("plain")]
    #[case("with \"quotes\"")]
    #[case("back\\slash\nnewline")]
    fn quote_is_read_back_verbatim(#[case] text: &str) {
        let raw = format!("desc:{}", quote(text));
        let tags = Tags::parse(&raw).expect("quoted text should parse");
        assert_eq!(tags.get("desc"), Some(text));
    }
}
