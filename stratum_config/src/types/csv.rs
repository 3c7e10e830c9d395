//! Single-record CSV encoding used for list and map text.
//!
//! Fields are separated by commas. A field is quoted when it contains a
//! comma, a quote, a line break or leading whitespace; embedded quotes are
//! doubled.

use super::ValueError;

/// Encode `fields` as one CSV record without a trailing newline.
#[must_use]
pub fn write_record<S: AsRef<str>>(fields: &[S]) -> String {
    let mut out = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let text = field.as_ref();
        if needs_quotes(text) {
            out.push('"');
            out.push_str(&text.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(text);
        }
    }
    out
}

fn needs_quotes(field: &str) -> bool {
    field.contains([',', '"', '\r', '\n']) || field.starts_with([' ', '\t'])
}

/// Decode a single CSV record.
///
/// Empty input yields no fields. A trailing line break is ignored.
///
/// # Errors
///
/// Returns a [`ValueError`] when a quote appears inside an unquoted field or
/// a quoted field is not terminated.
pub fn read_record(text: &str) -> Result<Vec<String>, ValueError> {
    let line = text
        .strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .unwrap_or(text);
    if line.is_empty() {
        return Ok(Vec::new());
    }
    let mut fields = Vec::new();
    let mut chars = line.chars().peekable();
    loop {
        let mut field = String::new();
        if chars.peek() == Some(&'"') {
            chars.next();
            loop {
                match chars.next() {
                    Some('"') if chars.peek() == Some(&'"') => {
                        chars.next();
                        field.push('"');
                    }
                    Some('"') => break,
                    Some(other) => field.push(other),
                    None => {
                        return Err(ValueError::new(format!(
                            "extraneous or missing \" in quoted-field: {text:?}"
                        )));
                    }
                }
            }
            match chars.next() {
                None => {
                    fields.push(field);
                    return Ok(fields);
                }
                Some(',') => fields.push(field),
                Some(_) => {
                    return Err(ValueError::new(format!(
                        "extraneous or missing \" in quoted-field: {text:?}"
                    )));
                }
            }
        } else {
            loop {
                match chars.next() {
                    None => {
                        fields.push(field);
                        return Ok(fields);
                    }
                    Some(',') => break,
                    Some('"') => {
                        return Err(ValueError::new(format!(
                            "bare \" in non-quoted-field: {text:?}"
                        )));
                    }
                    Some(other) => field.push(other),
                }
            }
            fields.push(field);
        }
    }
}
