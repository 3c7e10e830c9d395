//! Duration text in the `1h30m`, `250ms`, `1.5s` style.

use std::time::Duration;

use super::ValueError;

const NANOS_PER_SEC: u128 = 1_000_000_000;

fn unit_nanos(unit: &str) -> Option<u128> {
    Some(match unit {
        "ns" => 1,
        "us" | "\u{b5}s" | "\u{3bc}s" => 1_000,
        "ms" => 1_000_000,
        "s" => NANOS_PER_SEC,
        "m" => 60 * NANOS_PER_SEC,
        "h" => 3_600 * NANOS_PER_SEC,
        _ => return None,
    })
}

/// Parse a duration such as `1h30m`, `1.5s` or `250ms`.
///
/// A bare `0` is accepted; every other component needs a unit from `ns`,
/// `us` (or `µs`), `ms`, `s`, `m` and `h`.
///
/// ```
/// use std::time::Duration;
/// use stratum_config::types::parse_duration;
/// assert_eq!(parse_duration("1m30s").ok(), Some(Duration::from_secs(90)));
/// assert_eq!(parse_duration("1.5s").ok(), Some(Duration::from_millis(1500)));
/// ```
///
/// # Errors
///
/// Returns a [`ValueError`] for malformed text, negative values, or values
/// that overflow.
pub fn parse_duration(text: &str) -> Result<Duration, ValueError> {
    let invalid = || ValueError::new(format!("time: invalid duration {text:?}"));
    let trimmed = text.trim();
    let body = match trimmed.strip_prefix('-') {
        Some(rest) if rest == "0" => return Ok(Duration::ZERO),
        Some(_) => {
            return Err(ValueError::new(format!(
                "negative duration {text:?} is not supported"
            )));
        }
        None => trimmed.strip_prefix('+').unwrap_or(trimmed),
    };
    if body == "0" {
        return Ok(Duration::ZERO);
    }
    if body.is_empty() {
        return Err(invalid());
    }

    let mut total: u128 = 0;
    let mut rest = body;
    while !rest.is_empty() {
        let int_len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let (int_digits, after_int) = rest.split_at(int_len);
        let (frac_digits, after_number) = match after_int.strip_prefix('.') {
            Some(frac) => {
                let frac_len = frac.find(|c: char| !c.is_ascii_digit()).unwrap_or(frac.len());
                frac.split_at(frac_len)
            }
            None => ("", after_int),
        };
        if int_digits.is_empty() && frac_digits.is_empty() {
            return Err(invalid());
        }
        let unit_len = after_number
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(after_number.len());
        let (unit, remainder) = after_number.split_at(unit_len);
        if unit.is_empty() {
            return Err(ValueError::new(format!(
                "time: missing unit in duration {text:?}"
            )));
        }
        let scale = unit_nanos(unit).ok_or_else(|| {
            ValueError::new(format!("time: unknown unit {unit:?} in duration {text:?}"))
        })?;
        let whole: u128 = if int_digits.is_empty() {
            0
        } else {
            int_digits.parse().map_err(|_| invalid())?
        };
        let mut component = whole.checked_mul(scale).ok_or_else(invalid)?;
        component = component
            .checked_add(fraction_nanos(frac_digits, scale))
            .ok_or_else(invalid)?;
        total = total.checked_add(component).ok_or_else(invalid)?;
        rest = remainder;
    }

    let secs = u64::try_from(total / NANOS_PER_SEC).map_err(|_| invalid())?;
    let nanos = u32::try_from(total % NANOS_PER_SEC).map_err(|_| invalid())?;
    Ok(Duration::new(secs, nanos))
}

/// Nanoseconds contributed by the fractional digits of a component.
fn fraction_nanos(digits: &str, scale: u128) -> u128 {
    let mut value: u128 = 0;
    let mut divisor: u128 = 1;
    for digit in digits.chars().take(18).filter_map(|c| c.to_digit(10)) {
        value = value * 10 + u128::from(digit);
        divisor *= 10;
    }
    value * scale / divisor
}

/// Format a duration the way [`parse_duration`] reads it back.
///
/// ```
/// use std::time::Duration;
/// use stratum_config::types::format_duration;
/// assert_eq!(format_duration(&Duration::from_secs(5400)), "1h30m0s");
/// assert_eq!(format_duration(&Duration::from_millis(250)), "250ms");
/// assert_eq!(format_duration(&Duration::ZERO), "0s");
/// ```
#[must_use]
pub fn format_duration(duration: &Duration) -> String {
    let total = duration.as_nanos();
    if total == 0 {
        return "0s".to_owned();
    }
    if total < 1_000 {
        return format!("{total}ns");
    }
    if total < 1_000_000 {
        return format!("{}\u{b5}s", decimal(total, 1_000, 3));
    }
    if total < NANOS_PER_SEC {
        return format!("{}ms", decimal(total, 1_000_000, 6));
    }
    let secs = total / NANOS_PER_SEC;
    let hours = secs / 3_600;
    let minutes = secs % 3_600 / 60;
    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    let seconds_nanos = total % (60 * NANOS_PER_SEC);
    out.push_str(&decimal(seconds_nanos, NANOS_PER_SEC, 9));
    out.push('s');
    out
}

/// Render `value / unit` with trailing fractional zeros removed.
fn decimal(value: u128, unit: u128, width: usize) -> String {
    let whole = value / unit;
    let frac = value % unit;
    if frac == 0 {
        return whole.to_string();
    }
    let digits = format!("{frac:0width$}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rstest::rstest;

    use super::{format_duration, parse_duration};

    #[rstest]
    #[case("0", Duration::ZERO)]
    #[case("5s", Duration::from_secs(5))]
    #[case("1h30m", Duration::from_secs(5_400))]
    #[case("1.5h", Duration::from_secs(5_400))]
    #[case("250ms", Duration::from_millis(250))]
    #[case("3us", Duration::from_micros(3))]
    #[case("3\u{b5}s", Duration::from_micros(3))]
    #[case("42ns", Duration::from_nanos(42))]
    #[case(".5s", Duration::from_millis(500))]
    #[case("1m0.25s", Duration::from_millis(60_250))]
    fn parses_durations(#[case] text: &str, #[case] expected: Duration) {
        assert_eq!(parse_duration(text).expect("duration should parse"), expected);
    }

    #[rstest]
    #[case("")]
    #[case("5")]
    #[case("5x")]
    #[case("-5s")]
    #[case("s")]
    #[case(".s")]
    fn rejects_malformed_durations(#[case] text: &str) {
        assert!(parse_duration(text).is_err(), "{text:?} should be rejected");
    }

    #[rstest]
    #[case(Duration::from_secs(90), "1m30s")]
    #[case(Duration::from_secs(3_600), "1h0m0s")]
    #[case(Duration::from_millis(1_500), "1.5s")]
    #[case(Duration::from_micros(1_500), "1.5ms")]
    #[case(Duration::from_nanos(1_500), "1.5\u{b5}s")]
    #[case(Duration::from_nanos(7), "7ns")]
    fn formats_durations(#[case] duration: Duration, #[case] expected: &str) {
        assert_eq!(format_duration(&duration), expected);
        assert_eq!(parse_duration(expected).ok(), Some(duration));
    }
}
