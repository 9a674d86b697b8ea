//! # Numeric Input Coercion
//!
//! Form fields arrive as raw text. Nothing typed into a numeric field is ever
//! rejected: empty or non-numeric text becomes `0`, and text with a numeric
//! prefix ("12abc", "3.5 mm") keeps the prefix.
//!
//! ```rust
//! use calc_core::input::{coerce_number, coerce_integer};
//!
//! assert_eq!(coerce_number("4.5"), 4.5);
//! assert_eq!(coerce_number("12mm"), 12.0);
//! assert_eq!(coerce_number("abc"), 0.0);
//! assert_eq!(coerce_number(""), 0.0);
//! assert_eq!(coerce_integer("20.9"), 20.0);
//! assert_eq!(coerce_integer("1e3"), 1.0);
//! ```

/// Parse a numeric field, coercing anything unparsable to `0.0`.
///
/// Non-finite results (`"inf"`, `"NaN"`, overflow) also become `0.0`.
pub fn coerce_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    let value = trimmed
        .parse::<f64>()
        .ok()
        .or_else(|| leading_decimal(trimmed).and_then(|prefix| prefix.parse().ok()))
        .unwrap_or(0.0);

    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Parse an integer field (percentages).
///
/// Only a sign and the leading run of digits count: `"20.9"` is `20` and
/// `"1e3"` is `1`.
pub fn coerce_integer(raw: &str) -> f64 {
    let trimmed = raw.trim();
    let sign_len = usize::from(matches!(trimmed.as_bytes().first(), Some(b'+') | Some(b'-')));
    let digits = trimmed[sign_len..].bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return 0.0;
    }

    match trimmed[..sign_len + digits].parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Parse a field that must not go below zero (lengths, thicknesses).
pub fn coerce_non_negative(raw: &str) -> f64 {
    coerce_number(raw).max(0.0)
}

/// Longest prefix of `s` that looks like a decimal number, if any.
///
/// Accepts an optional sign, digits with at most one decimal point, and an
/// exponent only when it is followed by at least one digit.
fn leading_decimal(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let mut digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }

    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        let mut frac_digits = 0;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
            frac_digits += 1;
        }
        if digits + frac_digits > 0 {
            end = frac_end;
            digits += frac_digits;
        }
    }

    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_start {
            end = exp_end;
        }
    }

    Some(&s[..end])
}
