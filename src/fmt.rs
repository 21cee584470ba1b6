//! Scalar formatting: string escaping and numeric rendering.
//!
//! These are the default implementations behind the
//! [`string_encoder`](crate::JsonOptions::with_string_encoder),
//! [`int_encoder`](crate::JsonOptions::with_int_encoder) and
//! [`float_encoder`](crate::JsonOptions::with_float_encoder) hooks. They are
//! exposed so custom hooks can delegate to them.
//!
//! ## String escaping
//!
//! Both escape functions quote their input and escape the control range
//! (U+0000..=U+001F), backslash and double quote. Backspace, form feed,
//! newline, carriage return and tab use their named escapes; other control
//! characters use the `\u00XX` form.
//!
//! [`escape_str_ascii`] additionally escapes everything outside printable
//! ASCII; characters above U+FFFF are written as a UTF-16 surrogate pair.
//! [`escape_str`] passes non-control characters through verbatim.
//!
//! ```rust
//! use async_json::fmt::{escape_str, escape_str_ascii};
//!
//! assert_eq!(escape_str("x\ny"), "\"x\\ny\"");
//! assert_eq!(escape_str("héllo"), "\"héllo\"");
//! assert_eq!(escape_str_ascii("héllo"), "\"h\\u00e9llo\"");
//! ```

use crate::error::{Error, Result};

/// Returns a JSON string literal, escaping only what the grammar requires.
///
/// Characters outside the control range pass through verbatim, so the result
/// may contain arbitrary Unicode.
#[must_use]
pub fn escape_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Returns an ASCII-only JSON string literal.
///
/// Everything outside the printable ASCII range (U+0020..=U+007E) is escaped.
/// Characters beyond the Basic Multilingual Plane are written as a UTF-16
/// surrogate pair, each half in `\uXXXX` form.
#[must_use]
pub fn escape_str_ascii(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (' '..='\u{7e}').contains(&c) => out.push(c),
            c => {
                let n = c as u32;
                if n < 0x10000 {
                    out.push_str(&format!("\\u{:04x}", n));
                } else {
                    let n = n - 0x10000;
                    let hi = 0xd800 | ((n >> 10) & 0x3ff);
                    let lo = 0xdc00 | (n & 0x3ff);
                    out.push_str(&format!("\\u{:04x}\\u{:04x}", hi, lo));
                }
            }
        }
    }
    out.push('"');
    out
}

/// Renders a float.
///
/// Finite values use the shortest decimal representation that round-trips
/// back to the same `f64`. Non-finite values render as the literals `NaN`,
/// `Infinity` and `-Infinity` when `allow_non_finite` is set, and fail with
/// [`Error::NonFiniteFloat`] otherwise.
pub fn format_float(value: f64, allow_non_finite: bool) -> Result<String> {
    let text = if value.is_nan() {
        "NaN"
    } else if value == f64::INFINITY {
        "Infinity"
    } else if value == f64::NEG_INFINITY {
        "-Infinity"
    } else {
        // Debug formatting keeps the trailing `.0` on integral floats and
        // switches to exponent form where that is shorter.
        return Ok(format!("{value:?}"));
    };

    if allow_non_finite {
        Ok(text.to_string())
    } else {
        Err(Error::NonFiniteFloat(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_escapes() {
        assert_eq!(escape_str("a\"b\\c"), "\"a\\\"b\\\\c\"");
        assert_eq!(escape_str("\u{8}\u{c}\n\r\t"), "\"\\b\\f\\n\\r\\t\"");
        assert_eq!(escape_str_ascii("\u{8}\u{c}\n\r\t"), "\"\\b\\f\\n\\r\\t\"");
    }

    #[test]
    fn unnamed_control_characters_use_u00xx() {
        assert_eq!(escape_str("\u{1}\u{1f}"), "\"\\u0001\\u001f\"");
        assert_eq!(escape_str_ascii("\u{0}"), "\"\\u0000\"");
    }

    #[test]
    fn ascii_mode_escapes_all_non_ascii() {
        assert_eq!(escape_str_ascii("héllo"), "\"h\\u00e9llo\"");
        assert_eq!(escape_str_ascii("щ"), "\"\\u0449\"");
    }

    #[test]
    fn astral_plane_becomes_surrogate_pair() {
        // U+1F600
        assert_eq!(escape_str_ascii("😀"), "\"\\ud83d\\ude00\"");
        assert_eq!(escape_str("😀"), "\"😀\"");
    }

    #[test]
    fn full_unicode_mode_passes_text_through() {
        assert_eq!(escape_str("héllo щ"), "\"héllo щ\"");
    }

    #[test]
    fn finite_floats_round_trip() {
        assert_eq!(format_float(1.0, true).unwrap(), "1.0");
        assert_eq!(format_float(3.5, true).unwrap(), "3.5");
        assert_eq!(format_float(-0.0, true).unwrap(), "-0.0");
        let text = format_float(0.1, true).unwrap();
        assert_eq!(text.parse::<f64>().unwrap(), 0.1);
    }

    #[test]
    fn non_finite_literals() {
        assert_eq!(format_float(f64::NAN, true).unwrap(), "NaN");
        assert_eq!(format_float(f64::INFINITY, true).unwrap(), "Infinity");
        assert_eq!(format_float(f64::NEG_INFINITY, true).unwrap(), "-Infinity");
    }

    #[test]
    fn non_finite_rejected_when_disallowed() {
        assert!(matches!(
            format_float(f64::NAN, false),
            Err(Error::NonFiniteFloat(_))
        ));
        assert!(matches!(
            format_float(f64::INFINITY, false),
            Err(Error::NonFiniteFloat(_))
        ));
    }
}
