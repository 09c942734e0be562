//! String and binary literal escaping.

use std::fmt::Write as _;

use crate::config::StringDialect;

/// Renders `text` as a quoted SQL string literal under `dialect`.
///
/// In the backslash dialect the literal is prefixed with `E`, embedded quotes
/// are doubled and backslashes are doubled. In the standard dialect only the
/// quotes are doubled.
#[must_use]
pub fn escape_string(text: &str, dialect: StringDialect) -> String {
    let mut out = String::with_capacity(text.len() + 3);
    if dialect == StringDialect::Backslash {
        out.push('E');
    }
    out.push('\'');
    for ch in text.chars() {
        match ch {
            '\'' => out.push_str("''"),
            '\\' if dialect == StringDialect::Backslash => out.push_str("\\\\"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
    out
}

/// Renders a byte sequence in PostgreSQL's escaped `bytea` text format.
///
/// Bytes outside the printable range 32..=126, plus `'` and `\`, become a
/// backslash followed by three octal digits. The result still has to go
/// through [`escape_string`].
#[must_use]
pub fn escape_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &byte in bytes {
        if !(32..=126).contains(&byte) || byte == b'\'' || byte == b'\\' {
            // Writing to a String cannot fail.
            let _ = write!(out, "\\{byte:03o}");
        } else {
            out.push(char::from(byte));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reverses [`escape_string`] the way the server would read the literal.
    fn unescape(literal: &str, dialect: StringDialect) -> String {
        let body = match dialect {
            StringDialect::Backslash => literal.strip_prefix("E'").unwrap(),
            StringDialect::Standard => literal.strip_prefix('\'').unwrap(),
        };
        let body = body.strip_suffix('\'').unwrap();
        let mut out = String::new();
        let mut chars = body.chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                '\'' => {
                    assert_eq!(chars.next(), Some('\''), "lone quote in {literal}");
                    out.push('\'');
                }
                '\\' if dialect == StringDialect::Backslash => {
                    out.push(chars.next().unwrap());
                }
                _ => out.push(ch),
            }
        }
        out
    }

    #[test]
    fn test_backslash_dialect() {
        assert_eq!(escape_string("Ann", StringDialect::Backslash), "E'Ann'");
        assert_eq!(
            escape_string("it's a \\ path", StringDialect::Backslash),
            "E'it''s a \\\\ path'"
        );
    }

    #[test]
    fn test_standard_dialect() {
        assert_eq!(escape_string("Ann", StringDialect::Standard), "'Ann'");
        assert_eq!(
            escape_string("it's a \\ path", StringDialect::Standard),
            "'it''s a \\ path'"
        );
    }

    #[test]
    fn test_injection_attempt_stays_inside_literal() {
        let malicious = "'; DROP TABLE users; --";
        assert_eq!(
            escape_string(malicious, StringDialect::Standard),
            "'''; DROP TABLE users; --'"
        );
    }

    #[test]
    fn test_escaping_reverses_in_both_dialects() {
        let samples = ["", "plain", "O'Brien", "back\\slash", "'\\'\\''", "ünï'cødé\\"];
        for dialect in [StringDialect::Backslash, StringDialect::Standard] {
            for sample in samples {
                let escaped = escape_string(sample, dialect);
                assert_eq!(unescape(&escaped, dialect), sample, "{dialect:?}");
            }
        }
    }

    #[test]
    fn test_escape_bytes() {
        assert_eq!(escape_bytes(&[10]), "\\012");
        assert_eq!(escape_bytes(&[65]), "A");
        assert_eq!(escape_bytes(b"a'b\\c"), "a\\047b\\134c");
        assert_eq!(escape_bytes(&[0, 31, 32, 126, 127, 255]), "\\000\\037 ~\\177\\377");
    }
}
