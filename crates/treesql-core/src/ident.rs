//! Identifier naming.

use std::sync::OnceLock;

use regex::Regex;

fn positional_pattern() -> &'static Regex {
    static POSITIONAL: OnceLock<Regex> = OnceLock::new();
    POSITIONAL.get_or_init(|| Regex::new(r"^\$[0-9]+$").expect("positional pattern is valid"))
}

fn unsafe_chars() -> &'static Regex {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    UNSAFE.get_or_init(|| Regex::new(r"[^\p{Alphabetic}\p{N}.]").expect("identifier pattern is valid"))
}

/// Converts a symbolic name into a SQL identifier.
///
/// `*` and driver placeholders such as `$1` pass through untouched. Any
/// other name is lower-cased and every character that is neither
/// alphanumeric nor a period becomes `_`, so `user-id` turns into `user_id`.
/// With `quote` set, each dot-separated segment is double-quoted
/// (`a.b` becomes `"a"."b"`); a `*` segment is left bare.
#[must_use]
pub fn to_sql_name(name: &str, quote: bool) -> String {
    if name == "*" || positional_pattern().is_match(name) {
        return String::from(name);
    }
    let lowered = name.to_lowercase();
    lowered
        .split('.')
        .map(|segment| {
            if segment == "*" {
                String::from("*")
            } else {
                let sanitized = unsafe_chars().replace_all(segment, "_");
                if quote {
                    format!("\"{sanitized}\"")
                } else {
                    sanitized.into_owned()
                }
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}
