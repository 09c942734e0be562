//! Process-wide compiler settings.
//!
//! Two flags influence the text the compiler produces: the string quoting
//! dialect and whether identifiers are always quoted. They are read once
//! when a compilation starts (see [`Config::current`]), so flipping them later
//! never changes a template that was already compiled.

use std::sync::atomic::{AtomicBool, Ordering};

static STANDARD_STRINGS: AtomicBool = AtomicBool::new(false);
static QUOTE_IDENTIFIERS: AtomicBool = AtomicBool::new(false);

/// String literal quoting convention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StringDialect {
    /// `E'...'` literals; quotes are doubled and backslashes escaped.
    #[default]
    Backslash,
    /// Plain `'...'` literals; only quotes are doubled. Use this when the
    /// server runs with `standard_conforming_strings = on`.
    Standard,
}

/// A snapshot of the compiler settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Config {
    /// Quoting dialect for string and binary literals.
    pub strings: StringDialect,
    /// Wrap every identifier segment in double quotes.
    pub quote_identifiers: bool,
}

impl Config {
    /// Reads the current process-wide settings.
    #[must_use]
    pub fn current() -> Self {
        let strings = if STANDARD_STRINGS.load(Ordering::Acquire) {
            StringDialect::Standard
        } else {
            StringDialect::Backslash
        };
        Self {
            strings,
            quote_identifiers: QUOTE_IDENTIFIERS.load(Ordering::Acquire),
        }
    }

    /// Sets the string dialect.
    #[must_use]
    pub const fn with_strings(mut self, strings: StringDialect) -> Self {
        self.strings = strings;
        self
    }

    /// Sets identifier quoting.
    #[must_use]
    pub const fn with_quoted_identifiers(mut self, quote: bool) -> Self {
        self.quote_identifiers = quote;
        self
    }
}

/// Selects the standard-conforming string dialect for future compilations.
pub fn set_standard_strings(enabled: bool) {
    STANDARD_STRINGS.store(enabled, Ordering::Release);
}

/// Makes future compilations quote every identifier.
pub fn set_quote_identifiers(enabled: bool) {
    QUOTE_IDENTIFIERS.store(enabled, Ordering::Release);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.strings, StringDialect::Backslash);
        assert!(!config.quote_identifiers);
    }

    #[test]
    fn test_builder_setters() {
        let config = Config::default()
            .with_strings(StringDialect::Standard)
            .with_quoted_identifiers(true);
        assert_eq!(config.strings, StringDialect::Standard);
        assert!(config.quote_identifiers);
    }
}
