//! Error types for the compiler.

use thiserror::Error;

/// Errors raised while compiling an expression tree or rendering a template.
///
/// Every variant is fatal to the compilation (or template invocation) in
/// progress; no partial SQL is ever returned alongside an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// An operator tag has no registered expander and the registry has no
    /// fallback.
    #[error("unknown operator: {tag}")]
    UnknownOperator {
        /// The offending operator tag.
        tag: String,
    },

    /// An operator (or a template) received the wrong number of operands.
    #[error("operator {operator} expects {expected} operand(s), got {actual}")]
    Arity {
        /// Operator tag, group marker, or `template`.
        operator: String,
        /// Human-readable arity rule, e.g. `exactly 1`.
        expected: String,
        /// Number of operands actually supplied.
        actual: usize,
    },

    /// A keyword-delimited operand list does not match its group
    /// specification.
    #[error("malformed {operator} form: {message}")]
    GroupParse {
        /// Operator whose operands were being split.
        operator: String,
        /// What went wrong.
        message: String,
    },

    /// A value has no SQL literal rendering.
    #[error("cannot serialize {value} as a SQL literal: {reason}")]
    Serialization {
        /// Debug rendering of the offending value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// An invalid option value, such as an unknown foreign-key action.
    #[error("configuration error: {message}")]
    Configuration {
        /// What was wrong with the option.
        message: String,
    },

    /// A placeholder was compiled in static mode, where no runtime value can
    /// be supplied.
    #[error("placeholder {name} cannot be bound in a static compilation")]
    UnboundPlaceholder {
        /// Placeholder name, or `?` for anonymous ones.
        name: String,
    },
}

impl CompileError {
    /// Creates an arity error.
    #[must_use]
    pub fn arity(operator: impl Into<String>, expected: impl Into<String>, actual: usize) -> Self {
        Self::Arity {
            operator: operator.into(),
            expected: expected.into(),
            actual,
        }
    }

    /// Creates a group parse error.
    #[must_use]
    pub fn group(operator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::GroupParse {
            operator: operator.into(),
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a serialization error for the given value.
    #[must_use]
    pub fn serialization(value: &impl std::fmt::Debug, reason: impl Into<String>) -> Self {
        Self::Serialization {
            value: format!("{value:?}"),
            reason: reason.into(),
        }
    }
}

/// Result type alias for compiler operations.
pub type Result<T> = std::result::Result<T, CompileError>;
