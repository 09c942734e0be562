//! # treesql-core
//!
//! Compiles symbolic expression trees into PostgreSQL text.
//!
//! A query is an [`Expr`] tree: literals, identifiers, operator
//! applications, clause markers and placeholders. Operator applications are
//! expanded through a [`Registry`] of operator expanders; unknown operators
//! render as function calls.
//!
//! ```rust
//! use treesql_core::ast::{ident, kw, lit, op};
//!
//! let query = op("select", [
//!     ident("a"), ident("b"),
//!     kw("from"), ident("users"),
//!     kw("where"), op("=", [ident("id"), lit(5)]),
//! ]);
//! assert_eq!(
//!     treesql_core::compile_to_string(&query).unwrap(),
//!     "(SELECT a, b FROM users WHERE (id = 5))"
//! );
//! ```
//!
//! ## Templates
//!
//! Placeholders turn a tree into a reusable [`Template`]. Values bound at
//! render time are escaped with the string dialect captured at compile time.
//!
//! ```rust
//! use treesql_core::ast::{ident, kw, op, param};
//! use treesql_core::Value;
//!
//! let update = op("update", [
//!     ident("users"),
//!     kw("set"), ident("name"), param(),
//!     kw("where"), op("=", [ident("id"), param()]),
//! ]);
//! let template = treesql_core::compile_template(&update).unwrap();
//! assert_eq!(
//!     template.render(&[Value::Text("Ann".into()), Value::Int(7)]).unwrap(),
//!     "UPDATE users SET name = E'Ann' WHERE (id = 7)"
//! );
//! assert_eq!(
//!     template.positional_sql(),
//!     "UPDATE users SET name = $1 WHERE (id = $2)"
//! );
//! ```
//!
//! ## Escaping
//!
//! Text literals are escaped for the active [`StringDialect`]. With the
//! default backslash dialect a string becomes `E'...'`; with standard
//! strings it is a plain `'...'`. Identifiers are sanitized by
//! [`to_sql_name`], so user input can never break out of a name position.

pub mod ast;
mod builder;
pub mod compiler;
pub mod config;
pub mod error;
pub mod escape;
pub mod ident;
pub mod registry;
pub mod value;

pub use ast::{Expr, Placeholder};
pub use builder::ForeignKeyAction;
pub use compiler::{Compiled, Compiler, Fragment, Fragments, Mode, Template};
pub use config::{set_quote_identifiers, set_standard_strings, Config, StringDialect};
pub use error::{CompileError, Result};
pub use escape::{escape_bytes, escape_string};
pub use ident::to_sql_name;
pub use registry::{Operator, Registry};
pub use value::{Interval, ToSqlValue, Value};

fn compiler(mode: Mode) -> Compiler<'static> {
    Compiler::new(Registry::global(), Config::current(), mode)
}

/// Compiles a tree with the built-in operators and the current
/// configuration. Returns plain SQL when the tree holds no placeholder.
pub fn compile(expr: &Expr) -> Result<Compiled> {
    compiler(Mode::Deferred).compile(expr)
}

/// Compiles a tree whose values are all known to a SQL string.
///
/// A placeholder anywhere in the tree is an
/// [`UnboundPlaceholder`](CompileError::UnboundPlaceholder) error.
pub fn compile_to_string(expr: &Expr) -> Result<String> {
    compiler(Mode::Static).compile_string(expr)
}

/// Compiles a tree to a template, even if it holds no placeholder.
pub fn compile_template(expr: &Expr) -> Result<Template> {
    compiler(Mode::Deferred).compile_template(expr)
}
