//! Built-in operators.
//!
//! Declarative operators are listed in [`register_builtins`]; composite
//! statements live in the submodules, each built from the group parser and
//! the compiler.

mod ddl;
mod delete;
mod expr;
mod function;
mod insert;
mod select;
mod table;
mod update;

pub use table::ForeignKeyAction;

use crate::ast::Expr;
use crate::compiler::groups::Groups;
use crate::compiler::{Compiler, Fragments};
use crate::error::{CompileError, Result};
use crate::registry::Registry;

const UNARY: &[(&str, &str)] = &[("not", "NOT")];

const POSTFIX: &[(&str, &str)] = &[("is-null", "IS NULL"), ("not-null", "IS NOT NULL")];

const NARY: &[(&str, &str)] = &[
    ("+", "+"),
    ("*", "*"),
    ("%", "%"),
    ("&", "&"),
    ("|", "|"),
    ("||", "||"),
    ("and", "AND"),
    ("or", "OR"),
    ("union", "UNION"),
    ("union-all", "UNION ALL"),
];

const NARY_OR_UNARY: &[(&str, &str)] = &[("-", "-"), ("~", "~")];

const TWO_OR_MORE: &[(&str, &str)] = &[
    ("=", "="),
    ("/", "/"),
    ("!=", "!="),
    ("<>", "<>"),
    ("<", "<"),
    (">", ">"),
    ("<=", "<="),
    (">=", ">="),
    ("^", "^"),
    ("~*", "~*"),
    ("!~", "!~"),
    ("!~*", "!~*"),
    ("like", "LIKE"),
    ("ilike", "ILIKE"),
    ("->", "->"),
    ("->>", "->>"),
    ("#>", "#>"),
    ("#>>", "#>>"),
    ("@>", "@>"),
    ("<@", "<@"),
    ("intersect", "INTERSECT"),
    ("intersect-all", "INTERSECT ALL"),
    ("except", "EXCEPT"),
    ("except-all", "EXCEPT ALL"),
];

/// Registers every built-in operator.
pub(crate) fn register_builtins(registry: &mut Registry) {
    for (tag, sql) in UNARY {
        registry.register_unary(tag, sql);
    }
    for (tag, sql) in POSTFIX {
        registry.register_postfix(tag, sql);
    }
    for (tag, sql) in NARY {
        registry.register_nary(tag, sql);
    }
    for (tag, sql) in NARY_OR_UNARY {
        registry.register_nary_or_unary(tag, sql);
    }
    for (tag, sql) in TWO_OR_MORE {
        registry.register_two_or_more(tag, sql);
    }

    expr::register(registry);
    select::register(registry);
    insert::register(registry);
    update::register(registry);
    delete::register(registry);
    table::register(registry);
    ddl::register(registry);
    function::register(registry);
}

/// Splits `operands` into a leading table name and the rest.
fn table_and_rest<'a>(tag: &str, operands: &'a [Expr]) -> Result<(&'a Expr, &'a [Expr])> {
    operands
        .split_first()
        .ok_or_else(|| CompileError::arity(tag, "at least 1", 0))
}

/// Appends ` RETURNING a, b` when the `returning` group is bound.
fn push_returning(c: &Compiler<'_>, out: &mut Fragments, groups: &Groups<'_>) -> Result<()> {
    if let Some(columns) = groups.get("returning") {
        out.push_str(" RETURNING ");
        c.expand_joined(out, columns, ", ")?;
    }
    Ok(())
}

/// Appends ` WHERE cond` when the `where` group is bound.
fn push_where(c: &Compiler<'_>, out: &mut Fragments, groups: &Groups<'_>) -> Result<()> {
    if let Some(cond) = groups.single("where") {
        out.push_str(" WHERE ");
        c.expand_into(out, cond)?;
    }
    Ok(())
}

/// Reads the name of a keyword or identifier operand.
fn symbol_name(expr: &Expr) -> Option<&str> {
    match expr {
        Expr::Keyword(name) | Expr::Identifier(name) => Some(name),
        _ => None,
    }
}
