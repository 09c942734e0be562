//! `select` and the query modifiers wrapped around it.
//!
//! ```text
//! (select a b :from users :where (= id 5))
//!   => (SELECT a, b FROM users WHERE (id = 5))
//! ```
//!
//! The `:from` group takes table expressions separated by join markers:
//! `:from users :left-join orders :on (= users.id orders.user-id)`.

use super::push_where;
use crate::ast::Expr;
use crate::compiler::groups::{split_groups_after, Group};
use crate::compiler::{Compiler, Fragments};
use crate::error::{CompileError, Result};
use crate::registry::Registry;

const SELECT: &[Group] = &[
    Group::required("columns").repeatable(),
    Group::flag("distinct"),
    Group::optional("distinct-on").repeatable(),
    Group::optional("from").repeatable(),
    Group::optional("where"),
    Group::optional("group-by").repeatable(),
    Group::optional("having"),
];

/// Join markers and their SQL. Every join except `cross-join` takes an
/// `:on` condition.
const JOINS: &[(&str, &str)] = &[
    ("inner-join", " INNER JOIN "),
    ("left-join", " LEFT JOIN "),
    ("right-join", " RIGHT JOIN "),
    ("outer-join", " FULL OUTER JOIN "),
    ("cross-join", " CROSS JOIN "),
];

pub(super) fn register(registry: &mut Registry) {
    registry
        .register("select", select)
        .register("limit", limit)
        .register("offset", offset)
        .register("order-by", order_by);
}

fn select(c: &Compiler<'_>, operands: &[Expr]) -> Result<Fragments> {
    let groups = split_groups_after("select", SELECT, operands)?;
    if groups.has("distinct") && groups.has("distinct-on") {
        return Err(CompileError::group(
            "select",
            ":distinct and :distinct-on are mutually exclusive",
        ));
    }
    let mut out = Fragments::text("(SELECT ");
    if groups.has("distinct") {
        out.push_str("DISTINCT ");
    }
    if let Some(on) = groups.get("distinct-on") {
        out.push_str("DISTINCT ON (");
        c.expand_joined(&mut out, on, ", ")?;
        out.push_str(") ");
    }
    if let Some(columns) = groups.get("columns") {
        c.expand_joined(&mut out, columns, ", ")?;
    }
    if let Some(from) = groups.get("from") {
        out.push_str(" FROM ");
        expand_from(c, &mut out, "select", from)?;
    }
    push_where(c, &mut out, &groups)?;
    if let Some(keys) = groups.get("group-by") {
        out.push_str(" GROUP BY ");
        c.expand_joined(&mut out, keys, ", ")?;
    }
    if let Some(cond) = groups.single("having") {
        out.push_str(" HAVING ");
        c.expand_into(&mut out, cond)?;
    }
    out.push_str(")");
    Ok(out)
}

fn join_sql(expr: &Expr) -> Option<(&'static str, &'static str)> {
    let marker = expr.as_keyword()?;
    JOINS.iter().copied().find(|(m, _)| *m == marker)
}

/// Expands a table list with optional joins.
///
/// Plain tables are separated by `, `. A join marker is followed by its
/// target table and, except for `cross-join`, `:on condition`.
pub(super) fn expand_from(
    c: &Compiler<'_>,
    out: &mut Fragments,
    operator: &str,
    items: &[Expr],
) -> Result<()> {
    if let Some(first) = items.first() {
        if join_sql(first).is_some() {
            return Err(CompileError::group(
                operator,
                format!("{first} needs a table before it"),
            ));
        }
    }
    let mut rest = items;
    let mut first = true;
    while let Some((head, tail)) = rest.split_first() {
        match join_sql(head) {
            Some(("cross-join", sql)) => {
                let Some((target, tail)) = tail.split_first() else {
                    return Err(CompileError::group(operator, "cross-join without a table"));
                };
                out.push_str(sql);
                c.expand_into(out, target)?;
                rest = tail;
            }
            Some((marker, sql)) => {
                let [target, on, cond, tail @ ..] = tail else {
                    return Err(CompileError::group(
                        operator,
                        format!(":{marker} expects a table, :on and a condition"),
                    ));
                };
                if !on.is_keyword("on") {
                    return Err(CompileError::group(
                        operator,
                        format!(":{marker} expects :on after the table, found {on}"),
                    ));
                }
                out.push_str(sql);
                c.expand_into(out, target)?;
                out.push_str(" ON ");
                c.expand_into(out, cond)?;
                rest = tail;
            }
            None => {
                if !first {
                    out.push_str(", ");
                }
                c.expand_into(out, head)?;
                rest = tail;
            }
        }
        first = false;
    }
    Ok(())
}

/// `(query LIMIT n [OFFSET m])`.
fn limit(c: &Compiler<'_>, operands: &[Expr]) -> Result<Fragments> {
    let (query, count, skip) = match operands {
        [query, count] => (query, count, None),
        [query, count, skip] => (query, count, Some(skip)),
        _ => return Err(CompileError::arity("limit", "2 or 3", operands.len())),
    };
    let mut out = Fragments::text("(");
    c.expand_into(&mut out, query)?;
    out.push_str(" LIMIT ");
    c.expand_into(&mut out, count)?;
    if let Some(skip) = skip {
        out.push_str(" OFFSET ");
        c.expand_into(&mut out, skip)?;
    }
    out.push_str(")");
    Ok(out)
}

fn offset(c: &Compiler<'_>, operands: &[Expr]) -> Result<Fragments> {
    let [query, skip] = operands else {
        return Err(CompileError::arity("offset", "exactly 2", operands.len()));
    };
    let mut out = Fragments::text("(");
    c.expand_into(&mut out, query)?;
    out.push_str(" OFFSET ");
    c.expand_into(&mut out, skip)?;
    out.push_str(")");
    Ok(out)
}

/// `(query ORDER BY k1, k2)`.
fn order_by(c: &Compiler<'_>, operands: &[Expr]) -> Result<Fragments> {
    let [query, keys @ ..] = operands else {
        return Err(CompileError::arity("order-by", "at least 2", 0));
    };
    if keys.is_empty() {
        return Err(CompileError::arity("order-by", "at least 2", 1));
    }
    let mut out = Fragments::text("(");
    c.expand_into(&mut out, query)?;
    out.push_str(" ORDER BY ");
    c.expand_joined(&mut out, keys, ", ")?;
    out.push_str(")");
    Ok(out)
}
