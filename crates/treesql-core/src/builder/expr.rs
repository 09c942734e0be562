//! Expression-level operators that do not fit an arity class.

use crate::ast::{type_name, Expr};
use crate::compiler::{Compiler, Fragments};
use crate::error::{CompileError, Result};
use crate::registry::Registry;
use crate::value::Value;

pub(super) fn register(registry: &mut Registry) {
    registry
        .register("in", |c, operands| membership(c, "in", " IN ", operands))
        .register("not-in", |c, operands| {
            membership(c, "not-in", " NOT IN ", operands)
        })
        .register("set", set)
        .register("as", alias)
        .register("exists", exists)
        .register("between", between)
        .register("case", case)
        .register("raw", raw)
        .register("dot", dot)
        .register("cast", |c, operands| cast(c, "cast", operands))
        .register("type", |c, operands| cast(c, "type", operands))
        .register("desc", |c, operands| suffix(c, "desc", " DESC", operands))
        .register("asc", |c, operands| suffix(c, "asc", " ASC", operands))
        .register("nulls-first", |c, operands| {
            suffix(c, "nulls-first", " NULLS FIRST", operands)
        })
        .register("nulls-last", |c, operands| {
            suffix(c, "nulls-last", " NULLS LAST", operands)
        });
}

fn membership(c: &Compiler<'_>, tag: &str, sql: &str, operands: &[Expr]) -> Result<Fragments> {
    let [x, set] = operands else {
        return Err(CompileError::arity(tag, "exactly 2", operands.len()));
    };
    let mut out = Fragments::text("(");
    c.expand_into(&mut out, x)?;
    out.push_str(sql);
    c.expand_into(&mut out, set)?;
    out.push_str(")");
    Ok(out)
}

/// `(a, b, c)`; an empty set renders as `(NULL)` so `IN` stays valid.
fn set(c: &Compiler<'_>, operands: &[Expr]) -> Result<Fragments> {
    let mut out = Fragments::text("(");
    if operands.is_empty() {
        out.push_str("NULL");
    } else {
        c.expand_joined(&mut out, operands, ", ")?;
    }
    out.push_str(")");
    Ok(out)
}

fn alias(c: &Compiler<'_>, operands: &[Expr]) -> Result<Fragments> {
    let [x, name] = operands else {
        return Err(CompileError::arity("as", "exactly 2", operands.len()));
    };
    let mut out = c.expand(x)?;
    out.push_str(" AS ");
    c.expand_into(&mut out, name)?;
    Ok(out)
}

fn exists(c: &Compiler<'_>, operands: &[Expr]) -> Result<Fragments> {
    let [query] = operands else {
        return Err(CompileError::arity("exists", "exactly 1", operands.len()));
    };
    let mut out = Fragments::text("(EXISTS ");
    c.expand_into(&mut out, query)?;
    out.push_str(")");
    Ok(out)
}

fn between(c: &Compiler<'_>, operands: &[Expr]) -> Result<Fragments> {
    let [x, low, high] = operands else {
        return Err(CompileError::arity("between", "exactly 3", operands.len()));
    };
    let mut out = Fragments::text("(");
    c.expand_into(&mut out, x)?;
    out.push_str(" BETWEEN ");
    c.expand_into(&mut out, low)?;
    out.push_str(" AND ");
    c.expand_into(&mut out, high)?;
    out.push_str(")");
    Ok(out)
}

/// `CASE WHEN c THEN v ... [ELSE e] END`.
///
/// Every operand is a two-item list `[condition, value]`; a list starting
/// with the `:else` marker supplies the default and must come last.
fn case(c: &Compiler<'_>, operands: &[Expr]) -> Result<Fragments> {
    if operands.is_empty() {
        return Err(CompileError::arity("case", "at least 1", 0));
    }
    let mut out = Fragments::text("CASE");
    for (i, clause) in operands.iter().enumerate() {
        let Some([condition, value]) = clause.as_list() else {
            return Err(CompileError::group(
                "case",
                format!("expected a [condition value] pair, found {clause}"),
            ));
        };
        if condition.is_keyword("else") {
            if i + 1 != operands.len() {
                return Err(CompileError::group("case", ":else must be the last clause"));
            }
            out.push_str(" ELSE ");
        } else {
            out.push_str(" WHEN ");
            c.expand_into(&mut out, condition)?;
            out.push_str(" THEN ");
        }
        c.expand_into(&mut out, value)?;
    }
    out.push_str(" END");
    Ok(out)
}

/// Emits a text literal verbatim.
fn raw(_c: &Compiler<'_>, operands: &[Expr]) -> Result<Fragments> {
    match operands {
        [Expr::Literal(Value::Text(sql)) | Expr::Quoted(Value::Text(sql))] => Ok(Fragments::text(sql)),
        [other] => Err(CompileError::config(format!(
            "raw expects a text literal, found {other}"
        ))),
        _ => Err(CompileError::arity("raw", "exactly 1", operands.len())),
    }
}

fn dot(c: &Compiler<'_>, operands: &[Expr]) -> Result<Fragments> {
    if operands.len() < 2 {
        return Err(CompileError::arity("dot", "at least 2", operands.len()));
    }
    let mut out = Fragments::new();
    c.expand_joined(&mut out, operands, ".")?;
    Ok(out)
}

fn cast(c: &Compiler<'_>, tag: &str, operands: &[Expr]) -> Result<Fragments> {
    let [x, ty] = operands else {
        return Err(CompileError::arity(tag, "exactly 2", operands.len()));
    };
    let mut out = c.expand(x)?;
    out.push_str("::");
    out.push_str(&type_name(ty)?);
    Ok(out)
}

fn suffix(c: &Compiler<'_>, tag: &str, sql: &str, operands: &[Expr]) -> Result<Fragments> {
    let [x] = operands else {
        return Err(CompileError::arity(tag, "exactly 1", operands.len()));
    };
    let mut out = c.expand(x)?;
    out.push_str(sql);
    Ok(out)
}
