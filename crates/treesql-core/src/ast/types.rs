//! SQL type descriptors.
//!
//! Types appear in casts, column definitions and function signatures. A
//! descriptor is either a bare name (`integer`, `double-precision`) or an
//! operation whose operands are integer parameters (`varchar 20`,
//! `numeric 10 2`).

use super::expression::Expr;
use crate::error::{CompileError, Result};
use crate::value::Value;

const NULL_MARKER: &str = "db-null";

fn is_null_marker(expr: &Expr) -> bool {
    match expr {
        Expr::Identifier(name) | Expr::Keyword(name) => name.eq_ignore_ascii_case(NULL_MARKER),
        _ => false,
    }
}

/// Splits a nullable union into its inner type.
///
/// `(or db-null T)`, `(or T db-null)` and `(db-null T)` all yield
/// `(T, true)`; any other descriptor is returned as is with `false`.
#[must_use]
pub fn dissect_nullable(ty: &Expr) -> (&Expr, bool) {
    if let Expr::Operation { tag, operands } = ty {
        match (tag.as_str(), operands.as_slice()) {
            ("or", [a, b]) if is_null_marker(a) => return (b, true),
            ("or", [a, b]) if is_null_marker(b) => return (a, true),
            (NULL_MARKER, [inner]) => return (inner, true),
            _ => {}
        }
    }
    (ty, false)
}

fn base_name(name: &str, params: &[u64]) -> Result<String> {
    if name.is_empty()
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ' '))
    {
        return Err(CompileError::config(format!("invalid type name: {name:?}")));
    }
    let lowered = name.to_ascii_lowercase();
    if lowered == "string" {
        return match params {
            [] => Ok(String::from("TEXT")),
            [len] => Ok(format!("CHAR({len})")),
            _ => Err(CompileError::arity("string", "at most 1", params.len())),
        };
    }
    let mut sql = lowered.replace(['-', '_'], " ").to_ascii_uppercase();
    if !params.is_empty() {
        let params: Vec<String> = params.iter().map(u64::to_string).collect();
        sql.push('(');
        sql.push_str(&params.join(", "));
        sql.push(')');
    }
    Ok(sql)
}

fn type_param(expr: &Expr) -> Result<u64> {
    match expr {
        Expr::Literal(Value::Int(n)) | Expr::Quoted(Value::Int(n)) => u64::try_from(*n)
            .map_err(|_| CompileError::config(format!("negative type parameter: {n}"))),
        other => Err(CompileError::config(format!(
            "type parameters must be integers, got {other}"
        ))),
    }
}

/// Renders a type descriptor as SQL.
///
/// Character and numeric types take their parameters in parentheses:
/// `(varchar 20)` is `VARCHAR(20)`, `(numeric 10 2)` is `NUMERIC(10, 2)`.
/// `string` maps to `TEXT`, or `CHAR(n)` with a length.
pub fn type_name(ty: &Expr) -> Result<String> {
    match ty {
        Expr::Identifier(name) | Expr::Keyword(name) => base_name(name, &[]),
        Expr::Operation { tag, operands } => {
            let params = operands.iter().map(type_param).collect::<Result<Vec<_>>>()?;
            base_name(tag, &params)
        }
        other => Err(CompileError::config(format!(
            "invalid type descriptor: {other}"
        ))),
    }
}
