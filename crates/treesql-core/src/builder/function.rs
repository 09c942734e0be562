//! `create-function`.
//!
//! ```text
//! (create-function add-one [integer] integer :immutable "SELECT $1 + 1")
//!   => CREATE OR REPLACE FUNCTION add_one(INTEGER) RETURNS INTEGER
//!      LANGUAGE SQL IMMUTABLE AS $$SELECT $1 + 1$$
//! ```

use crate::ast::{type_name, Expr};
use crate::compiler::{Compiler, Fragments};
use crate::error::{CompileError, Result};
use crate::registry::Registry;
use crate::value::Value;

pub(super) fn register(registry: &mut Registry) {
    registry.register("create-function", create_function);
}

fn stability(expr: &Expr) -> Result<&'static str> {
    match expr.as_keyword() {
        Some("immutable") => Ok("IMMUTABLE"),
        Some("stable") => Ok("STABLE"),
        Some("volatile") => Ok("VOLATILE"),
        _ => Err(CompileError::config(format!(
            "function stability must be :immutable, :stable or :volatile, got {expr}"
        ))),
    }
}

/// Whether `tag` first occurs in `body` followed by `tag` at the closing
/// position, so a trailing `$` in the body cannot end the quote early.
fn closes_cleanly(body: &str, tag: &str) -> bool {
    format!("{body}{tag}").find(tag) == Some(body.len())
}

/// Picks a dollar-quote delimiter that does not occur in `body`.
fn dollar_tag(body: &str) -> String {
    if closes_cleanly(body, "$$") {
        return String::from("$$");
    }
    let mut n = 0_usize;
    loop {
        let tag = if n == 0 {
            String::from("$body$")
        } else {
            format!("$body{n}$")
        };
        if closes_cleanly(body, &tag) {
            return tag;
        }
        n += 1;
    }
}

fn create_function(c: &Compiler<'_>, operands: &[Expr]) -> Result<Fragments> {
    let [name, args, returns, stable, body] = operands else {
        return Err(CompileError::arity(
            "create-function",
            "exactly 5",
            operands.len(),
        ));
    };
    let Some(args) = args.as_list() else {
        return Err(CompileError::config(format!(
            "function argument types must be a list, got {args}"
        )));
    };
    let body = match body {
        Expr::Literal(Value::Text(body)) | Expr::Quoted(Value::Text(body)) => body,
        other => {
            return Err(CompileError::config(format!(
                "function body must be a text literal, got {other}"
            )))
        }
    };
    let stability = stability(stable)?;
    let arg_types = args.iter().map(type_name).collect::<Result<Vec<_>>>()?;

    let mut out = Fragments::text("CREATE OR REPLACE FUNCTION ");
    c.expand_into(&mut out, name)?;
    out.push_str("(");
    out.push_str(&arg_types.join(", "));
    out.push_str(") RETURNS ");
    out.push_str(&type_name(returns)?);
    out.push_str(" LANGUAGE SQL ");
    out.push_str(stability);
    let tag = dollar_tag(body);
    out.push_str(" AS ");
    out.push_str(&tag);
    out.push_str(body);
    out.push_str(&tag);
    Ok(out)
}
