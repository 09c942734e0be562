//! `update`.

use super::select::expand_from;
use super::{push_returning, push_where, table_and_rest};
use crate::ast::Expr;
use crate::compiler::groups::{split_groups, Group};
use crate::compiler::{Compiler, Fragments};
use crate::error::{CompileError, Result};
use crate::registry::Registry;

const UPDATE: &[Group] = &[
    Group::required("set").repeatable(),
    Group::optional("from").repeatable(),
    Group::optional("where"),
    Group::optional("returning").repeatable(),
];

pub(super) fn register(registry: &mut Registry) {
    registry.register("update", update);
}

/// `UPDATE t SET f1 = v1, f2 = v2 [FROM ...] [WHERE c] [RETURNING ...]`.
fn update(c: &Compiler<'_>, operands: &[Expr]) -> Result<Fragments> {
    let (table, rest) = table_and_rest("update", operands)?;
    let groups = split_groups("update", UPDATE, rest)?;
    let pairs = groups.get("set").unwrap_or_default();
    if pairs.len() % 2 != 0 {
        return Err(CompileError::arity(
            "update :set",
            "an even number of",
            pairs.len(),
        ));
    }

    let mut out = Fragments::text("UPDATE ");
    c.expand_into(&mut out, table)?;
    out.push_str(" SET ");
    for (i, pair) in pairs.chunks_exact(2).enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        c.expand_into(&mut out, &pair[0])?;
        out.push_str(" = ");
        c.expand_into(&mut out, &pair[1])?;
    }
    if let Some(from) = groups.get("from") {
        out.push_str(" FROM ");
        expand_from(c, &mut out, "update", from)?;
    }
    push_where(c, &mut out, &groups)?;
    push_returning(c, &mut out, &groups)?;
    Ok(out)
}
