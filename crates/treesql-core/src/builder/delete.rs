//! `delete-from`.

use super::{push_returning, push_where, table_and_rest};
use crate::ast::Expr;
use crate::compiler::groups::{split_groups, Group};
use crate::compiler::{Compiler, Fragments};
use crate::error::Result;
use crate::registry::Registry;

const DELETE: &[Group] = &[
    Group::optional("where"),
    Group::optional("returning").repeatable(),
];

pub(super) fn register(registry: &mut Registry) {
    registry.register("delete-from", delete_from);
}

fn delete_from(c: &Compiler<'_>, operands: &[Expr]) -> Result<Fragments> {
    let (table, rest) = table_and_rest("delete-from", operands)?;
    let groups = split_groups("delete-from", DELETE, rest)?;
    let mut out = Fragments::text("DELETE FROM ");
    c.expand_into(&mut out, table)?;
    push_where(c, &mut out, &groups)?;
    push_returning(c, &mut out, &groups)?;
    Ok(out)
}
