//! Indexes, sequences and `DROP` statements.

use super::{push_where, table_and_rest};
use crate::ast::Expr;
use crate::compiler::groups::{split_groups, Group};
use crate::compiler::{Compiler, Fragments};
use crate::error::{CompileError, Result};
use crate::registry::Registry;

const INDEX: &[Group] = &[
    Group::required("on"),
    Group::optional("using"),
    Group::required("fields").repeatable(),
    Group::optional("where"),
];

/// Sequence options in output order, with their SQL keywords.
const SEQUENCE_OPTIONS: &[(&str, &str)] = &[
    ("increment", "INCREMENT"),
    ("min-value", "MINVALUE"),
    ("max-value", "MAXVALUE"),
    ("start", "START"),
    ("cache", "CACHE"),
];

const SEQUENCE: &[Group] = &[
    Group::optional("increment"),
    Group::optional("min-value"),
    Group::optional("max-value"),
    Group::optional("start"),
    Group::optional("cache"),
    Group::flag("cycle"),
];

pub(super) fn register(registry: &mut Registry) {
    registry
        .register("create-index", |c, operands| {
            create_index(c, "create-index", "CREATE INDEX ", operands)
        })
        .register("create-unique-index", |c, operands| {
            create_index(c, "create-unique-index", "CREATE UNIQUE INDEX ", operands)
        })
        .register("create-sequence", create_sequence)
        .register("drop-table", |c, operands| drop_object(c, "drop-table", "TABLE", operands))
        .register("drop-index", |c, operands| drop_object(c, "drop-index", "INDEX", operands))
        .register("drop-sequence", |c, operands| {
            drop_object(c, "drop-sequence", "SEQUENCE", operands)
        });
}

/// `CREATE [UNIQUE] INDEX n ON t [USING m] (f1, f2) [WHERE w]`.
fn create_index(c: &Compiler<'_>, tag: &str, sql: &str, operands: &[Expr]) -> Result<Fragments> {
    let (name, rest) = table_and_rest(tag, operands)?;
    let groups = split_groups(tag, INDEX, rest)?;
    let mut out = Fragments::text(sql);
    c.expand_into(&mut out, name)?;
    if let Some(table) = groups.single("on") {
        out.push_str(" ON ");
        c.expand_into(&mut out, table)?;
    }
    if let Some(method) = groups.single("using") {
        out.push_str(" USING ");
        c.expand_into(&mut out, method)?;
    }
    out.push_str(" (");
    c.expand_joined(&mut out, groups.get("fields").unwrap_or_default(), ", ")?;
    out.push_str(")");
    push_where(c, &mut out, &groups)?;
    Ok(out)
}

fn create_sequence(c: &Compiler<'_>, operands: &[Expr]) -> Result<Fragments> {
    let (name, rest) = table_and_rest("create-sequence", operands)?;
    let groups = split_groups("create-sequence", SEQUENCE, rest)?;
    let mut out = Fragments::text("CREATE SEQUENCE ");
    c.expand_into(&mut out, name)?;
    for (marker, sql) in SEQUENCE_OPTIONS {
        if let Some(value) = groups.single(marker) {
            out.push_str(" ");
            out.push_str(sql);
            out.push_str(" ");
            c.expand_into(&mut out, value)?;
        }
    }
    if groups.has("cycle") {
        out.push_str(" CYCLE");
    }
    Ok(out)
}

/// `DROP <kind> [IF EXISTS] n [CASCADE]`.
fn drop_object(c: &Compiler<'_>, tag: &str, kind: &str, operands: &[Expr]) -> Result<Fragments> {
    let (if_exists, rest) = match operands.split_first() {
        Some((first, rest)) if first.is_keyword("if-exists") => (true, rest),
        _ => (false, operands),
    };
    let (cascade, rest) = match rest.split_last() {
        Some((last, rest)) if last.is_keyword("cascade") => (true, rest),
        _ => (false, rest),
    };
    let [name] = rest else {
        return Err(CompileError::arity(tag, "exactly 1 name", rest.len()));
    };
    let mut out = Fragments::text("DROP ");
    out.push_str(kind);
    if if_exists {
        out.push_str(" IF EXISTS");
    }
    out.push_str(" ");
    c.expand_into(&mut out, name)?;
    if cascade {
        out.push_str(" CASCADE");
    }
    Ok(out)
}
