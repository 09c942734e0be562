//! `create-table`.
//!
//! ```text
//! (create-table users
//!   [[id :type serial :primary-key true]
//!    [email :type (varchar 255) :unique true]
//!    [team :type (or db-null integer) :references [[teams id] :cascade]]]
//!   [:check (<> email "")])
//! ```
//!
//! The second operand lists the columns; every further operand is a table
//! constraint.

use super::symbol_name;
use crate::ast::{dissect_nullable, type_name, Expr};
use crate::compiler::{Compiler, Fragments};
use crate::error::{CompileError, Result};
use crate::registry::Registry;

/// Foreign key referential action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForeignKeyAction {
    /// No action.
    NoAction,
    /// Restrict deletion/update.
    #[default]
    Restrict,
    /// Cascade the operation.
    Cascade,
    /// Set to NULL.
    SetNull,
    /// Set to default value.
    SetDefault,
}

impl ForeignKeyAction {
    /// Parses an action marker such as `:set-null`.
    pub fn from_marker(expr: &Expr) -> Result<Self> {
        match symbol_name(expr) {
            Some("no-action") => Ok(Self::NoAction),
            Some("restrict") => Ok(Self::Restrict),
            Some("cascade") => Ok(Self::Cascade),
            Some("set-null") => Ok(Self::SetNull),
            Some("set-default") => Ok(Self::SetDefault),
            _ => Err(CompileError::config(format!(
                "unknown foreign key action: {expr}"
            ))),
        }
    }

    /// Returns the SQL representation of the action.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
        }
    }
}

pub(super) fn register(registry: &mut Registry) {
    registry.register("create-table", create_table);
}

fn create_table(c: &Compiler<'_>, operands: &[Expr]) -> Result<Fragments> {
    let [name, columns, constraints @ ..] = operands else {
        return Err(CompileError::arity(
            "create-table",
            "at least 2",
            operands.len(),
        ));
    };
    let columns = match columns.as_list() {
        Some([]) => {
            return Err(CompileError::config(format!(
                "table {name} has no columns"
            )))
        }
        Some(columns) => columns,
        None => {
            return Err(CompileError::config(format!(
                "columns of table {name} must be a list, got {columns}"
            )))
        }
    };

    let mut out = Fragments::text("CREATE TABLE ");
    c.expand_into(&mut out, name)?;
    out.push_str(" (");
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        expand_column(c, &mut out, column)?;
    }
    for constraint in constraints {
        out.push_str(", ");
        expand_constraint(c, &mut out, constraint)?;
    }
    out.push_str(")");
    Ok(out)
}

/// Splits a `:key value ...` list into pairs.
fn option_pairs<'a>(owner: &str, items: &'a [Expr]) -> Result<Vec<(&'a str, &'a Expr)>> {
    if items.len() % 2 != 0 {
        return Err(CompileError::arity(
            format!("{owner} options"),
            "an even number of",
            items.len(),
        ));
    }
    let mut pairs: Vec<(&str, &Expr)> = Vec::with_capacity(items.len() / 2);
    for pair in items.chunks_exact(2) {
        let Some(key) = pair[0].as_keyword() else {
            return Err(CompileError::config(format!(
                "{owner}: expected an option marker, found {}",
                pair[0]
            )));
        };
        if pairs.iter().any(|(seen, _)| *seen == key) {
            return Err(CompileError::config(format!(
                "{owner}: option :{key} given more than once"
            )));
        }
        pairs.push((key, &pair[1]));
    }
    Ok(pairs)
}

fn expand_column(c: &Compiler<'_>, out: &mut Fragments, column: &Expr) -> Result<()> {
    let Some([name, options @ ..]) = column.as_list() else {
        return Err(CompileError::config(format!(
            "column definitions must be non-empty lists, got {column}"
        )));
    };
    let owner = format!("column {name}");
    let options = option_pairs(&owner, options)?;
    let Some((_, ty)) = options.iter().find(|(key, _)| *key == "type") else {
        return Err(CompileError::config(format!("{owner} has no :type")));
    };
    let (ty, nullable) = dissect_nullable(ty);

    c.expand_into(out, name)?;
    out.push_str(" ");
    out.push_str(&type_name(ty)?);
    if !nullable {
        out.push_str(" NOT NULL");
    }
    for (key, value) in options {
        match key {
            "type" => {}
            "default" => {
                out.push_str(" DEFAULT ");
                c.expand_into(out, value)?;
            }
            "primary-key" => {
                if value.is_truthy() {
                    out.push_str(" PRIMARY KEY");
                }
            }
            "unique" => {
                if value.is_truthy() {
                    out.push_str(" UNIQUE");
                }
            }
            "check" => {
                out.push_str(" CHECK ");
                c.expand_into(out, value)?;
            }
            "references" => {
                let Some([target, actions @ ..]) = value.as_list() else {
                    return Err(CompileError::config(format!(
                        "{owner}: :references expects ((table [column]) [on-delete [on-update]])"
                    )));
                };
                out.push_str(" ");
                expand_reference(c, out, &owner, target, actions)?;
            }
            other => {
                return Err(CompileError::config(format!(
                    "{owner}: unknown option :{other}"
                )))
            }
        }
    }
    Ok(())
}

/// `REFERENCES t(c) ON DELETE a ON UPDATE a`.
fn expand_reference(
    c: &Compiler<'_>,
    out: &mut Fragments,
    owner: &str,
    target: &Expr,
    actions: &[Expr],
) -> Result<()> {
    let (table, columns) = match target {
        Expr::List(items) => match items.split_first() {
            Some((table, columns)) => (table, columns),
            None => return Err(CompileError::config(format!("{owner}: empty reference target"))),
        },
        table => (table, &[][..]),
    };
    let (on_delete, on_update) = match actions {
        [] => (ForeignKeyAction::default(), ForeignKeyAction::default()),
        [delete] => (ForeignKeyAction::from_marker(delete)?, ForeignKeyAction::default()),
        [delete, update] => (
            ForeignKeyAction::from_marker(delete)?,
            ForeignKeyAction::from_marker(update)?,
        ),
        _ => {
            return Err(CompileError::config(format!(
                "{owner}: a reference takes at most two actions, got {}",
                actions.len()
            )))
        }
    };

    out.push_str("REFERENCES ");
    c.expand_into(out, table)?;
    if !columns.is_empty() {
        out.push_str("(");
        c.expand_joined(out, columns, ", ")?;
        out.push_str(")");
    }
    out.push_str(" ON DELETE ");
    out.push_str(on_delete.as_sql());
    out.push_str(" ON UPDATE ");
    out.push_str(on_update.as_sql());
    Ok(())
}

fn expand_constraint(c: &Compiler<'_>, out: &mut Fragments, constraint: &Expr) -> Result<()> {
    let Some([kind, args @ ..]) = constraint.as_list() else {
        return Err(CompileError::config(format!(
            "table constraints must be lists, got {constraint}"
        )));
    };
    match (kind.as_keyword(), args) {
        (Some("check"), [cond]) => {
            out.push_str("CHECK ");
            c.expand_into(out, cond)?;
        }
        (Some("primary-key"), columns) if !columns.is_empty() => {
            out.push_str("PRIMARY KEY (");
            c.expand_joined(out, columns, ", ")?;
            out.push_str(")");
        }
        (Some("unique"), columns) if !columns.is_empty() => {
            out.push_str("UNIQUE (");
            c.expand_joined(out, columns, ", ")?;
            out.push_str(")");
        }
        (Some("foreign-key"), [Expr::List(columns), target, actions @ ..]) if !columns.is_empty() => {
            out.push_str("FOREIGN KEY (");
            c.expand_joined(out, columns, ", ")?;
            out.push_str(") ");
            expand_reference(c, out, "foreign key", target, actions)?;
        }
        (Some("constraint"), [name, inner @ ..]) if !inner.is_empty() => {
            out.push_str("CONSTRAINT ");
            c.expand_into(out, name)?;
            out.push_str(" ");
            expand_constraint(c, out, &Expr::List(inner.to_vec()))?;
        }
        _ => {
            return Err(CompileError::config(format!(
                "invalid table constraint: {constraint}"
            )))
        }
    }
    Ok(())
}
