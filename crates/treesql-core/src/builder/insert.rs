//! `insert-into`.
//!
//! Two forms are accepted:
//!
//! ```text
//! (insert-into users :set name "Ann" age 30 :returning id)
//! (insert-into archive (select * :from users))
//! ```

use super::{push_returning, table_and_rest};
use crate::ast::Expr;
use crate::compiler::groups::{split_groups, Group};
use crate::compiler::{Compiler, Fragments};
use crate::error::{CompileError, Result};
use crate::registry::Registry;

const WITH_SET: &[Group] = &[
    Group::required("set").repeatable(),
    Group::optional("returning").repeatable(),
];

const WITH_QUERY: &[Group] = &[Group::optional("returning").repeatable()];

pub(super) fn register(registry: &mut Registry) {
    registry.register("insert-into", insert_into);
}

fn insert_into(c: &Compiler<'_>, operands: &[Expr]) -> Result<Fragments> {
    let (table, rest) = table_and_rest("insert-into", operands)?;
    if rest.is_empty() {
        return Err(CompileError::arity("insert-into", "at least 2", operands.len()));
    }

    let mut out = Fragments::text("INSERT INTO ");
    if rest[0].is_keyword("set") {
        let groups = split_groups("insert-into", WITH_SET, rest)?;
        let pairs = groups.get("set").unwrap_or_default();
        if pairs.len() % 2 != 0 {
            return Err(CompileError::arity(
                "insert-into :set",
                "an even number of",
                pairs.len(),
            ));
        }
        let (fields, values): (Vec<_>, Vec<_>) = pairs
            .chunks_exact(2)
            .map(|pair| (pair[0].clone(), pair[1].clone()))
            .unzip();
        c.expand_into(&mut out, table)?;
        out.push_str(" (");
        c.expand_joined(&mut out, &fields, ", ")?;
        out.push_str(") VALUES (");
        c.expand_joined(&mut out, &values, ", ")?;
        out.push_str(")");
        push_returning(c, &mut out, &groups)?;
    } else {
        let (query, tail) = table_and_rest("insert-into", rest)?;
        let groups = split_groups("insert-into", WITH_QUERY, tail)?;
        c.expand_into(&mut out, table)?;
        out.push_str(" ");
        c.expand_into(&mut out, query)?;
        push_returning(c, &mut out, &groups)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use crate::ast::{ident, kw, lit, op, param, Expr};
    use crate::compiler::{Compiler, Mode};
    use crate::config::Config;
    use crate::error::{CompileError, Result};
    use crate::registry::Registry;

    fn sql(expr: &Expr) -> Result<String> {
        Compiler::new(Registry::global(), Config::default(), Mode::Static).compile_string(expr)
    }

    #[test]
    fn test_insert_with_set() {
        let expr = op(
            "insert-into",
            [
                ident("users"),
                kw("set"),
                ident("name"),
                lit("Ann"),
                ident("age"),
                lit(30_i32),
                kw("returning"),
                ident("id"),
            ],
        );
        assert_eq!(
            sql(&expr).unwrap(),
            "INSERT INTO users (name, age) VALUES (E'Ann', 30) RETURNING id"
        );
    }

    #[test]
    fn test_insert_from_query() {
        let expr = op(
            "insert-into",
            [
                ident("archive"),
                op("select", [ident("*"), kw("from"), ident("users")]),
            ],
        );
        assert_eq!(
            sql(&expr).unwrap(),
            "INSERT INTO archive (SELECT * FROM users)"
        );
    }

    #[test]
    fn test_odd_pairs_fail_before_expansion() {
        // The unbound placeholder would fail in static mode; the arity check
        // must come first.
        let expr = op(
            "insert-into",
            [ident("t"), kw("set"), ident("a"), param(), ident("b")],
        );
        assert_eq!(
            sql(&expr).unwrap_err(),
            CompileError::arity("insert-into :set", "an even number of", 3)
        );
    }

    #[test]
    fn test_missing_values() {
        assert_eq!(
            sql(&op("insert-into", [ident("t")])).unwrap_err(),
            CompileError::arity("insert-into", "at least 2", 1)
        );
    }
}
