//! Tests for compile error cases: arity boundaries, malformed clause
//! groups, unknown operators and bad option values.

mod common;
use common::*;

use treesql_core::ast::{ident, kw, lit, op, param};
use treesql_core::{CompileError, Compiler, Config, Fragments, Mode, Registry};

#[test]
fn error_unary_arity() {
    assert_eq!(
        sql_err(&op("not", [])),
        CompileError::arity("not", "exactly 1", 0)
    );
    assert_eq!(
        sql_err(&op("is-null", [ident("a"), ident("b")])),
        CompileError::arity("is-null", "exactly 1", 2)
    );
}

#[test]
fn error_two_or_more_arity() {
    assert_eq!(
        sql_err(&op("like", [ident("a")])),
        CompileError::arity("like", "at least 2", 1)
    );
    assert_eq!(sql(&op("like", [ident("a"), lit("b%")])), "(a LIKE E'b%')");
}

#[test]
fn error_membership_arity() {
    assert_eq!(
        sql_err(&op("in", [ident("a")])),
        CompileError::arity("in", "exactly 2", 1)
    );
}

#[test]
fn error_select_group_arity() {
    let q = op(
        "select",
        [ident("a"), kw("from"), ident("t"), kw("where"), ident("x"), ident("y")],
    );
    assert_eq!(
        sql_err(&q),
        CompileError::arity("select :where", "exactly 1", 2)
    );
    let flag = op("select", [ident("a"), kw("distinct"), ident("b")]);
    assert_eq!(
        sql_err(&flag),
        CompileError::arity("select :distinct", "no", 1)
    );
}

#[test]
fn error_select_without_columns() {
    assert_eq!(
        sql_err(&op("select", [kw("from"), ident("t")])),
        CompileError::arity("select :columns", "at least 1", 0)
    );
}

#[test]
fn error_join_shapes() {
    let leading_join = op(
        "select",
        [ident("*"), kw("from"), kw("left-join"), ident("t"), kw("on"), lit(true)],
    );
    assert!(matches!(sql_err(&leading_join), CompileError::GroupParse { .. }));

    let no_condition = op(
        "select",
        [ident("*"), kw("from"), ident("a"), kw("left-join"), ident("b"), kw("on")],
    );
    assert!(matches!(sql_err(&no_condition), CompileError::GroupParse { .. }));

    let wrong_marker = op(
        "select",
        [
            ident("*"),
            kw("from"),
            ident("a"),
            kw("left-join"),
            ident("b"),
            kw("using"),
            ident("id"),
        ],
    );
    assert!(matches!(sql_err(&wrong_marker), CompileError::GroupParse { .. }));
}

#[test]
fn error_distinct_with_distinct_on() {
    let q = op(
        "select",
        [
            ident("a"),
            kw("distinct"),
            kw("distinct-on"),
            ident("a"),
            kw("from"),
            ident("t"),
        ],
    );
    assert_eq!(
        sql_err(&q),
        CompileError::group("select", ":distinct and :distinct-on are mutually exclusive")
    );
}

#[test]
fn error_unknown_operator_in_strict_registry() {
    let registry = Registry::builtin().strict();
    let c = Compiler::new(&registry, Config::default(), Mode::Static);
    assert_eq!(
        c.compile_string(&op("lower", [ident("name")])).unwrap_err(),
        CompileError::UnknownOperator {
            tag: String::from("lower")
        }
    );
    assert_eq!(sql(&op("lower", [ident("name")])), "lower(name)");
}

#[test]
fn error_messages_carry_context() {
    let err = sql_err(&op("between", [ident("a"), lit(1_i32)]));
    assert_eq!(
        err.to_string(),
        "operator between expects exactly 3 operand(s), got 2"
    );
    let err = sql_err(&op("=", [ident("a"), param()]));
    assert!(err.to_string().contains("placeholder"), "{err}");
}

#[test]
fn errors_abort_the_whole_compilation() {
    // The failing node is nested deep inside otherwise valid SQL.
    let q = op(
        "select",
        [
            ident("a"),
            kw("from"),
            ident("t"),
            kw("where"),
            op("and", [op("=", [ident("a"), lit(1_i32)]), op("not", [])]),
        ],
    );
    assert!(compiler(Mode::Deferred).compile(&q).is_err());
}

#[test]
fn custom_operator_errors_propagate() {
    let mut registry = Registry::builtin();
    registry.register("checked", |c, operands| {
        let [x] = operands else {
            return Err(CompileError::arity("checked", "exactly 1", operands.len()));
        };
        let mut out = Fragments::text("checked(");
        c.expand_into(&mut out, x)?;
        out.push_str(")");
        Ok(out)
    });
    let c = Compiler::new(&registry, Config::default(), Mode::Static);
    assert_eq!(
        c.compile_string(&op("checked", [lit(1_i32)])).unwrap(),
        "checked(1)"
    );
    assert_eq!(
        c.compile_string(&op("checked", [])).unwrap_err(),
        CompileError::arity("checked", "exactly 1", 0)
    );
}
