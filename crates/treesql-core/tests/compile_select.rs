//! Tests for SELECT compilation: columns, DISTINCT, FROM with joins,
//! WHERE, GROUP BY, HAVING, ordering, limits and set operations.

mod common;
use common::*;

use treesql_core::ast::{ident, kw, lit, op};

#[test]
fn select_columns_from_where() {
    let q = op(
        "select",
        [
            ident("a"),
            ident("b"),
            kw("from"),
            ident("users"),
            kw("where"),
            op("=", [ident("id"), lit(5_i32)]),
        ],
    );
    assert_eq!(sql(&q), "(SELECT a, b FROM users WHERE (id = 5))");
}

#[test]
fn select_star_from_several_tables() {
    let q = op(
        "select",
        [ident("*"), kw("from"), ident("a"), ident("b")],
    );
    assert_eq!(sql(&q), "(SELECT * FROM a, b)");
}

#[test]
fn select_without_from() {
    assert_eq!(sql(&op("select", [op("now", [])])), "(SELECT now())");
}

#[test]
fn select_names_are_sanitized() {
    let q = op(
        "select",
        [ident("Created-At"), kw("from"), ident("public.Users")],
    );
    assert_eq!(sql(&q), "(SELECT created_at FROM public.users)");
}

#[test]
fn select_distinct_group_by_having() {
    let q = op(
        "select",
        [
            ident("country"),
            op("as", [op("count", [ident("*")]), ident("n")]),
            kw("distinct"),
            kw("from"),
            ident("customers"),
            kw("group-by"),
            ident("country"),
            kw("having"),
            op(">", [op("count", [ident("*")]), lit(10_i32)]),
        ],
    );
    assert_eq!(
        sql(&q),
        "(SELECT DISTINCT country, count(*) AS n FROM customers \
         GROUP BY country HAVING (count(*) > 10))"
    );
}

#[test]
fn select_every_join_kind() {
    let q = op(
        "select",
        [
            ident("*"),
            kw("from"),
            ident("a"),
            kw("inner-join"),
            ident("b"),
            kw("on"),
            op("=", [ident("a.id"), ident("b.a_id")]),
            kw("right-join"),
            ident("c"),
            kw("on"),
            op("=", [ident("b.id"), ident("c.b_id")]),
            kw("outer-join"),
            ident("d"),
            kw("on"),
            lit(true),
        ],
    );
    assert_eq!(
        sql(&q),
        "(SELECT * FROM a INNER JOIN b ON (a.id = b.a_id) \
         RIGHT JOIN c ON (b.id = c.b_id) FULL OUTER JOIN d ON true)"
    );
}

#[test]
fn join_followed_by_where() {
    let q = op(
        "select",
        [
            ident("u.name"),
            kw("from"),
            ident("users"),
            kw("left-join"),
            ident("orders"),
            kw("on"),
            op("=", [ident("users.id"), ident("orders.user_id")]),
            kw("where"),
            op("is-null", [ident("orders.id")]),
        ],
    );
    assert_eq!(
        sql(&q),
        "(SELECT u.name FROM users LEFT JOIN orders ON (users.id = orders.user_id) \
         WHERE (orders.id IS NULL))"
    );
}

#[test]
fn subquery_in_where() {
    let inner = op("select", [ident("user_id"), kw("from"), ident("banned")]);
    let q = op(
        "select",
        [
            ident("name"),
            kw("from"),
            ident("users"),
            kw("where"),
            op("not-in", [ident("id"), inner]),
        ],
    );
    assert_eq!(
        sql(&q),
        "(SELECT name FROM users WHERE (id NOT IN (SELECT user_id FROM banned)))"
    );
}

#[test]
fn ordered_and_limited() {
    let base = op("select", [ident("name"), kw("from"), ident("users")]);
    let ordered = op(
        "order-by",
        [
            base,
            op("desc", [ident("created")]),
            op("nulls-first", [ident("name")]),
        ],
    );
    let q = op("limit", [ordered, lit(10_i32)]);
    assert_eq!(
        sql(&q),
        "(((SELECT name FROM users) ORDER BY created DESC, name NULLS FIRST) LIMIT 10)"
    );
    let paged = op("offset", [op("select", [lit(1_i32)]), lit(5_i32)]);
    assert_eq!(sql(&paged), "((SELECT 1) OFFSET 5)");
}

#[test]
fn set_operations() {
    let a = op("select", [ident("id"), kw("from"), ident("a")]);
    let b = op("select", [ident("id"), kw("from"), ident("b")]);
    assert_eq!(
        sql(&op("union", [a.clone(), b.clone()])),
        "((SELECT id FROM a) UNION (SELECT id FROM b))"
    );
    assert_eq!(
        sql(&op("except-all", [a, b])),
        "((SELECT id FROM a) EXCEPT ALL (SELECT id FROM b))"
    );
}

#[test]
fn boolean_and_arithmetic_nesting() {
    let cond = op(
        "or",
        [
            op("and", [ident("a"), op("not", [ident("b")])]),
            op(">=", [op("+", [ident("x"), lit(1_i32)]), op("-", [ident("y")])]),
        ],
    );
    assert_eq!(sql(&cond), "((a AND (NOT b)) OR ((x + 1) >= (- y)))");
}

#[test]
fn json_operators() {
    assert_eq!(
        sql(&op("->>", [ident("data"), lit("name")])),
        "(data ->> E'name')"
    );
    assert_eq!(
        sql(&op("@>", [ident("doc"), op("cast", [lit("{\"a\": 1}"), ident("jsonb")])])),
        "(doc @> E'{\"a\": 1}'::JSONB)"
    );
}
