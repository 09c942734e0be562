//! Tests for literal serialization, escaping and identifier naming.

mod common;
use common::*;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use treesql_core::ast::{ident, lit, op};
use treesql_core::{
    escape_bytes, escape_string, to_sql_name, CompileError, Compiler, Config, Interval, Mode,
    Registry, StringDialect, Value,
};

#[test]
fn bytes_use_octal_escapes() {
    assert_eq!(escape_bytes(&[10]), "\\012");
    assert_eq!(escape_bytes(&[65]), "A");
    assert_eq!(escape_bytes(b"a'b\\"), "a\\047b\\134");
    assert_eq!(
        Value::Bytes(vec![0, 65, 255])
            .to_sql(StringDialect::Backslash)
            .unwrap(),
        "E'\\\\000A\\\\377'"
    );
    assert_eq!(
        Value::Bytes(vec![0, 65, 255])
            .to_sql(StringDialect::Standard)
            .unwrap(),
        "'\\000A\\377'"
    );
}

#[test]
fn string_dialects() {
    assert_eq!(
        escape_string("it's a \\ test", StringDialect::Backslash),
        "E'it''s a \\\\ test'"
    );
    assert_eq!(
        escape_string("it's a \\ test", StringDialect::Standard),
        "'it''s a \\ test'"
    );
}

#[test]
fn scalar_literals() {
    assert_eq!(sql(&lit(true)), "true");
    assert_eq!(sql(&lit(Option::<i32>::None)), "NULL");
    assert_eq!(sql(&lit(-42_i64)), "-42");
    assert_eq!(sql(&lit(1.5_f64)), "1.5");
    assert_eq!(sql(&lit(Value::Numeric(String::from("123.450")))), "123.450");
}

#[test]
fn temporal_literals() {
    let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    let time = NaiveTime::from_hms_milli_opt(13, 5, 9, 250).unwrap();
    let ts = NaiveDateTime::new(date, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
    assert_eq!(sql(&lit(date)), "E'2024-02-29'::date");
    assert_eq!(sql(&lit(time)), "E'13:05:09.250'::time");
    assert_eq!(sql(&lit(ts)), "E'2024-02-29 08:00:00'::timestamp");
    let interval = Interval {
        days: 3,
        hours: 4,
        ..Interval::default()
    };
    assert_eq!(sql(&lit(interval)), "E'3 days 4 hours'::interval");
}

#[test]
fn arrays() {
    assert_eq!(
        sql(&lit(Value::array([1_i32, 2, 3]))),
        "ARRAY[1, 2, 3]"
    );
    assert_eq!(sql(&lit(Value::array(Vec::<i32>::new()))), "E'{}'");
}

#[test]
fn unserializable_values() {
    assert!(matches!(
        sql_err(&lit(f64::INFINITY)),
        CompileError::Serialization { .. }
    ));
    assert!(matches!(
        sql_err(&lit(Value::Numeric(String::from("1; DROP")))),
        CompileError::Serialization { .. }
    ));
}

#[test]
fn json_arguments() {
    let value = Value::try_from(serde_json::json!(["a", 1, null, true])).unwrap();
    assert_eq!(
        value.to_sql(StringDialect::Standard).unwrap(),
        "ARRAY['a', 1, NULL, true]"
    );
    assert!(Value::try_from(serde_json::json!({"a": 1})).is_err());
}

#[test]
fn identifier_naming() {
    assert_eq!(to_sql_name("*", true), "*");
    assert_eq!(to_sql_name("$3", true), "$3");
    assert_eq!(to_sql_name("t.*", true), "\"t\".*");
    assert_eq!(to_sql_name("Order-Items.Unit-Price", false), "order_items.unit_price");
    assert_eq!(to_sql_name("x\"; --", true), "\"x_____\"");
}

#[test]
fn quoted_identifiers_in_statements() {
    let c = Compiler::new(
        Registry::global(),
        Config::default().with_quoted_identifiers(true),
        Mode::Static,
    );
    let q = op("select", [ident("u.name"), op("count", [ident("*")])]);
    assert_eq!(
        c.compile_string(&q).unwrap(),
        "(SELECT \"u\".\"name\", \"count\"(*))"
    );
}
