//! SQL literal values and their text rendering.
//!
//! [`Value::serialize`] turns a typed value into literal text plus an
//! [`Escape`] directive telling the caller how the text still has to be
//! quoted. [`Value::to_sql`] applies the directive and returns finished SQL.

use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::StringDialect;
use crate::error::{CompileError, Result};
use crate::escape::{escape_bytes, escape_string};

/// A typed SQL literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Arbitrary precision decimal, kept as text (e.g. `"12.50"`).
    Numeric(String),
    /// Text value.
    Text(String),
    /// Binary value, rendered in escaped `bytea` format.
    Bytes(Vec<u8>),
    /// Calendar date.
    Date(NaiveDate),
    /// Time of day.
    Time(NaiveTime),
    /// Date and time without zone.
    Timestamp(NaiveDateTime),
    /// Interval.
    Interval(Interval),
    /// Array of values, rendered as `ARRAY[...]`.
    Array(Vec<Value>),
    /// Already escaped SQL, emitted verbatim.
    Raw(String),
}

/// An interval split into calendar and clock components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Interval {
    pub years: i64,
    pub months: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub milliseconds: i64,
}

impl Interval {
    fn components(&self) -> [(i64, &'static str); 7] {
        [
            (self.years, "years"),
            (self.months, "months"),
            (self.days, "days"),
            (self.hours, "hours"),
            (self.minutes, "minutes"),
            (self.seconds, "seconds"),
            (self.milliseconds, "milliseconds"),
        ]
    }

    fn to_text(self) -> String {
        let parts: Vec<String> = self
            .components()
            .iter()
            .filter(|(n, _)| *n != 0)
            .map(|(n, unit)| format!("{n} {unit}"))
            .collect();
        if parts.is_empty() {
            String::from("0 milliseconds")
        } else {
            parts.join(" ")
        }
    }
}

/// How serialized literal text must be wrapped before it is valid SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escape {
    /// The text is already valid SQL.
    None,
    /// Quote and escape as a string literal.
    String,
    /// Quote and escape, then cast to the named type.
    Typed(&'static str),
}

fn numeric_pattern() -> &'static Regex {
    static NUMERIC: OnceLock<Regex> = OnceLock::new();
    NUMERIC.get_or_init(|| {
        Regex::new(r"^[-+]?([0-9]+(\.[0-9]*)?|\.[0-9]+)$").expect("numeric pattern is valid")
    })
}

/// Leap seconds carry `nanos >= 1e9`; only the sub-second part is printed.
fn millis_suffix(nanos: u32) -> String {
    let millis = nanos / 1_000_000 % 1000;
    if millis == 0 {
        String::new()
    } else {
        format!(".{millis:03}")
    }
}

impl Value {
    /// Builds an array value.
    pub fn array<T: ToSqlValue>(items: impl IntoIterator<Item = T>) -> Self {
        Self::Array(items.into_iter().map(ToSqlValue::to_sql_value).collect())
    }

    /// Serializes the value into literal text and an escape directive.
    ///
    /// `dialect` is only consulted for array elements, which are rendered in
    /// full.
    pub fn serialize(&self, dialect: StringDialect) -> Result<(String, Escape)> {
        let literal = match self {
            Self::Null => (String::from("NULL"), Escape::None),
            Self::Bool(b) => (String::from(if *b { "true" } else { "false" }), Escape::None),
            Self::Int(n) => (n.to_string(), Escape::None),
            Self::Float(f) => {
                if !f.is_finite() {
                    return Err(CompileError::serialization(self, "not a finite number"));
                }
                (format!("{f}"), Escape::None)
            }
            Self::Numeric(text) => {
                if !numeric_pattern().is_match(text) {
                    return Err(CompileError::serialization(self, "not a decimal number"));
                }
                (text.clone(), Escape::None)
            }
            Self::Text(s) => (s.clone(), Escape::String),
            Self::Bytes(b) => (escape_bytes(b), Escape::String),
            Self::Date(d) => (d.format("%Y-%m-%d").to_string(), Escape::Typed("date")),
            Self::Time(t) => (
                format!("{}{}", t.format("%H:%M:%S"), millis_suffix(t.nanosecond())),
                Escape::Typed("time"),
            ),
            Self::Timestamp(ts) => (
                format!(
                    "{}{}",
                    ts.format("%Y-%m-%d %H:%M:%S"),
                    millis_suffix(ts.nanosecond())
                ),
                Escape::Typed("timestamp"),
            ),
            Self::Interval(i) => (i.to_text(), Escape::Typed("interval")),
            Self::Array(items) if items.is_empty() => (String::from("{}"), Escape::String),
            Self::Array(items) => {
                let rendered = items
                    .iter()
                    .map(|item| item.to_sql(dialect))
                    .collect::<Result<Vec<_>>>()?;
                (format!("ARRAY[{}]", rendered.join(", ")), Escape::None)
            }
            Self::Raw(sql) => (sql.clone(), Escape::None),
        };
        Ok(literal)
    }

    /// Returns the finished SQL literal for this value.
    pub fn to_sql(&self, dialect: StringDialect) -> Result<String> {
        let (text, escape) = self.serialize(dialect)?;
        Ok(match escape {
            Escape::None => text,
            Escape::String => escape_string(&text, dialect),
            Escape::Typed(ty) => format!("{}::{ty}", escape_string(&text, dialect)),
        })
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = CompileError;

    fn try_from(json: serde_json::Value) -> Result<Self> {
        use serde_json::Value as Json;

        match json {
            Json::Null => Ok(Self::Null),
            Json::Bool(b) => Ok(Self::Bool(b)),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Self::Int(i))
                } else if n.is_u64() {
                    Ok(Self::Numeric(n.to_string()))
                } else if let Some(f) = n.as_f64() {
                    Ok(Self::Float(f))
                } else {
                    Err(CompileError::serialization(&n, "unsupported number"))
                }
            }
            Json::String(s) => Ok(Self::Text(s)),
            Json::Array(items) => items
                .into_iter()
                .map(Self::try_from)
                .collect::<Result<Vec<_>>>()
                .map(Self::Array),
            Json::Object(_) => Err(CompileError::serialization(
                &json,
                "objects have no SQL literal form",
            )),
        }
    }
}

/// Trait for types that can be converted to SQL values.
pub trait ToSqlValue {
    /// Converts the value to a `Value`.
    fn to_sql_value(self) -> Value;
}

impl ToSqlValue for Value {
    fn to_sql_value(self) -> Value {
        self
    }
}

impl ToSqlValue for bool {
    fn to_sql_value(self) -> Value {
        Value::Bool(self)
    }
}

macro_rules! int_to_sql_value {
    ($($ty:ty),*) => {
        $(
            impl ToSqlValue for $ty {
                fn to_sql_value(self) -> Value {
                    Value::Int(i64::from(self))
                }
            }
        )*
    };
}

int_to_sql_value!(i8, i16, i32, i64, u8, u16, u32);

impl ToSqlValue for u64 {
    fn to_sql_value(self) -> Value {
        i64::try_from(self).map_or_else(|_| Value::Numeric(self.to_string()), Value::Int)
    }
}

impl ToSqlValue for f64 {
    fn to_sql_value(self) -> Value {
        Value::Float(self)
    }
}

impl ToSqlValue for f32 {
    fn to_sql_value(self) -> Value {
        Value::Float(f64::from(self))
    }
}

impl ToSqlValue for String {
    fn to_sql_value(self) -> Value {
        Value::Text(self)
    }
}

impl ToSqlValue for &str {
    fn to_sql_value(self) -> Value {
        Value::Text(String::from(self))
    }
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(self) -> Value {
        match self {
            Some(v) => v.to_sql_value(),
            None => Value::Null,
        }
    }
}

impl ToSqlValue for Vec<u8> {
    fn to_sql_value(self) -> Value {
        Value::Bytes(self)
    }
}

impl ToSqlValue for &[u8] {
    fn to_sql_value(self) -> Value {
        Value::Bytes(self.to_vec())
    }
}

impl ToSqlValue for NaiveDate {
    fn to_sql_value(self) -> Value {
        Value::Date(self)
    }
}

impl ToSqlValue for NaiveTime {
    fn to_sql_value(self) -> Value {
        Value::Time(self)
    }
}

impl ToSqlValue for NaiveDateTime {
    fn to_sql_value(self) -> Value {
        Value::Timestamp(self)
    }
}

impl ToSqlValue for Interval {
    fn to_sql_value(self) -> Value {
        Value::Interval(self)
    }
}
