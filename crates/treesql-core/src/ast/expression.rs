//! Expression tree types.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::value::{ToSqlValue, Value};

/// A position whose value is supplied when a compiled template is invoked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placeholder {
    /// Optional name, used in diagnostics.
    pub name: Option<String>,
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "?{name}"),
            None => f.write_str("?"),
        }
    }
}

/// A node of the expression tree.
///
/// Trees are built bottom-up and never mutated afterwards. Composite
/// operators such as `select` receive a flat operand list in which
/// [`Expr::Keyword`] markers delimit the clauses:
///
/// ```rust
/// use treesql_core::ast::{ident, kw, lit, op};
///
/// let query = op("select", [ident("a"), kw("from"), ident("users"),
///                           kw("where"), op("=", [ident("id"), lit(5)])]);
/// assert_eq!(query.to_string(), "(select a :from users :where (= id 5))");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    /// A typed scalar.
    Literal(Value),
    /// A table, column or function name.
    Identifier(String),
    /// An operator application.
    Operation {
        /// Registry tag selecting the expander.
        tag: String,
        /// Operands, in order.
        operands: Vec<Expr>,
    },
    /// A value that is always serialized on the spot, in every mode.
    Quoted(Value),
    /// A runtime argument slot.
    Placeholder(Placeholder),
    /// A clause marker such as `:from`, stored without the colon.
    Keyword(String),
    /// A structural grouping (column definitions, option lists, ...).
    List(Vec<Expr>),
}

impl Expr {
    /// Returns the marker name when this node is a keyword.
    #[must_use]
    pub fn as_keyword(&self) -> Option<&str> {
        match self {
            Self::Keyword(name) => Some(name),
            _ => None,
        }
    }

    /// Returns true if this node is the given keyword.
    #[must_use]
    pub fn is_keyword(&self, name: &str) -> bool {
        self.as_keyword() == Some(name)
    }

    /// Returns the items when this node is a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns true for literal values that count as "set" in option lists:
    /// anything except `NULL` and `false`.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        !matches!(
            self,
            Self::Literal(Value::Null | Value::Bool(false))
                | Self::Quoted(Value::Null | Value::Bool(false))
        )
    }
}

/// Creates an identifier node.
#[must_use]
pub fn ident(name: &str) -> Expr {
    Expr::Identifier(String::from(name))
}

/// Creates a literal node.
pub fn lit<T: ToSqlValue>(value: T) -> Expr {
    Expr::Literal(value.to_sql_value())
}

/// Creates a quoted literal node.
pub fn quoted<T: ToSqlValue>(value: T) -> Expr {
    Expr::Quoted(value.to_sql_value())
}

/// Creates an operation node.
pub fn op(tag: &str, operands: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Operation {
        tag: String::from(tag),
        operands: operands.into_iter().collect(),
    }
}

/// Creates a keyword marker. A leading colon is optional.
#[must_use]
pub fn kw(name: &str) -> Expr {
    Expr::Keyword(String::from(name.strip_prefix(':').unwrap_or(name)))
}

/// Creates a list node.
pub fn list(items: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::List(items.into_iter().collect())
}

/// Creates an anonymous placeholder.
#[must_use]
pub fn param() -> Expr {
    Expr::Placeholder(Placeholder::default())
}

/// Creates a named placeholder.
#[must_use]
pub fn named_param(name: &str) -> Expr {
    Expr::Placeholder(Placeholder {
        name: Some(String::from(name)),
    })
}

fn write_seq(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(Value::Text(s)) => write!(f, "{s:?}"),
            Self::Literal(v) => match v {
                Value::Null => f.write_str("null"),
                Value::Bool(b) => write!(f, "{b}"),
                Value::Int(n) => write!(f, "{n}"),
                Value::Float(x) => write!(f, "{x}"),
                other => write!(f, "{other:?}"),
            },
            Self::Identifier(name) => f.write_str(name),
            Self::Operation { tag, operands } => {
                write!(f, "({tag}")?;
                if !operands.is_empty() {
                    f.write_str(" ")?;
                    write_seq(f, operands)?;
                }
                f.write_str(")")
            }
            Self::Quoted(v) => write!(f, "'{v:?}"),
            Self::Placeholder(p) => write!(f, "{p}"),
            Self::Keyword(name) => write!(f, ":{name}"),
            Self::List(items) => {
                f.write_str("[")?;
                write_seq(f, items)?;
                f.write_str("]")
            }
        }
    }
}
