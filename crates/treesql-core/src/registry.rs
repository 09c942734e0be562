//! Operator registry.
//!
//! Maps operator tags to expanders. Most operators belong to one of five
//! declarative arity classes; composite statements use custom expanders.
//! Unregistered tags fall back to a plain function call unless the registry
//! is [`strict`](Registry::strict).
//!
//! Registration takes `&mut self`, so a registry is filled by a single owner
//! and only shared (immutably) afterwards. [`Registry::global`] holds the
//! built-in operator set.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::ast::Expr;
use crate::builder;
use crate::compiler::{Compiler, Fragments};
use crate::error::{CompileError, Result};

/// A custom expander: operand list in, fragments out.
pub type ExpandFn = dyn Fn(&Compiler<'_>, &[Expr]) -> Result<Fragments> + Send + Sync;

/// How an operator tag expands.
#[derive(Clone)]
pub enum Operator {
    /// `(OP x)`, exactly one operand.
    Unary(String),
    /// `(x OP)`, exactly one operand.
    UnaryPostfix(String),
    /// `(x1 OP x2 OP ... xn)`, or just `x1` for a single operand.
    Nary(String),
    /// `(x1 OP x2 OP ... xn)`, at least two operands.
    TwoOrMore(String),
    /// n-ary for two or more operands, `(OP x)` for one.
    NaryOrUnary(String),
    /// Bespoke fragment assembly.
    Custom(Arc<ExpandFn>),
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unary(op) => f.debug_tuple("Unary").field(op).finish(),
            Self::UnaryPostfix(op) => f.debug_tuple("UnaryPostfix").field(op).finish(),
            Self::Nary(op) => f.debug_tuple("Nary").field(op).finish(),
            Self::TwoOrMore(op) => f.debug_tuple("TwoOrMore").field(op).finish(),
            Self::NaryOrUnary(op) => f.debug_tuple("NaryOrUnary").field(op).finish(),
            Self::Custom(_) => f.write_str("Custom"),
        }
    }
}

impl Operator {
    /// Short name of the operator class.
    #[must_use]
    pub const fn class(&self) -> &'static str {
        match self {
            Self::Unary(_) => "unary",
            Self::UnaryPostfix(_) => "unary-postfix",
            Self::Nary(_) => "n-ary",
            Self::TwoOrMore(_) => "2+-ary",
            Self::NaryOrUnary(_) => "n-or-unary",
            Self::Custom(_) => "custom",
        }
    }

    fn expand(&self, compiler: &Compiler<'_>, tag: &str, operands: &[Expr]) -> Result<Fragments> {
        match self {
            Self::Unary(op) => {
                let [x] = operands else {
                    return Err(CompileError::arity(tag, "exactly 1", operands.len()));
                };
                prefix(compiler, op, x)
            }
            Self::UnaryPostfix(op) => {
                let [x] = operands else {
                    return Err(CompileError::arity(tag, "exactly 1", operands.len()));
                };
                let mut out = Fragments::text("(");
                compiler.expand_into(&mut out, x)?;
                out.push_str(" ");
                out.push_str(op);
                out.push_str(")");
                Ok(out)
            }
            Self::Nary(op) => match operands {
                [] => Err(CompileError::arity(tag, "at least 1", 0)),
                [x] => compiler.expand(x),
                _ => infix(compiler, op, operands),
            },
            Self::TwoOrMore(op) => {
                if operands.len() < 2 {
                    return Err(CompileError::arity(tag, "at least 2", operands.len()));
                }
                infix(compiler, op, operands)
            }
            Self::NaryOrUnary(op) => match operands {
                [] => Err(CompileError::arity(tag, "at least 1", 0)),
                [x] => prefix(compiler, op, x),
                _ => infix(compiler, op, operands),
            },
            Self::Custom(expand) => expand(compiler, operands),
        }
    }
}

fn prefix(compiler: &Compiler<'_>, op: &str, x: &Expr) -> Result<Fragments> {
    let mut out = Fragments::text("(");
    out.push_str(op);
    out.push_str(" ");
    compiler.expand_into(&mut out, x)?;
    out.push_str(")");
    Ok(out)
}

fn infix(compiler: &Compiler<'_>, op: &str, operands: &[Expr]) -> Result<Fragments> {
    let mut out = Fragments::text("(");
    compiler.expand_joined(&mut out, operands, &format!(" {op} "))?;
    out.push_str(")");
    Ok(out)
}

/// Renders `name(a, b, ...)`.
fn function_call(compiler: &Compiler<'_>, tag: &str, operands: &[Expr]) -> Result<Fragments> {
    let mut out = Fragments::text(&compiler.name(tag));
    out.push_str("(");
    compiler.expand_joined(&mut out, operands, ", ")?;
    out.push_str(")");
    Ok(out)
}

/// A table of operator tags.
#[derive(Clone)]
pub struct Registry {
    operators: HashMap<String, Operator>,
    fallback: bool,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("operators", &self.operators.len())
            .field("fallback", &self.fallback)
            .finish()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Registry {
    /// Creates a registry without any operators. Every tag renders as a
    /// function call.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            operators: HashMap::new(),
            fallback: true,
        }
    }

    /// Creates a registry holding the built-in operators.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        builder::register_builtins(&mut registry);
        debug!(operators = registry.operators.len(), "built-in operators registered");
        registry
    }

    /// Returns the process-wide built-in registry.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(Self::builtin)
    }

    /// Disables the function-call fallback: unknown tags become an error.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.fallback = false;
        self
    }

    /// Registers (or replaces) an operator.
    pub fn register_operator(&mut self, tag: &str, operator: Operator) -> &mut Self {
        debug!(tag, class = operator.class(), "registering operator");
        self.operators.insert(String::from(tag), operator);
        self
    }

    /// Registers a custom expander.
    pub fn register<F>(&mut self, tag: &str, expand: F) -> &mut Self
    where
        F: Fn(&Compiler<'_>, &[Expr]) -> Result<Fragments> + Send + Sync + 'static,
    {
        self.register_operator(tag, Operator::Custom(Arc::new(expand)))
    }

    /// Registers a unary prefix operator.
    pub fn register_unary(&mut self, tag: &str, sql: &str) -> &mut Self {
        self.register_operator(tag, Operator::Unary(String::from(sql)))
    }

    /// Registers a unary postfix operator.
    pub fn register_postfix(&mut self, tag: &str, sql: &str) -> &mut Self {
        self.register_operator(tag, Operator::UnaryPostfix(String::from(sql)))
    }

    /// Registers an n-ary operator.
    pub fn register_nary(&mut self, tag: &str, sql: &str) -> &mut Self {
        self.register_operator(tag, Operator::Nary(String::from(sql)))
    }

    /// Registers an operator taking two or more operands.
    pub fn register_two_or_more(&mut self, tag: &str, sql: &str) -> &mut Self {
        self.register_operator(tag, Operator::TwoOrMore(String::from(sql)))
    }

    /// Registers an operator that is n-ary, or prefix with a single operand.
    pub fn register_nary_or_unary(&mut self, tag: &str, sql: &str) -> &mut Self {
        self.register_operator(tag, Operator::NaryOrUnary(String::from(sql)))
    }

    /// Looks up an operator.
    #[must_use]
    pub fn get(&self, tag: &str) -> Option<&Operator> {
        self.operators.get(tag)
    }

    /// Returns the registered tags, sorted.
    #[must_use]
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.operators.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Expands an operation.
    pub fn expand(&self, compiler: &Compiler<'_>, tag: &str, operands: &[Expr]) -> Result<Fragments> {
        match self.operators.get(tag) {
            Some(operator) => operator.expand(compiler, tag, operands),
            None if self.fallback => function_call(compiler, tag, operands),
            None => Err(CompileError::UnknownOperator {
                tag: String::from(tag),
            }),
        }
    }
}
