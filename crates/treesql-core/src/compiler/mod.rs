//! The expression compiler.
//!
//! [`Compiler::expand`] walks an expression tree and produces [`Fragments`]:
//! static SQL text interleaved with slots for runtime arguments. Operation
//! nodes are handed to the [`Registry`], whose expanders call back into the
//! compiler for their operands.
//!
//! Two modes exist. [`Mode::Static`] is for trees whose values are all known
//! up front and always yields plain text. [`Mode::Deferred`] turns every
//! placeholder into a slot so the result can become a reusable [`Template`].

pub mod groups;
mod template;

pub use template::{Compiled, Template};

use tracing::{debug, trace};

use crate::ast::{Expr, Placeholder};
use crate::config::Config;
use crate::error::{CompileError, Result};
use crate::ident::to_sql_name;
use crate::registry::Registry;
use crate::value::Value;

/// Compilation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Every value is available now; placeholders are an error.
    Static,
    /// Placeholders become template slots.
    Deferred,
}

/// A unit of compiled output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Fixed SQL text.
    Text(String),
    /// A value supplied when the template is rendered.
    Slot(Placeholder),
}

/// An ordered fragment sequence.
///
/// Adjacent text is merged on insertion, so the sequence never holds two
/// consecutive [`Fragment::Text`] entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragments {
    parts: Vec<Fragment>,
}

impl Fragments {
    /// Creates an empty sequence.
    #[must_use]
    pub const fn new() -> Self {
        Self { parts: Vec::new() }
    }

    /// Creates a sequence holding one piece of text.
    #[must_use]
    pub fn text(text: &str) -> Self {
        let mut out = Self::new();
        out.push_str(text);
        out
    }

    /// Appends text, merging it into a trailing text fragment.
    pub fn push_str(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Fragment::Text(last)) = self.parts.last_mut() {
            last.push_str(text);
        } else {
            self.parts.push(Fragment::Text(String::from(text)));
        }
    }

    /// Appends a slot.
    pub fn push_slot(&mut self, placeholder: Placeholder) {
        self.parts.push(Fragment::Slot(placeholder));
    }

    /// Appends another sequence.
    pub fn append(&mut self, other: Self) {
        for part in other.parts {
            match part {
                Fragment::Text(text) => self.push_str(&text),
                Fragment::Slot(slot) => self.push_slot(slot),
            }
        }
    }

    /// Returns the fragments.
    #[must_use]
    pub fn as_slice(&self) -> &[Fragment] {
        &self.parts
    }

    /// Returns the number of slots.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|p| matches!(p, Fragment::Slot(_)))
            .count()
    }

    /// Returns true if no slot is present.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.slot_count() == 0
    }

    /// Concatenates the sequence into one string, or `None` if it holds a
    /// slot.
    #[must_use]
    pub fn into_sql(self) -> Option<String> {
        let mut sql = String::new();
        for part in self.parts {
            match part {
                Fragment::Text(text) => sql.push_str(&text),
                Fragment::Slot(_) => return None,
            }
        }
        Some(sql)
    }

    pub(crate) fn into_parts(self) -> Vec<Fragment> {
        self.parts
    }
}

/// Compiles expression trees against a registry and a configuration.
#[derive(Debug, Clone, Copy)]
pub struct Compiler<'r> {
    registry: &'r Registry,
    config: Config,
    mode: Mode,
}

impl<'r> Compiler<'r> {
    /// Creates a compiler.
    #[must_use]
    pub const fn new(registry: &'r Registry, config: Config, mode: Mode) -> Self {
        Self {
            registry,
            config,
            mode,
        }
    }

    /// Returns the configuration snapshot in use.
    #[must_use]
    pub const fn config(&self) -> Config {
        self.config
    }

    /// Returns the compilation mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the registry in use.
    #[must_use]
    pub const fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Renders a symbolic name as an identifier.
    #[must_use]
    pub fn name(&self, name: &str) -> String {
        to_sql_name(name, self.config.quote_identifiers)
    }

    /// Renders a value as a finished SQL literal.
    pub fn literal(&self, value: &Value) -> Result<String> {
        value.to_sql(self.config.strings)
    }

    /// Compiles one expression.
    pub fn expand(&self, expr: &Expr) -> Result<Fragments> {
        let mut out = Fragments::new();
        self.expand_into(&mut out, expr)?;
        Ok(out)
    }

    /// Compiles one expression, appending to `out`.
    pub fn expand_into(&self, out: &mut Fragments, expr: &Expr) -> Result<()> {
        match expr {
            Expr::Literal(value) | Expr::Quoted(value) => out.push_str(&self.literal(value)?),
            Expr::Identifier(name) | Expr::Keyword(name) => out.push_str(&self.name(name)),
            Expr::Operation { tag, operands } => {
                trace!(tag = %tag, operands = operands.len(), "expanding operation");
                out.append(self.registry.expand(self, tag, operands)?);
            }
            Expr::Placeholder(placeholder) => match self.mode {
                Mode::Deferred => out.push_slot(placeholder.clone()),
                Mode::Static => {
                    return Err(CompileError::UnboundPlaceholder {
                        name: placeholder
                            .name
                            .clone()
                            .unwrap_or_else(|| String::from("?")),
                    })
                }
            },
            Expr::List(items) => {
                out.push_str("(");
                if items.is_empty() {
                    out.push_str("NULL");
                } else {
                    self.expand_joined(out, items, ", ")?;
                }
                out.push_str(")");
            }
        }
        Ok(())
    }

    /// Compiles a sequence of expressions separated by `separator`.
    pub fn expand_joined(&self, out: &mut Fragments, exprs: &[Expr], separator: &str) -> Result<()> {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                out.push_str(separator);
            }
            self.expand_into(out, expr)?;
        }
        Ok(())
    }

    /// Compiles an expression to a finished string.
    ///
    /// Always runs in static mode, whatever mode the compiler was built with.
    pub fn compile_string(&self, expr: &Expr) -> Result<String> {
        let fragments = Compiler { mode: Mode::Static, ..*self }.expand(expr)?;
        fragments.into_sql().ok_or_else(|| CompileError::UnboundPlaceholder {
            name: String::from("?"),
        })
    }

    /// Compiles an expression into a template, capturing the configuration.
    pub fn compile_template(&self, expr: &Expr) -> Result<Template> {
        let fragments = Compiler { mode: Mode::Deferred, ..*self }.expand(expr)?;
        debug!(slots = fragments.slot_count(), "compiled template");
        Ok(Template::new(fragments, self.config))
    }

    /// Compiles an expression, returning a string when nothing is deferred.
    pub fn compile(&self, expr: &Expr) -> Result<Compiled> {
        let template = self.compile_template(expr)?;
        Ok(template.into_compiled())
    }
}
