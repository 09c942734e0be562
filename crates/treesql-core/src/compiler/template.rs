//! Compiled templates.

use std::fmt::Write as _;

use super::{Fragment, Fragments};
use crate::ast::Placeholder;
use crate::config::Config;
use crate::error::{CompileError, Result};
use crate::value::Value;

/// A reusable, parameterized SQL renderer.
///
/// A template owns its fragments and the configuration that was current when
/// it was compiled. Rendering never mutates it, so one template can be shared
/// between threads and rendered concurrently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    fragments: Vec<Fragment>,
    slots: Vec<Placeholder>,
    config: Config,
}

impl Template {
    pub(crate) fn new(fragments: Fragments, config: Config) -> Self {
        let fragments = fragments.into_parts();
        let slots = fragments
            .iter()
            .filter_map(|f| match f {
                Fragment::Slot(p) => Some(p.clone()),
                Fragment::Text(_) => None,
            })
            .collect();
        Self {
            fragments,
            slots,
            config,
        }
    }

    /// Returns the fragments in output order.
    #[must_use]
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Returns the slots in the order their arguments are expected.
    #[must_use]
    pub fn slots(&self) -> &[Placeholder] {
        &self.slots
    }

    /// Returns the number of runtime arguments.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Returns the configuration captured at compile time.
    #[must_use]
    pub const fn config(&self) -> Config {
        self.config
    }

    /// Renders the template with one value per slot, in order.
    pub fn render(&self, args: &[Value]) -> Result<String> {
        if args.len() != self.slots.len() {
            return Err(CompileError::arity(
                "template",
                format!("exactly {}", self.slots.len()),
                args.len(),
            ));
        }
        let mut sql = String::new();
        let mut args = args.iter();
        for fragment in &self.fragments {
            match fragment {
                Fragment::Text(text) => sql.push_str(text),
                Fragment::Slot(_) => {
                    if let Some(value) = args.next() {
                        sql.push_str(&value.to_sql(self.config.strings)?);
                    }
                }
            }
        }
        Ok(sql)
    }

    /// Renders the template with driver-level positional parameters
    /// (`$1`, `$2`, ...) in place of the slots.
    #[must_use]
    pub fn positional_sql(&self) -> String {
        let mut sql = String::new();
        let mut index = 0;
        for fragment in &self.fragments {
            match fragment {
                Fragment::Text(text) => sql.push_str(text),
                Fragment::Slot(_) => {
                    index += 1;
                    // Writing to a String cannot fail.
                    let _ = write!(sql, "${index}");
                }
            }
        }
        sql
    }

    pub(crate) fn into_compiled(self) -> Compiled {
        if self.slots.is_empty() {
            let sql = self
                .fragments
                .into_iter()
                .map(|f| match f {
                    Fragment::Text(text) => text,
                    Fragment::Slot(_) => String::new(),
                })
                .collect();
            Compiled::Sql(sql)
        } else {
            Compiled::Template(self)
        }
    }
}

/// Result of [`crate::compile`]: plain SQL when every value was known at
/// compile time, a template otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compiled {
    /// Finished SQL.
    Sql(String),
    /// A template awaiting runtime arguments.
    Template(Template),
}

impl Compiled {
    /// Renders the result. Plain SQL accepts no arguments.
    pub fn render(&self, args: &[Value]) -> Result<String> {
        match self {
            Self::Sql(sql) if args.is_empty() => Ok(sql.clone()),
            Self::Sql(_) => Err(CompileError::arity("template", "exactly 0", args.len())),
            Self::Template(template) => template.render(args),
        }
    }

    /// Returns the SQL if nothing was deferred.
    #[must_use]
    pub fn as_sql(&self) -> Option<&str> {
        match self {
            Self::Sql(sql) => Some(sql),
            Self::Template(_) => None,
        }
    }
}
