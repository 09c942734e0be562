//! Expression trees and type descriptors.

mod expression;
mod types;

pub use expression::{ident, kw, list, lit, named_param, op, param, quoted, Expr, Placeholder};
pub use types::{dissect_nullable, type_name};
