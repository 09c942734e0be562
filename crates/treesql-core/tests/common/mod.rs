#![allow(dead_code)]

use treesql_core::{CompileError, Compiler, Config, Expr, Mode, Registry, Template};

/// Compiles with the built-in operators and the default configuration,
/// independent of the process-wide flags.
pub fn compiler(mode: Mode) -> Compiler<'static> {
    Compiler::new(Registry::global(), Config::default(), mode)
}

pub fn sql(expr: &Expr) -> String {
    compiler(Mode::Static)
        .compile_string(expr)
        .unwrap_or_else(|e| panic!("Failed to compile: {expr}\nError: {e}"))
}

pub fn sql_err(expr: &Expr) -> CompileError {
    compiler(Mode::Static)
        .compile_string(expr)
        .expect_err(&format!("Expected compile error for: {expr}"))
}

pub fn template(expr: &Expr) -> Template {
    compiler(Mode::Deferred)
        .compile_template(expr)
        .unwrap_or_else(|e| panic!("Failed to compile template: {expr}\nError: {e}"))
}
