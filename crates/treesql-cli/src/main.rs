//! treesql CLI
//!
//! Compiles JSON-serialized expression trees to PostgreSQL.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use treesql_core::{
    compile, compile_template, set_quote_identifiers, set_standard_strings, Compiled, Expr,
    Registry, Value,
};

/// Compile symbolic expression trees to PostgreSQL.
#[derive(Parser)]
#[command(name = "treesql")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Emit standard-conforming string literals ('...') instead of E'...'.
    #[arg(long, global = true, env = "TREESQL_STANDARD_STRINGS")]
    standard_strings: bool,

    /// Double-quote every identifier.
    #[arg(long, global = true, env = "TREESQL_QUOTE_IDENTIFIERS")]
    quote_identifiers: bool,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile an expression tree read as JSON.
    Compile {
        /// Input file; standard input when omitted or `-`.
        file: Option<PathBuf>,

        /// Runtime argument for the next placeholder, as JSON.
        #[arg(short, long = "arg", value_name = "JSON")]
        args: Vec<String>,
    },

    /// List the built-in operators.
    Operators,
}

fn read_input(file: Option<&PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("failed to read standard input")?;
            Ok(input)
        }
    }
}

fn parse_args(args: &[String]) -> anyhow::Result<Vec<Value>> {
    args.iter()
        .enumerate()
        .map(|(i, arg)| {
            let json: serde_json::Value = serde_json::from_str(arg)
                .with_context(|| format!("argument {} is not valid JSON: {arg}", i + 1))?;
            Value::try_from(json).with_context(|| format!("argument {} has no SQL form", i + 1))
        })
        .collect()
}

fn compile_command(file: Option<&PathBuf>, args: &[String]) -> anyhow::Result<String> {
    let input = read_input(file)?;
    let expr: Expr = serde_json::from_str(&input).context("input is not a valid expression tree")?;
    debug!(%expr, "parsed expression");

    if args.is_empty() {
        return Ok(match compile(&expr)? {
            Compiled::Sql(sql) => sql,
            Compiled::Template(template) => {
                info!(
                    slots = template.slot_count(),
                    "expression has placeholders; printing positional form"
                );
                template.positional_sql()
            }
        });
    }

    let values = parse_args(args)?;
    let template = compile_template(&expr)?;
    Ok(template.render(&values)?)
}

fn operator_listing(registry: &Registry) -> Vec<String> {
    registry
        .tags()
        .into_iter()
        .filter_map(|tag| {
            registry
                .get(tag)
                .map(|operator| format!("{tag:<24} {}", operator.class()))
        })
        .collect()
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    set_standard_strings(cli.standard_strings);
    set_quote_identifiers(cli.quote_identifiers);

    match cli.command {
        Commands::Compile { file, args } => {
            println!("{}", compile_command(file.as_ref(), &args)?);
        }
        Commands::Operators => {
            for line in operator_listing(Registry::global()) {
                println!("{line}");
            }
        }
    }

    Ok(())
}
