//! `luapath` CLI: load a script-style source and query its tables by path.
//!
//! ## Usage
//!
//! ```sh
//! # Read a global scalar from a JSON document (stdin)
//! echo '{"N1": 5}' | luapath value N1
//!
//! # Look up a value inside a global table
//! luapath -i config.json get cars .bmw.price
//!
//! # Render a subtree, as text or as JSON
//! luapath -i config.json table cars '#5.class'
//! luapath -i config.json table cars --json
//!
//! # Extract an array, one element per line
//! luapath -i config.json array scores --as float
//!
//! # Lua scripts (requires the `lua` feature); the format is inferred
//! # from the `.lua` extension
//! luapath -i config.lua get cars .honda.owner
//! ```
//!
//! Builder diagnostics are logged to stderr. Set `RUST_LOG` to change the
//! level (default `warn`).

use std::fmt::Display;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use luapath_core::{BuildOptions, JsonSource, Table, TableSource, DEFAULT_MAX_DEPTH};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "luapath",
    version,
    about = "Query Lua-style nested tables with search paths"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Input file (reads from stdin if omitted)
    #[arg(short, long, global = true)]
    input: Option<String>,

    /// Source format (inferred from a `.lua` input extension, else json)
    #[arg(long, value_enum, global = true)]
    format: Option<Format>,

    /// Maximum nesting depth materialized below a global table
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH, global = true)]
    max_depth: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a global scalar
    Value {
        /// Global variable name
        name: String,
    },
    /// Print the value at PATH inside a global table
    Get {
        /// Global table name
        table: String,
        /// Search path, e.g. `#5.class.model`
        path: String,
    },
    /// Render a global table or one of its subtables
    Table {
        /// Global table name
        table: String,
        /// Search path to a subtable (the whole table if omitted)
        path: Option<String>,
        /// Print pretty JSON instead of the text rendering
        #[arg(long)]
        json: bool,
    },
    /// Print the leaves of a table as an array, one element per line
    Array {
        /// Global table name
        table: String,
        /// Search path to a subtable (the whole table if omitted)
        path: Option<String>,
        /// Element type every leaf must convert to
        #[arg(long = "as", value_enum, default_value_t = Element::String)]
        element: Element,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Lua,
}

#[derive(Clone, Copy, ValueEnum)]
enum Element {
    String,
    Int,
    Float,
    Bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let format = cli
        .format
        .unwrap_or_else(|| infer_format(cli.input.as_deref()));
    let options = BuildOptions {
        max_depth: cli.max_depth,
    };

    let text = read_input(cli.input.as_deref())?;
    let output = match format {
        Format::Json => {
            let source: JsonSource = text.parse().context("Failed to load JSON source")?;
            run(&source, &cli.command, options)?
        }
        Format::Lua => run_lua(&text, &cli.command, options)?,
    };

    print!("{output}");
    Ok(())
}

#[cfg(feature = "lua")]
fn run_lua(text: &str, command: &Commands, options: BuildOptions) -> Result<String> {
    let mut source = luapath_core::LuaSource::new();
    source
        .load_string(text)
        .context("Failed to load Lua source")?;
    run(&source, command, options)
}

#[cfg(not(feature = "lua"))]
fn run_lua(_text: &str, _command: &Commands, _options: BuildOptions) -> Result<String> {
    anyhow::bail!("Lua input is not supported: luapath was built without the `lua` feature")
}

/// Execute one subcommand against a loaded source and return what to print.
fn run<S: TableSource>(source: &S, command: &Commands, options: BuildOptions) -> Result<String> {
    match command {
        Commands::Value { name } => {
            let value = source
                .global_value(name)
                .with_context(|| format!("Failed to read global '{name}'"))?;
            Ok(line(value.text()))
        }
        Commands::Get { table, path } => {
            let root = load_table(source, table, options)?;
            let value = root
                .value(path)
                .with_context(|| format!("Failed to look up \"{path}\" in '{table}'"))?;
            Ok(line(value.text()))
        }
        Commands::Table { table, path, json } => {
            let root = load_table(source, table, options)?;
            let subtree = subtable(&root, table, path.as_deref())?;
            if *json {
                let pretty = serde_json::to_string_pretty(subtree)
                    .context("Failed to serialize table to JSON")?;
                Ok(line(pretty))
            } else {
                Ok(subtree.to_string())
            }
        }
        Commands::Array {
            table,
            path,
            element,
        } => {
            let root = load_table(source, table, options)?;
            let subtree = subtable(&root, table, path.as_deref())?;
            let context = || format!("Failed to read '{table}' as an array");
            match element {
                Element::String => Ok(lines(subtree.to_array::<String>().with_context(context)?)),
                Element::Int => Ok(lines(subtree.to_array::<i64>().with_context(context)?)),
                Element::Float => Ok(lines(subtree.to_array::<f64>().with_context(context)?)),
                Element::Bool => Ok(lines(subtree.to_array::<bool>().with_context(context)?)),
            }
        }
    }
}

/// Materialize a global table; skipped entries were already logged by the
/// builder.
fn load_table<S: TableSource>(source: &S, name: &str, options: BuildOptions) -> Result<Table> {
    let build = source
        .build_global(name, options)
        .with_context(|| format!("Failed to load table '{name}'"))?;

    if !build.is_complete() {
        tracing::warn!(
            table = name,
            skipped = build.diagnostics.len(),
            "table loaded partially"
        );
    }

    Ok(build.table)
}

fn subtable<'t>(root: &'t Table, name: &str, path: Option<&str>) -> Result<&'t Table> {
    let path = path.unwrap_or("");
    root.table(path)
        .with_context(|| format!("Failed to find table \"{path}\" in '{name}'"))
}

fn infer_format(input: Option<&str>) -> Format {
    match input.and_then(|path| Path::new(path).extension()) {
        Some(extension) if extension.eq_ignore_ascii_case("lua") => Format::Lua,
        _ => Format::Json,
    }
}

fn line(text: impl Display) -> String {
    format!("{text}\n")
}

fn lines<T: Display>(items: Vec<T>) -> String {
    items.iter().map(line).collect()
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}
