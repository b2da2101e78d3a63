//! sqlts — generate typed source from a database schema
//!
//! # Usage
//!
//! ```bash
//! # Render schema.json with the bundled TypeScript template
//! sqlts schema.json > db.ts
//!
//! # Nest interfaces under one namespace per schema
//! sqlts schema.json --schema-as-namespace
//!
//! # Use your own template and config
//! sqlts schema.json --template codegen.handlebars --config sqlts.toml
//! ```

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlts::prelude::*;
use sqlts::render::template_path;
use sqlts::resolve::{BUILTIN_TYPES, builtin_type};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sqlts")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Generate typed source code from a database schema", long_about = None)]
#[command(after_help = "EXAMPLES:
    sqlts schema.json > db.ts
    sqlts schema.json --schema-as-namespace
    cat schema.json | sqlts - --template codegen.handlebars
    sqlts types")]
struct Cli {
    /// Schema JSON file produced by introspection ('-' for stdin)
    schema: Option<String>,

    /// Config file (defaults to ./sqlts.toml, then the user config dir)
    #[arg(short, long, env = "SQLTS_CONFIG")]
    config: Option<PathBuf>,

    /// Template overriding the one in the config
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Nest generated names under a namespace per schema
    #[arg(short = 'n', long)]
    schema_as_namespace: bool,

    /// Verbose output (debug logs on stderr)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the built-in source → target type table
    Types,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Some(Commands::Types) => show_types(),
        None => {
            if let Some(schema) = &cli.schema {
                if let Err(e) = run(schema, &cli) {
                    eprintln!("{} {:#}", "Error:".red().bold(), e);
                    std::process::exit(1);
                }
            } else {
                eprintln!("{}", "sqlts — schema in, typed source out".cyan().bold());
                eprintln!();
                eprintln!("Usage: sqlts <SCHEMA> [OPTIONS]");
                eprintln!();
                eprintln!("Try: sqlts --help");
            }
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "sqlts=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(schema: &str, cli: &Cli) -> Result<()> {
    let raw = if schema == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read schema from stdin")?;
        buf
    } else {
        std::fs::read_to_string(schema)
            .with_context(|| format!("Failed to read schema file '{}'", schema))?
    };
    let database = Database::from_json(&raw).map_err(Error::from)?;

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::discover()?,
    };
    if let Some(template) = &cli.template {
        config.template = Some(template.clone());
    }
    if cli.schema_as_namespace {
        config.schema_as_namespace = true;
    }

    tracing::info!(
        "Rendering {} tables from {}",
        database.tables.len(),
        schema
    );

    let code = match generate(database, &config) {
        Err(e) if e.is_file_read() => {
            let path = template_path(&config);
            return Err(anyhow::Error::new(e))
                .with_context(|| format!("Failed to read template '{}'", path.display()));
        }
        other => other?,
    };
    print!("{}", code);
    Ok(())
}

fn show_types() {
    println!("{}", "Built-in type mapping".cyan().bold());
    println!();
    println!("{:22} {}", "Source".white().bold(), "Target".white().bold());
    println!("{}", "─".repeat(40).dimmed());

    for source in BUILTIN_TYPES {
        let target = builtin_type(source).unwrap_or("?");
        println!("{:22} {}", source.yellow(), target.white());
    }

    println!();
    println!(
        "{}",
        "Arrays (_int4, text[]) map to <element>[]; override any entry with [typeMap].".dimmed()
    );
}
