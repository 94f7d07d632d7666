//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use strata_catalog::Scope;

/// strata -- software bill of materials cataloger.
///
/// Use `strata <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "strata", version, about, long_about = None)]
pub struct Cli {
    /// Path to the strata.toml configuration file (defaults apply when missing).
    #[arg(short, long, global = true, default_value = "strata.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format (scan defaults to json, other commands to text).
    #[arg(long, global = true)]
    pub output: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Output format for the selected command.
    pub fn output_format(&self) -> OutputFormat {
        self.output.unwrap_or(match self.command {
            Commands::Scan(_) => OutputFormat::Json,
            _ => OutputFormat::Text,
        })
    }
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Catalog packages and files of a directory, file or unpacked image.
    Scan(ScanArgs),

    /// Inspect the registered catalogers.
    Catalogers(CatalogersArgs),

    /// Manage the JSON schema of the output document.
    Schema(SchemaArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- scan ----

/// Catalog a source and print the SBOM document.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Directory or file to scan, or the image name when --layer is given.
    #[arg(default_value = ".")]
    pub target: PathBuf,

    /// Cataloger selection patterns (comma separated, overrides the config file).
    #[arg(long, value_delimiter = ',')]
    pub catalogers: Vec<String>,

    /// Glob over real paths to exclude (repeatable, added to the config file list).
    #[arg(long)]
    pub exclude: Vec<String>,

    /// Unpacked image layer directory, bottom layer first (repeatable).
    #[arg(long)]
    pub layer: Vec<PathBuf>,
}

// ---- catalogers ----

/// Inspect the registered catalogers.
#[derive(Args, Debug)]
pub struct CatalogersArgs {
    #[command(subcommand)]
    pub action: CatalogersAction,
}

#[derive(Subcommand, Debug)]
pub enum CatalogersAction {
    /// List catalogers applicable to a scope and whether the current selection enables them.
    List {
        /// Source scope (image, directory, all).
        #[arg(long, default_value = "all")]
        scope: Scope,
    },
}

// ---- schema ----

/// Manage the JSON schema of the output document.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    #[command(subcommand)]
    pub action: SchemaAction,
}

#[derive(Subcommand, Debug)]
pub enum SchemaAction {
    /// Write schema-<version>.json; refuses to change an already published version.
    Write {
        /// Target directory.
        #[arg(long, default_value = "schema/json")]
        dir: PathBuf,
    },
}

// ---- config ----

/// Manage strata configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, catalog, file).
        #[arg(long)]
        section: Option<String>,
    },
}
