//! Command-line argument definitions.

use std::path::PathBuf;

use clap::Parser;

use crate::output::OutputFormat;

/// Searches PHP source files for code matching a pattern.
#[derive(Parser, Debug)]
#[command(name = "phpgrep", version)]
pub(crate) struct Cli {
    /// Pattern written as PHP code, for example `in_array($x, ${"*"})`.
    #[arg(value_name = "PATTERN")]
    pub(crate) pattern: String,
    /// Files or directories to search. Directories are searched recursively
    /// for `*.php` files.
    #[arg(value_name = "PATH", required = true, num_args = 1..)]
    pub(crate) paths: Vec<PathBuf>,
    /// Compares function, class and method names exactly.
    #[arg(long)]
    pub(crate) case_sensitive: bool,
    /// Stops after this many matches.
    #[arg(long, value_name = "N")]
    pub(crate) limit: Option<usize>,
    /// Controls how matches are printed.
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub(crate) format: OutputFormat,
    /// Prints the captures of every match.
    #[arg(long)]
    pub(crate) captures: bool,
    /// Tracing filter for diagnostics written to stderr.
    #[arg(long, value_name = "FILTER", default_value = "warn")]
    pub(crate) log_filter: String,
}
