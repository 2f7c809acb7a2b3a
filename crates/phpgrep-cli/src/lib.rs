//! Command-line runtime for `phpgrep`.
//!
//! Parses arguments, installs diagnostics logging, compiles the pattern once
//! and searches every input path with it. The runtime writes to injected
//! streams so it can be driven from tests as well as from the binary.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser as _;
use phpgrep::Compiler;
use tracing::info;

mod cli;
mod errors;
pub mod output;
mod search;
pub mod telemetry;

use cli::Cli;
use errors::AppError;
use search::{SearchOptions, Searcher};

const CLI_TARGET: &str = "phpgrep_cli";

/// Exit status when at least one match was printed.
const EXIT_MATCH: u8 = 0;
/// Exit status when nothing matched.
const EXIT_NO_MATCH: u8 = 1;
/// Exit status for usage, pattern and I/O errors.
const EXIT_ERROR: u8 = 2;

/// Outcome of a completed search.
struct Summary {
    matches: usize,
    failed_paths: usize,
}

impl Summary {
    fn exit_code(&self) -> ExitCode {
        if self.failed_paths > 0 {
            ExitCode::from(EXIT_ERROR)
        } else if self.matches > 0 {
            ExitCode::from(EXIT_MATCH)
        } else {
            ExitCode::from(EXIT_NO_MATCH)
        }
    }
}

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => return report_usage(&error, stdout, stderr),
    };

    match execute(&cli, stdout, stderr) {
        Ok(summary) => summary.exit_code(),
        Err(error) => {
            let _ = writeln!(stderr, "phpgrep: {error}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Prints clap's rendering of `error`; help and version requests go to
/// stdout and succeed.
fn report_usage<W: Write, E: Write>(error: &clap::Error, stdout: &mut W, stderr: &mut E) -> ExitCode {
    let rendered = error.render();
    if error.use_stderr() {
        let _ = write!(stderr, "{rendered}");
        ExitCode::from(EXIT_ERROR)
    } else {
        let _ = write!(stdout, "{rendered}");
        ExitCode::from(EXIT_MATCH)
    }
}

fn execute<W: Write, E: Write>(
    cli: &Cli,
    stdout: &mut W,
    stderr: &mut E,
) -> Result<Summary, AppError> {
    telemetry::initialise(&cli.log_filter)?;

    let matcher = Compiler::new()
        .with_case_sensitive(cli.case_sensitive)
        .compile(&cli.pattern)
        .map_err(AppError::Pattern)?;
    info!(
        target: CLI_TARGET,
        pattern = matcher.source(),
        paths = cli.paths.len(),
        "searching"
    );

    let mut searcher = Searcher::new(
        matcher,
        SearchOptions {
            limit: cli.limit,
            format: cli.format,
            captures: cli.captures,
        },
    )?;

    let mut failed_paths = 0;
    for path in &cli.paths {
        if searcher.limit_reached() {
            break;
        }
        match searcher.search_path(path, stdout) {
            Ok(()) => {}
            Err(error) if error.is_per_path() => {
                let _ = writeln!(stderr, "phpgrep: {error}");
                failed_paths += 1;
            }
            Err(error) => return Err(error),
        }
    }
    stdout.flush().map_err(AppError::Write)?;

    Ok(Summary {
        matches: searcher.printed(),
        failed_paths,
    })
}
