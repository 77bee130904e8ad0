//! errfix CLI
//!
//! Command-line interface that gives every `result.error(...)` and
//! `self.logger.error(...)` call in a Python code base a fresh error number

mod commands;
mod output;

use anyhow::Context;
use clap::{ArgAction, Parser, ValueEnum};
use errfix_core::{ConfigOverrides, ErrfixError, SeriesScope, init_tracing};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::warn;

use crate::commands::{EXIT_FAILURE, outcome_exit_code};
use crate::output::Reporter;

#[derive(Parser, Debug)]
#[command(name = "errfix")]
#[command(about = "Insert or renumber error codes in Python error-reporting calls")]
#[command(version = errfix_core::VERSION)]
#[command(
    long_about = "errfix rewrites result.error(...), self.logger.error(...) and\n\
self.logger.user_error(...) calls so that each one starts with a fresh numeric error code.\n\
Formatting and comments are preserved; only the code argument changes.\n\
\n\
Examples:\n  \
errfix -i plugins/                  # Renumber every .py file under plugins/\n  \
errfix -i a.py -e 9000              # Number calls in a.py starting at 9001\n  \
errfix -i src --no-write -o fixed   # Write results below fixed/ instead\n  \
errfix -i src --no-write            # Only show the diffs"
)]
struct Cli {
    /// Input files or directories
    #[arg(
        short = 'i',
        long = "input",
        visible_alias = "input_directory",
        value_name = "PATH",
        num_args = 1..,
        required = true
    )]
    inputs: Vec<PathBuf>,

    /// Mirror rewritten files below this directory (with --no-write)
    #[arg(short = 'o', long, visible_alias = "output_directory", value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Append `_<SUFFIX>` to the name of every written file
    #[arg(short = 'a', long, visible_alias = "append_suffix", value_name = "SUFFIX")]
    append_suffix: Option<String>,

    /// Error series seed; the first code issued is SEED + 1
    #[arg(
        short = 'e',
        long,
        visible_alias = "error_series",
        value_name = "SEED",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    error_series: Option<u64>,

    /// Write the rewritten code back to the source files (default)
    #[arg(short = 'w', long, overrides_with = "no_write")]
    write: bool,

    /// Do not overwrite the source files
    #[arg(long, overrides_with = "write")]
    no_write: bool,

    /// Keep a .bak copy of every file before overwriting it
    #[arg(short = 'b', long)]
    backup: bool,

    /// Restart numbering in every file, or continue one series across files
    #[arg(long, value_enum, value_name = "SCOPE")]
    series_scope: Option<ScopeArg>,

    /// Parse sources as they are instead of stripping a shared indentation margin
    #[arg(long)]
    no_dedent: bool,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Number of threads to use for parallel processing
    #[arg(
        short = 'j',
        long,
        help = "Number of threads (default: number of CPU cores)"
    )]
    threads: Option<usize>,

    /// Configuration file path
    #[arg(
        short,
        long,
        help = "Path to configuration file (.errfixrc.toml/.errfixrc.json/errfix.toml)"
    )]
    config: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ScopeArg {
    /// Every file restarts from its seed
    PerFile,
    /// One series runs across all files
    Shared,
}

impl From<ScopeArg> for SeriesScope {
    fn from(scope: ScopeArg) -> Self {
        match scope {
            ScopeArg::PerFile => SeriesScope::PerFile,
            ScopeArg::Shared => SeriesScope::Shared,
        }
    }
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        let write = if self.no_write {
            Some(false)
        } else if self.write {
            Some(true)
        } else {
            None
        };

        ConfigOverrides {
            error_series: self.error_series,
            series_scope: self.series_scope.map(SeriesScope::from),
            write,
            backup: self.backup.then_some(true),
            append_suffix: self.append_suffix.clone(),
            output_dir: self.output_dir.clone(),
            dedent: self.no_dedent.then_some(false),
            threads: self.threads,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    let log_level = match cli.verbose {
        0 => "errfix=error",
        1 => "errfix=warn",
        2 => "errfix=info",
        3 => "errfix=debug",
        _ => "errfix=trace",
    };
    init_tracing(log_level);

    let reporter = Reporter::new();
    match run(cli, reporter) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            reporter.error(&format!("{e:#}"));
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

/// Run the fix on a blocking worker so Ctrl-C can cut it short
fn run(cli: Cli, reporter: Reporter) -> anyhow::Result<u8> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")?;

    let overrides = cli.overrides();
    let Cli { inputs, config, .. } = cli;

    let outcome = runtime.block_on(async move {
        let mut task = tokio::task::spawn_blocking(move || {
            commands::fix_command(inputs, config, overrides, reporter)
        });

        tokio::select! {
            joined = &mut task => joined.context("Fix task failed"),
            signal = tokio::signal::ctrl_c() => match signal {
                Ok(()) => Ok(Err(ErrfixError::Interrupted)),
                Err(e) => {
                    warn!("Cannot listen for Ctrl-C: {}", e);
                    (&mut task).await.context("Fix task failed")
                }
            },
        }
    })?;
    runtime.shutdown_background();

    if let Err(e) = &outcome {
        reporter.error(&e.to_string());
    }
    Ok(outcome_exit_code(&outcome))
}
