//! The fix command

use errfix_core::{
    ConfigLoader, ConfigOverrides, ErrfixError, OutputOptions, Result, SeriesScope, SourceFile,
    backup, discover_sources, output_target, review_diff, write_atomic,
};
use errfix_rules::{
    ErrorNumberFixer, FixOutcome, FixerOptions, LocalSeries, SharedSeries, default_series_for,
};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use crate::output::Reporter;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_NO_FILES: u8 = 1;
pub const EXIT_INTERRUPTED: u8 = 2;
pub const EXIT_FAILURE: u8 = 3;

/// Counts gathered over one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixSummary {
    pub files_found: usize,
    pub files_changed: usize,
    pub files_written: usize,
    pub calls_fixed: usize,
    pub failures: usize,
}

impl FixSummary {
    pub fn exit_code(&self) -> u8 {
        if self.files_found == 0 {
            EXIT_NO_FILES
        } else if self.failures > 0 {
            EXIT_FAILURE
        } else {
            EXIT_SUCCESS
        }
    }
}

/// Exit code for a run that finished, failed, or was interrupted
pub fn outcome_exit_code(outcome: &Result<FixSummary>) -> u8 {
    match outcome {
        Ok(summary) => summary.exit_code(),
        Err(ErrfixError::Interrupted) => EXIT_INTERRUPTED,
        Err(_) => EXIT_FAILURE,
    }
}

/// Renumber error calls in every source under `inputs`
///
/// Per-file failures are reported and counted; only setup problems (bad
/// configuration, unresolvable inputs) return an error.
pub fn fix_command(
    inputs: Vec<PathBuf>,
    config_path: Option<PathBuf>,
    overrides: ConfigOverrides,
    reporter: Reporter,
) -> Result<FixSummary> {
    debug!("Running errfix on inputs: {:?}", inputs);

    let config = ConfigLoader::load(config_path.as_deref(), None)?.merge_cli(overrides);
    config.validate()?;
    debug!("Loaded configuration: {:?}", config);

    if let Some(threads) = config.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .map_err(|e| {
                ErrfixError::config_error(format!("Failed to set thread pool size: {e}"))
            })?;
    }

    let start_time = Instant::now();
    let sources = discover_sources(&inputs, &config.extensions, &config.exclude)?;
    let mut summary = FixSummary {
        files_found: sources.len(),
        ..Default::default()
    };
    if sources.is_empty() {
        reporter.warning("No source files found in the given inputs");
        return Ok(summary);
    }

    let fixer = ErrorNumberFixer::new(FixerOptions {
        dedent: config.dedent,
    });
    let seed_for = |path: &Path| config.error_series.unwrap_or_else(|| default_seed(path));

    let results: Vec<Result<FixOutcome>> = match config.series_scope {
        SeriesScope::PerFile => sources
            .par_iter()
            .map(|source| {
                let mut series = LocalSeries::new(seed_for(&source.path));
                fixer.fix_file(&source.path, &mut series)
            })
            .collect(),
        SeriesScope::Shared => {
            let series = SharedSeries::new(seed_for(&sources[0].path));
            sources
                .iter()
                .map(|source| fixer.fix_file(&source.path, &mut series.clone()))
                .collect()
        }
    };

    let options = OutputOptions::from(&config);
    for (source, result) in sources.iter().zip(results) {
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                debug!("Failed to fix {}: {}", source.path.display(), e);
                reporter.error(&e.to_string());
                summary.failures += 1;
                continue;
            }
        };

        summary.calls_fixed += outcome.fixes.len();
        if !outcome.is_changed() {
            debug!("No changes for {}", source.path.display());
            continue;
        }
        summary.files_changed += 1;
        reporter.file_changed(
            &source.path,
            &review_diff(&outcome.original, &outcome.output),
        );

        match persist(source, &outcome, &options) {
            Ok(true) => summary.files_written += 1,
            Ok(false) => {}
            Err(e) => {
                debug!("Failed to write {}: {}", source.path.display(), e);
                reporter.error(&e.to_string());
                summary.failures += 1;
            }
        }
    }

    if summary.files_written > 0 {
        reporter.reminder();
    }

    info!(
        "Fixed {} call(s) in {} of {} file(s), wrote {} in {:.2?}",
        summary.calls_fixed,
        summary.files_changed,
        summary.files_found,
        summary.files_written,
        start_time.elapsed()
    );
    Ok(summary)
}

/// Seed from the file name, stripping the file's own extension
fn default_seed(path: &Path) -> u64 {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default();
    default_series_for(path, &extension)
}

/// Write the rewritten text where the options say. `false` means a dry run.
fn persist(source: &SourceFile, outcome: &FixOutcome, options: &OutputOptions) -> Result<bool> {
    let Some(target) = output_target(source, options) else {
        debug!("Dry run, not writing {}", source.path.display());
        return Ok(false);
    };

    if options.backup && target == source.path {
        backup(&source.path)?;
    }
    write_atomic(&target, &outcome.output)?;
    info!("Wrote {}", target.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let mut summary = FixSummary::default();
        assert_eq!(summary.exit_code(), EXIT_NO_FILES);

        summary.files_found = 2;
        assert_eq!(summary.exit_code(), EXIT_SUCCESS);

        summary.failures = 1;
        assert_eq!(summary.exit_code(), EXIT_FAILURE);
    }

    #[test]
    fn test_outcome_exit_codes() {
        let done = FixSummary {
            files_found: 1,
            ..Default::default()
        };
        assert_eq!(outcome_exit_code(&Ok(done)), EXIT_SUCCESS);
        assert_eq!(
            outcome_exit_code(&Ok(FixSummary::default())),
            EXIT_NO_FILES
        );
        assert_eq!(
            outcome_exit_code(&Err(ErrfixError::Interrupted)),
            EXIT_INTERRUPTED
        );
        assert_eq!(
            outcome_exit_code(&Err(ErrfixError::config_error("bad"))),
            EXIT_FAILURE
        );
        assert_eq!(
            outcome_exit_code(&Err(ErrfixError::series_exhausted(u64::MAX))),
            EXIT_FAILURE
        );
    }

    #[test]
    fn test_default_seed_strips_own_extension() {
        assert_eq!(default_seed(Path::new("dir/cymon.py")), 23000);
        assert_eq!(
            default_seed(Path::new("cymon.pyw")),
            default_seed(Path::new("cymon"))
        );
    }
}
