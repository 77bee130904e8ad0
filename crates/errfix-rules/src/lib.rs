//! errfix rules
//!
//! The error-number rule: find `result.error(...)` and
//! `self.logger.error(...)` / `self.logger.user_error(...)` calls in a Python
//! syntax tree and give each a fresh numeric code from an [`ErrorSeries`].

pub mod engine;
pub mod matcher;
pub mod rewrite;
pub mod series;

pub use engine::{ErrorNumberFixer, FixOutcome, FixerOptions};
pub use matcher::{CallShape, ErrorCallMatch, LoggerMethod, MatchedArgs, match_error_call};
pub use rewrite::{AppliedFix, FixKind, apply_error_code};
pub use series::{ErrorSeries, FALLBACK_SEED, LocalSeries, SharedSeries, default_series_for};
