//! Configuration for errfix runs
//!
//! Settings come from an optional file (`.errfixrc.toml`, `.errfixrc.json` or
//! `errfix.toml`, found by walking up from the working directory) and are
//! then overridden by command-line flags.

mod errfix_config;
mod loader;

pub use errfix_config::{ConfigOverrides, ErrfixConfig, SeriesScope};
pub use loader::{CONFIG_FILE_NAMES, ConfigLoader};
