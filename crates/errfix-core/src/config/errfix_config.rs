//! The errfix configuration model

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::{ErrfixError, Result};

/// How error codes are shared between files in one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeriesScope {
    /// Every file restarts from its own seed
    #[default]
    PerFile,
    /// One counter runs across all files in discovery order
    Shared,
}

/// Settings for one errfix run
///
/// # Example
///
/// ```toml
/// error_series = 9000
/// series_scope = "per-file"
/// extensions = ["py"]
/// exclude = ["**/migrations/**"]
/// backup = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ErrfixConfig {
    /// Seed for the error series. Derived from each file name when unset.
    pub error_series: Option<u64>,
    pub series_scope: SeriesScope,
    /// File extensions picked up when walking directories, without the dot
    pub extensions: Vec<String>,
    /// Glob patterns for walked files to skip
    pub exclude: Vec<String>,
    /// Overwrite the input files
    pub write: bool,
    /// Keep a `.bak` copy of each file before it is overwritten
    pub backup: bool,
    pub append_suffix: Option<String>,
    pub output_dir: Option<PathBuf>,
    /// Strip a common leading margin before parsing
    pub dedent: bool,
    pub threads: Option<usize>,
}

impl Default for ErrfixConfig {
    fn default() -> Self {
        Self {
            error_series: None,
            series_scope: SeriesScope::PerFile,
            extensions: vec!["py".to_string()],
            exclude: Vec::new(),
            write: true,
            backup: false,
            append_suffix: None,
            output_dir: None,
            dedent: true,
            threads: None,
        }
    }
}

/// Values set on the command line. `None` keeps the file or default value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub error_series: Option<u64>,
    pub series_scope: Option<SeriesScope>,
    pub write: Option<bool>,
    pub backup: Option<bool>,
    pub append_suffix: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub dedent: Option<bool>,
    pub threads: Option<usize>,
}

impl ErrfixConfig {
    /// Apply command-line values on top of this configuration
    pub fn merge_cli(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(seed) = overrides.error_series {
            self.error_series = Some(seed);
        }
        if let Some(scope) = overrides.series_scope {
            self.series_scope = scope;
        }
        if let Some(write) = overrides.write {
            self.write = write;
        }
        if let Some(backup) = overrides.backup {
            self.backup = backup;
        }
        if overrides.append_suffix.is_some() {
            self.append_suffix = overrides.append_suffix;
        }
        if overrides.output_dir.is_some() {
            self.output_dir = overrides.output_dir;
        }
        if let Some(dedent) = overrides.dedent {
            self.dedent = dedent;
        }
        if overrides.threads.is_some() {
            self.threads = overrides.threads;
        }
        self
    }

    /// Reject values no run can use
    pub fn validate(&self) -> Result<()> {
        if self.error_series == Some(0) {
            return Err(ErrfixError::config_error(
                "error_series must be a positive integer",
            ));
        }
        if self.extensions.is_empty() {
            return Err(ErrfixError::config_error(
                "extensions must name at least one file extension",
            ));
        }
        if self.threads == Some(0) {
            return Err(ErrfixError::config_error("threads must be at least 1"));
        }
        if self.append_suffix.as_deref() == Some("") {
            return Err(ErrfixError::config_error("append_suffix must not be empty"));
        }
        for pattern in &self.exclude {
            glob::Pattern::new(pattern).map_err(|e| {
                ErrfixError::config_error(format!("invalid exclude pattern '{pattern}': {e}"))
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ErrfixConfig::default();
        assert!(config.write);
        assert!(config.dedent);
        assert!(!config.backup);
        assert_eq!(config.extensions, vec!["py"]);
        assert_eq!(config.series_scope, SeriesScope::PerFile);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ErrfixConfig = toml::from_str(
            r#"
error_series = 9000
series_scope = "shared"
"#,
        )
        .unwrap();
        assert_eq!(config.error_series, Some(9000));
        assert_eq!(config.series_scope, SeriesScope::Shared);
        assert!(config.write);
        assert_eq!(config.extensions, vec!["py"]);
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let result: std::result::Result<ErrfixConfig, _> = toml::from_str("colour = true\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_overrides_win() {
        let file = ErrfixConfig {
            error_series: Some(100),
            backup: true,
            ..ErrfixConfig::default()
        };
        let merged = file.merge_cli(ConfigOverrides {
            error_series: Some(500),
            write: Some(false),
            output_dir: Some(PathBuf::from("out")),
            ..ConfigOverrides::default()
        });
        assert_eq!(merged.error_series, Some(500));
        assert!(!merged.write);
        assert!(merged.backup);
        assert_eq!(merged.output_dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_validation_errors() {
        let bad = [
            ErrfixConfig {
                error_series: Some(0),
                ..ErrfixConfig::default()
            },
            ErrfixConfig {
                extensions: Vec::new(),
                ..ErrfixConfig::default()
            },
            ErrfixConfig {
                threads: Some(0),
                ..ErrfixConfig::default()
            },
            ErrfixConfig {
                exclude: vec!["[".to_string()],
                ..ErrfixConfig::default()
            },
        ];
        for config in bad {
            assert!(config.validate().is_err(), "{config:?}");
        }
    }
}
