//! Configuration file discovery and loading

use super::ErrfixConfig;
use crate::{ErrfixError, Result};
use std::path::{Path, PathBuf};

/// Config file names in priority order
pub const CONFIG_FILE_NAMES: [&str; 3] = [".errfixrc.toml", ".errfixrc.json", "errfix.toml"];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover a config file by traversing upward from `start_path`
    ///
    /// Each directory is checked for [`CONFIG_FILE_NAMES`] in order, moving up
    /// until a file is found or the filesystem root is reached.
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| ErrfixError::config_error(format!("Invalid path: {e}")))?;

        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    /// Load and validate configuration from a specific file
    ///
    /// `.json` files are read as JSON, everything else as TOML.
    pub fn load_from_file(path: &Path) -> Result<ErrfixConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ErrfixError::config_error(format!(
                "Failed to read config '{}': {e}",
                path.display()
            ))
        })?;

        let is_json = path.extension().is_some_and(|ext| ext == "json");
        let config: ErrfixConfig = if is_json {
            serde_json::from_str(&content).map_err(|e| {
                ErrfixError::config_error(format!(
                    "Failed to load config from '{}': {e}",
                    path.display()
                ))
            })?
        } else {
            toml::from_str(&content).map_err(|e| {
                ErrfixError::config_error(format!(
                    "Failed to load config from '{}': {e}",
                    path.display()
                ))
            })?
        };

        config.validate()?;
        Ok(config)
    }

    /// Load config from path or auto-discover
    ///
    /// An explicit path must exist. When auto-discovering, finding nothing
    /// yields the defaults.
    pub fn load(custom_path: Option<&Path>, start_dir: Option<&Path>) -> Result<ErrfixConfig> {
        if let Some(path) = custom_path {
            if !path.exists() {
                return Err(ErrfixError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::load_from_file(path);
        }

        let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
        match Self::auto_discover(search_dir)? {
            Some(path) => Self::load_from_file(&path),
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(ErrfixConfig::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SeriesScope;
    use std::fs;
    use tempfile::TempDir;

    fn create_temp_config(dir: &Path, filename: &str, content: &str) -> PathBuf {
        let path = dir.join(filename);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_from_file_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(
            temp_dir.path(),
            ".errfixrc.toml",
            "error_series = 9000\nbackup = true\nexclude = [\"**/vendor/**\"]\n",
        );

        let config = ConfigLoader::load_from_file(&config_path).unwrap();
        assert_eq!(config.error_series, Some(9000));
        assert!(config.backup);
        assert_eq!(config.exclude, vec!["**/vendor/**"]);
    }

    #[test]
    fn test_load_from_file_json() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(
            temp_dir.path(),
            ".errfixrc.json",
            r#"{ "series_scope": "shared", "extensions": ["py", "pyw"] }"#,
        );

        let config = ConfigLoader::load_from_file(&config_path).unwrap();
        assert_eq!(config.series_scope, SeriesScope::Shared);
        assert_eq!(config.extensions, vec!["py", "pyw"]);
    }

    #[test]
    fn test_load_invalid_values() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(temp_dir.path(), "errfix.toml", "error_series = 0\n");
        assert!(ConfigLoader::load_from_file(&config_path).is_err());

        let config_path = create_temp_config(temp_dir.path(), "bad.json", "{ invalid json }");
        assert!(ConfigLoader::load_from_file(&config_path).is_err());
    }

    #[test]
    fn test_auto_discover_walks_up() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("src/nested");
        fs::create_dir_all(&nested).unwrap();
        create_temp_config(temp_dir.path(), "errfix.toml", "backup = true\n");

        let found = ConfigLoader::auto_discover(&nested).unwrap();
        assert_eq!(found.unwrap().file_name().unwrap(), "errfix.toml");
    }

    #[test]
    fn test_auto_discover_priority() {
        let temp_dir = TempDir::new().unwrap();
        create_temp_config(temp_dir.path(), "errfix.toml", "");
        create_temp_config(temp_dir.path(), ".errfixrc.json", "{}");
        create_temp_config(temp_dir.path(), ".errfixrc.toml", "");

        let found = ConfigLoader::auto_discover(temp_dir.path()).unwrap();
        assert_eq!(found.unwrap().file_name().unwrap(), ".errfixrc.toml");
    }

    #[test]
    fn test_load_missing_custom_path() {
        let result = ConfigLoader::load(Some(Path::new("nonexistent.toml")), None);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(temp_dir.path(), "custom.toml", "dedent = false\n");
        let config = ConfigLoader::load(Some(&config_path), None).unwrap();
        assert!(!config.dedent);
    }
}
