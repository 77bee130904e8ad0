//! Source file discovery
//!
//! Input paths are resolved into the Python files to rewrite. Directories are
//! walked recursively in file-name order so runs are reproducible; explicit
//! files are taken as given, whatever their extension.

use glob::Pattern;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::{ErrfixError, Result, ResultExt};

/// A discovered source and the input root it was found under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// The directory input that led here, or the parent of an explicit file
    pub root: PathBuf,
    pub path: PathBuf,
}

impl SourceFile {
    /// Path below the input root, used to mirror files into an output directory
    pub fn relative_path(&self) -> &Path {
        self.path.strip_prefix(&self.root).unwrap_or(&self.path)
    }
}

/// Resolve `inputs` into source files, in input order
///
/// Walked files must carry one of `extensions` and match none of the
/// `exclude` glob patterns (tested against the path relative to the input
/// directory and against the full path).
pub fn discover_sources(
    inputs: &[PathBuf],
    extensions: &[String],
    exclude: &[String],
) -> Result<Vec<SourceFile>> {
    let patterns = exclude
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| {
                ErrfixError::config_error(format!("invalid exclude pattern '{p}': {e}"))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut sources = Vec::new();
    for input in inputs {
        if input.is_file() {
            let root = input.parent().map(Path::to_path_buf).unwrap_or_default();
            sources.push(SourceFile {
                root,
                path: input.clone(),
            });
        } else if input.is_dir() {
            walk_directory(input, extensions, &patterns, &mut sources);
        } else {
            return Err(ErrfixError::input_error(
                input,
                "path does not exist or is not a file or directory",
            ));
        }
    }

    debug!("Discovered {} source file(s)", sources.len());
    Ok(sources)
}

fn walk_directory(
    root: &Path,
    extensions: &[String],
    exclude: &[Pattern],
    sources: &mut Vec<SourceFile>,
) {
    let entries = WalkDir::new(root).sort_by_file_name().into_iter().filter_map(|entry| {
        entry
            .map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                ErrfixError::io_error("walk", path, e.into())
            })
            .log_and_continue()
    });

    for entry in entries {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !has_extension(path, extensions) {
            continue;
        }
        let relative = path.strip_prefix(root).unwrap_or(path);
        if exclude
            .iter()
            .any(|p| p.matches_path(relative) || p.matches_path(path))
        {
            debug!("Excluded {}", path.display());
            continue;
        }
        sources.push(SourceFile {
            root: root.to_path_buf(),
            path: path.to_path_buf(),
        });
    }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|wanted| wanted == ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn py() -> Vec<String> {
        vec!["py".to_string()]
    }

    fn touch(dir: &Path, relative: &str) -> PathBuf {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "pass\n").unwrap();
        path
    }

    #[test]
    fn test_walks_sorted_and_filters_extensions() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "b.py");
        touch(temp.path(), "a.py");
        touch(temp.path(), "notes.txt");
        touch(temp.path(), "pkg/c.py");

        let sources = discover_sources(&[temp.path().to_path_buf()], &py(), &[]).unwrap();
        let relative: Vec<_> = sources.iter().map(|s| s.relative_path().to_path_buf()).collect();
        assert_eq!(
            relative,
            vec![
                PathBuf::from("a.py"),
                PathBuf::from("b.py"),
                PathBuf::from("pkg/c.py")
            ]
        );
    }

    #[test]
    fn test_exclude_patterns() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "keep.py");
        touch(temp.path(), "pkg/migrations/0001.py");

        let sources = discover_sources(
            &[temp.path().to_path_buf()],
            &py(),
            &["**/migrations/**".to_string()],
        )
        .unwrap();
        assert_eq!(sources.len(), 1);
        assert!(sources[0].path.ends_with("keep.py"));
    }

    #[test]
    fn test_explicit_file_is_taken_as_given() {
        let temp = TempDir::new().unwrap();
        let script = touch(temp.path(), "tool.script");

        let sources = discover_sources(&[script.clone()], &py(), &[]).unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].path, script);
        assert_eq!(sources[0].relative_path(), Path::new("tool.script"));
    }

    #[test]
    fn test_missing_input() {
        let err = discover_sources(&[PathBuf::from("does/not/exist")], &py(), &[]).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Input);
    }

    #[test]
    fn test_empty_directory() {
        let temp = TempDir::new().unwrap();
        let sources = discover_sources(&[temp.path().to_path_buf()], &py(), &[]).unwrap();
        assert!(sources.is_empty());
    }
}
