//! Writing rewritten sources back to disk
//!
//! Every write goes through a temp file in the destination directory that is
//! renamed over the target, so an interrupted run never leaves half a file.

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::{ErrfixConfig, ErrfixError, Result, SourceFile};

/// Where and how rewritten text is written
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputOptions {
    /// Overwrite the source file. Takes precedence over `output_dir`.
    pub write_in_place: bool,
    /// Mirror outputs below this directory when not writing in place
    pub output_dir: Option<PathBuf>,
    /// Rename outputs to `<stem>_<suffix>.<ext>`
    pub append_suffix: Option<String>,
    /// Keep a `.bak` copy of files that are overwritten in place
    pub backup: bool,
}

impl From<&ErrfixConfig> for OutputOptions {
    fn from(config: &ErrfixConfig) -> Self {
        Self {
            write_in_place: config.write,
            output_dir: config.output_dir.clone(),
            append_suffix: config.append_suffix.clone(),
            backup: config.backup,
        }
    }
}

/// Resolve the path rewritten text for `source` should go to
///
/// `None` means a dry run: nothing is written.
pub fn output_target(source: &SourceFile, options: &OutputOptions) -> Option<PathBuf> {
    let base = if options.write_in_place {
        source.path.clone()
    } else {
        options.output_dir.as_ref()?.join(source.relative_path())
    };

    Some(match &options.append_suffix {
        Some(suffix) => suffixed_path(&base, suffix),
        None => base,
    })
}

/// `dir/name.ext` becomes `dir/name_<suffix>.ext`
pub fn suffixed_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_stem()
        .map(OsString::from)
        .unwrap_or_default();
    name.push("_");
    name.push(suffix);
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    path.with_file_name(name)
}

/// `<path>.bak`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

/// Copy `path` to `<path>.bak`, replacing a previous backup
pub fn backup(path: &Path) -> Result<PathBuf> {
    let target = backup_path(path);
    if target.symlink_metadata().is_ok() {
        fs::remove_file(&target)
            .map_err(|e| ErrfixError::io_error("remove backup", &target, e))?;
    }
    fs::copy(path, &target).map_err(|e| ErrfixError::io_error("back up", path, e))?;
    debug!("Backed up {} to {}", path.display(), target.display());
    Ok(target)
}

/// Write `contents` to `path` via a temp file in the same directory
///
/// Missing parent directories are created. When `path` already exists its
/// permissions carry over to the new file.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| ErrfixError::io_error("create directory", dir, e))?;

    let mut temp = NamedTempFile::new_in(dir)
        .map_err(|e| ErrfixError::io_error("create temp file in", dir, e))?;
    temp.write_all(contents.as_bytes())
        .map_err(|e| ErrfixError::io_error("write", temp.path(), e))?;

    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(temp.path(), metadata.permissions())
            .map_err(|e| ErrfixError::io_error("copy permissions to", temp.path(), e))?;
    }

    temp.persist(path)
        .map_err(|e| ErrfixError::io_error("persist", path, e.error))?;
    debug!("Wrote {}", path.display());
    Ok(())
}
