use std::{
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;

use super::{ConflictPolicy, Operation};

/// Attempts at finding a free `name_N.ext` before giving up.
const MAX_RENAME_ATTEMPTS: usize = 1000;

/// One file to place at its computed destination.
#[derive(Debug, Clone, Copy)]
pub struct TransferRequest<'a> {
    pub source: &'a Path,
    pub target: &'a Path,
    pub operation: Operation,
    pub conflict: ConflictPolicy,
}

/// Result of a transfer that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    /// File written at this path.
    Written(PathBuf),
    /// Target existed and the conflict policy says skip.
    Skipped,
}

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Source and destination are the same file: {0}")]
    SameFile(PathBuf),
    #[error("Unable to prepare folder {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to remove original {path} after copy: {source}")]
    RemoveOriginal {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Could not find a free name for {0}")]
    NoFreeName(PathBuf),
}

/// Copy or move one file, creating the target folder as needed.
///
/// Copies keep the source modification time. Moves try a rename first and
/// fall back to copy + delete when crossing filesystems.
pub fn transfer_file(request: TransferRequest<'_>) -> Result<TransferOutcome, TransferError> {
    let TransferRequest {
        source,
        target,
        operation,
        conflict,
    } = request;
    if same_file(source, target) {
        return Err(TransferError::SameFile(source.to_path_buf()));
    }
    let target = match conflict {
        _ if !target.exists() => target.to_path_buf(),
        ConflictPolicy::Overwrite => target.to_path_buf(),
        ConflictPolicy::Skip => return Ok(TransferOutcome::Skipped),
        ConflictPolicy::Rename => unique_destination(target)?,
    };
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|source| TransferError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    match operation {
        Operation::Copy => copy_preserving_mtime(source, &target)?,
        Operation::Move => move_file(source, &target)?,
    }
    Ok(TransferOutcome::Written(target))
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn copy_preserving_mtime(from: &Path, to: &Path) -> Result<(), TransferError> {
    let copy_err = |source| TransferError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };
    fs::copy(from, to).map_err(copy_err)?;
    let modified = fs::metadata(from).and_then(|meta| meta.modified());
    if let Ok(modified) = modified {
        if let Err(err) = fs::File::options()
            .write(true)
            .open(to)
            .and_then(|file| file.set_modified(modified))
        {
            tracing::debug!(path = %to.display(), error = %err, "Could not preserve mtime");
        }
    }
    Ok(())
}

fn move_file(from: &Path, to: &Path) -> Result<(), TransferError> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    copy_preserving_mtime(from, to)?;
    fs::remove_file(from).map_err(|source| TransferError::RemoveOriginal {
        path: from.to_path_buf(),
        source,
    })
}

fn unique_destination(target: &Path) -> Result<PathBuf, TransferError> {
    let parent = target.parent().unwrap_or_else(|| Path::new(""));
    let stem = target
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string());
    let ext = target
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned());
    for idx in 1..=MAX_RENAME_ATTEMPTS {
        let name = match &ext {
            Some(ext) => format!("{stem}_{idx}.{ext}"),
            None => format!("{stem}_{idx}"),
        };
        let candidate = parent.join(name);
        if !candidate.exists() {
            return Ok(candidate);
        }
    }
    Err(TransferError::NoFreeName(target.to_path_buf()))
}
