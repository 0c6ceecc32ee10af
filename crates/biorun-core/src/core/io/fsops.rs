//! Moving and removing files written by containers.
//!
//! Container processes commonly run as a different user, so files they leave behind may not
//! be removable by the caller. Failures are reported as a typed [`MoveError`] that separates
//! ownership problems from other I/O errors; no privilege escalation is attempted.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MoveError {
    #[error("Source does not exist: {0:?}")]
    SourceMissing(PathBuf),

    #[error("Permission denied while trying to {operation} {path:?} (owned by another user?)")]
    PermissionDenied {
        operation: &'static str,
        path: PathBuf,
    },

    #[error("Failed to {operation} {path:?}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl MoveError {
    fn classify(operation: &'static str, path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::PermissionDenied => MoveError::PermissionDenied {
                operation,
                path: path.to_path_buf(),
            },
            _ => MoveError::Io {
                operation,
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

/// Moves `from` to `to`, replacing an existing destination file.
///
/// Falls back to copy-then-delete when a rename is not possible (e.g. across filesystems).
pub fn move_file(from: &Path, to: &Path) -> Result<(), MoveError> {
    if !from.exists() {
        return Err(MoveError::SourceMissing(from.to_path_buf()));
    }

    if to.is_file() {
        fs::remove_file(to).map_err(|e| MoveError::classify("replace", to, e))?;
    }

    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            Err(MoveError::classify("move", from, e))
        }
        Err(_) => {
            fs::copy(from, to).map_err(|e| MoveError::classify("copy", from, e))?;
            fs::remove_file(from).map_err(|e| MoveError::classify("remove", from, e))
        }
    }
}

/// Recursively removes a directory the container produced.
pub fn remove_tree(dir: &Path) -> Result<(), MoveError> {
    if !dir.exists() {
        return Err(MoveError::SourceMissing(dir.to_path_buf()));
    }
    fs::remove_dir_all(dir).map_err(|e| MoveError::classify("remove", dir, e))
}
