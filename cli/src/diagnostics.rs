//! Maps any failure of a run to the single line shown to the user.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use blockzip_core::types::StreamError;
use thiserror::Error;

pub const SOURCE_NOT_FOUND: &str = "The source file cannot be found.";
pub const INVALID_PATH: &str =
    "The specified path is invalid such as being on unmapped drive or includes non-existing sub path.";
pub const PERMISSION_DENIED: &str =
    "The application doesn't have enough permission to complete the current operation.";
pub const NOT_A_FILE: &str = "Path refers to the non-file device.";
pub const OUT_OF_MEMORY: &str = "Not enough memory to complete an operation.";
pub const MISSING_ARGUMENTS: &str = "The required arguments are missing.";
pub const INVALID_COMMAND: &str = "The specified command is invalid.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRole {
    Source,
    Destination,
}

impl fmt::Display for FileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileRole::Source => f.write_str("source"),
            FileRole::Destination => f.write_str("destination"),
        }
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot open {role} {path:?}: {source}")]
    Open {
        role: FileRole,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{role} {path:?} is not a regular file")]
    NotAFile { role: FileRole, path: PathBuf },
}

/// True when the directory that should hold `path` does not exist.
fn parent_missing(path: &Path) -> bool {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => !parent.exists(),
        _ => false,
    }
}

fn describe_io(err: &io::Error, role: Option<FileRole>, path: Option<&Path>) -> String {
    match (err.kind(), role) {
        (io::ErrorKind::NotFound, Some(FileRole::Source)) if path.is_some_and(parent_missing) => {
            INVALID_PATH.to_string()
        }
        (io::ErrorKind::NotFound, Some(FileRole::Source)) => SOURCE_NOT_FOUND.to_string(),
        (io::ErrorKind::NotFound, _) => INVALID_PATH.to_string(),
        (io::ErrorKind::PermissionDenied, _) => PERMISSION_DENIED.to_string(),
        (io::ErrorKind::OutOfMemory, _) => OUT_OF_MEMORY.to_string(),
        _ => err.to_string(),
    }
}

/// Message for the one diagnostic line printed before exiting with 1.
pub fn describe(err: &anyhow::Error) -> String {
    if let Some(cli) = err.downcast_ref::<CliError>() {
        return match cli {
            CliError::Open { role, path, source } => {
                describe_io(source, Some(*role), Some(path.as_path()))
            }
            CliError::NotAFile { .. } => NOT_A_FILE.to_string(),
        };
    }

    if let Some(stream) = err.downcast_ref::<StreamError>() {
        if let StreamError::MemoryExhausted { .. } = stream {
            return OUT_OF_MEMORY.to_string();
        }
        if let Some(io_err) = stream.io_error() {
            if matches!(
                io_err.kind(),
                io::ErrorKind::PermissionDenied | io::ErrorKind::OutOfMemory
            ) {
                return describe_io(io_err, None, None);
            }
        }
        return stream.user_message();
    }

    if let Some(io_err) = err.downcast_ref::<io::Error>() {
        return describe_io(io_err, None, None);
    }

    err.to_string()
}
