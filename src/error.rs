//! Error taxonomy for load and save
//!
//! Every call returns at most one [`StoreError`]. Callers branch on
//! [`StoreError::kind`] rather than on message text.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::codec::CodecError;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Coarse classification of a [`StoreError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Decode,
    UnknownKeys,
    Encode,
    Io,
}

/// The filesystem step that failed
///
/// Closing a handle has no entry: std reports no error from dropping a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IoOp {
    CreateDir,
    CreateTemp,
    Write,
    Sync,
    Rename,
    Open,
    Read,
}

impl IoOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            IoOp::CreateDir => "make dir",
            IoOp::CreateTemp => "create temp",
            IoOp::Write => "write",
            IoOp::Sync => "sync",
            IoOp::Rename => "rename",
            IoOp::Open => "open",
            IoOp::Read => "read",
        }
    }
}

impl fmt::Display for IoOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("open {}: file not found", .path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("decode {format} {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        format: &'static str,
        #[source]
        source: CodecError,
    },

    #[error("unknown keys in {}: {}", .path.display(), .keys.join(", "))]
    UnknownKeys { path: PathBuf, keys: Vec<String> },

    #[error("encode {format} into {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        format: &'static str,
        #[source]
        source: CodecError,
    },

    #[error("{op} {}{}: {source}", .path.display(), DisplayTarget(.target.as_deref()))]
    Io {
        op: IoOp,
        path: PathBuf,
        /// Destination of a rename, if the failed step had one
        target: Option<PathBuf>,
        #[source]
        source: io::Error,
    },
}

struct DisplayTarget<'a>(Option<&'a Path>);

impl fmt::Display for DisplayTarget<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(target) => write!(f, " -> {}", target.display()),
            None => Ok(()),
        }
    }
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            StoreError::Decode { .. } => ErrorKind::Decode,
            StoreError::UnknownKeys { .. } => ErrorKind::UnknownKeys,
            StoreError::Encode { .. } => ErrorKind::Encode,
            StoreError::Io { .. } => ErrorKind::Io,
        }
    }

    /// True when the target file did not exist on load
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// The path the error refers to (the temp file for save-side failures)
    pub fn path(&self) -> &Path {
        match self {
            StoreError::NotFound { path, .. }
            | StoreError::Decode { path, .. }
            | StoreError::UnknownKeys { path, .. }
            | StoreError::Encode { path, .. }
            | StoreError::Io { path, .. } => path,
        }
    }

    /// Offending dotted key paths for [`ErrorKind::UnknownKeys`], empty otherwise
    pub fn unknown_keys(&self) -> &[String] {
        match self {
            StoreError::UnknownKeys { keys, .. } => keys,
            _ => &[],
        }
    }

    pub(crate) fn io(op: IoOp, path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Io {
            op,
            path: path.into(),
            target: None,
            source,
        }
    }
}
