use std::fmt;
use std::io;

use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Why a snapshot could not be loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadFailureKind {
    /// The snapshot does not exist.
    Missing,
    /// The snapshot exists but could not be read.
    Unreadable,
    /// The snapshot was read but is not valid JSON of the expected shape.
    Malformed,
}

impl fmt::Display for LoadFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LoadFailureKind::Missing => "missing",
            LoadFailureKind::Unreadable => "unreadable",
            LoadFailureKind::Malformed => "malformed",
        })
    }
}

/// Errors raised by the snapshot stores.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{kind} snapshot at {origin}: {detail}")]
    LoadFailure {
        origin: String,
        kind: LoadFailureKind,
        detail: String,
    },
}

impl StoreError {
    pub(crate) fn io(origin: impl Into<String>, err: &io::Error) -> Self {
        let kind = if err.kind() == io::ErrorKind::NotFound {
            LoadFailureKind::Missing
        } else {
            LoadFailureKind::Unreadable
        };
        StoreError::LoadFailure {
            origin: origin.into(),
            kind,
            detail: err.to_string(),
        }
    }

    pub(crate) fn malformed(origin: impl Into<String>, detail: impl fmt::Display) -> Self {
        StoreError::LoadFailure {
            origin: origin.into(),
            kind: LoadFailureKind::Malformed,
            detail: detail.to_string(),
        }
    }

    pub fn kind(&self) -> LoadFailureKind {
        match self {
            StoreError::LoadFailure { kind, .. } => *kind,
        }
    }
}
