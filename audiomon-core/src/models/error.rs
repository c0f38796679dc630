use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while projecting sink state onto disk.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to sync {path}: {source}")]
    Sync { path: PathBuf, source: io::Error },

    #[error("failed to remove {path}: {source}")]
    Remove { path: PathBuf, source: io::Error },

    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("serialization failed: {0}")]
    Serialize(String),
}

/// Failures of a hotplug or bus event source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("event source unavailable: {0}")]
    Unavailable(String),

    #[error("failed to receive event: {0}")]
    Receive(String),

    #[error("wait on event sources failed: {0}")]
    Poll(#[from] io::Error),
}

/// A per-event profile lookup that did not produce an answer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("profile query timed out")]
    Timeout,

    #[error("profile query failed: {0}")]
    Failed(String),

    #[error("malformed profile reply: {0}")]
    Malformed(String),
}

/// Invalid daemon configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("artifact path has no file name: {0}")]
    InvalidArtifactPath(PathBuf),

    #[error("{0} must be non-zero")]
    ZeroTimeout(&'static str),

    #[error("audio profile identifier is empty")]
    EmptyProfile,
}
