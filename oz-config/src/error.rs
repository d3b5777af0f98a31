//! Error types for configuration loading

use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LoadError>;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Refusing untrusted config {path}: {reason}")]
    Untrusted {
        path: PathBuf,
        #[source]
        reason: TrustError,
    },

    #[error("Failed to read config {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to decode config {path}: {source}")]
    DecodeFailed {
        path: PathBuf,
        source: DecodeError,
    },
}

impl LoadError {
    /// Path of the configuration file the load was attempted on
    pub fn path(&self) -> &Path {
        match self {
            LoadError::NotFound(path) => path,
            LoadError::Untrusted { path, .. } => path,
            LoadError::ReadFailed { path, .. } => path,
            LoadError::DecodeFailed { path, .. } => path,
        }
    }

    /// True when the file was rejected by the ownership/permission checks
    pub fn is_trust_failure(&self) -> bool {
        matches!(self, LoadError::Untrusted { .. })
    }
}

/// Reasons a file or directory fails the trust policy
#[derive(Debug, Error)]
pub enum TrustError {
    #[error("{0} is writable by everyone")]
    WorldWritable(PathBuf),

    #[error("{path} is writable by group {gid}, which is not root")]
    GroupWritableByUntrustedGroup { path: PathBuf, gid: u32 },

    #[error("Failed to read metadata for {path}: {source}")]
    MetadataUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl TrustError {
    /// The entry (file or directory) that failed the check
    pub fn path(&self) -> &Path {
        match self {
            TrustError::WorldWritable(path) => path,
            TrustError::GroupWritableByUntrustedGroup { path, .. } => path,
            TrustError::MetadataUnavailable { path, .. } => path,
        }
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("content is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("top-level value must be an object, found {0}")]
    NotAnObject(&'static str),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
}
