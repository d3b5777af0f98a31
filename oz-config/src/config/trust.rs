//! Ownership and permission checks run before a config file is parsed
//!
//! A file is trusted only when neither it nor its directory can be modified
//! by anyone but root: no entry may be world-writable, and a group-writable
//! entry must belong to the root group.

use crate::error::TrustError;
use std::fs::{self, Metadata};
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

const S_IWGRP: u32 = 0o020;
const S_IWOTH: u32 = 0o002;
const ROOT_GID: u32 = 0;

/// Which entries around the config file are checked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrustScope {
    /// The file and its immediate parent directory
    #[default]
    ParentOnly,
    /// The file and every directory up to the filesystem root
    Ancestors,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TrustValidator {
    scope: TrustScope,
}

impl TrustValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scope(scope: TrustScope) -> Self {
        Self { scope }
    }

    pub fn scope(&self) -> TrustScope {
        self.scope
    }

    /// Check every entry for `path`, outermost directory first
    pub fn validate(&self, path: &Path) -> Result<(), TrustError> {
        for entry in self.entries(path)? {
            tracing::debug!(path = %entry.display(), "Checking permissions");
            check_path(&entry)?;
        }
        Ok(())
    }

    /// Entries that `validate` inspects, in checking order
    pub fn entries(&self, path: &Path) -> Result<Vec<PathBuf>, TrustError> {
        let parent = parent_dir(path);
        let mut entries = match self.scope {
            TrustScope::ParentOnly => vec![parent],
            TrustScope::Ancestors => {
                let parent = fs::canonicalize(&parent).map_err(|source| {
                    TrustError::MetadataUnavailable {
                        path: parent.clone(),
                        source,
                    }
                })?;
                let mut dirs: Vec<PathBuf> = parent.ancestors().map(Path::to_path_buf).collect();
                dirs.reverse();
                dirs
            }
        };
        entries.push(path.to_path_buf());
        Ok(entries)
    }
}

/// Directory holding `path`; a bare file name lives in `.`
fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => PathBuf::from("."),
        Some(parent) => parent.to_path_buf(),
        None => path.to_path_buf(),
    }
}

/// Stat `path` (following symlinks) and apply the policy
pub fn check_path(path: &Path) -> Result<(), TrustError> {
    let metadata = fs::metadata(path).map_err(|source| TrustError::MetadataUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    check_metadata(path, &metadata)
}

/// Apply the policy to metadata already obtained, e.g. from an open handle
pub fn check_metadata(path: &Path, metadata: &Metadata) -> Result<(), TrustError> {
    check_mode(path, metadata.mode(), metadata.gid())
}

/// The policy itself, over raw mode bits and owning group
pub fn check_mode(path: &Path, mode: u32, gid: u32) -> Result<(), TrustError> {
    if mode & S_IWOTH != 0 {
        return Err(TrustError::WorldWritable(path.to_path_buf()));
    }
    if mode & S_IWGRP != 0 && gid != ROOT_GID {
        return Err(TrustError::GroupWritableByUntrustedGroup {
            path: path.to_path_buf(),
            gid,
        });
    }
    Ok(())
}
