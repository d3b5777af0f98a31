//! Shared fixtures for filesystem tests

use super::trust::check_path;
use std::fs::{self, Permissions};
use std::os::unix::fs::PermissionsExt;
use tempfile::TempDir;

/// A 0o755 temporary directory whose every ancestor passes the trust checks
///
/// The system temp dir is usually world-writable, so the directory is made
/// under the crate instead. Returns `None` when the checkout itself sits
/// under an untrusted directory; callers skip the test then.
pub(crate) fn trusted_base() -> Option<TempDir> {
    let base = tempfile::Builder::new()
        .prefix(".oz-test")
        .tempdir_in(env!("CARGO_MANIFEST_DIR"))
        .unwrap();
    fs::set_permissions(base.path(), Permissions::from_mode(0o755)).unwrap();

    let canonical = fs::canonicalize(base.path()).unwrap();
    if let Some(untrusted) = canonical.ancestors().find(|dir| check_path(dir).is_err()) {
        eprintln!("skipping: {} is not trusted", untrusted.display());
        return None;
    }
    Some(base)
}
