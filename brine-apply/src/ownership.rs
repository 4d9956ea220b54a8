//! Best-effort ownership normalization for the daemon's directories.
//!
//! After a successful generate, every entry under the fixed roots is
//! chowned to the configured user and the fixed group. The pass is bulk
//! and best-effort: an entry that cannot be read or chowned is counted,
//! logged at warn level, and skipped — it never aborts the run. User
//! resolution failure, by contrast, is fatal.

use std::path::PathBuf;

use crate::error::ApplyError;

#[cfg(unix)]
use nix::unistd::{chown, Gid, Uid, User};
#[cfg(unix)]
use walkdir::WalkDir;

/// Summary of one ownership pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OwnershipReport {
    /// Entries whose ownership was set.
    pub changed: usize,
    /// Entries skipped with a warning.
    pub skipped: usize,
}

impl OwnershipReport {
    pub fn visited(&self) -> usize {
        self.changed + self.skipped
    }
}

/// Resolve a configured user to a uid.
///
/// Accepts a numeric uid directly; otherwise consults the system account
/// database. An unknown account is a fatal, typed error.
#[cfg(unix)]
pub fn resolve_user(name: &str) -> Result<Uid, ApplyError> {
    let trimmed = name.trim();
    if let Ok(id) = trimmed.parse::<u32>() {
        return Ok(Uid::from_raw(id));
    }
    let user = User::from_name(trimmed)
        .map_err(|source| ApplyError::UserLookup {
            user: trimmed.to_string(),
            source,
        })?
        .ok_or_else(|| ApplyError::UnknownUser {
            user: trimmed.to_string(),
        })?;
    Ok(user.uid)
}

/// Chown every entry under `roots` to `user` and `gid`.
///
/// Roots that do not exist are skipped silently (nothing to normalize).
#[cfg(unix)]
pub fn apply_ownership(
    roots: &[PathBuf],
    user: &str,
    gid: u32,
) -> Result<OwnershipReport, ApplyError> {
    let uid = resolve_user(user)?;
    let gid = Gid::from_raw(gid);
    let mut report = OwnershipReport::default();

    for root in roots {
        if !root.exists() {
            continue;
        }
        for entry in WalkDir::new(root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(
                        "ownership pass: skipping unreadable entry under {}: {err}",
                        root.display()
                    );
                    report.skipped += 1;
                    continue;
                }
            };
            match chown(entry.path(), Some(uid), Some(gid)) {
                Ok(()) => report.changed += 1,
                Err(err) => {
                    tracing::warn!(
                        "ownership pass: cannot chown {}: {err}",
                        entry.path().display()
                    );
                    report.skipped += 1;
                }
            }
        }
    }

    Ok(report)
}

#[cfg(not(unix))]
pub fn apply_ownership(
    _roots: &[PathBuf],
    _user: &str,
    _gid: u32,
) -> Result<OwnershipReport, ApplyError> {
    Err(ApplyError::Unsupported {
        operation: "ownership pass",
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(all(test, unix))]
mod tests {
    use std::os::unix::fs::MetadataExt;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn numeric_user_resolves_without_account_lookup() {
        assert_eq!(resolve_user("1234").unwrap(), Uid::from_raw(1234));
    }

    #[test]
    fn unknown_user_is_a_typed_error() {
        let err = resolve_user("no-such-account-xyz").unwrap_err();
        assert!(matches!(err, ApplyError::UnknownUser { .. }), "got: {err:?}");
    }

    #[test]
    fn root_user_resolves_to_uid_zero() {
        assert_eq!(resolve_user("root").unwrap(), Uid::from_raw(0));
    }

    #[test]
    fn pass_visits_every_entry() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("etc").join("salt");
        std::fs::create_dir_all(root.join("pki")).unwrap();
        std::fs::write(root.join("minion"), "x").unwrap();
        std::fs::write(root.join("pki").join("minion.pem"), "y").unwrap();

        // Re-assert the current owner; succeeds without privileges and
        // exercises the same code path as the real pass.
        let meta = std::fs::metadata(&root).unwrap();
        let report = apply_ownership(
            &[root.clone()],
            &meta.uid().to_string(),
            meta.gid(),
        )
        .unwrap();

        // root dir + pki dir + 2 files
        assert_eq!(report.visited(), 4);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.changed, 4);
    }

    #[test]
    fn missing_roots_are_skipped() {
        let tmp = TempDir::new().unwrap();
        let report = apply_ownership(
            &[tmp.path().join("does-not-exist")],
            "0",
            0,
        )
        .unwrap();
        assert_eq!(report, OwnershipReport::default());
    }
}
