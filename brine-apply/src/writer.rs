//! Hash-gated atomic writer for the generated configuration file.
//!
//! ## Write protocol
//!
//! 1. SHA-256 hash the rendered content.
//! 2. Hash the current on-disk file, if any → skip when identical.
//! 3. Ensure parent directories exist.
//! 4. Write to `<path>.brine.tmp`.
//! 5. Rename to the final path (atomic on POSIX).
//!
//! No hash store is kept between invocations: the comparison is always
//! against the bytes currently on disk.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::{io_err, ApplyError};
use crate::paths;

/// Outcome of the configuration-file write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written (content changed or did not previously exist).
    Written { path: PathBuf },
    /// File was skipped — rendered content matches what is on disk.
    Unchanged { path: PathBuf },
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Atomically write the rendered configuration file.
///
/// Skips the write when the on-disk content already matches, so repeated
/// runs with an unchanged record leave the file's mtime alone.
pub fn write_config(path: &Path, content: &str) -> Result<WriteResult, ApplyError> {
    let digest = sha256_hex(content.as_bytes());

    if path.exists() {
        let current = std::fs::read(path).map_err(|e| io_err(path, e))?;
        if sha256_hex(&current) == digest {
            tracing::debug!("unchanged: {}", path.display());
            return Ok(WriteResult::Unchanged {
                path: path.to_path_buf(),
            });
        }
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }

    let tmp = PathBuf::from(format!("{}.brine.tmp", path.display()));
    std::fs::write(&tmp, content).map_err(|e| io_err(&tmp, e))?;

    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }

    tracing::info!("wrote: {}", path.display());
    Ok(WriteResult::Written {
        path: path.to_path_buf(),
    })
}

/// Ensure the PKI directory tree exists. Idempotent.
pub fn ensure_pki_dir(root: &Path) -> Result<PathBuf, ApplyError> {
    let dir = paths::pki_dir(root);
    std::fs::create_dir_all(&dir).map_err(|e| io_err(&dir, e))?;
    Ok(dir)
}

/// Remove the configuration file; a missing file is success.
///
/// Returns whether a file was actually removed.
pub fn remove_config(path: &Path) -> Result<bool, ApplyError> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::info!("removed: {}", path.display());
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(io_err(path, e)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn first_write_returns_written() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("minion");
        let result = write_config(&path, "hash_type: sha256\n").unwrap();
        assert!(matches!(result, WriteResult::Written { .. }));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "hash_type: sha256\n"
        );
    }

    #[test]
    fn second_write_same_content_returns_unchanged() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("minion");
        write_config(&path, "same content").unwrap();
        let result = write_config(&path, "same content").unwrap();
        assert!(matches!(result, WriteResult::Unchanged { .. }));
    }

    #[test]
    fn changed_content_returns_written() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("minion");
        write_config(&path, "v1").unwrap();
        let result = write_config(&path, "v2").unwrap();
        assert!(matches!(result, WriteResult::Written { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "v2");
    }

    #[test]
    fn creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("etc").join("salt").join("minion");
        write_config(&path, "content").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn tmp_file_removed_after_write() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("minion");
        write_config(&path, "data").unwrap();
        let tmp_path = PathBuf::from(format!("{}.brine.tmp", path.display()));
        assert!(!tmp_path.exists(), ".brine.tmp must be cleaned up");
    }

    #[test]
    fn ensure_pki_dir_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let first = ensure_pki_dir(tmp.path()).unwrap();
        let second = ensure_pki_dir(tmp.path()).unwrap();
        assert_eq!(first, second);
        assert!(first.is_dir());
    }

    #[test]
    fn remove_config_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("minion");
        std::fs::write(&path, "x").unwrap();

        assert!(remove_config(&path).unwrap(), "file existed");
        assert!(!path.exists());
        assert!(
            !remove_config(&path).unwrap(),
            "missing file is success, not an error"
        );
    }

    #[cfg(unix)]
    #[test]
    fn failed_write_leaves_original_intact() {
        use std::os::unix::fs::PermissionsExt;

        let root = TempDir::new().unwrap();
        let readonly_dir = root.path().join("readonly");
        std::fs::create_dir_all(&readonly_dir).unwrap();

        let path = readonly_dir.join("minion");
        std::fs::write(&path, "original").unwrap();

        let mut perms = std::fs::metadata(&readonly_dir).unwrap().permissions();
        perms.set_mode(0o555);
        std::fs::set_permissions(&readonly_dir, perms).unwrap();

        let err = write_config(&path, "new content").expect_err("write into readonly dir");
        let _ = err;

        let mut perms = std::fs::metadata(&readonly_dir).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&readonly_dir, perms).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "original");
        let tmp_path = PathBuf::from(format!("{}.brine.tmp", path.display()));
        assert!(!tmp_path.exists(), ".brine.tmp should be cleaned up");
    }
}
