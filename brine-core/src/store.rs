//! Configuration-store access.
//!
//! The device configuration tree is an external collaborator; this tool
//! only ever reads it, through three operations:
//!
//! ```text
//! exists(path)        -> bool
//! return_value(path)  -> Option<String>     (single-valued leaf)
//! return_values(path) -> Vec<String>        (multi-valued leaf, ordered)
//! ```
//!
//! Paths are space-separated node paths from the configuration root, e.g.
//! `service salt-minion log_level`.
//!
//! Two implementations: [`CliShellApi`] shells out to the platform's
//! `cli-shell-api` binary; [`MemStore`] is a deterministic in-memory store
//! for tests.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::process::{Command, Output};

use crate::error::StoreError;

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

/// Read-only view of the device configuration tree.
pub trait ConfigStore {
    /// Whether `path` exists as a node or leaf.
    fn exists(&self, path: &str) -> Result<bool, StoreError>;

    /// Value of a single-valued leaf; `None` when unset.
    fn return_value(&self, path: &str) -> Result<Option<String>, StoreError>;

    /// Values of a multi-valued leaf, in configured order; empty when unset.
    fn return_values(&self, path: &str) -> Result<Vec<String>, StoreError>;
}

// ---------------------------------------------------------------------------
// CliShellApi — live store
// ---------------------------------------------------------------------------

/// Live store backed by the `cli-shell-api` binary.
///
/// `exists` maps the documented exit codes (0 exists, 1 not) to a bool;
/// any other status is a backend error. `returnValue`/`returnValues`
/// treat a non-zero exit as "unset" since the binary exits 1 for absent
/// nodes.
#[derive(Debug, Clone)]
pub struct CliShellApi {
    binary: PathBuf,
}

impl CliShellApi {
    pub fn new() -> Self {
        Self::with_binary("cli-shell-api")
    }

    /// Point the store at an explicit binary; used by tests with a stub
    /// script.
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        CliShellApi {
            binary: binary.into(),
        }
    }

    fn describe(&self, op: &str, path: &str) -> String {
        format!("{} {op} {path}", self.binary.display())
    }

    fn invoke(&self, op: &str, path: &str) -> Result<Output, StoreError> {
        Command::new(&self.binary)
            .arg(op)
            .args(path.split_whitespace())
            .output()
            .map_err(|source| StoreError::Spawn {
                command: self.describe(op, path),
                source,
            })
    }

    fn stdout_text(&self, op: &str, path: &str, output: &Output) -> Result<String, StoreError> {
        String::from_utf8(output.stdout.clone()).map_err(|_| StoreError::Encoding {
            command: self.describe(op, path),
        })
    }
}

impl Default for CliShellApi {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for CliShellApi {
    fn exists(&self, path: &str) -> Result<bool, StoreError> {
        let output = self.invoke("exists", path)?;
        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            code => Err(StoreError::Backend {
                command: self.describe("exists", path),
                status: code.unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }),
        }
    }

    fn return_value(&self, path: &str) -> Result<Option<String>, StoreError> {
        let output = self.invoke("returnValue", path)?;
        if !output.status.success() {
            return Ok(None);
        }
        let text = self.stdout_text("returnValue", path, &output)?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            Ok(None)
        } else {
            Ok(Some(trimmed.to_string()))
        }
    }

    fn return_values(&self, path: &str) -> Result<Vec<String>, StoreError> {
        let output = self.invoke("returnValues", path)?;
        if !output.status.success() {
            return Ok(vec![]);
        }
        let text = self.stdout_text("returnValues", path, &output)?;
        Ok(parse_quoted_values(&text))
    }
}

/// Split `cli-shell-api returnValues` output into individual values.
///
/// The binary emits one line of space-separated, single-quoted tokens
/// (`'master1' 'master2'`); quoting is optional for values without spaces.
fn parse_quoted_values(raw: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for ch in raw.chars() {
        match ch {
            '\'' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    values.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }
    if has_token {
        values.push(current);
    }
    values
}

// ---------------------------------------------------------------------------
// MemStore — deterministic store for tests
// ---------------------------------------------------------------------------

/// In-memory [`ConfigStore`] with explicit contents.
///
/// A path exists when it was added as a node, holds a value, or is a
/// strict prefix of any stored path — mirroring how the live tree answers
/// `exists` for interior nodes.
#[derive(Debug, Clone, Default)]
pub struct MemStore {
    nodes: BTreeSet<String>,
    values: BTreeMap<String, Vec<String>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a single-valued leaf, replacing any previous value.
    pub fn set(&mut self, path: &str, value: impl Into<String>) -> &mut Self {
        self.values.insert(path.to_string(), vec![value.into()]);
        self
    }

    /// Append one value to a multi-valued leaf, preserving insertion order.
    pub fn push(&mut self, path: &str, value: impl Into<String>) -> &mut Self {
        self.values
            .entry(path.to_string())
            .or_default()
            .push(value.into());
        self
    }

    /// Add a valueless node (e.g. the feature root).
    pub fn add_node(&mut self, path: &str) -> &mut Self {
        self.nodes.insert(path.to_string());
        self
    }
}

impl ConfigStore for MemStore {
    fn exists(&self, path: &str) -> Result<bool, StoreError> {
        if self.nodes.contains(path) || self.values.contains_key(path) {
            return Ok(true);
        }
        let prefix = format!("{path} ");
        Ok(self.nodes.iter().any(|n| n.starts_with(&prefix))
            || self.values.keys().any(|k| k.starts_with(&prefix)))
    }

    fn return_value(&self, path: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .values
            .get(path)
            .and_then(|values| values.first())
            .cloned())
    }

    fn return_values(&self, path: &str) -> Result<Vec<String>, StoreError> {
        Ok(self.values.get(path).cloned().unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_values_parse_in_order() {
        assert_eq!(
            parse_quoted_values("'master1' 'master2'\n"),
            vec!["master1", "master2"]
        );
    }

    #[test]
    fn unquoted_and_empty_values_parse() {
        assert_eq!(parse_quoted_values("salt"), vec!["salt"]);
        assert_eq!(parse_quoted_values(""), Vec::<String>::new());
        assert_eq!(parse_quoted_values("  \n"), Vec::<String>::new());
    }

    #[test]
    fn quoted_value_keeps_embedded_space() {
        assert_eq!(parse_quoted_values("'a b' 'c'"), vec!["a b", "c"]);
    }

    #[test]
    fn mem_store_exists_covers_nodes_values_and_prefixes() {
        let mut store = MemStore::new();
        store.add_node("service salt-minion");
        store.set("service salt-minion log_level", "debug");

        assert!(store.exists("service salt-minion").unwrap());
        assert!(store.exists("service salt-minion log_level").unwrap());
        assert!(store.exists("service").unwrap(), "prefix of a stored path");
        assert!(!store.exists("service ssh").unwrap());
    }

    #[test]
    fn mem_store_values_preserve_order() {
        let mut store = MemStore::new();
        store.push("service salt-minion master", "m1");
        store.push("service salt-minion master", "m2");
        assert_eq!(
            store.return_values("service salt-minion master").unwrap(),
            vec!["m1", "m2"]
        );
        assert_eq!(
            store.return_value("service salt-minion master").unwrap(),
            Some("m1".to_string())
        );
        assert_eq!(store.return_value("service salt-minion user").unwrap(), None);
    }

    #[cfg(unix)]
    mod cli_shell_api {
        use std::os::unix::fs::PermissionsExt;

        use tempfile::TempDir;

        use super::super::*;

        fn stub_binary(dir: &TempDir, body: &str) -> PathBuf {
            let path = dir.path().join("cli-shell-api");
            std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            let mut perms = std::fs::metadata(&path).unwrap().permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&path, perms).unwrap();
            path
        }

        #[test]
        fn exists_maps_exit_codes() {
            let dir = TempDir::new().unwrap();
            // $1 is the operation; the node path follows as separate args.
            let stub = stub_binary(
                &dir,
                r#"case "$3" in salt-minion) exit 0 ;; *) exit 1 ;; esac"#,
            );
            let store = CliShellApi::with_binary(&stub);
            assert!(store.exists("service salt-minion").unwrap());
            assert!(!store.exists("service ssh").unwrap());
        }

        #[test]
        fn return_values_parses_quoted_output() {
            let dir = TempDir::new().unwrap();
            let stub = stub_binary(&dir, r#"printf "'m1' 'm2'\n""#);
            let store = CliShellApi::with_binary(&stub);
            assert_eq!(
                store.return_values("service salt-minion master").unwrap(),
                vec!["m1", "m2"]
            );
        }

        #[test]
        fn return_value_trims_and_maps_absent_to_none() {
            let dir = TempDir::new().unwrap();
            let stub = stub_binary(
                &dir,
                r#"case "$4" in log_level) printf 'debug\n' ;; *) exit 1 ;; esac"#,
            );
            let store = CliShellApi::with_binary(&stub);
            assert_eq!(
                store
                    .return_value("service salt-minion log_level")
                    .unwrap(),
                Some("debug".to_string())
            );
            assert_eq!(
                store.return_value("service salt-minion user").unwrap(),
                None
            );
        }

        #[test]
        fn missing_binary_is_a_spawn_error() {
            let store = CliShellApi::with_binary("/nonexistent/cli-shell-api");
            let err = store.exists("service salt-minion").unwrap_err();
            assert!(matches!(err, StoreError::Spawn { .. }), "got: {err:?}");
        }

        #[test]
        fn unexpected_exit_code_is_a_backend_error() {
            let dir = TempDir::new().unwrap();
            let stub = stub_binary(&dir, "echo boom >&2; exit 3");
            let store = CliShellApi::with_binary(&stub);
            let err = store.exists("service salt-minion").unwrap_err();
            match err {
                StoreError::Backend { status, stderr, .. } => {
                    assert_eq!(status, 3);
                    assert_eq!(stderr, "boom");
                }
                other => panic!("expected Backend error, got {other:?}"),
            }
        }
    }
}
