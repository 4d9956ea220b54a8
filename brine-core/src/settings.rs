//! Domain types for the salt-minion settings record.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem
//! paths. The record is built once per invocation with every default filled
//! in, then individual fields are overridden from the configuration store.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// LogLevel
// ---------------------------------------------------------------------------

/// Console log level understood by the minion daemon.
///
/// `Garbage`, `Trace` and `Debug` are considered insecure by the daemon and
/// may log sensitive data; the default is `Warning`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Garbage,
    Trace,
    Debug,
    Info,
    #[default]
    Warning,
    Error,
    Critical,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Garbage => write!(f, "garbage"),
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warning => write!(f, "warning"),
            LogLevel::Error => write!(f, "error"),
            LogLevel::Critical => write!(f, "critical"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "garbage" => Ok(LogLevel::Garbage),
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            "critical" => Ok(LogLevel::Critical),
            other => Err(format!(
                "unknown log level '{other}'; expected one of: garbage, trace, debug, info, warning, error, critical"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// MinionSettings
// ---------------------------------------------------------------------------

/// Fully-populated settings record for the minion configuration file.
///
/// Either absent as a whole (feature disabled) or complete: the reader
/// starts from [`MinionSettings::defaults`] and overrides the fields it
/// finds in the store. Never persisted between invocations.
///
/// Invariant: `verify_master_pubkey_sign` is `true` iff `master_key_url`
/// is `Some` — the reader sets both together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinionSettings {
    /// Hash used when discovering file hashes on the master.
    pub hash_type: String,
    /// Location of the minion's own log file.
    pub log_file: PathBuf,
    pub log_level: LogLevel,
    /// Master host(s) the minion connects to, in configured order.
    pub master: Vec<String>,
    /// System account the daemon runs as.
    pub user: String,
    /// Explicit minion id; defaults to the local hostname.
    pub salt_id: String,
    /// Minutes between mine updates.
    pub mine_interval: u32,
    /// URL of the master's public signing key, when configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master_key_url: Option<String>,
    pub verify_master_pubkey_sign: bool,
}

impl MinionSettings {
    /// The documented defaults, with `salt_id` supplied by the caller
    /// (the local hostname in production, a fixed string in tests).
    pub fn defaults(salt_id: impl Into<String>) -> Self {
        MinionSettings {
            hash_type: "sha256".to_string(),
            log_file: PathBuf::from("/var/log/salt/minion"),
            log_level: LogLevel::Warning,
            master: vec!["salt".to_string()],
            user: "minion".to_string(),
            salt_id: salt_id.into(),
            mine_interval: 60,
            master_key_url: None,
            verify_master_pubkey_sign: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
