//! Error types for brine-core.

use thiserror::Error;

/// All errors that can arise from querying the configuration store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing `cli-shell-api` process could not be spawned.
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The backing process exited with a status that carries no answer
    /// (anything other than the documented exists/not-exists codes).
    #[error("{command} failed (status {status}): {stderr}")]
    Backend {
        command: String,
        status: i32,
        stderr: String,
    },

    /// The backing process produced output that was not valid UTF-8.
    #[error("{command} produced non-UTF-8 output")]
    Encoding { command: String },
}

/// All errors that can arise while materializing the settings record.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration store could not be queried.
    #[error("configuration store error: {0}")]
    Store(#[from] StoreError),

    /// A configured value does not fit its typed field.
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    /// The local hostname (the `salt_id` fallback) could not be read.
    #[cfg(unix)]
    #[error("cannot determine local hostname: {0}")]
    Hostname(nix::Error),

    /// Hostname lookup is only implemented for unix targets.
    #[cfg(not(unix))]
    #[error("hostname lookup is not supported on this platform")]
    HostnameUnsupported,
}
