//! Error types for brine-apply.

use std::path::PathBuf;

use thiserror::Error;

use brine_renderer::RenderError;

/// All errors that can arise from the generate/apply stages.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// An error from the rendering engine.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The system account database could not be queried.
    #[cfg(unix)]
    #[error("failed to look up user '{user}': {source}")]
    UserLookup {
        user: String,
        #[source]
        source: nix::Error,
    },

    /// The configured user does not map to a system account.
    #[error("user '{user}' is not a known system account")]
    UnknownUser { user: String },

    /// The key request itself failed (transport error or non-2xx status).
    #[error("key download from {url} failed: {source}")]
    KeyDownload {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    /// The key response body could not be streamed to disk.
    #[error("key transfer from {url} interrupted: {source}")]
    KeyTransfer {
        url: String,
        #[source]
        source: std::io::Error,
    },

    /// The service manager reported failure for a lifecycle command.
    #[error("service manager error for unit {unit}: {message}")]
    Service { unit: String, message: String },

    /// The operation requires a unix target.
    #[error("{operation} is not supported on this platform")]
    Unsupported { operation: &'static str },
}

/// Convenience constructor for [`ApplyError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ApplyError {
    ApplyError::Io {
        path: path.into(),
        source,
    }
}
