//! Conditional download of the master's public signing key.
//!
//! The fetch happens only when a key URL is configured AND the
//! destination file is absent; an existing key is never re-fetched. The
//! body is streamed in fixed-size chunks to a temporary sibling and
//! renamed into place, so a failed transfer never leaves a partial key
//! file behind.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{io_err, ApplyError};

/// Response bodies are streamed in chunks of this size.
const FETCH_CHUNK_SIZE: usize = 8192;

/// An unresponsive key server must not hang the commit pipeline.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Outcome of the key-fetch stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Destination file already exists; no network call made.
    AlreadyPresent,
    /// No key URL configured; no network call made.
    NotConfigured,
    /// Key downloaded to the destination.
    Fetched { bytes: u64 },
}

/// Fetch the master signing key to `dest` if needed.
pub fn fetch_master_key(dest: &Path, url: Option<&str>) -> Result<KeyOutcome, ApplyError> {
    if dest.exists() {
        return Ok(KeyOutcome::AlreadyPresent);
    }
    let Some(url) = url else {
        return Ok(KeyOutcome::NotConfigured);
    };

    let agent = ureq::AgentBuilder::new().timeout(FETCH_TIMEOUT).build();
    let response = agent
        .get(url)
        .call()
        .map_err(|source| ApplyError::KeyDownload {
            url: url.to_string(),
            source: Box::new(source),
        })?;

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }

    let tmp = PathBuf::from(format!("{}.brine.tmp", dest.display()));
    let bytes = match stream_to_file(response.into_reader(), &tmp) {
        Ok(bytes) => bytes,
        Err(source) => {
            let _ = fs::remove_file(&tmp);
            return Err(ApplyError::KeyTransfer {
                url: url.to_string(),
                source,
            });
        }
    };
    if let Err(e) = fs::rename(&tmp, dest) {
        let _ = fs::remove_file(&tmp);
        return Err(io_err(dest, e));
    }

    tracing::info!("fetched master signing key ({bytes} bytes) from {url}");
    Ok(KeyOutcome::Fetched { bytes })
}

fn stream_to_file(mut reader: impl Read, tmp: &Path) -> Result<u64, std::io::Error> {
    let mut out = File::create(tmp)?;
    let mut buf = [0u8; FETCH_CHUNK_SIZE];
    let mut total = 0u64;
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        out.write_all(&buf[..n])?;
        total += n as u64;
    }
    Ok(total)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
