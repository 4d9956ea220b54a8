//! Service-manager integration.
//!
//! The daemon's lifecycle is driven through the [`ServiceManager`] trait so
//! the reconciliation logic can be exercised against a recording fake;
//! [`Systemctl`] is the live implementation.

use std::path::PathBuf;
use std::process::Command;

use crate::error::ApplyError;

/// Lifecycle operations this tool needs from the init system.
///
/// Both operations are idempotent at the unit level: restarting a stopped
/// unit starts it, stopping a stopped unit succeeds.
pub trait ServiceManager {
    fn restart(&self, unit: &str) -> Result<(), ApplyError>;
    fn stop(&self, unit: &str) -> Result<(), ApplyError>;
}

/// Live [`ServiceManager`] invoking `systemctl`.
///
/// Exit status is checked; a failed lifecycle command surfaces as
/// [`ApplyError::Service`] with the command's combined output.
#[derive(Debug, Clone)]
pub struct Systemctl {
    binary: PathBuf,
}

impl Systemctl {
    pub fn new() -> Self {
        Self::with_binary("systemctl")
    }

    /// Point at an explicit binary; used by tests with a stub script.
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Systemctl {
            binary: binary.into(),
        }
    }

    fn run(&self, verb: &str, unit: &str) -> Result<(), ApplyError> {
        let output = Command::new(&self.binary)
            .arg(verb)
            .arg(unit)
            .output()
            .map_err(|source| ApplyError::Service {
                unit: unit.to_string(),
                message: format!("failed to run {} {verb}: {source}", self.binary.display()),
            })?;

        if output.status.success() {
            return Ok(());
        }

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        Err(ApplyError::Service {
            unit: unit.to_string(),
            message: format!(
                "{} {verb} failed (status {}): {stdout} {stderr}",
                self.binary.display(),
                output.status
            ),
        })
    }
}

impl Default for Systemctl {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceManager for Systemctl {
    fn restart(&self, unit: &str) -> Result<(), ApplyError> {
        self.run("restart", unit)
    }

    fn stop(&self, unit: &str) -> Result<(), ApplyError> {
        self.run("stop", unit)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
