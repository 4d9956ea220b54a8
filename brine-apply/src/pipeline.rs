//! Generate/apply pipeline — the canonical one-shot entrypoint.
//!
//! Stage order follows the commit flow: PKI directory, rendered config
//! file, ownership pass, key fetch ("generate"), then the service
//! transition ("apply"). An absent settings record takes the disable
//! branch: nothing is generated, the unit is stopped and the config file
//! unlinked.

use std::path::Path;

use brine_core::MinionSettings;
use brine_renderer::Renderer;

use crate::error::ApplyError;
use crate::keyfetch::{fetch_master_key, KeyOutcome};
use crate::ownership::{apply_ownership, OwnershipReport};
use crate::paths;
use crate::service::ServiceManager;
use crate::writer::{ensure_pki_dir, remove_config, write_config, WriteResult};

/// Outcome of the generate stage.
#[derive(Debug)]
pub struct GenerateReport {
    pub config: WriteResult,
    pub ownership: OwnershipReport,
    pub key: KeyOutcome,
}

/// Service transition issued by the apply stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceAction {
    Restarted,
    Stopped { removed_config: bool },
}

/// Combined outcome of one pipeline run.
#[derive(Debug)]
pub struct PipelineReport {
    /// `None` when the feature is disabled (nothing generated).
    pub generate: Option<GenerateReport>,
    pub service: ServiceAction,
}

/// Render and write the configuration file, normalize ownership, and
/// fetch the master key if needed.
pub fn generate_at(root: &Path, settings: &MinionSettings) -> Result<GenerateReport, ApplyError> {
    ensure_pki_dir(root)?;

    let renderer = Renderer::new()?;
    let text = renderer.render(settings)?;
    let config = write_config(&paths::config_file(root), &text)?;

    let ownership = apply_ownership(
        &paths::ownership_roots(root),
        &settings.user,
        paths::SALT_GID,
    )?;

    let key = fetch_master_key(
        &paths::master_sign_key(root),
        settings.master_key_url.as_deref(),
    )?;

    Ok(GenerateReport {
        config,
        ownership,
        key,
    })
}

/// Reconcile the daemon unit with the presence/absence of the record.
pub fn reconcile_at(
    root: &Path,
    present: bool,
    manager: &dyn ServiceManager,
) -> Result<ServiceAction, ApplyError> {
    if present {
        manager.restart(paths::MINION_UNIT)?;
        tracing::info!("restarted {}", paths::MINION_UNIT);
        Ok(ServiceAction::Restarted)
    } else {
        manager.stop(paths::MINION_UNIT)?;
        let removed_config = remove_config(&paths::config_file(root))?;
        tracing::info!(
            "stopped {} (config removed: {removed_config})",
            paths::MINION_UNIT
        );
        Ok(ServiceAction::Stopped { removed_config })
    }
}

/// Run generate (when the record is present) followed by the service
/// transition.
pub fn run_at(
    root: &Path,
    settings: Option<&MinionSettings>,
    manager: &dyn ServiceManager,
) -> Result<PipelineReport, ApplyError> {
    let generate = match settings {
        Some(settings) => Some(generate_at(root, settings)?),
        None => None,
    };
    let service = reconcile_at(root, settings.is_some(), manager)?;
    Ok(PipelineReport { generate, service })
}
