//! Template context — serializable rendering payload built from
//! [`MinionSettings`].
//!
//! Every field is pre-converted to the exact text the target file carries
//! (booleans to `true`/`false`, the interval to a decimal string), so the
//! template itself stays substitution-only and is statically matched to
//! the data model.

use serde::{Deserialize, Serialize};

use brine_core::MinionSettings;

use crate::error::RenderError;

/// Flat rendering payload for the minion configuration template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateContext {
    pub hash_type: String,
    pub log_file: String,
    pub log_level: String,
    /// Master hosts in configured order; one `- <host>` line each.
    pub master: Vec<String>,
    pub user: String,
    pub salt_id: String,
    pub mine_interval: String,
    pub verify_master_pubkey_sign: String,
}

impl TemplateContext {
    /// Build a [`TemplateContext`] from a settings record.
    pub fn from_settings(settings: &MinionSettings) -> Self {
        TemplateContext {
            hash_type: settings.hash_type.clone(),
            log_file: settings.log_file.display().to_string(),
            log_level: settings.log_level.to_string(),
            master: settings.master.clone(),
            user: settings.user.clone(),
            salt_id: settings.salt_id.clone(),
            mine_interval: settings.mine_interval.to_string(),
            verify_master_pubkey_sign: settings.verify_master_pubkey_sign.to_string(),
        }
    }

    /// Convert to a [`tera::Context`] for rendering.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}
