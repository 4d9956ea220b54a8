//! Materialize a [`MinionSettings`] record from the configuration store.
//!
//! # API pattern
//!
//! - [`read_with_id`] — explicit `salt_id` fallback; used in tests
//! - [`read`] — derives the fallback from the local hostname, delegates
//!
//! Tests must NEVER call [`read`]; always use [`read_with_id`].

use std::path::PathBuf;

use crate::error::ConfigError;
use crate::settings::MinionSettings;
use crate::store::ConfigStore;

/// Root node of the feature's configuration subtree.
pub const ROOT: &str = "service salt-minion";

fn node(key: &str) -> String {
    format!("{ROOT} {key}")
}

/// Read the feature subtree with the local hostname as `salt_id` fallback.
///
/// Returns `Ok(None)` when the root node is absent — the feature is
/// disabled, which is not an error.
pub fn read(store: &dyn ConfigStore) -> Result<Option<MinionSettings>, ConfigError> {
    read_with_id(store, local_hostname()?)
}

/// [`read`] with an explicit `salt_id` fallback.
///
/// Starts from the full defaults table and overrides each recognized key
/// present under the root node. `master` is the only multi-valued key;
/// its order is preserved from the store. A configured `master-key` node
/// stores its URL and forces `verify_master_pubkey_sign` on.
pub fn read_with_id(
    store: &dyn ConfigStore,
    fallback_id: impl Into<String>,
) -> Result<Option<MinionSettings>, ConfigError> {
    if !store.exists(ROOT)? {
        return Ok(None);
    }

    let mut settings = MinionSettings::defaults(fallback_id);

    if let Some(value) = store.return_value(&node("hash_type"))? {
        settings.hash_type = value;
    }
    if let Some(value) = store.return_value(&node("log_file"))? {
        settings.log_file = PathBuf::from(value);
    }
    if let Some(value) = store.return_value(&node("log_level"))? {
        settings.log_level = match value.parse() {
            Ok(level) => level,
            Err(reason) => {
                return Err(ConfigError::InvalidValue {
                    key: "log_level",
                    value,
                    reason,
                })
            }
        };
    }
    if store.exists(&node("master"))? {
        settings.master = store.return_values(&node("master"))?;
    }
    if let Some(value) = store.return_value(&node("ID"))? {
        settings.salt_id = value;
    }
    if let Some(value) = store.return_value(&node("user"))? {
        settings.user = value;
    }
    if let Some(value) = store.return_value(&node("mine_interval"))? {
        settings.mine_interval = match value.parse() {
            Ok(minutes) => minutes,
            Err(err) => {
                return Err(ConfigError::InvalidValue {
                    key: "mine_interval",
                    value,
                    reason: format!("{err}"),
                })
            }
        };
    }
    if store.exists(&node("master-key"))? {
        settings.master_key_url = store.return_value(&node("master-key"))?;
        settings.verify_master_pubkey_sign = settings.master_key_url.is_some();
    }

    Ok(Some(settings))
}

#[cfg(unix)]
fn local_hostname() -> Result<String, ConfigError> {
    let name = nix::unistd::gethostname().map_err(ConfigError::Hostname)?;
    Ok(name.to_string_lossy().into_owned())
}

#[cfg(not(unix))]
fn local_hostname() -> Result<String, ConfigError> {
    Err(ConfigError::HostnameUnsupported)
}
