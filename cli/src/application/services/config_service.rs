//! Application service — configuration use-cases.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::config::WuwrapConfig;

/// Load configuration.
pub fn load_config(store: &impl ConfigStore) -> Result<WuwrapConfig> {
    store.load()
}

/// Set one key and persist the result. Returns the updated configuration.
///
/// # Errors
///
/// Returns an error if the key or value is invalid, or the store fails.
pub fn set_value(store: &impl ConfigStore, key: &str, value: &str) -> Result<WuwrapConfig> {
    let mut config = store.load()?;
    config.set(key, value)?;
    store.save(&config)?;
    Ok(config)
}
