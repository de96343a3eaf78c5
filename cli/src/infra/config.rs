//! Infrastructure implementation of the `ConfigStore` port.

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::application::ports::ConfigStore;
use crate::domain::config::WuwrapConfig;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "WUWRAP_CONFIG";

/// Production implementation of `ConfigStore` that uses a YAML file on disk.
pub struct YamlConfigStore;

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<WuwrapConfig> {
        let path = self.path()?;
        if !path.exists() {
            return Ok(WuwrapConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
    }

    fn save(&self, config: &WuwrapConfig) -> Result<()> {
        let path = self.path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        let content = serde_yaml::to_string(config).context("cannot serialize config")?;
        std::fs::write(&path, content)
            .with_context(|| format!("cannot write {}", path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("cannot set permissions on {}", path.display()))?;
        }
        Ok(())
    }

    fn path(&self) -> Result<PathBuf> {
        resolve_path(std::env::var_os(CONFIG_ENV), dirs::home_dir())
    }
}

/// Pick the config file location.
///
/// A non-empty `WUWRAP_CONFIG` is used as given, so a relative value is
/// relative to the working directory. Otherwise `~/.wuwrap/config.yaml`.
fn resolve_path(env_override: Option<OsString>, home: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(val) = env_override.filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(val));
    }
    let home = home.ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.join(".wuwrap").join("config.yaml"))
}
