//! Runner configuration loading

use std::path::Path;

use anyhow::Result;
use onebot_node::core::{ConfigStore, OneBotConfig};
use tracing::info;

/// Base configuration file
pub const CONFIG_FILE: &str = "config.toml";

/// Optional overrides merged on top of [`CONFIG_FILE`]
pub const LOCAL_CONFIG_FILE: &str = "config.local.toml";

/// Load `[onebot]` from the config files in `dir`, then apply env overrides.
pub fn load(dir: &Path) -> Result<OneBotConfig> {
    let mut store = ConfigStore::empty();

    for name in [CONFIG_FILE, LOCAL_CONFIG_FILE] {
        let path = dir.join(name);
        if path.exists() {
            store.merge(&ConfigStore::from_file(&path)?);
        }
    }

    let mut config: OneBotConfig = store.get()?;
    config.apply_env();

    info!("OneBot server: {}", config.base_url()?);
    if config.token().is_some() {
        info!("Access token configured");
    }

    Ok(config)
}
