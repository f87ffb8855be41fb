//! Configuration system.
//!
//! TOML-based configuration with typed sections. The OneBot credentials live
//! in the `[onebot]` section.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;

// ============================================================================
// Configurable Trait
// ============================================================================

/// Trait for types that can be loaded from configuration
///
/// # Example
///
/// ```ignore
/// use serde::Deserialize;
/// use onebot_node::core::config::Configurable;
///
/// #[derive(Debug, Deserialize, Default)]
/// pub struct RunnerConfig {
///     pub log_level: String,
/// }
///
/// impl Configurable for RunnerConfig {
///     const PREFIX: &'static str = "runner";
/// }
/// ```
pub trait Configurable: DeserializeOwned + Default {
    /// Configuration section prefix (corresponds to TOML section name)
    const PREFIX: &'static str;
}

// ============================================================================
// Configuration Store
// ============================================================================

/// Configuration storage with TOML support
pub struct ConfigStore {
    data: toml::Value,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::empty()
    }
}

impl ConfigStore {
    /// Create an empty configuration store
    pub fn empty() -> Self {
        Self {
            data: toml::Value::Table(Default::default()),
        }
    }

    /// Create a configuration store from a TOML string
    pub fn parse(content: &str) -> Result<Self> {
        let data: toml::Value =
            toml::from_str(content).map_err(|e| anyhow!("Failed to parse TOML: {}", e))?;
        Ok(Self { data })
    }

    /// Create a configuration store from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;

        let data: toml::Value = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse TOML in '{}': {}", path.display(), e))?;

        Ok(Self { data })
    }

    /// Get a typed configuration section
    ///
    /// If the section doesn't exist, returns the default value.
    pub fn get<C: Configurable>(&self) -> Result<C> {
        let section = self
            .data
            .get(C::PREFIX)
            .cloned()
            .unwrap_or(toml::Value::Table(Default::default()));

        debug!("Loading config section: {}", C::PREFIX);

        section
            .try_into()
            .map_err(|e| anyhow!("Failed to deserialize config section '{}': {}", C::PREFIX, e))
    }

    /// Check if a configuration section exists
    pub fn has_section(&self, prefix: &str) -> bool {
        self.data.get(prefix).is_some()
    }

    /// Merge another configuration into this one
    ///
    /// Values from `other` will override values in `self`.
    pub fn merge(&mut self, other: &ConfigStore) {
        merge_toml_values(&mut self.data, &other.data);
    }
}

/// Recursively merge TOML values
fn merge_toml_values(base: &mut toml::Value, other: &toml::Value) {
    match (base, other) {
        (toml::Value::Table(base_table), toml::Value::Table(other_table)) => {
            for (key, value) in other_table {
                if let Some(base_value) = base_table.get_mut(key) {
                    merge_toml_values(base_value, value);
                } else {
                    base_table.insert(key.clone(), value.clone());
                }
            }
        }
        (base, other) => {
            *base = other.clone();
        }
    }
}

// ============================================================================
// OneBot Credentials
// ============================================================================

/// Connection settings for the OneBot HTTP API
#[derive(Debug, Clone, serde::Deserialize)]
pub struct OneBotConfig {
    /// Base URL of the OneBot HTTP server, e.g. `http://127.0.0.1:3000`
    #[serde(default)]
    pub server: String,

    /// Sent as `Authorization: Bearer <token>` when set
    #[serde(default, alias = "accessToken")]
    pub access_token: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Overrides the default `User-Agent` header
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for OneBotConfig {
    fn default() -> Self {
        Self {
            server: String::new(),
            access_token: None,
            timeout_secs: default_timeout_secs(),
            user_agent: None,
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

impl Configurable for OneBotConfig {
    const PREFIX: &'static str = "onebot";
}

impl OneBotConfig {
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            ..Default::default()
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Parsed server URL. Only absolute http(s) URLs are accepted.
    pub fn base_url(&self) -> Result<Url> {
        if self.server.trim().is_empty() {
            bail!("`onebot.server` is not configured");
        }
        let url = Url::parse(self.server.trim())
            .with_context(|| format!("Invalid OneBot server URL '{}'", self.server))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => bail!("Unsupported OneBot server scheme '{}'", other),
        }
    }

    /// Access token, treating an empty string as absent
    pub fn token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Apply `ONEBOT_SERVER` / `ONEBOT_ACCESS_TOKEN` from the environment.
    pub fn apply_env(&mut self) {
        if let Ok(server) = std::env::var("ONEBOT_SERVER") {
            self.server = server;
        }
        if let Ok(token) = std::env::var("ONEBOT_ACCESS_TOKEN") {
            self.access_token = Some(token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, serde::Deserialize, Default, PartialEq)]
    struct TestConfig {
        #[serde(default)]
        value: String,
        #[serde(default)]
        number: i32,
    }

    impl Configurable for TestConfig {
        const PREFIX: &'static str = "test";
    }

    #[test]
    fn test_empty_config() {
        let store = ConfigStore::empty();
        let config: OneBotConfig = store.get().unwrap();
        assert_eq!(config.server, "");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.base_url().is_err());
    }

    #[test]
    fn test_parse_onebot_section() {
        let toml = r#"
            [onebot]
            server = "http://127.0.0.1:3000"
            accessToken = "secret"
        "#;

        let store = ConfigStore::parse(toml).unwrap();
        assert!(store.has_section("onebot"));
        let config: OneBotConfig = store.get().unwrap();
        assert_eq!(config.base_url().unwrap().as_str(), "http://127.0.0.1:3000/");
        assert_eq!(config.token(), Some("secret"));
    }

    #[test]
    fn test_rejects_non_http_server() {
        let config = OneBotConfig::new("ws://127.0.0.1:8080");
        assert!(config.base_url().is_err());

        let config = OneBotConfig::new("http://localhost").with_access_token("");
        assert_eq!(config.token(), None);
    }

    #[test]
    fn test_merge() {
        let toml1 = r#"
            [test]
            value = "original"
            number = 1
        "#;

        let toml2 = r#"
            [test]
            value = "overridden"
        "#;

        let mut store1 = ConfigStore::parse(toml1).unwrap();
        let store2 = ConfigStore::parse(toml2).unwrap();

        store1.merge(&store2);

        let config: TestConfig = store1.get().unwrap();
        assert_eq!(config.value, "overridden");
        assert_eq!(config.number, 1);
    }
}
