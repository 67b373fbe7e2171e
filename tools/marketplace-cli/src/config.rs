//! CLI configuration.

use anyhow::{Context, Result};
use marketplace_cart::CartStoreConfig;
use serde::{Deserialize, Serialize};

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Cart store configuration.
    #[serde(default)]
    pub cart: CartStoreConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }
}

/// Where the cart record is kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the storage file. Relative paths resolve against the working
    /// directory; unset means the per-user data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Generate a default market.toml config file.
pub fn generate_default_config() -> String {
    r#"# Marketplace cart configuration

[storage]
# Defaults to ~/.local/share/marketplace/storage.json
# path = ".market/storage.json"

[cart]
storage_key = "@GoMarketplace:products"
channel_capacity = 64
"#
    .to_string()
}
