//! Cart store configuration.

use marketplace_storage::storage_key;
use serde::{Deserialize, Serialize};

/// Configuration for a [`CartStore`](crate::CartStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartStoreConfig {
    /// Key of the persisted cart record.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Capacity of the mutation queue. Senders wait when it is full.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

/// The record key used by the marketplace app: `@GoMarketplace:products`.
pub fn default_storage_key() -> String {
    storage_key!("@GoMarketplace", "products")
}

fn default_channel_capacity() -> usize {
    64
}

impl Default for CartStoreConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl CartStoreConfig {
    /// Set the record key.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Set the mutation queue capacity.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }
}
