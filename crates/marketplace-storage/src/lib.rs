//! Async key-value storage layer for the marketplace cart.
//!
//! Provides a small backend seam ([`KeyValueStore`]) modelled after a
//! mobile app's local storage: string values, addressed by namespaced keys,
//! read and written asynchronously. [`TypedStore`] layers JSON encoding on
//! top of any backend.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use marketplace_storage::{storage_key, MemoryStore, TypedStore};
//!
//! let store = TypedStore::new(Arc::new(MemoryStore::new()));
//! let key = storage_key!("@GoMarketplace", "products");
//!
//! store.set(&key, &items).await?;
//! let items: Option<Vec<Item>> = store.get(&key).await?;
//! ```

mod error;
mod file;
mod kv;

pub use error::StorageError;
pub use file::FileStore;
pub use kv::{KeyValueStore, MemoryStore, TypedStore};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FileStore, KeyValueStore, MemoryStore, StorageError, TypedStore};
}
