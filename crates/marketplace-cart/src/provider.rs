//! Provider/consumer access to a cart store.
//!
//! A [`CartProvider`] is mounted once per session and owns the store task.
//! Consumers take a [`CartHandle`] from it; asking for the cart without a
//! provider is a misuse and fails with [`CartError::MissingProvider`].

use std::sync::Arc;

use marketplace_storage::KeyValueStore;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::config::CartStoreConfig;
use crate::error::CartError;
use crate::store::{CartHandle, CartStore};

/// Owner of a running cart store.
pub struct CartProvider {
    handle: CartHandle,
    task: JoinHandle<()>,
}

impl CartProvider {
    /// Spawn a cart store over `storage` and start hydrating it.
    ///
    /// Must be called inside a tokio runtime.
    pub fn mount(storage: Arc<dyn KeyValueStore>, config: CartStoreConfig) -> Self {
        let (handle, task) = CartStore::spawn(storage, config);
        Self { handle, task }
    }

    /// Hand out a consumer handle.
    pub fn cart(&self) -> CartHandle {
        self.handle.clone()
    }

    /// Stop the store after already queued mutations and wait for it.
    pub async fn unmount(self) {
        self.handle.shutdown().await;
        if let Err(e) = self.task.await {
            warn!(error = %e, "cart store task ended abnormally");
        }
    }
}

/// Get the cart from the enclosing provider.
///
/// # Example
///
/// ```rust,ignore
/// let cart = use_cart(Some(&provider))?;
/// cart.add_to_cart(product).await?;
/// ```
pub fn use_cart(provider: Option<&CartProvider>) -> Result<CartHandle, CartError> {
    provider.map(CartProvider::cart).ok_or(CartError::MissingProvider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketplace_storage::MemoryStore;

    #[test]
    fn test_use_cart_without_provider() {
        let err = use_cart(None).err().unwrap();
        assert!(matches!(err, CartError::MissingProvider));
        assert_eq!(err.to_string(), "use_cart must be used within a CartProvider");
    }

    #[tokio::test]
    async fn test_use_cart_with_provider() {
        let provider = CartProvider::mount(Arc::new(MemoryStore::new()), CartStoreConfig::default());
        let cart = use_cart(Some(&provider)).unwrap();
        cart.ready().await.unwrap();
        assert!(cart.is_running());

        provider.unmount().await;
        assert!(!cart.is_running());
    }
}
