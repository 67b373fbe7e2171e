//! Persisted shopping cart state for the marketplace app.
//!
//! This crate provides:
//!
//! - **Cart**: line items keyed by product id, with quantities that never drop
//!   below one (an item decremented to zero is removed)
//! - **Store**: an actor task that hydrates the cart from a key-value backend
//!   and persists every mutation before publishing it
//! - **Provider**: explicit provider/consumer access to the store
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use marketplace_cart::prelude::*;
//! use marketplace_storage::MemoryStore;
//!
//! let provider = CartProvider::mount(Arc::new(MemoryStore::new()), CartStoreConfig::default());
//! let cart = use_cart(Some(&provider))?;
//!
//! cart.ready().await?;
//! cart.add_to_cart(Product::new("x", "Backpack", "https://img/x.png", 120.0)).await?;
//! cart.increment("x").await?;
//!
//! println!("{} items, subtotal {:.2}", cart.summary().item_count, cart.summary().subtotal);
//! ```

pub mod error;
pub mod ids;

pub mod cart;
pub mod config;
pub mod provider;
pub mod store;

pub use error::CartError;
pub use ids::ProductId;

pub use cart::{Cart, CartSummary, Decrement, LineItem, Product};
pub use config::CartStoreConfig;
pub use provider::{use_cart, CartProvider};
pub use store::{CartHandle, CartLifecycle, CartStore, CartView};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::cart::{Cart, CartSummary, Decrement, LineItem, Product};
    pub use crate::config::CartStoreConfig;
    pub use crate::error::CartError;
    pub use crate::ids::ProductId;
    pub use crate::provider::{use_cart, CartProvider};
    pub use crate::store::{CartHandle, CartLifecycle, CartView};
}
