//! Cart error types.

use marketplace_storage::StorageError;
use thiserror::Error;

/// Errors that can occur in cart operations.
#[derive(Error, Debug)]
pub enum CartError {
    /// The cart was requested without a provider in scope.
    #[error("use_cart must be used within a CartProvider")]
    MissingProvider,

    /// Reading or writing the persisted record failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The product price is NaN or infinite and cannot be persisted.
    #[error("Invalid price for {id}: {price}")]
    InvalidPrice { id: String, price: f64 },

    /// Hydration from storage failed; the cart will not accept mutations.
    #[error("Cart hydration failed: {0}")]
    HydrationFailed(String),

    /// The store task is no longer running.
    #[error("Cart store is not running")]
    StoreClosed,
}
