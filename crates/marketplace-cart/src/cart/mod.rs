//! Shopping cart module.
//!
//! Contains the cart, its line items, and derived totals.

mod cart;
mod summary;

pub use cart::{Cart, Decrement, LineItem, Product};
pub use summary::CartSummary;
