//! Cart and line item types.

use crate::cart::CartSummary;
use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// A product offered for the cart: a line item without a quantity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Product identifier.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Image URI.
    pub image_url: String,
    /// Unit price.
    pub price: f64,
}

impl Product {
    /// Create a new product.
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }
}

/// A line item in the cart.
///
/// Serializes to `{id, title, image_url, price, quantity}`, which is the
/// persisted record layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    /// Product identifier.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Image URI.
    pub image_url: String,
    /// Unit price.
    pub price: f64,
    /// Quantity, at least 1 while the item is in a cart.
    pub quantity: u32,
}

impl LineItem {
    /// Create a line item from a product with quantity 1.
    pub fn from_product(product: Product) -> Self {
        Self {
            id: product.id,
            title: product.title,
            image_url: product.image_url,
            price: product.price,
            quantity: 1,
        }
    }

    /// Set the quantity.
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Line total (price * quantity).
    pub fn total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// Result of a decrement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decrement {
    /// Quantity dropped and the item stays; carries the new quantity.
    Decremented(u32),
    /// Quantity reached zero and the item was removed.
    Removed,
    /// No item with that id.
    NotFound,
}

/// A shopping cart: line items in insertion order, unique by id.
///
/// Serializes as a bare JSON array of line items.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from stored items.
    ///
    /// Returns the cart and the number of entries that had to be dropped or
    /// merged to restore the cart invariants (see [`Cart::normalize`]).
    pub fn from_items(items: Vec<LineItem>) -> (Self, usize) {
        let mut cart = Self { items };
        let adjusted = cart.normalize();
        (cart, adjusted)
    }

    /// Add a product.
    ///
    /// An existing item has its quantity bumped by one with other fields
    /// untouched; a new item is appended with quantity 1. Returns the
    /// resulting quantity.
    pub fn add_item(&mut self, product: Product) -> u32 {
        if let Some(existing) = self.items.iter_mut().find(|i| i.id == product.id) {
            existing.quantity = existing.quantity.saturating_add(1);
            return existing.quantity;
        }

        self.items.push(LineItem::from_product(product));
        1
    }

    /// Increase an item's quantity by one.
    ///
    /// Returns the new quantity, or `None` if the id is not in the cart.
    pub fn increment(&mut self, id: &ProductId) -> Option<u32> {
        let item = self.items.iter_mut().find(|i| &i.id == id)?;
        item.quantity = item.quantity.saturating_add(1);
        Some(item.quantity)
    }

    /// Decrease an item's quantity by one, removing it at zero.
    pub fn decrement(&mut self, id: &ProductId) -> Decrement {
        let Some(index) = self.items.iter().position(|i| &i.id == id) else {
            return Decrement::NotFound;
        };

        let item = &mut self.items[index];
        item.quantity = item.quantity.saturating_sub(1);
        if item.quantity == 0 {
            self.items.remove(index);
            Decrement::Removed
        } else {
            Decrement::Decremented(item.quantity)
        }
    }

    /// Drop zero-quantity entries and merge duplicate ids.
    ///
    /// Duplicates fold into the first occurrence, summing quantities.
    /// Returns how many entries were dropped or merged.
    pub fn normalize(&mut self) -> usize {
        let before = self.items.len();
        let mut kept: Vec<LineItem> = Vec::with_capacity(before);

        for item in self.items.drain(..) {
            if item.quantity == 0 {
                continue;
            }
            if let Some(existing) = kept.iter_mut().find(|i| i.id == item.id) {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
            } else {
                kept.push(item);
            }
        }

        self.items = kept;
        before - self.items.len()
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Consume the cart, returning its items.
    pub fn into_items(self) -> Vec<LineItem> {
        self.items
    }

    /// Get an item by product id.
    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| &i.id == id)
    }

    /// Total item count (sum of quantities).
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Number of distinct items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Derived totals.
    pub fn summary(&self) -> CartSummary {
        CartSummary {
            item_count: self.item_count(),
            unique_items: self.len(),
            subtotal: self.items.iter().map(LineItem::total).sum(),
        }
    }
}
