//! Derived cart totals.

use serde::{Deserialize, Serialize};

/// Totals derived from the cart contents.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct CartSummary {
    /// Sum of quantities across all items.
    pub item_count: u64,
    /// Number of distinct items.
    pub unique_items: usize,
    /// Sum of price * quantity.
    pub subtotal: f64,
}

impl CartSummary {
    /// Average unit price across all units in the cart.
    pub fn average_unit_price(&self) -> f64 {
        if self.item_count == 0 {
            return 0.0;
        }
        self.subtotal / self.item_count as f64
    }
}
