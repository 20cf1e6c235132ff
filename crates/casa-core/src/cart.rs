//! Shopping cart domain models and interface.

use crate::catalog::Product;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One product line in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

/// The cart contents plus the precomputed total.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<CartItem>,
    /// Sum of price × quantity over all items, rounded to cents.
    pub total: f64,
}

impl Cart {
    /// Total number of units across all lines.
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

/// Mutable access to the cart state collaborator.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Adds `quantity` units of the product, merging with an existing line.
    async fn add(&self, product: Product, quantity: u32) -> Result<()>;

    /// Removes the line for the given product, if present.
    async fn remove(&self, product_id: u64) -> Result<()>;

    /// Sets the quantity for the given product.
    ///
    /// Zero or negative quantity removes the line.
    async fn set_quantity(&self, product_id: u64, quantity: i64) -> Result<()>;

    /// Empties the cart.
    async fn clear(&self) -> Result<()>;

    /// Returns a copy of the current cart contents.
    async fn snapshot(&self) -> Cart;
}
