//! In-memory cart store.

use async_trait::async_trait;
use casa_core::cart::{Cart, CartItem, CartStore};
use casa_core::catalog::Product;
use casa_core::Result;
use tokio::sync::RwLock;

fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

fn recompute_total(items: &[CartItem]) -> f64 {
    round_to_cents(
        items
            .iter()
            .map(|item| item.product.price * item.quantity as f64)
            .sum(),
    )
}

/// Cart state held in process memory, guarded by an async lock.
#[derive(Default)]
pub struct InMemoryCartStore {
    cart: RwLock<Cart>,
}

impl InMemoryCartStore {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
    async fn add(&self, product: Product, quantity: u32) -> Result<()> {
        let mut cart = self.cart.write().await;
        match cart.items.iter_mut().find(|item| item.product.id == product.id) {
            Some(item) => item.quantity += quantity,
            None => cart.items.push(CartItem { product, quantity }),
        }
        cart.total = recompute_total(&cart.items);
        Ok(())
    }

    async fn remove(&self, product_id: u64) -> Result<()> {
        let mut cart = self.cart.write().await;
        cart.items.retain(|item| item.product.id != product_id);
        cart.total = recompute_total(&cart.items);
        Ok(())
    }

    async fn set_quantity(&self, product_id: u64, quantity: i64) -> Result<()> {
        let mut cart = self.cart.write().await;
        if quantity <= 0 {
            cart.items.retain(|item| item.product.id != product_id);
        } else if let Some(item) = cart
            .items
            .iter_mut()
            .find(|item| item.product.id == product_id)
        {
            item.quantity = quantity as u32;
        }
        cart.total = recompute_total(&cart.items);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut cart = self.cart.write().await;
        cart.items.clear();
        cart.total = 0.0;
        Ok(())
    }

    async fn snapshot(&self) -> Cart {
        self.cart.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casa_core::catalog::{Rating, StockStatus};

    fn product(id: u64, price: f64) -> Product {
        Product {
            id,
            name: format!("Product {id}"),
            price,
            description: String::new(),
            short_description: String::new(),
            category: "test".to_string(),
            status: StockStatus::InStock,
            specs: Vec::new(),
            image_url: String::new(),
            rating: Rating {
                rate: 4.0,
                count: 200,
            },
        }
    }

    #[tokio::test]
    async fn test_add_merges_existing_lines() {
        let store = InMemoryCartStore::new();
        store.add(product(1, 10.0), 1).await.unwrap();
        store.add(product(1, 10.0), 2).await.unwrap();

        let cart = store.snapshot().await;
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 3);
        assert_eq!(cart.total, 30.0);
        assert_eq!(cart.item_count(), 3);
    }

    #[tokio::test]
    async fn test_set_quantity_zero_or_negative_removes() {
        let store = InMemoryCartStore::new();
        store.add(product(1, 5.0), 2).await.unwrap();
        store.add(product(2, 7.0), 1).await.unwrap();

        store.set_quantity(1, 0).await.unwrap();
        assert_eq!(store.snapshot().await.items.len(), 1);

        store.set_quantity(2, -3).await.unwrap();
        let cart = store.snapshot().await;
        assert!(cart.items.is_empty());
        assert_eq!(cart.total, 0.0);
    }

    #[tokio::test]
    async fn test_total_rounds_to_cents() {
        let store = InMemoryCartStore::new();
        store.add(product(1, 0.1), 3).await.unwrap();

        // 0.1 * 3 is not exactly representable; the total is rounded
        assert_eq!(store.snapshot().await.total, 0.3);
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let store = InMemoryCartStore::new();
        store.add(product(1, 5.0), 1).await.unwrap();
        store.add(product(2, 5.0), 1).await.unwrap();

        store.remove(1).await.unwrap();
        assert_eq!(store.snapshot().await.items.len(), 1);

        store.clear().await.unwrap();
        let cart = store.snapshot().await;
        assert!(cart.items.is_empty());
        assert_eq!(cart.total, 0.0);
    }
}
