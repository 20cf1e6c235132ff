//! Presentation sink interface.
//!
//! Display actions need somewhere to land; the actual rendering surface is
//! out of scope, so executors hand their results to this sink and the
//! embedder decides what to do with them.

use crate::catalog::Product;
use crate::error::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Receives the results of display actions.
#[async_trait]
pub trait ViewSink: Send + Sync {
    /// A filtered product listing is ready to show.
    async fn show_products(&self, products: Vec<Product>) -> Result<()>;

    /// A single product's details are ready to show.
    async fn show_product_details(&self, product: Product) -> Result<()>;

    /// The category list is ready to show.
    async fn show_categories(&self, categories: Vec<String>) -> Result<()>;

    /// A side-by-side comparison set is ready to show.
    async fn show_comparison(&self, products: Vec<Product>) -> Result<()>;

    /// A free-form UI adjustment requested by the backend.
    async fn update_ui(&self, parameters: Map<String, Value>) -> Result<()>;
}
