//! Logging view sink.
//!
//! Default `ViewSink` for embedders without a rendering surface: every
//! display action becomes a structured tracing event.

use async_trait::async_trait;
use casa_core::catalog::Product;
use casa_core::view::ViewSink;
use casa_core::Result;
use serde_json::{Map, Value};

/// Renders display actions as `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingViewSink;

impl LoggingViewSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ViewSink for LoggingViewSink {
    async fn show_products(&self, products: Vec<Product>) -> Result<()> {
        tracing::info!(
            target: "view",
            count = products.len(),
            "Showing filtered products: {:?}",
            products.iter().map(|p| p.name.as_str()).collect::<Vec<_>>()
        );
        Ok(())
    }

    async fn show_product_details(&self, product: Product) -> Result<()> {
        tracing::info!(
            target: "view",
            id = product.id,
            price = product.price,
            "Showing product details: {}",
            product.name
        );
        Ok(())
    }

    async fn show_categories(&self, categories: Vec<String>) -> Result<()> {
        tracing::info!(target: "view", "Showing categories: {categories:?}");
        Ok(())
    }

    async fn show_comparison(&self, products: Vec<Product>) -> Result<()> {
        tracing::info!(
            target: "view",
            count = products.len(),
            "Showing comparison: {:?}",
            products.iter().map(|p| p.name.as_str()).collect::<Vec<_>>()
        );
        Ok(())
    }

    async fn update_ui(&self, parameters: Map<String, Value>) -> Result<()> {
        tracing::info!(target: "view", "UI update requested: {:?}", serde_json::Value::Object(parameters));
        Ok(())
    }
}
