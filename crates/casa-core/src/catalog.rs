//! Product catalog domain models and interface.
//!
//! The catalog itself is an external collaborator; this module owns the
//! product model, the filter semantics, and the trait the rest of the
//! pipeline consumes it through.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Stock availability, derived from demand signals when the source API
/// does not carry stock levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockStatus {
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "Low Stock")]
    LowStock,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
}

/// Aggregate product rating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub rate: f64,
    pub count: u64,
}

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub price: f64,
    pub description: String,
    pub short_description: String,
    pub category: String,
    pub status: StockStatus,
    #[serde(default)]
    pub specs: Vec<String>,
    pub image_url: String,
    pub rating: Rating,
}

/// Inclusive price bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// Filter criteria for catalog listings.
///
/// Field names match the parameter object the classification backend
/// emits for `SHOW_PRODUCTS`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    /// Product type, matched as a lowercase prefix of category or name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    /// Category, matched exactly (case-insensitive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Free-text search; every whitespace-delimited term must match name
    /// or description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Feature terms; all of them must appear in name or description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    /// Inclusive price bounds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<PriceRange>,
    /// Maximum number of results to return.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl ProductFilter {
    /// Returns true when the product satisfies every present criterion.
    ///
    /// `limit` is not a match criterion; callers apply it after filtering.
    pub fn matches(&self, product: &Product) -> bool {
        let name = product.name.to_lowercase();
        let description = product.description.to_lowercase();
        let category = product.category.to_lowercase();

        if let Some(product_type) = &self.product_type {
            let term = product_type.to_lowercase();
            if !category.starts_with(&term) && !name.starts_with(&term) {
                return false;
            }
        }

        if let Some(wanted) = &self.category {
            if category != wanted.to_lowercase() {
                return false;
            }
        }

        if let Some(search) = &self.search {
            let all_terms_match = search
                .to_lowercase()
                .split_whitespace()
                .all(|term| name.contains(term) || description.contains(term));
            if !all_terms_match {
                return false;
            }
        }

        if let Some(features) = &self.features {
            let all_features_match = features.iter().all(|feature| {
                let feature = feature.to_lowercase();
                name.contains(&feature) || description.contains(&feature)
            });
            if !all_features_match {
                return false;
            }
        }

        if let Some(range) = &self.price_range {
            if let Some(min) = range.min {
                if product.price < min {
                    return false;
                }
            }
            if let Some(max) = range.max {
                if product.price > max {
                    return false;
                }
            }
        }

        true
    }
}

/// Read access to the product catalog collaborator.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Lists products matching the filter (before any `limit`).
    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>>;

    /// Fetches a single product by id.
    async fn get(&self, id: u64) -> Result<Product>;

    /// Lists the known category names.
    async fn categories(&self) -> Result<Vec<String>>;
}
