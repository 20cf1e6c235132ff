//! Fake Store catalog client.
//!
//! `ProductCatalog` implementation over the Fake Store-style REST API.
//! The API has no server-side filtering beyond categories, so listings
//! are fetched whole and filtered client-side with
//! [`ProductFilter::matches`].

use async_trait::async_trait;
use casa_core::catalog::{Product, ProductCatalog, ProductFilter, Rating, StockStatus};
use casa_core::{CasaError, Result};
use reqwest::Client;
use serde::Deserialize;

/// Default public Fake Store API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://fakestoreapi.com";

/// Product shape as served by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiProduct {
    pub id: u64,
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category: String,
    pub image: String,
    pub rating: Rating,
}

/// Converts an API product to the domain model.
///
/// Stock status is derived from the rating count (the API carries no
/// stock levels); the short description is the first sentence.
pub fn convert_api_product(api: ApiProduct) -> Product {
    let status = if api.rating.count > 100 {
        StockStatus::InStock
    } else if api.rating.count > 20 {
        StockStatus::LowStock
    } else {
        StockStatus::OutOfStock
    };

    let short_description = match api.description.split('.').next() {
        Some(sentence) if !sentence.is_empty() => format!("{sentence}."),
        _ => api.description.clone(),
    };

    Product {
        id: api.id,
        name: api.title,
        price: api.price,
        description: api.description,
        short_description,
        category: api.category,
        status,
        specs: Vec::new(),
        image_url: api.image,
        rating: api.rating,
    }
}

/// HTTP catalog client.
#[derive(Clone)]
pub struct FakeStoreCatalog {
    client: Client,
    base_url: String,
}

impl FakeStoreCatalog {
    /// Creates a client against the public endpoint.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a client against a custom endpoint.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn fetch_all(&self) -> Result<Vec<ApiProduct>> {
        let response = self
            .client
            .get(format!("{}/products", self.base_url))
            .send()
            .await
            .map_err(|err| CasaError::catalog(format!("Failed to fetch products: {err}")))?;

        if !response.status().is_success() {
            return Err(CasaError::catalog(format!(
                "Product listing returned status {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|err| CasaError::catalog(format!("Failed to parse products: {err}")))
    }
}

impl Default for FakeStoreCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductCatalog for FakeStoreCatalog {
    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>> {
        let products = self.fetch_all().await?;
        Ok(products
            .into_iter()
            .map(convert_api_product)
            .filter(|product| filter.matches(product))
            .collect())
    }

    async fn get(&self, id: u64) -> Result<Product> {
        let response = self
            .client
            .get(format!("{}/products/{id}", self.base_url))
            .send()
            .await
            .map_err(|err| CasaError::catalog(format!("Failed to fetch product {id}: {err}")))?;

        if response.status().as_u16() == 404 {
            return Err(CasaError::not_found("product", id.to_string()));
        }
        if !response.status().is_success() {
            return Err(CasaError::catalog(format!(
                "Product {id} returned status {}",
                response.status()
            )));
        }

        let api: ApiProduct = response
            .json()
            .await
            .map_err(|err| CasaError::catalog(format!("Failed to parse product {id}: {err}")))?;
        Ok(convert_api_product(api))
    }

    async fn categories(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .get(format!("{}/products/categories", self.base_url))
            .send()
            .await
            .map_err(|err| CasaError::catalog(format!("Failed to fetch categories: {err}")))?;

        if !response.status().is_success() {
            return Err(CasaError::catalog(format!(
                "Categories returned status {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|err| CasaError::catalog(format!("Failed to parse categories: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_product(count: u64) -> ApiProduct {
        ApiProduct {
            id: 7,
            title: "Mens Cotton Jacket".to_string(),
            price: 55.99,
            description: "Great outerwear jackets. Suitable for many occasions.".to_string(),
            category: "men's clothing".to_string(),
            image: "https://example.com/jacket.png".to_string(),
            rating: Rating { rate: 4.7, count },
        }
    }

    #[test]
    fn test_stock_status_thresholds() {
        assert_eq!(convert_api_product(api_product(101)).status, StockStatus::InStock);
        assert_eq!(convert_api_product(api_product(100)).status, StockStatus::LowStock);
        assert_eq!(convert_api_product(api_product(21)).status, StockStatus::LowStock);
        assert_eq!(convert_api_product(api_product(20)).status, StockStatus::OutOfStock);
    }

    #[test]
    fn test_short_description_is_first_sentence() {
        let product = convert_api_product(api_product(150));
        assert_eq!(product.short_description, "Great outerwear jackets.");
        assert_eq!(product.name, "Mens Cotton Jacket");
    }
}
