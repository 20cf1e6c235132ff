//! Built-in action executors.
//!
//! One executor per action kind in the fixed set, wired against the
//! catalog/cart/view collaborator traits. Parameters arrive as the raw
//! object the classification backend emitted and are deserialized into
//! typed parameter structs here.

use crate::dispatcher::{ActionDispatcher, ActionExecutor};
use casa_core::cart::CartStore;
use casa_core::catalog::{ProductCatalog, ProductFilter};
use casa_core::classify::ActionKind;
use casa_core::view::ViewSink;
use casa_core::{CasaError, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;

fn parse_parameters<T: for<'de> Deserialize<'de>>(parameters: &Map<String, Value>) -> Result<T> {
    serde_json::from_value(Value::Object(parameters.clone()))
        .map_err(|err| CasaError::internal(format!("Invalid action parameters: {err}")))
}

/// Builds a dispatcher with the full built-in executor set registered.
pub fn default_dispatcher(
    catalog: Arc<dyn ProductCatalog>,
    cart: Arc<dyn CartStore>,
    view: Arc<dyn ViewSink>,
) -> ActionDispatcher {
    let mut dispatcher = ActionDispatcher::new();
    dispatcher.register(
        ActionKind::ShowProducts,
        Arc::new(ShowProductsExecutor {
            catalog: catalog.clone(),
            view: view.clone(),
        }),
    );
    dispatcher.register(
        ActionKind::ShowProductDetails,
        Arc::new(ShowProductDetailsExecutor {
            catalog: catalog.clone(),
            view: view.clone(),
        }),
    );
    dispatcher.register(
        ActionKind::UpdateCart,
        Arc::new(UpdateCartExecutor {
            catalog: catalog.clone(),
            cart,
        }),
    );
    dispatcher.register(
        ActionKind::ShowCategories,
        Arc::new(ShowCategoriesExecutor {
            catalog: catalog.clone(),
            view: view.clone(),
        }),
    );
    dispatcher.register(
        ActionKind::ShowComparison,
        Arc::new(ShowComparisonExecutor {
            catalog,
            view: view.clone(),
        }),
    );
    dispatcher.register(ActionKind::UpdateUi, Arc::new(UpdateUiExecutor { view }));
    dispatcher.register(ActionKind::NoAction, Arc::new(NoActionExecutor));
    dispatcher
}

/// `SHOW_PRODUCTS`: filter the catalog and hand the listing to the view.
pub struct ShowProductsExecutor {
    pub catalog: Arc<dyn ProductCatalog>,
    pub view: Arc<dyn ViewSink>,
}

#[async_trait::async_trait]
impl ActionExecutor for ShowProductsExecutor {
    async fn run(&self, parameters: &Map<String, Value>) -> Result<()> {
        let filter: ProductFilter = parse_parameters(parameters)?;
        let mut products = self.catalog.list(&filter).await?;
        if let Some(limit) = filter.limit {
            products.truncate(limit);
        }
        tracing::debug!(target: "actions", "Showing {} filtered products", products.len());
        self.view.show_products(products).await
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductDetailsParams {
    product_id: u64,
}

/// `SHOW_PRODUCT_DETAILS`: fetch one product and hand it to the view.
pub struct ShowProductDetailsExecutor {
    pub catalog: Arc<dyn ProductCatalog>,
    pub view: Arc<dyn ViewSink>,
}

#[async_trait::async_trait]
impl ActionExecutor for ShowProductDetailsExecutor {
    async fn run(&self, parameters: &Map<String, Value>) -> Result<()> {
        let params: ProductDetailsParams = parse_parameters(parameters)?;
        let product = self.catalog.get(params.product_id).await?;
        self.view.show_product_details(product).await
    }
}

/// Cart mutation requested by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum CartOp {
    Add,
    Remove,
    #[serde(alias = "setQuantity", alias = "update")]
    SetQuantity,
    Clear,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateCartParams {
    action: CartOp,
    #[serde(default)]
    product_id: Option<u64>,
    #[serde(default)]
    quantity: Option<i64>,
}

/// `UPDATE_CART`: apply one cart mutation, resolving the product through
/// the catalog when adding.
pub struct UpdateCartExecutor {
    pub catalog: Arc<dyn ProductCatalog>,
    pub cart: Arc<dyn CartStore>,
}

impl UpdateCartExecutor {
    fn required_product_id(params: &UpdateCartParams) -> Result<u64> {
        params
            .product_id
            .ok_or_else(|| CasaError::internal("UPDATE_CART parameters missing productId"))
    }
}

#[async_trait::async_trait]
impl ActionExecutor for UpdateCartExecutor {
    async fn run(&self, parameters: &Map<String, Value>) -> Result<()> {
        let params: UpdateCartParams = parse_parameters(parameters)?;
        match params.action {
            CartOp::Add => {
                let id = Self::required_product_id(&params)?;
                let quantity = params.quantity.unwrap_or(1).max(1) as u32;
                let product = self.catalog.get(id).await?;
                self.cart.add(product, quantity).await
            }
            CartOp::Remove => {
                let id = Self::required_product_id(&params)?;
                self.cart.remove(id).await
            }
            CartOp::SetQuantity => {
                let id = Self::required_product_id(&params)?;
                let quantity = params.quantity.ok_or_else(|| {
                    CasaError::internal("UPDATE_CART set_quantity missing quantity")
                })?;
                self.cart.set_quantity(id, quantity).await
            }
            CartOp::Clear => self.cart.clear().await,
        }
    }
}

/// `SHOW_CATEGORIES`: list the category names.
pub struct ShowCategoriesExecutor {
    pub catalog: Arc<dyn ProductCatalog>,
    pub view: Arc<dyn ViewSink>,
}

#[async_trait::async_trait]
impl ActionExecutor for ShowCategoriesExecutor {
    async fn run(&self, _parameters: &Map<String, Value>) -> Result<()> {
        let categories = self.catalog.categories().await?;
        self.view.show_categories(categories).await
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComparisonParams {
    product_ids: Vec<u64>,
}

/// `SHOW_COMPARISON`: fetch the named products for a side-by-side view.
pub struct ShowComparisonExecutor {
    pub catalog: Arc<dyn ProductCatalog>,
    pub view: Arc<dyn ViewSink>,
}

#[async_trait::async_trait]
impl ActionExecutor for ShowComparisonExecutor {
    async fn run(&self, parameters: &Map<String, Value>) -> Result<()> {
        let params: ComparisonParams = parse_parameters(parameters)?;
        let mut products = Vec::with_capacity(params.product_ids.len());
        for id in params.product_ids {
            products.push(self.catalog.get(id).await?);
        }
        self.view.show_comparison(products).await
    }
}

/// `UPDATE_UI`: pass the parameters through to the view.
pub struct UpdateUiExecutor {
    pub view: Arc<dyn ViewSink>,
}

#[async_trait::async_trait]
impl ActionExecutor for UpdateUiExecutor {
    async fn run(&self, parameters: &Map<String, Value>) -> Result<()> {
        self.view.update_ui(parameters.clone()).await
    }
}

/// `NO_ACTION`: explicit no-op.
pub struct NoActionExecutor;

#[async_trait::async_trait]
impl ActionExecutor for NoActionExecutor {
    async fn run(&self, _parameters: &Map<String, Value>) -> Result<()> {
        Ok(())
    }
}
