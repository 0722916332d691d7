//! `/products` route group.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};

use storefront_core::{NewProduct, Product, StorefrontError};

use super::{MemoryStore, Route, RouteGroup};
use crate::error::ApiError;

type Store = Arc<MemoryStore<Product>>;

#[derive(Default)]
pub struct ProductsRoutes {
    store: Store,
}

impl ProductsRoutes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(store: Store) -> Self {
        Self { store }
    }
}

impl RouteGroup for ProductsRoutes {
    fn name(&self) -> &'static str {
        "products"
    }

    fn prefix(&self) -> &'static str {
        "/products"
    }

    fn routes(&self) -> Vec<Route> {
        vec![
            Route::get("/", list_products, Arc::clone(&self.store)),
            Route::post("/", create_product, Arc::clone(&self.store)),
            Route::get("/:id", get_product, Arc::clone(&self.store)),
        ]
    }
}

async fn list_products(State(store): State<Store>) -> Json<Vec<Product>> {
    Json(store.list())
}

async fn create_product(
    State(store): State<Store>,
    body: Result<Json<NewProduct>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let Json(req) = body.map_err(|e| StorefrontError::BadRequest(e.body_text()))?;
    req.validate()?;

    let product = store.insert_with(|id| req.into_product(id));
    tracing::info!(product_id = product.id, price_cents = product.price_cents, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

async fn get_product(
    State(store): State<Store>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<Product>, ApiError> {
    let Path(id) = id.map_err(|e| StorefrontError::BadRequest(e.body_text()))?;
    store
        .get(id)
        .map(Json)
        .ok_or_else(|| StorefrontError::NotFound(format!("product {id}")).into())
}
