//! `/users` route group.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};

use storefront_core::{NewUser, StorefrontError, User};

use super::{MemoryStore, Route, RouteGroup};
use crate::error::ApiError;

type Store = Arc<MemoryStore<User>>;

#[derive(Default)]
pub struct UsersRoutes {
    store: Store,
}

impl UsersRoutes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share an existing store (used by tests to inspect state).
    pub fn with_store(store: Store) -> Self {
        Self { store }
    }
}

impl RouteGroup for UsersRoutes {
    fn name(&self) -> &'static str {
        "users"
    }

    fn prefix(&self) -> &'static str {
        "/users"
    }

    fn routes(&self) -> Vec<Route> {
        vec![
            Route::get("/", list_users, Arc::clone(&self.store)),
            Route::post("/", create_user, Arc::clone(&self.store)),
            Route::get("/:id", get_user, Arc::clone(&self.store)),
        ]
    }
}

async fn list_users(State(store): State<Store>) -> Json<Vec<User>> {
    Json(store.list())
}

async fn create_user(
    State(store): State<Store>,
    body: Result<Json<NewUser>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let Json(req) = body.map_err(|e| StorefrontError::BadRequest(e.body_text()))?;
    req.validate()?;

    let user = store.insert_with(|id| req.into_user(id));
    tracing::info!(user_id = user.id, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_user(
    State(store): State<Store>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<User>, ApiError> {
    let Path(id) = id.map_err(|e| StorefrontError::BadRequest(e.body_text()))?;
    store
        .get(id)
        .map(Json)
        .ok_or_else(|| StorefrontError::NotFound(format!("user {id}")).into())
}
