//! Route groups mounted by the bootstrapper.
//!
//! A route group owns a path prefix and a set of `(method, path, handler)`
//! triples. Handlers carry their own state, so the bootstrapper can mount any
//! group without knowing its concrete type.

pub mod products;
pub mod store;
pub mod users;

use axum::{
    handler::Handler,
    http::Method,
    routing::{self, MethodRouter},
};

pub use products::ProductsRoutes;
pub use store::MemoryStore;
pub use users::UsersRoutes;

/// One bindable route: method and path relative to the group prefix.
///
/// Only built through `get`/`post`, so the method always matches what the
/// handler serves.
pub struct Route {
    method: Method,
    path: &'static str,
    handler: MethodRouter,
}

impl Route {
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    pub(crate) fn into_parts(self) -> (Method, &'static str, MethodRouter) {
        (self.method, self.path, self.handler)
    }

    pub fn get<H, T, S>(path: &'static str, handler: H, state: S) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
        S: Clone + Send + Sync + 'static,
    {
        Self {
            method: Method::GET,
            path,
            handler: routing::get(handler).with_state(state),
        }
    }

    pub fn post<H, T, S>(path: &'static str, handler: H, state: S) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
        S: Clone + Send + Sync + 'static,
    {
        Self {
            method: Method::POST,
            path,
            handler: routing::post(handler).with_state(state),
        }
    }
}

/// A named set of routable handlers plus a prefix.
pub trait RouteGroup: Send + Sync {
    fn name(&self) -> &'static str;
    /// Mount point, e.g. `/users` (leading slash, no trailing slash).
    fn prefix(&self) -> &'static str;
    fn routes(&self) -> Vec<Route>;
}

/// Groups shipped with the service.
pub fn default_groups() -> Vec<Box<dyn RouteGroup>> {
    vec![
        Box::new(UsersRoutes::new()),
        Box::new(ProductsRoutes::new()),
    ]
}
