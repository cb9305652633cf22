//! HTTP application wiring.
//!
//! Builds the axum router and the shared state injected into handlers,
//! keeping `main` small and the router testable without a listener.
use crate::api;
use crate::store::UserStore;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub default_page_limit: u32,
    pub max_page_limit: u32,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/users",
            axum::routing::get(api::users::list_users).post(api::users::create_user),
        )
        .route("/users/:id", axum::routing::get(api::users::get_user))
        .route("/health", axum::routing::get(api::system::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
