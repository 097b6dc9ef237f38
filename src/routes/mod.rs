//! Route tables and the assembled application router.

mod common;
mod todos;

pub use common::common_routes;
pub use todos::todo_routes;

use crate::state::AppState;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Health endpoints at the root, todo routes under `/api`.
pub fn app(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .nest("/api", todo_routes(state))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
}
