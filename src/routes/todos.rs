//! Todo CRUD routes.

use crate::handlers::todos::{create, delete, list, read, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn todo_routes(state: AppState) -> Router {
    Router::new()
        .route("/todos", get(list).post(create))
        .route("/todos/:id", get(read).put(update).delete(delete))
        .with_state(state)
}
