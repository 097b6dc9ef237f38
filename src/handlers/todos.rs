//! Todo handlers: list, read, create, update, delete.

use crate::error::AppError;
use crate::extractors::{JsonBody, TodoForm};
use crate::model::{Todo, TodoId, TodoView};
use crate::response::{ack, not_found};
use crate::service::RequestValidator;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};

async fn lookup(state: &AppState, id_str: &str) -> Result<Option<(TodoId, Todo)>, AppError> {
    let Some(id) = state.store.parse_id(id_str) else {
        return Ok(None);
    };
    Ok(state.store.get(&id).await?.map(|todo| (id, todo)))
}

/// GET /todos
pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let style = state.flag_style();
    let todos: Vec<TodoView> = state
        .store
        .list()
        .await?
        .into_iter()
        .map(|todo| TodoView::from_todo(todo, style))
        .collect();
    Ok(Json(todos))
}

/// GET /todos/:id
pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<Response, AppError> {
    Ok(match lookup(&state, &id_str).await? {
        Some((_, todo)) => Json(TodoView::from_todo(todo, state.flag_style())).into_response(),
        None => not_found().into_response(),
    })
}

/// POST /todos (urlencoded or multipart `title`)
pub async fn create(
    State(state): State<AppState>,
    TodoForm(form): TodoForm,
) -> Result<impl IntoResponse, AppError> {
    let payload = RequestValidator::validate_create(&form)?;
    let todo = state.store.create(&payload.title).await?;
    tracing::debug!(id = %todo.id, "todo created");
    Ok(ack())
}

/// PUT /todos/:id (JSON `{title, completed}`). An unknown id still answers `{ok: true}`.
pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    let payload = RequestValidator::validate_update(&body)?;
    match state.store.parse_id(&id_str) {
        Some(id) => state.store.update(&id, payload.into()).await?,
        None => tracing::warn!(id = %id_str, "unrecognized todo id; update skipped"),
    }
    Ok(ack())
}

/// DELETE /todos/:id. Checks existence first and answers 404 when absent.
pub async fn delete(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<Response, AppError> {
    let Some((id, _)) = lookup(&state, &id_str).await? else {
        return Ok(not_found().into_response());
    };
    state.store.delete(&id).await?;
    Ok(ack().into_response())
}
