//! Response bodies for the todo routes.

use crate::model::{Ack, Message};
use axum::{http::StatusCode, response::IntoResponse, Json};

/// `200 {"ok": true}`.
pub fn ack() -> (StatusCode, Json<Ack>) {
    (StatusCode::OK, Json(Ack { ok: true }))
}

/// `404 {"message": "not found"}`, the bare shape the delete and read routes answer with.
pub fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(Message {
            message: "not found".into(),
        }),
    )
}
