//! Health, readiness and version handlers.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthBody {
    status: &'static str,
}

#[derive(Serialize)]
pub struct ReadyBody {
    status: &'static str,
    store: &'static str,
}

pub async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

pub async fn ready(State(state): State<AppState>) -> Result<Json<ReadyBody>, (StatusCode, Json<ReadyBody>)> {
    if let Err(e) = state.store.ping().await {
        tracing::warn!(error = %e, "readiness check failed");
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadyBody {
                status: "degraded",
                store: "unavailable",
            }),
        ));
    }
    Ok(Json(ReadyBody {
        status: "ok",
        store: "ok",
    }))
}

pub async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}
