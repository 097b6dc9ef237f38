//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {var}: '{value}' ({expected})")]
    Invalid {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Failures raised by a key-value engine.
#[derive(Error, Debug)]
pub enum KvError {
    #[error("kv backend: {0}")]
    Backend(#[from] sqlx::Error),
    #[error("kv namespace unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{field}: {message}")]
    Validation { field: String, message: String },
    #[error("todo creation failed: {0}")]
    CreationFailed(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error(transparent)]
    Kv(#[from] KvError),
    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::CreationFailed(_)
            | AppError::Db(_)
            | AppError::Kv(_)
            | AppError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "validation_error",
            AppError::CreationFailed(_) => "creation_failed",
            AppError::Conflict(_) => "conflict",
            AppError::BadRequest(_) => "bad_request",
            AppError::Db(_) => "database_error",
            AppError::Kv(_) => "kv_error",
            AppError::Serialization(_) => "serialization_error",
        }
    }
}

/// Errors seen by [`crate::client::TodoClient`].
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),
    #[error("not found")]
    NotFound,
    #[error("unexpected status {status}: {message}")]
    Status { status: u16, message: String },
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let details = match &self {
            AppError::Validation { field, .. } => Some(serde_json::json!({ "field": field })),
            _ => None,
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code().to_string(),
                message: self.to_string(),
                details,
            },
        };
        (status, Json(body)).into_response()
    }
}
