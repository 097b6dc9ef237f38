//! Body extractors for the todo routes.

use crate::error::AppError;
use crate::service::CreateTodoForm;
use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde_json::Value;

/// `POST /todos` body, either `application/x-www-form-urlencoded` or `multipart/form-data`.
#[derive(Clone, Debug)]
pub struct TodoForm(pub CreateTodoForm);

#[async_trait]
impl<S> FromRequest<S> for TodoForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.trim_start().to_ascii_lowercase().starts_with("multipart/form-data"));

        let fields = if multipart {
            multipart_fields(req, state).await?
        } else {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
            pairs
        };
        Ok(TodoForm(CreateTodoForm::from_fields(fields)?))
    }
}

async fn multipart_fields<S>(req: Request, state: &S) -> Result<Vec<(String, String)>, AppError>
where
    S: Send + Sync,
{
    let mut multipart = Multipart::from_request(req, state)
        .await
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let mut fields = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        // file parts and unnamed parts carry nothing a todo uses
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        if field.file_name().is_some() {
            continue;
        }
        let value = field.text().await.map_err(|e| AppError::BadRequest(e.body_text()))?;
        fields.push((name, value));
    }
    Ok(fields)
}

/// JSON object body. Syntax and content-type failures become `bad_request` envelopes.
#[derive(Clone, Debug)]
pub struct JsonBody(pub Value);

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(JsonBody(value))
    }
}
