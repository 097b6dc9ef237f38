//! Typed HTTP client for the todo routes. No retries, no caching.

use crate::error::ClientError;
use crate::model::{Flag, Message, TodoId, TodoView};
use reqwest::StatusCode;
use serde::Serialize;

#[derive(Serialize)]
struct CreateForm<'a> {
    title: &'a str,
}

#[derive(Serialize)]
struct UpdateBody<'a> {
    title: &'a str,
    completed: Flag,
}

#[derive(Clone, Debug)]
pub struct TodoClient {
    client: reqwest::Client,
    base_url: String,
}

impl TodoClient {
    /// `base_url` is the API root the todo routes are mounted on, e.g. `http://127.0.0.1:3000/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        TodoClient { client, base_url }
    }

    fn todos_url(&self) -> String {
        format!("{}/todos", self.base_url)
    }

    fn todo_url(&self, id: &TodoId) -> String {
        format!("{}/todos/{}", self.base_url, id)
    }

    pub async fn list_todos(&self) -> Result<Vec<TodoView>, ClientError> {
        let response = self.client.get(self.todos_url()).send().await?;
        Ok(expect_success(response).await?.json().await?)
    }

    /// `None` when the server answers 404.
    pub async fn get_todo(&self, id: &TodoId) -> Result<Option<TodoView>, ClientError> {
        let response = self.client.get(self.todo_url(id)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(expect_success(response).await?.json().await?))
    }

    pub async fn create_todo(&self, title: &str) -> Result<(), ClientError> {
        let response = self
            .client
            .post(self.todos_url())
            .form(&CreateForm { title })
            .send()
            .await?;
        expect_success(response).await?;
        Ok(())
    }

    pub async fn update_todo(&self, id: &TodoId, title: &str, completed: bool) -> Result<(), ClientError> {
        let response = self
            .client
            .put(self.todo_url(id))
            .json(&UpdateBody {
                title,
                completed: Flag::Bool(completed),
            })
            .send()
            .await?;
        expect_success(response).await?;
        Ok(())
    }

    /// Flip the completion flag of a todo as last seen by the caller.
    pub async fn toggle_todo(&self, todo: &TodoView) -> Result<(), ClientError> {
        self.update_todo(&todo.id, &todo.title, !todo.completed.is_set()).await
    }

    pub async fn delete_todo(&self, id: &TodoId) -> Result<(), ClientError> {
        let response = self.client.delete(self.todo_url(id)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound);
        }
        expect_success(response).await?;
        Ok(())
    }
}

async fn expect_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&text)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(String::from)
                .or_else(|| serde_json::from_value::<Message>(v).ok().map(|m| m.message))
        })
        .unwrap_or(text);
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}
