//! Payload validation. Runs before any store access.

use crate::error::AppError;
use crate::model::{Flag, TodoPatch};
use serde_json::Value;

pub const TITLE_MIN_CHARS: usize = 1;
pub const TITLE_MAX_CHARS: usize = 100;

/// Form body of `POST /todos`. Fields are optional so missing ones surface as validation errors.
#[derive(Clone, Debug, Default)]
pub struct CreateTodoForm {
    pub title: Option<String>,
    /// Accepted for schema parity; new todos always start not completed.
    pub completed: Option<String>,
}

impl CreateTodoForm {
    /// Collect name/value pairs from a urlencoded or multipart body. Unknown names are ignored.
    pub fn from_fields<I>(fields: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut form = CreateTodoForm::default();
        for (name, value) in fields {
            let slot = match name.as_str() {
                "title" => &mut form.title,
                "completed" => &mut form.completed,
                _ => continue,
            };
            if slot.is_some() {
                return Err(AppError::validation(&name, format!("{} must be given once", name)));
            }
            *slot = Some(value);
        }
        Ok(form)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateTodo {
    pub title: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateTodo {
    pub title: String,
    pub completed: bool,
}

impl From<UpdateTodo> for TodoPatch {
    fn from(u: UpdateTodo) -> Self {
        TodoPatch {
            title: Some(u.title),
            completed: Some(u.completed),
        }
    }
}

pub struct RequestValidator;

impl RequestValidator {
    pub fn validate_create(form: &CreateTodoForm) -> Result<CreateTodo, AppError> {
        let title = form
            .title
            .as_deref()
            .ok_or_else(|| AppError::validation("title", "title is required"))?;
        validate_title(title)?;
        Ok(CreateTodo {
            title: title.to_string(),
        })
    }

    /// Full replacement: both `title` and `completed` must be present.
    pub fn validate_update(body: &Value) -> Result<UpdateTodo, AppError> {
        let obj = body
            .as_object()
            .ok_or_else(|| AppError::validation("body", "body must be a JSON object"))?;
        let title = match obj.get("title") {
            None | Some(Value::Null) => return Err(AppError::validation("title", "title is required")),
            Some(v) => title_value(v)?,
        };
        let completed = match obj.get("completed") {
            None | Some(Value::Null) => {
                return Err(AppError::validation("completed", "completed is required"))
            }
            Some(v) => completed_value(v)?,
        };
        Ok(UpdateTodo { title, completed })
    }

    /// Partial patch for the key-value store: every field optional, present fields checked.
    pub fn validate_patch(body: &Value) -> Result<TodoPatch, AppError> {
        let obj = body
            .as_object()
            .ok_or_else(|| AppError::validation("body", "body must be a JSON object"))?;
        let title = match obj.get("title") {
            None | Some(Value::Null) => None,
            Some(v) => Some(title_value(v)?),
        };
        let completed = match obj.get("completed") {
            None | Some(Value::Null) => None,
            Some(v) => Some(completed_value(v)?),
        };
        Ok(TodoPatch { title, completed })
    }
}

pub fn validate_title(title: &str) -> Result<(), AppError> {
    let n = title.chars().count();
    if n < TITLE_MIN_CHARS {
        return Err(AppError::validation(
            "title",
            format!("title must be at least {} characters", TITLE_MIN_CHARS),
        ));
    }
    if n > TITLE_MAX_CHARS {
        return Err(AppError::validation(
            "title",
            format!("title must be at most {} characters", TITLE_MAX_CHARS),
        ));
    }
    Ok(())
}

fn title_value(v: &Value) -> Result<String, AppError> {
    let s = v
        .as_str()
        .ok_or_else(|| AppError::validation("title", "title must be a string"))?;
    validate_title(s)?;
    Ok(s.to_string())
}

fn completed_value(v: &Value) -> Result<bool, AppError> {
    match serde_json::from_value::<Flag>(v.clone()) {
        Ok(Flag::Bool(b)) => Ok(b),
        Ok(Flag::Int(n @ (0 | 1))) => Ok(n == 1),
        _ => Err(AppError::validation("completed", "completed must be a boolean or 0/1")),
    }
}
