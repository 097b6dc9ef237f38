//! Todo record, identity and wire shapes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned identity. Integer for the relational table, UUID for the key-value store.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TodoId {
    Int(i64),
    Uuid(uuid::Uuid),
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TodoId::Int(n) => write!(f, "{}", n),
            TodoId::Uuid(u) => write!(f, "{}", u),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub completed: bool,
}

/// Fields an update may change. `None` keeps the stored value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl TodoPatch {
    pub fn is_full(&self) -> bool {
        self.title.is_some() && self.completed.is_some()
    }

    pub fn apply(self, todo: Todo) -> Todo {
        Todo {
            id: todo.id,
            title: self.title.unwrap_or(todo.title),
            completed: self.completed.unwrap_or(todo.completed),
        }
    }
}

/// Which persistence variant backs a store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    Relational,
    KeyValue,
}

impl Backend {
    pub fn flag_style(self) -> FlagStyle {
        match self {
            Backend::Relational => FlagStyle::Integer,
            Backend::KeyValue => FlagStyle::Boolean,
        }
    }
}

/// How `completed` is rendered on the wire: 0/1 for relational rows, native boolean for kv values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlagStyle {
    Integer,
    Boolean,
}

/// Completion flag as it appears in JSON: either `0`/`1` or `false`/`true`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    Bool(bool),
    Int(i64),
}

impl Flag {
    pub fn render(completed: bool, style: FlagStyle) -> Self {
        match style {
            FlagStyle::Integer => Flag::Int(i64::from(completed)),
            FlagStyle::Boolean => Flag::Bool(completed),
        }
    }

    pub fn is_set(self) -> bool {
        match self {
            Flag::Bool(b) => b,
            Flag::Int(n) => n != 0,
        }
    }
}

/// Response/request shape shared by the router and the client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoView {
    pub id: TodoId,
    pub title: String,
    pub completed: Flag,
}

impl TodoView {
    pub fn from_todo(todo: Todo, style: FlagStyle) -> Self {
        TodoView {
            id: todo.id,
            title: todo.title,
            completed: Flag::render(todo.completed, style),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub ok: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}
