//! Todo service: list/create/update/delete over a relational table or a key-value namespace.

pub mod client;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use client::TodoClient;
pub use config::{KvEngine, Settings, StoreKind};
pub use error::{AppError, ClientError, ConfigError, KvError};
pub use model::{Backend, Flag, Todo, TodoId, TodoPatch, TodoView};
pub use routes::{app, common_routes, todo_routes};
pub use service::RequestValidator;
pub use state::AppState;
pub use store::{open_store, ConcurrencyMode, ListFailurePolicy, TodoStore};
