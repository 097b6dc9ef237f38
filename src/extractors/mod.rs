//! Request body extractors that report malformed input through [`crate::error::AppError`].

mod body;

pub use body::{JsonBody, TodoForm};
