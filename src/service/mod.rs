//! Request validation ahead of the store.

mod validation;
pub use validation::{
    validate_title, CreateTodo, CreateTodoForm, RequestValidator, UpdateTodo, TITLE_MAX_CHARS,
    TITLE_MIN_CHARS,
};
