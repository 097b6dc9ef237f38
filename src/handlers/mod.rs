//! HTTP handlers for todo CRUD and the health endpoints.

pub mod common;
pub mod todos;
