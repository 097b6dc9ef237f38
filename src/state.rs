//! Shared application state for all routes.

use crate::model::FlagStyle;
use crate::store::TodoStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TodoStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        AppState { store }
    }

    pub fn flag_style(&self) -> FlagStyle {
        self.store.backend().flag_style()
    }
}
