//! Shared application state.

use crate::lifecycle::ModelManager;

/// Shared application state passed to all handlers.
pub struct AppState {
    pub models: ModelManager,
}

impl AppState {
    pub fn new(models: ModelManager) -> Self {
        Self { models }
    }
}
