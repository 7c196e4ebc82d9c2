//! API server state

use std::sync::Arc;

use crate::store::ProductStore;

/// API server state: the injected store handle shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProductStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }
}
