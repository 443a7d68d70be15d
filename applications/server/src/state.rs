/// Shared application state
use remix_sync::PlaylistService;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PlaylistService>,
}

impl AppState {
    pub fn new(service: Arc<PlaylistService>) -> Self {
        Self { service }
    }
}
