use std::sync::Arc;

use crate::{chat::ChatBackend, ticker::FleetHandle};

/// Shared by every request handler
pub struct AppState {
    pub fleet: FleetHandle,
    pub chat: Arc<dyn ChatBackend>,
}

impl AppState {
    pub fn new(fleet: FleetHandle, chat: Arc<dyn ChatBackend>) -> Arc<Self> {
        Arc::new(Self { fleet, chat })
    }
}
