use bgbridge_core::FuturesExchange;
use std::sync::Arc;

/// Shared application state accessible by all route handlers.
pub struct AppState {
    /// Exchange every trading route delegates to. Read-only after startup.
    pub exchange: Arc<dyn FuturesExchange>,
}

impl AppState {
    pub fn new(exchange: Arc<dyn FuturesExchange>) -> Self {
        Self { exchange }
    }
}
