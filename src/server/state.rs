//! Server state and configuration.

use std::sync::Arc;

use crate::symbology::Registry;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
    /// Viewport width used when a request does not name one.
    pub viewport_width: f64,
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub registry: Arc<Registry>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            registry: Arc::new(Registry::builtin()),
        }
    }
}
