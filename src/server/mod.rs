//! # HTTP Server for Barcode Rendering
//!
//! Serves barcodes as SVG, PNG or JSON geometry.
//!
//! ## Usage
//!
//! ```bash
//! barpath serve --listen 0.0.0.0:8080 --viewport 600
//! ```
//!
//! ```text
//! GET  /api/formats                           registered format names
//! GET  /api/barcode.svg?value=...&format=...  SVG document
//! GET  /api/barcode.png?value=...&format=...  PNG image
//! POST /api/barcode                           JSON options → JSON frame
//! ```

mod handlers;
mod state;

pub use state::{AppState, ServerConfig};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::BarcodeError;

/// Build the router without binding a socket.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/formats", get(handlers::barcode::formats))
        .route("/api/barcode.svg", get(handlers::barcode::render_svg))
        .route("/api/barcode.png", get(handlers::barcode::render_png))
        .route("/api/barcode", post(handlers::barcode::geometry))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use barpath::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), barpath::error::BarcodeError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8080".to_string(),
///     viewport_width: 600.0,
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), BarcodeError> {
    let app_state = Arc::new(AppState::new(config.clone()));
    let app = router(app_state);

    info!(
        listen = %config.listen_addr,
        viewport = config.viewport_width,
        "barpath HTTP server starting"
    );

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            BarcodeError::Server(format!("Failed to bind to {}: {}", config.listen_addr, e))
        })?;

    axum::serve(listener, app)
        .await
        .map_err(|e| BarcodeError::Server(format!("Server error: {}", e)))?;

    Ok(())
}
