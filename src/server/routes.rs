//! Router configuration for the notebook server.
//!
//! The notebook interface does its own path classification, so the router
//! has a single fallback route that sends every request to
//! [`www_handler`](super::handlers::www_handler).
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use notebook_www::server::{create_router, RouterConfig, WwwInterface};
//! use notebook_www::store::FsNotebook;
//! use notebook_www::template::load_template;
//!
//! let notebook = FsNotebook::open("/path/to/notebook")?;
//! let interface = WwwInterface::new(notebook, load_template("Default")?);
//!
//! let router = create_router(interface, RouterConfig::new());
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, router).await?;
//! ```

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::Level;

use super::dispatch::WwwInterface;
use super::handlers::{www_handler, AppState};
use crate::store::DocumentStore;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Whether to enable request tracing
    pub enable_tracing: bool,

    /// Level at which 404 responses are logged
    pub not_found_level: Level,
}

impl RouterConfig {
    /// Create a router configuration.
    ///
    /// By default:
    /// - Tracing is enabled
    /// - 404s are logged at DEBUG
    pub fn new() -> Self {
        Self {
            enable_tracing: true,
            not_found_level: Level::DEBUG,
        }
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }

    /// Set the level at which 404 responses are logged.
    pub fn with_not_found_level(mut self, level: Level) -> Self {
        self.not_found_level = level;
        self
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the application router serving `interface`.
pub fn create_router<S>(interface: WwwInterface<S>, config: RouterConfig) -> Router
where
    S: DocumentStore + 'static,
{
    let app_state = AppState::new(interface).with_not_found_level(config.not_found_level);

    let router = Router::new()
        .fallback(www_handler::<S>)
        .with_state(app_state);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

// =============================================================================
// Tests
// =============================================================================
