//! HTTP layer for the notebook.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  Transport (axum, routes, handlers)             │
//! │            HTTP request ──► Request ... Response ──► HTTP       │
//! └───────────────────────────────┬─────────────────────────────────┘
//!                                 │ handle(Request) -> Response
//!                                 ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     WwwInterface (dispatch)                     │
//! │                                                                 │
//! │  ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌────────┐  ┌──────┐ │
//! │  │ classify │─►│   auth   │─►│ resolve  │─►│ render │─►│ resp │ │
//! │  └──────────┘  └──────────┘  └──────────┘  └────────┘  └──────┘ │
//! └───────────────────────────────┬─────────────────────────────────┘
//!                                 │
//!                 ┌───────────────┴───────────────┐
//!                 ▼                               ▼
//!         DocumentStore                       Template
//! ```

pub mod auth;
pub mod classify;
pub mod dispatch;
pub mod handlers;
pub mod mime;
pub mod render;
pub mod resolve;
pub mod response;
pub mod routes;

pub use auth::{AuthError, BasicAuth, Credentials, DEFAULT_REALM};
pub use classify::{classify, ResourceRef};
pub use dispatch::{Request, WwwInterface};
pub use handlers::{www_handler, AppState};
pub use mime::{mime_for, HTML_CONTENT_TYPE};
pub use render::PageRenderer;
pub use resolve::{ContentResolver, IndexEntry, ResolvedFile, ResolvedIndex, ResolvedPage};
pub use response::{build_response, Outcome, Response};
pub use routes::{create_router, RouterConfig};
