//! Axum adapter for the notebook interface.
//!
//! Every inbound request goes to [`www_handler`], which converts it into a
//! [`Request`], dispatches it on the blocking thread pool (store lookups are
//! synchronous file system reads), logs the outcome and converts the
//! [`WwwResponse`] back into an axum response.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Method},
    response::{IntoResponse, Response},
};
use tracing::{debug, error, info, trace, warn, Level, Span};

use crate::error::DispatchError;
use crate::store::DocumentStore;

use super::auth::AuthError;
use super::dispatch::{Request, WwwInterface};
use super::response::{build_response, Outcome, Response as WwwResponse};

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the notebook interface.
pub struct AppState<S: DocumentStore> {
    /// The interface answering every request
    pub interface: Arc<WwwInterface<S>>,

    /// Level at which 404 responses are logged
    pub not_found_level: Level,
}

impl<S: DocumentStore> AppState<S> {
    /// Create application state; 404s are logged at DEBUG.
    pub fn new(interface: WwwInterface<S>) -> Self {
        Self {
            interface: Arc::new(interface),
            not_found_level: Level::DEBUG,
        }
    }

    /// Set the level at which 404 responses are logged.
    pub fn with_not_found_level(mut self, level: Level) -> Self {
        self.not_found_level = level;
        self
    }
}

impl<S: DocumentStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            interface: Arc::clone(&self.interface),
            not_found_level: self.not_found_level,
        }
    }
}

// =============================================================================
// Handler
// =============================================================================

/// Serve any request through the notebook interface.
///
/// # Response
///
/// - `200 OK`: page, index, attachment or resource
/// - `401 Unauthorized`: credentials required, with `WWW-Authenticate`
/// - `404 Not Found`: nothing exists at the path
/// - `405 Method Not Allowed`: method other than GET or HEAD
/// - `500 Internal Server Error`: store or template fault
pub async fn www_handler<S: DocumentStore + 'static>(
    State(state): State<AppState<S>>,
    request: axum::extract::Request,
) -> Response {
    let request = to_www_request(request);
    let method = request.method.clone();
    let interface = Arc::clone(&state.interface);
    let not_found_level = state.not_found_level;
    let span = Span::current();

    let result = tokio::task::spawn_blocking(move || {
        span.in_scope(|| {
            let outcome = interface.dispatch(&request);
            log_outcome(&request, &outcome, not_found_level);
            build_response(&request.method, outcome)
        })
    })
    .await;

    match result {
        Ok(response) => into_axum_response(&method, response),
        Err(e) => {
            error!(
                error_type = "task_failed",
                status = 500,
                "Request task failed: {}",
                e
            );
            fault_response(&method, format!("request task failed: {}", e))
        }
    }
}

fn to_www_request(request: axum::extract::Request) -> Request {
    let (parts, _body) = request.into_parts();
    let path = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());
    let authorization = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    Request {
        method: parts.method,
        path,
        authorization,
    }
}

fn into_axum_response(method: &Method, response: WwwResponse) -> Response {
    let (status, headers, body) = response.into_parts();
    let mut builder = Response::builder().status(status);
    for (name, value) in headers {
        builder = builder.header(name, value);
    }

    match builder.body(Body::from(body)) {
        Ok(response) => response,
        Err(e) => {
            error!(
                error_type = "invalid_response",
                status = 500,
                "Failed to build response: {}",
                e
            );
            fault_response(method, format!("invalid response: {}", e))
        }
    }
}

/// A 500 built by the core response builder, for failures after dispatch.
///
/// Headers that are not valid header values are skipped; the builder only
/// emits ASCII for faults.
fn fault_response(method: &Method, message: String) -> Response {
    let fault = Outcome::Fault(DispatchError::Transport(message));
    let (status, headers, body) = build_response(method, fault).into_parts();

    let mut response = Body::from(body).into_response();
    *response.status_mut() = status;
    for (name, value) in headers {
        if let Ok(value) = HeaderValue::from_str(&value) {
            response.headers_mut().append(name, value);
        }
    }
    response
}

// =============================================================================
// Logging
// =============================================================================

/// Log a dispatch outcome at a level chosen by its status.
///
/// - 5xx at ERROR
/// - wrong credentials at WARN, other 401s at DEBUG
/// - 404 at `not_found_level`
/// - everything else at DEBUG
fn log_outcome(request: &Request, outcome: &Outcome, not_found_level: Level) {
    let status = outcome.status().as_u16();
    let method = request.method.as_str();
    let path = request.path.as_str();

    match outcome {
        Outcome::Fault(err) => {
            error!(
                error_type = "dispatch_fault",
                status,
                method,
                path,
                "Server error: {}",
                err
            );
        }
        Outcome::Denied {
            reason: AuthError::InvalidCredentials,
            ..
        } => {
            warn!(
                error_type = AuthError::InvalidCredentials.error_type(),
                status, method, path, "Authentication failed"
            );
        }
        Outcome::Denied { reason, .. } => {
            debug!(
                error_type = reason.error_type(),
                status,
                method,
                path,
                "Authentication required: {}",
                reason
            );
        }
        Outcome::NotFound => log_not_found(not_found_level, method, path),
        Outcome::MethodNotAllowed => {
            warn!(status, method, path, "Method not allowed");
        }
        Outcome::Found { content_type, body } => {
            debug!(
                status,
                method,
                path,
                content_type = *content_type,
                bytes = body.len(),
                "Served"
            );
        }
    }
}

fn log_not_found(level: Level, method: &str, path: &str) {
    let status = 404u16;
    if level == Level::ERROR {
        error!(status, method, path, "Resource not found");
    } else if level == Level::WARN {
        warn!(status, method, path, "Resource not found");
    } else if level == Level::INFO {
        info!(status, method, path, "Resource not found");
    } else if level == Level::DEBUG {
        debug!(status, method, path, "Resource not found");
    } else {
        trace!(status, method, path, "Resource not found");
    }
}

// =============================================================================
// Tests
// =============================================================================
