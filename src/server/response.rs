//! Response building.
//!
//! Maps a dispatch [`Outcome`] onto a [`Response`]:
//!
//! | Outcome            | Status | Extra headers        |
//! |--------------------|--------|----------------------|
//! | `Found`            | 200    |                      |
//! | `Denied`           | 401    | `WWW-Authenticate`   |
//! | `NotFound`         | 404    |                      |
//! | `MethodNotAllowed` | 405    | `Allow: GET, HEAD`   |
//! | `Fault`            | 500    |                      |
//!
//! Every response carries exactly one `Content-Type`, `Content-Length` and
//! `Date`. HEAD responses keep the headers a GET would produce and drop the
//! body.

use bytes::{Bytes, BytesMut};
use chrono::{DateTime, Utc};
use http::header::{HeaderName, ALLOW, CONTENT_LENGTH, CONTENT_TYPE, DATE, WWW_AUTHENTICATE};
use http::{Method, StatusCode};

use crate::error::DispatchError;

use super::auth::AuthError;
use super::mime::HTML_CONTENT_TYPE;

/// Methods the interface serves.
pub const ALLOWED_METHODS: &str = "GET, HEAD";

const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

// =============================================================================
// Outcome
// =============================================================================

/// Result of dispatching one request, before it becomes a response.
#[derive(Debug)]
pub enum Outcome {
    /// The resource exists and the caller may see it
    Found {
        content_type: &'static str,
        body: Bytes,
    },

    /// Authentication failed
    Denied { reason: AuthError, challenge: String },

    /// Nothing exists at the path
    NotFound,

    /// The method is neither GET nor HEAD
    MethodNotAllowed,

    /// The store or template failed
    Fault(DispatchError),
}

impl Outcome {
    /// HTTP status this outcome maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            Outcome::Found { .. } => StatusCode::OK,
            Outcome::Denied { .. } => StatusCode::UNAUTHORIZED,
            Outcome::NotFound => StatusCode::NOT_FOUND,
            Outcome::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Outcome::Fault(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// =============================================================================
// Response
// =============================================================================

/// A complete response: status, ordered headers and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: StatusCode,
    headers: Vec<(HeaderName, String)>,
    body: Bytes,
}

impl Response {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &[(HeaderName, String)] {
        &self.headers
    }

    /// First value of header `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.as_str().eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Number of headers named `name` (case-insensitive).
    pub fn header_count(&self, name: &str) -> usize {
        self.headers
            .iter()
            .filter(|(key, _)| key.as_str().eq_ignore_ascii_case(name))
            .count()
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn into_parts(self) -> (StatusCode, Vec<(HeaderName, String)>, Bytes) {
        (self.status, self.headers, self.body)
    }

    /// Serialize as an HTTP/1.0 message: status line, headers, blank line, body.
    pub fn to_http10_bytes(&self) -> Bytes {
        let mut out = BytesMut::with_capacity(128 + self.body.len());
        out.extend_from_slice(
            format!(
                "HTTP/1.0 {} {}\r\n",
                self.status.as_u16(),
                self.status.canonical_reason().unwrap_or("Unknown")
            )
            .as_bytes(),
        );
        for (name, value) in &self.headers {
            out.extend_from_slice(format!("{}: {}\r\n", wire_name(name), value).as_bytes());
        }
        out.extend_from_slice(b"\r\n");
        out.extend_from_slice(&self.body);
        out.freeze()
    }
}

/// Canonical capitalization of a header name (`Content-Type`).
fn wire_name(name: &HeaderName) -> String {
    if *name == WWW_AUTHENTICATE {
        return "WWW-Authenticate".to_string();
    }
    name.as_str()
        .split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

// =============================================================================
// Builder
// =============================================================================

/// Build the response for `outcome`, dated now.
pub fn build_response(method: &Method, outcome: Outcome) -> Response {
    build_response_at(method, outcome, Utc::now())
}

/// Build the response for `outcome` with an explicit `Date`.
pub fn build_response_at(method: &Method, outcome: Outcome, now: DateTime<Utc>) -> Response {
    let status = outcome.status();
    let (content_type, body, extra) = match outcome {
        Outcome::Found { content_type, body } => (content_type, body, None),
        Outcome::Denied { challenge, .. } => (
            HTML_CONTENT_TYPE,
            error_page(status),
            Some((WWW_AUTHENTICATE, challenge)),
        ),
        Outcome::MethodNotAllowed => (
            HTML_CONTENT_TYPE,
            error_page(status),
            Some((ALLOW, ALLOWED_METHODS.to_string())),
        ),
        Outcome::NotFound | Outcome::Fault(_) => (HTML_CONTENT_TYPE, error_page(status), None),
    };

    let mut headers = vec![
        (CONTENT_TYPE, content_type.to_string()),
        (CONTENT_LENGTH, body.len().to_string()),
        (DATE, now.format(HTTP_DATE_FORMAT).to_string()),
    ];
    headers.extend(extra);

    let body = if *method == Method::HEAD {
        Bytes::new()
    } else {
        body
    };

    Response {
        status,
        headers,
        body,
    }
}

/// Minimal HTML document for an error status.
fn error_page(status: StatusCode) -> Bytes {
    let code = status.as_u16();
    let reason = status.canonical_reason().unwrap_or("Error");
    Bytes::from(format!(
        "<!DOCTYPE html>\n<html>\n<head><title>{code} {reason}</title></head>\n\
         <body><h1>{code} {reason}</h1></body>\n</html>\n"
    ))
}
