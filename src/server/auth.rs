//! HTTP Basic authentication.
//!
//! A [`BasicAuth`] gate is configured once with an optional credential pair.
//! Without credentials every request is allowed; with credentials every
//! request must carry
//!
//! ```text
//! Authorization: Basic base64("{username}:{password}")
//! ```
//!
//! decoding exactly to the configured pair. Comparison is constant-time.

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use subtle::ConstantTimeEq;
use thiserror::Error;

/// Realm announced in the challenge when none is configured.
pub const DEFAULT_REALM: &str = "notebook";

// =============================================================================
// Types
// =============================================================================

/// Why a request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No `Authorization` header was sent
    #[error("Missing Authorization header")]
    MissingHeader,

    /// The header uses a scheme other than `Basic`
    #[error("Unsupported authorization scheme")]
    UnsupportedScheme,

    /// The Basic token is not valid base64 `user:password`
    #[error("Malformed Basic credentials")]
    MalformedCredentials,

    /// Well-formed credentials that do not match
    #[error("Invalid credentials")]
    InvalidCredentials,
}

impl AuthError {
    /// Short machine-readable name used in log fields.
    pub fn error_type(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "missing_credentials",
            AuthError::UnsupportedScheme => "unsupported_scheme",
            AuthError::MalformedCredentials => "malformed_credentials",
            AuthError::InvalidCredentials => "invalid_credentials",
        }
    }
}

/// A user name and password pair.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Create a credential pair.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// The `Authorization` header value a client would send for this pair.
    pub fn to_header_value(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {}", token)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

// =============================================================================
// Basic Authentication
// =============================================================================

/// Optional HTTP Basic authentication gate.
#[derive(Debug, Clone)]
pub struct BasicAuth {
    credentials: Option<Credentials>,
    realm: String,
}

impl BasicAuth {
    /// Create a gate; `None` allows every request.
    pub fn new(credentials: Option<Credentials>) -> Self {
        Self {
            credentials,
            realm: DEFAULT_REALM.to_string(),
        }
    }

    /// A gate that allows every request.
    pub fn disabled() -> Self {
        Self::new(None)
    }

    /// Set the realm announced in challenges.
    pub fn with_realm(mut self, realm: impl Into<String>) -> Self {
        self.realm = realm.into();
        self
    }

    /// Whether credentials are required.
    pub fn is_enabled(&self) -> bool {
        self.credentials.is_some()
    }

    /// Realm announced in challenges.
    pub fn realm(&self) -> &str {
        &self.realm
    }

    /// Value of the `WWW-Authenticate` header for a 401 response.
    pub fn challenge(&self) -> String {
        let realm: String = self
            .realm
            .chars()
            .filter(|c| *c != '"' && *c != '\\' && !c.is_control())
            .collect();
        format!("Basic realm=\"{}\"", realm)
    }

    /// Check the value of a request's `Authorization` header.
    pub fn check(&self, authorization: Option<&str>) -> Result<(), AuthError> {
        let Some(expected) = &self.credentials else {
            return Ok(());
        };

        let header = authorization.ok_or(AuthError::MissingHeader)?.trim();
        let (scheme, token) = header
            .split_once(char::is_whitespace)
            .unwrap_or((header, ""));
        if !scheme.eq_ignore_ascii_case("Basic") {
            return Err(AuthError::UnsupportedScheme);
        }

        let decoded = STANDARD
            .decode(token.trim())
            .map_err(|_| AuthError::MalformedCredentials)?;
        let decoded = String::from_utf8(decoded).map_err(|_| AuthError::MalformedCredentials)?;
        let (username, password) = decoded
            .split_once(':')
            .ok_or(AuthError::MalformedCredentials)?;

        let user_ok = username.as_bytes().ct_eq(expected.username.as_bytes());
        let password_ok = password.as_bytes().ct_eq(expected.password.as_bytes());
        if bool::from(user_ok & password_ok) {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

impl Default for BasicAuth {
    fn default() -> Self {
        Self::disabled()
    }
}

// =============================================================================
// Tests
// =============================================================================
