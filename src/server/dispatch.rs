//! Request dispatch.
//!
//! ```text
//! Request ──► classify ──► authenticate ──► method check ──► resolve ──► render
//!                               │                │              │           │
//!                               ▼                ▼              ▼           ▼
//!                             401              405         404 / 500     200 / 500
//! ```
//!
//! [`WwwInterface`] holds only immutable configuration, so a single instance
//! can serve any number of concurrent requests.

use std::sync::Arc;

use bytes::Bytes;
use http::Method;

use crate::error::DispatchError;
use crate::store::DocumentStore;
use crate::template::Template;

use super::auth::{BasicAuth, Credentials};
use super::classify::{classify, ResourceRef};
use super::mime::HTML_CONTENT_TYPE;
use super::render::PageRenderer;
use super::resolve::{ContentResolver, ResolvedFile};
use super::response::{build_response, Outcome, Response};

// =============================================================================
// Request
// =============================================================================

/// The parts of an inbound HTTP request the interface looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,

    /// Raw request path, possibly percent-encoded and with a query string
    pub path: String,

    /// Value of the `Authorization` header
    pub authorization: Option<String>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            authorization: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn head(path: impl Into<String>) -> Self {
        Self::new(Method::HEAD, path)
    }

    pub fn with_authorization(mut self, value: impl Into<String>) -> Self {
        self.authorization = Some(value.into());
        self
    }
}

// =============================================================================
// Interface
// =============================================================================

/// Serves a notebook over HTTP.
pub struct WwwInterface<S> {
    store: S,
    template: Arc<dyn Template>,
    auth: BasicAuth,
    notebook_name: String,
}

impl<S: DocumentStore> WwwInterface<S> {
    /// Create an interface without authentication.
    pub fn new(store: S, template: Arc<dyn Template>) -> Self {
        Self {
            store,
            template,
            auth: BasicAuth::disabled(),
            notebook_name: String::new(),
        }
    }

    /// Require these credentials on every request (`None` disables the gate).
    pub fn with_credentials(mut self, credentials: Option<Credentials>) -> Self {
        let realm = self.auth.realm().to_string();
        self.auth = BasicAuth::new(credentials).with_realm(realm);
        self
    }

    /// Set the realm announced in 401 challenges.
    pub fn with_realm(mut self, realm: impl Into<String>) -> Self {
        self.auth = self.auth.with_realm(realm);
        self
    }

    /// Set the notebook name shown by templates.
    pub fn with_notebook_name(mut self, name: impl Into<String>) -> Self {
        self.notebook_name = name.into();
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn template(&self) -> &dyn Template {
        self.template.as_ref()
    }

    pub fn auth(&self) -> &BasicAuth {
        &self.auth
    }

    /// Handle one request end to end.
    pub fn handle(&self, request: &Request) -> Response {
        build_response(&request.method, self.dispatch(request))
    }

    /// Decide the outcome of a request without building the response.
    ///
    /// Denied and disallowed requests never reach the store.
    pub fn dispatch(&self, request: &Request) -> Outcome {
        let reference = classify(&request.path, self.template.has_resources());

        if let Err(reason) = self.auth.check(request.authorization.as_deref()) {
            return Outcome::Denied {
                reason,
                challenge: self.auth.challenge(),
            };
        }

        if request.method != Method::GET && request.method != Method::HEAD {
            return Outcome::MethodNotAllowed;
        }

        match self.serve(reference) {
            Ok(Some(outcome)) => outcome,
            Ok(None) => Outcome::NotFound,
            Err(err) => Outcome::Fault(err),
        }
    }

    fn serve(&self, reference: ResourceRef) -> Result<Option<Outcome>, DispatchError> {
        let resolver = ContentResolver::new(&self.store, self.template.as_ref());
        let renderer = PageRenderer::new(self.template.as_ref(), &self.notebook_name);

        let outcome = match reference {
            ResourceRef::Index(section) => match resolver.resolve_index(&section)? {
                Some(index) => Some(html(renderer.render_index(&index)?)),
                None => None,
            },
            ResourceRef::Page(path) => match resolver.resolve_page(&path)? {
                Some(page) => Some(html(renderer.render_page(&page)?)),
                None => None,
            },
            ResourceRef::Attachment { page, filename } => resolver
                .resolve_attachment(&page, &filename)?
                .map(file),
            ResourceRef::StaticResource(name) => resolver.resolve_static(&name, false)?.map(file),
            ResourceRef::TemplateResource(name) => resolver.resolve_static(&name, true)?.map(file),
            ResourceRef::Unresolvable => None,
        };
        Ok(outcome)
    }
}

fn html(document: String) -> Outcome {
    Outcome::Found {
        content_type: HTML_CONTENT_TYPE,
        body: Bytes::from(document),
    }
}

fn file(resolved: ResolvedFile) -> Outcome {
    Outcome::Found {
        content_type: resolved.content_type,
        body: resolved.data,
    }
}
