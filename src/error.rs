use thiserror::Error;

/// Faults reported by a document store.
///
/// A page or attachment that simply does not exist is never a `StoreError`;
/// stores report that as `Ok(None)`/`Ok(false)`. These variants are the
/// unexpected failures that end a request with a 500.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The underlying file system failed
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    /// Stored data could not be interpreted
    #[error("Corrupt data in {path}: {reason}")]
    Corrupt { path: String, reason: String },
}

impl StoreError {
    /// Build an I/O fault from a `std::io::Error`.
    pub fn io(path: impl Into<String>, err: &std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

/// Errors raised while loading or rendering a template.
#[derive(Debug, Clone, Error)]
pub enum TemplateError {
    /// Template file does not exist
    #[error("Template not found: {0}")]
    NotFound(String),

    /// Template file or resource could not be read
    #[error("Template I/O error: {0}")]
    Io(String),

    /// Template source failed to compile
    #[error("Template syntax error: {0}")]
    Syntax(String),

    /// Template failed while rendering a page
    #[error("Template render error: {0}")]
    Render(String),
}

impl From<minijinja::Error> for TemplateError {
    fn from(err: minijinja::Error) -> Self {
        match err.kind() {
            minijinja::ErrorKind::SyntaxError => TemplateError::Syntax(err.to_string()),
            _ => TemplateError::Render(err.to_string()),
        }
    }
}

/// Faults that abort a request after it passed classification and
/// authentication. Always surfaced as 500 Internal Server Error.
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    /// The document store failed
    #[error("Store fault: {0}")]
    Store(#[from] StoreError),

    /// The template collaborator failed
    #[error("Template fault: {0}")]
    Template(#[from] TemplateError),

    /// The HTTP adapter failed after dispatch
    #[error("Transport fault: {0}")]
    Transport(String),
}
