//! Content types for served files.

/// Content type of rendered pages, indexes and error documents.
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=\"utf-8\"";

/// Content type for files with unknown extensions.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Content type for `filename`, from its extension.
///
/// Lookup is case-insensitive; unknown or missing extensions map to
/// [`DEFAULT_CONTENT_TYPE`].
pub fn mime_for(filename: &str) -> &'static str {
    mime_guess::from_path(filename)
        .first_raw()
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}
