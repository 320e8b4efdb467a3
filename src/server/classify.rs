//! Request path classification.
//!
//! Maps a raw request path onto a typed [`ResourceRef`] by prefix and suffix
//! rules, evaluated in order:
//!
//! ```text
//! /favicon.ico                 -> StaticResource("favicon.ico")
//! /+resources/<name>           -> TemplateResource(name) | StaticResource(name)
//! /+file/<page dirs>/<file>    -> Attachment { page, filename }
//! /<section>/                  -> Index(section)
//! /<page>.html                 -> Page(page)
//! anything else                -> Unresolvable
//! ```
//!
//! Classification never touches the store.

use crate::store::{is_valid_segment, PagePath, FILE_URL_PREFIX};
use crate::template::resource_segments;

/// Path of the favicon.
pub const FAVICON_PATH: &str = "/favicon.ico";

/// Prefix of template and built-in resource URLs.
pub const RESOURCE_URL_PREFIX: &str = "/+resources/";

/// What a request path refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRef {
    /// Listing of the children of a section (`/Test/`, `/`)
    Index(PagePath),

    /// A rendered page (`/Test/foo.html`)
    Page(PagePath),

    /// A file attached to a page (`/+file/Test/foo/a.pdf`)
    Attachment { page: PagePath, filename: String },

    /// A resource from the built-in set only
    StaticResource(String),

    /// A resource looked up in the template folder first, then the built-in set
    TemplateResource(String),

    /// The path does not name anything that can exist
    Unresolvable,
}

/// Classify a raw request path.
///
/// The query string is ignored and the path is percent-decoded here.
/// `template_has_resources` selects between [`ResourceRef::TemplateResource`]
/// and [`ResourceRef::StaticResource`] for `/+resources/` paths.
pub fn classify(raw_path: &str, template_has_resources: bool) -> ResourceRef {
    let raw = raw_path.split(['?', '#']).next().unwrap_or_default();
    let Ok(decoded) = urlencoding::decode(raw) else {
        return ResourceRef::Unresolvable;
    };
    let path: &str = if decoded.is_empty() { "/" } else { decoded.as_ref() };
    if !path.starts_with('/') {
        return ResourceRef::Unresolvable;
    }

    if path == FAVICON_PATH {
        return ResourceRef::StaticResource("favicon.ico".to_string());
    }

    if let Some(name) = path.strip_prefix(RESOURCE_URL_PREFIX) {
        if resource_segments(name).is_none() {
            return ResourceRef::Unresolvable;
        }
        return if template_has_resources {
            ResourceRef::TemplateResource(name.to_string())
        } else {
            ResourceRef::StaticResource(name.to_string())
        };
    }

    if let Some(rest) = path.strip_prefix(FILE_URL_PREFIX) {
        return classify_attachment(rest);
    }

    let relative = &path[1..];
    if relative.is_empty() {
        return ResourceRef::Index(PagePath::root());
    }

    if let Some(section) = relative.strip_suffix('/') {
        return match url_segments(section) {
            Some(section) if !section.is_root() => ResourceRef::Index(section),
            _ => ResourceRef::Unresolvable,
        };
    }

    if let Some(page) = relative.strip_suffix(".html") {
        return match url_segments(page) {
            Some(page) if !page.is_root() => ResourceRef::Page(page),
            _ => ResourceRef::Unresolvable,
        };
    }

    ResourceRef::Unresolvable
}

fn classify_attachment(rest: &str) -> ResourceRef {
    let (dir, filename) = rest.rsplit_once('/').unwrap_or(("", rest));
    if !is_valid_segment(filename) {
        return ResourceRef::Unresolvable;
    }
    match url_segments(dir) {
        Some(page) => ResourceRef::Attachment {
            page,
            filename: filename.to_string(),
        },
        None => ResourceRef::Unresolvable,
    }
}

/// Strict `/`-separated page path; empty is the root, empty segments are invalid.
fn url_segments(path: &str) -> Option<PagePath> {
    if path.is_empty() {
        return Some(PagePath::root());
    }
    PagePath::from_segments(path.split('/'))
}
