//! Template collaborators.
//!
//! A template wraps rendered page fragments in a full HTML document and may
//! ship its own static resources. Two implementations exist:
//!
//! - [`BuiltinTemplate`]: the `Default` template compiled into the binary
//! - [`FileTemplate`]: an HTML file on disk plus a sibling resource folder
//!
//! Both are selected once at startup through [`load_template`] and shared
//! read-only by every request afterwards.

mod builtin;
mod file;
pub mod markup;

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use minijinja::Value;
use serde::Serialize;

use crate::error::TemplateError;
use crate::store::PagePath;

pub use builtin::{builtin_resource, BuiltinTemplate, BUILTIN_RESOURCES};
pub use file::FileTemplate;

/// Name that selects the built-in template.
pub const DEFAULT_TEMPLATE: &str = "Default";

/// Marker every bundled template places right before the page content.
pub const CONTENT_MARKER: &str = "<!-- Wiki content -->";

// =============================================================================
// Render Context
// =============================================================================

/// Page information exposed to templates as `page`.
#[derive(Debug, Clone, Serialize)]
pub struct TemplatePage {
    /// Full page name (`Test:foo`), empty for the index of the root
    pub name: String,

    /// Last segment of the page name
    pub basename: String,

    /// URL of the page itself
    pub url: String,

    /// URL of the index listing the pages below this one
    pub index_url: String,

    /// URL of the parent page, absent for top level pages
    pub parent_url: Option<String>,
}

impl TemplatePage {
    /// Describe `path` for a template.
    pub fn new(path: &PagePath) -> Self {
        let parent_url = path
            .parent()
            .filter(|parent| !parent.is_root())
            .map(|parent| parent.url());
        Self {
            name: path.name().to_string(),
            basename: path.basename().to_string(),
            url: path.url(),
            index_url: path.index_url(),
            parent_url,
        }
    }
}

/// Everything a template needs to produce one document.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Document title
    pub title: String,

    /// Rendered HTML fragment for the content slot (already escaped)
    pub content: String,

    /// Page being rendered
    pub page: TemplatePage,

    /// Display name of the notebook
    pub notebook: String,
}

impl RenderContext {
    /// Convert into a minijinja context; `content` is marked safe.
    pub(crate) fn to_value(&self) -> Value {
        minijinja::context! {
            title => &self.title,
            content => Value::from_safe_string(self.content.clone()),
            page => Value::from_serialize(&self.page),
            notebook => &self.notebook,
        }
    }
}

// =============================================================================
// Template Trait
// =============================================================================

/// A template that turns page fragments into complete HTML documents.
pub trait Template: Send + Sync {
    /// Name the template was selected by.
    fn name(&self) -> &str;

    /// Render a full document around `context.content`.
    fn render(&self, context: &RenderContext) -> Result<String, TemplateError>;

    /// Look up a resource shipped with the template, `None` if absent.
    fn resource(&self, name: &str) -> Result<Option<Bytes>, TemplateError>;

    /// Whether the template ships its own resource folder.
    fn has_resources(&self) -> bool;

    /// Convert page markup to an HTML fragment, rewriting links for `page`.
    fn format_markup(&self, page: &PagePath, markup: &str) -> String {
        markup::to_html(page, markup)
    }
}

/// Select a template by name.
///
/// `Default` (case-insensitive) selects the built-in template; anything else
/// is read as the path of an HTML template file.
pub fn load_template(name: &str) -> Result<Arc<dyn Template>, TemplateError> {
    if name.eq_ignore_ascii_case(DEFAULT_TEMPLATE) {
        return Ok(Arc::new(BuiltinTemplate::new()?));
    }
    Ok(Arc::new(FileTemplate::load(Path::new(name))?))
}

/// Validate a `/`-separated resource name, returning its segments.
pub(crate) fn resource_segments(name: &str) -> Option<Vec<&str>> {
    let segments: Vec<&str> = name.split('/').collect();
    if segments
        .iter()
        .all(|s| crate::store::is_valid_segment(s))
    {
        Some(segments)
    } else {
        None
    }
}
