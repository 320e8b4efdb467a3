//! Document store abstraction.
//!
//! The HTTP layer never touches storage directly. Everything it needs from a
//! notebook goes through the [`DocumentStore`] trait:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         Content Resolver (server)       │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │          DocumentStore Trait            │
//! │  (pages, children, attachments)         │
//! └────────────────────┬────────────────────┘
//!                      │
//!          ┌───────────┴───────────┐
//!          ▼                       ▼
//! ┌─────────────────┐    ┌─────────────────────┐
//! │   FsNotebook    │    │   test doubles      │
//! │ (directory tree)│    │  (in-memory)        │
//! └─────────────────┘    └─────────────────────┘
//! ```
//!
//! Lookups distinguish a *miss* (`Ok(None)`, `Ok(false)`, empty listings)
//! from a *fault* (`Err(StoreError)`). Only faults abort a request.

mod fs;
mod path;

use bytes::Bytes;

use crate::error::StoreError;

pub use fs::FsNotebook;
pub use path::{is_valid_segment, PagePath, FILE_URL_PREFIX, PAGE_SEPARATOR};

/// File extension of page source files inside a page's folder.
///
/// Attachment listings contain these files for every sub-page; the resolver
/// uses the extension to tell them apart from real attachments.
pub const PAGE_FILE_EXTENSION: &str = "txt";

// =============================================================================
// Store Types
// =============================================================================

/// Source content of a single page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent {
    /// Page this content belongs to
    pub path: PagePath,

    /// Header fields from the top of the page file (`Content-Type`, ...)
    pub headers: Vec<(String, String)>,

    /// Wiki markup body
    pub body: String,
}

impl PageContent {
    /// Split raw page source into its header block and body.
    ///
    /// The header block is a run of `Key: value` lines at the very top of
    /// the file, terminated by a blank line. Sources without such a block are
    /// treated as all body.
    pub fn parse(path: PagePath, source: &str) -> Self {
        let mut headers = Vec::new();
        let mut offset = 0;
        let mut terminated = false;

        for line in source.split_inclusive('\n') {
            let trimmed = line.trim_end_matches(['\r', '\n']);
            if trimmed.is_empty() {
                offset += line.len();
                terminated = !headers.is_empty();
                break;
            }
            match parse_header_line(trimmed) {
                Some(field) => {
                    headers.push(field);
                    offset += line.len();
                }
                None => break,
            }
        }

        // A header block only counts when a blank line closes it
        if !terminated {
            return Self {
                path,
                headers: Vec::new(),
                body: source.to_string(),
            };
        }

        Self {
            path,
            headers,
            body: source[offset..].to_string(),
        }
    }

    /// Look up a header field by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

fn parse_header_line(line: &str) -> Option<(String, String)> {
    let (key, value) = line.split_once(':')?;
    let valid_key = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid_key {
        return None;
    }
    Some((key.to_string(), value.trim().to_string()))
}

/// A direct child page as listed by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildPage {
    /// Last segment of the child's page name
    pub name: String,

    /// Whether the child has children of its own
    pub has_children: bool,
}

/// One raw entry of a page's attachment folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentEntry {
    /// File or directory name
    pub name: String,

    /// Size in bytes (0 for directories)
    pub size: u64,

    /// Whether the entry is a directory
    pub is_dir: bool,
}

// =============================================================================
// DocumentStore Trait
// =============================================================================

/// Read-only access to a notebook.
///
/// Implementations must be safe for concurrent reads; the HTTP layer calls
/// them from many requests at once and never mutates the store.
pub trait DocumentStore: Send + Sync {
    /// Whether a page or section exists at `path`. The root always exists.
    fn page_exists(&self, path: &PagePath) -> Result<bool, StoreError>;

    /// Load the content of a page, `None` if the page does not exist.
    fn get_page(&self, path: &PagePath) -> Result<Option<PageContent>, StoreError>;

    /// Direct children of `path` in the store's natural order.
    fn list_children(&self, path: &PagePath) -> Result<Vec<ChildPage>, StoreError>;

    /// Raw listing of the attachment folder of `path`.
    ///
    /// This is unfiltered: it may contain sub-page source files and folders.
    fn list_attachments(&self, path: &PagePath) -> Result<Vec<AttachmentEntry>, StoreError>;

    /// Contents of attachment `name` of page `path`, `None` if absent.
    fn attachment_bytes(&self, path: &PagePath, name: &str) -> Result<Option<Bytes>, StoreError>;
}
