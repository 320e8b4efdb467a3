//! Content resolution.
//!
//! Turns a classified reference into the entity it names. Every lookup
//! returns `Ok(None)` for a miss; only store or template faults are errors.

use bytes::Bytes;

use crate::error::{StoreError, TemplateError};
use crate::store::{
    AttachmentEntry, ChildPage, DocumentStore, PageContent, PagePath, PAGE_FILE_EXTENSION,
};
use crate::template::{builtin_resource, Template};

use super::mime::mime_for;

/// Nesting limit for index trees.
pub const MAX_INDEX_DEPTH: usize = 32;

// =============================================================================
// Resolved Entities
// =============================================================================

/// One page in an index tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub path: PagePath,
    pub children: Vec<IndexEntry>,
}

/// A section and the tree of pages below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIndex {
    pub section: PagePath,
    pub entries: Vec<IndexEntry>,
}

/// A page with its sub-pages and real attachments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPage {
    pub content: PageContent,

    /// Direct children in store order
    pub children: Vec<ChildPage>,

    /// Attachment files, without sub-page sources and folders
    pub attachments: Vec<AttachmentEntry>,
}

impl ResolvedPage {
    pub fn path(&self) -> &PagePath {
        &self.content.path
    }
}

/// File contents ready to be served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    pub data: Bytes,
    pub content_type: &'static str,
}

// =============================================================================
// Content Resolver
// =============================================================================

/// Looks up entities in the store and the template collaborator.
pub struct ContentResolver<'a, S: ?Sized> {
    store: &'a S,
    template: &'a dyn Template,
}

impl<'a, S: DocumentStore + ?Sized> ContentResolver<'a, S> {
    pub fn new(store: &'a S, template: &'a dyn Template) -> Self {
        Self { store, template }
    }

    /// Resolve the index of `section`.
    ///
    /// The root always resolves; other sections must exist in the store.
    pub fn resolve_index(&self, section: &PagePath) -> Result<Option<ResolvedIndex>, StoreError> {
        if !section.is_root() && !self.store.page_exists(section)? {
            return Ok(None);
        }
        Ok(Some(ResolvedIndex {
            section: section.clone(),
            entries: self.index_entries(section, 0)?,
        }))
    }

    fn index_entries(&self, parent: &PagePath, depth: usize) -> Result<Vec<IndexEntry>, StoreError> {
        let mut entries = Vec::new();
        for child in self.store.list_children(parent)? {
            let Some(path) = parent.child(&child.name) else {
                continue;
            };
            let children = if child.has_children && depth + 1 < MAX_INDEX_DEPTH {
                self.index_entries(&path, depth + 1)?
            } else {
                Vec::new()
            };
            entries.push(IndexEntry { path, children });
        }
        Ok(entries)
    }

    /// Resolve a page together with its sub-pages and attachments.
    pub fn resolve_page(&self, path: &PagePath) -> Result<Option<ResolvedPage>, StoreError> {
        let Some(content) = self.store.get_page(path)? else {
            return Ok(None);
        };

        let children = self.store.list_children(path)?;
        let attachments = self
            .store
            .list_attachments(path)?
            .into_iter()
            .filter(|entry| !entry.is_dir && !names_child_page(&children, &entry.name))
            .collect();

        Ok(Some(ResolvedPage {
            content,
            children,
            attachments,
        }))
    }

    /// Resolve attachment `filename` of `page`.
    ///
    /// Entries named after a sub-page or its source file are hidden from
    /// page listings, so they are never served here either.
    pub fn resolve_attachment(
        &self,
        page: &PagePath,
        filename: &str,
    ) -> Result<Option<ResolvedFile>, StoreError> {
        let children = self.store.list_children(page)?;
        if names_child_page(&children, filename) {
            return Ok(None);
        }

        Ok(self
            .store
            .attachment_bytes(page, filename)?
            .map(|data| ResolvedFile {
                data,
                content_type: mime_for(filename),
            }))
    }

    /// Resolve a static resource.
    ///
    /// With `template_first` the template's own resources are searched
    /// before the built-in set.
    pub fn resolve_static(
        &self,
        name: &str,
        template_first: bool,
    ) -> Result<Option<ResolvedFile>, TemplateError> {
        let data = if template_first {
            self.template.resource(name)?
        } else {
            None
        };

        Ok(data.or_else(|| builtin_resource(name)).map(|data| ResolvedFile {
            data,
            content_type: mime_for(name),
        }))
    }
}

/// Whether an attachment folder entry is a child page or its source file.
fn names_child_page(children: &[ChildPage], entry: &str) -> bool {
    let stem = entry
        .strip_suffix(PAGE_FILE_EXTENSION)
        .and_then(|s| s.strip_suffix('.'));
    children
        .iter()
        .any(|child| child.name == entry || Some(child.name.as_str()) == stem)
}
