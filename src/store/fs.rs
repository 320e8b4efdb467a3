//! Filesystem-backed notebook.
//!
//! Layout on disk:
//!
//! ```text
//! <root>/
//!   Test.txt              page "Test"
//!   Test/                 attachment folder of "Test", holds its children
//!     foo.txt             page "Test:foo"
//!     foo/                attachment folder of "Test:foo"
//!       attachment.pdf    attachment of "Test:foo"
//!       bar.txt           page "Test:foo:bar"
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tracing::debug;

use crate::error::StoreError;

use super::path::is_valid_segment;
use super::{AttachmentEntry, ChildPage, DocumentStore, PageContent, PagePath, PAGE_FILE_EXTENSION};

/// A notebook stored as a directory tree of page files.
#[derive(Debug, Clone)]
pub struct FsNotebook {
    root: PathBuf,
}

impl FsNotebook {
    /// Open the notebook rooted at `root`.
    ///
    /// Fails if `root` is not an existing directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        match fs::metadata(&root) {
            Ok(meta) if meta.is_dir() => Ok(Self { root }),
            Ok(_) => Err(StoreError::Io {
                path: root.display().to_string(),
                message: "not a directory".to_string(),
            }),
            Err(e) => Err(StoreError::io(root.display().to_string(), &e)),
        }
    }

    /// Root directory of the notebook.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Source file of a page. The root has no source file.
    pub fn page_file(&self, path: &PagePath) -> Option<PathBuf> {
        if path.is_root() {
            return None;
        }
        Some(with_page_extension(&self.attachments_dir(path)))
    }

    /// Folder holding a page's attachments and child pages.
    pub fn attachments_dir(&self, path: &PagePath) -> PathBuf {
        let mut dir = self.root.clone();
        for segment in path.segments() {
            dir.push(segment);
        }
        dir
    }

    /// Whether a directory contains at least one page.
    fn dir_has_pages(&self, dir: &Path) -> Result<bool, StoreError> {
        let Some(entries) = read_dir(dir)? else {
            return Ok(false);
        };
        for entry in entries {
            let (name, is_dir) = entry;
            if page_name(&name, is_dir).is_some() {
                if !is_dir {
                    return Ok(true);
                }
                if self.dir_has_pages(&dir.join(&name))? {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }
}

impl DocumentStore for FsNotebook {
    fn page_exists(&self, path: &PagePath) -> Result<bool, StoreError> {
        let Some(file) = self.page_file(path) else {
            return Ok(true);
        };
        if probe(&file)?.is_some_and(|meta| meta.is_file()) {
            return Ok(true);
        }
        let dir = self.attachments_dir(path);
        if !probe(&dir)?.is_some_and(|meta| meta.is_dir()) {
            return Ok(false);
        }
        self.dir_has_pages(&dir)
    }

    fn get_page(&self, path: &PagePath) -> Result<Option<PageContent>, StoreError> {
        let Some(file) = self.page_file(path) else {
            return Ok(Some(PageContent::parse(path.clone(), "")));
        };

        match fs::read_to_string(&file) {
            Ok(source) => Ok(Some(PageContent::parse(path.clone(), &source))),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // A folder with sub-pages but no source file is an empty page
                if self.page_exists(path)? {
                    Ok(Some(PageContent::parse(path.clone(), "")))
                } else {
                    Ok(None)
                }
            }
            Err(e) if e.kind() == ErrorKind::InvalidData => Err(StoreError::Corrupt {
                path: file.display().to_string(),
                reason: "page source is not valid UTF-8".to_string(),
            }),
            Err(e) => Err(StoreError::io(file.display().to_string(), &e)),
        }
    }

    fn list_children(&self, path: &PagePath) -> Result<Vec<ChildPage>, StoreError> {
        let dir = self.attachments_dir(path);
        let Some(entries) = read_dir(&dir)? else {
            return Ok(Vec::new());
        };

        let mut children: Vec<ChildPage> = Vec::new();
        for (name, is_dir) in entries {
            let Some(child) = page_name(&name, is_dir) else {
                continue;
            };
            if children.iter().any(|c| c.name == child) {
                continue;
            }

            let child_dir = dir.join(child);
            let has_children = self.dir_has_pages(&child_dir)?;
            // Folders without pages and without a source file are plain attachments
            if is_dir && !has_children {
                let file = with_page_extension(&child_dir);
                if !probe(&file)?.is_some_and(|meta| meta.is_file()) {
                    continue;
                }
            }

            children.push(ChildPage {
                name: child.to_string(),
                has_children,
            });
        }

        children.sort_by_cached_key(|c| (c.name.to_lowercase(), c.name.clone()));
        debug!(page = %path, count = children.len(), "Listed child pages");
        Ok(children)
    }

    fn list_attachments(&self, path: &PagePath) -> Result<Vec<AttachmentEntry>, StoreError> {
        let dir = self.attachments_dir(path);
        let Some(entries) = read_dir(&dir)? else {
            return Ok(Vec::new());
        };

        let mut attachments = Vec::with_capacity(entries.len());
        for (name, is_dir) in entries {
            let size = if is_dir {
                0
            } else {
                probe(&dir.join(&name))?.map_or(0, |meta| meta.len())
            };
            attachments.push(AttachmentEntry { name, size, is_dir });
        }
        attachments.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(attachments)
    }

    fn attachment_bytes(&self, path: &PagePath, name: &str) -> Result<Option<Bytes>, StoreError> {
        if !is_valid_segment(name) {
            return Ok(None);
        }
        let file = self.attachments_dir(path).join(name);
        match probe(&file)? {
            Some(meta) if meta.is_file() => {}
            _ => return Ok(None),
        }
        match fs::read(&file) {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(file.display().to_string(), &e)),
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// `dir` with the page file extension appended (`foo.bar` -> `foo.bar.txt`).
fn with_page_extension(dir: &Path) -> PathBuf {
    let mut file = dir.as_os_str().to_owned();
    file.push(".");
    file.push(PAGE_FILE_EXTENSION);
    PathBuf::from(file)
}

/// Page name represented by a directory entry, if any.
fn page_name(name: &str, is_dir: bool) -> Option<&str> {
    let stem = if is_dir {
        name
    } else {
        name.strip_suffix(PAGE_FILE_EXTENSION)?.strip_suffix('.')?
    };
    is_valid_segment(stem).then_some(stem)
}

/// Metadata for `path`, `None` if it does not exist.
fn probe(path: &Path) -> Result<Option<fs::Metadata>, StoreError> {
    match fs::metadata(path) {
        Ok(meta) => Ok(Some(meta)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) if e.kind() == ErrorKind::NotADirectory => Ok(None),
        Err(e) => Err(StoreError::io(path.display().to_string(), &e)),
    }
}

/// Non-hidden entries of a directory as `(name, is_dir)`, `None` if missing.
fn read_dir(dir: &Path) -> Result<Option<Vec<(String, bool)>>, StoreError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) if e.kind() == ErrorKind::NotADirectory => return Ok(None),
        Err(e) => return Err(StoreError::io(dir.display().to_string(), &e)),
    };

    let mut result = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| StoreError::io(dir.display().to_string(), &e))?;
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if name.starts_with('.') {
            continue;
        }
        let is_dir = entry
            .file_type()
            .map_err(|e| StoreError::io(dir.display().to_string(), &e))?
            .is_dir();
        result.push((name, is_dir));
    }
    Ok(Some(result))
}
