//! Page names and their URL forms.

use std::fmt;

/// Separator between the segments of a page name (`Test:foo`).
pub const PAGE_SEPARATOR: char = ':';

/// Prefix of attachment URLs.
pub const FILE_URL_PREFIX: &str = "/+file/";

/// A validated page name inside the notebook.
///
/// The root of the notebook is the empty path. Every other path is a list of
/// non-empty segments joined with [`PAGE_SEPARATOR`]. Segments never start
/// with `.` and never contain `/`, `\` or `:`, so a `PagePath` can be mapped
/// onto a directory tree without escaping it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PagePath {
    name: String,
}

impl PagePath {
    /// The notebook root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a page name such as `Test:foo`.
    ///
    /// Returns `None` if any segment is invalid. The empty string is the root.
    pub fn parse(name: &str) -> Option<Self> {
        if name.is_empty() {
            return Some(Self::root());
        }
        Self::from_segments(name.split(PAGE_SEPARATOR))
    }

    /// Build a path from `/`-separated URL segments (`Test/foo`).
    ///
    /// Leading and trailing slashes are ignored.
    pub fn from_url_path(path: &str) -> Option<Self> {
        let trimmed = path.trim_matches('/');
        if trimmed.is_empty() {
            return Some(Self::root());
        }
        Self::from_segments(trimmed.split('/'))
    }

    /// Build a path from individual segments, validating each one.
    pub fn from_segments<'a, I>(segments: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut name = String::new();
        for segment in segments {
            if !is_valid_segment(segment) {
                return None;
            }
            if !name.is_empty() {
                name.push(PAGE_SEPARATOR);
            }
            name.push_str(segment);
        }
        Some(Self { name })
    }

    /// Whether this is the notebook root.
    pub fn is_root(&self) -> bool {
        self.name.is_empty()
    }

    /// Full page name (`Test:foo`), empty for the root.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last segment of the name (`foo` for `Test:foo`).
    pub fn basename(&self) -> &str {
        self.name
            .rsplit(PAGE_SEPARATOR)
            .next()
            .unwrap_or(&self.name)
    }

    /// Iterate over the segments of the name. Yields nothing for the root.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.name.split(PAGE_SEPARATOR).filter(|s| !s.is_empty())
    }

    /// Parent path, or `None` for the root.
    pub fn parent(&self) -> Option<PagePath> {
        if self.is_root() {
            return None;
        }
        match self.name.rfind(PAGE_SEPARATOR) {
            Some(idx) => Some(Self {
                name: self.name[..idx].to_string(),
            }),
            None => Some(Self::root()),
        }
    }

    /// Path of a direct child page, or `None` if `name` is not a valid segment.
    pub fn child(&self, name: &str) -> Option<PagePath> {
        if !is_valid_segment(name) {
            return None;
        }
        let name = if self.is_root() {
            name.to_string()
        } else {
            format!("{}{}{}", self.name, PAGE_SEPARATOR, name)
        };
        Some(Self { name })
    }

    /// URL of the rendered page (`/Test/foo.html`); `/` for the root.
    pub fn url(&self) -> String {
        if self.is_root() {
            return "/".to_string();
        }
        format!("/{}.html", self.encoded_segments())
    }

    /// URL of the index listing this page's children (`/Test/foo/`).
    pub fn index_url(&self) -> String {
        if self.is_root() {
            return "/".to_string();
        }
        format!("/{}/", self.encoded_segments())
    }

    /// URL of an attachment owned by this page (`/+file/Test/foo/a.pdf`).
    pub fn file_url(&self, filename: &str) -> String {
        let filename = urlencoding::encode(filename);
        if self.is_root() {
            format!("{}{}", FILE_URL_PREFIX, filename)
        } else {
            format!("{}{}/{}", FILE_URL_PREFIX, self.encoded_segments(), filename)
        }
    }

    fn encoded_segments(&self) -> String {
        self.segments()
            .map(|s| urlencoding::encode(s).into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl fmt::Display for PagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, ":")
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// Whether `segment` can be used as one component of a page name.
pub fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && !segment.starts_with('.')
        && !segment
            .chars()
            .any(|c| c == '/' || c == '\\' || c == PAGE_SEPARATOR || c.is_control())
}
