//! Templates loaded from HTML files on disk.
//!
//! A template `html/Custom.html` may ship resources in the sibling folder
//! `html/Custom/`; they are served under `/+resources/` and take precedence
//! over the built-in resource set.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use minijinja::{AutoEscape, Environment};
use tracing::debug;

use crate::error::TemplateError;

use super::{resource_segments, RenderContext, Template};

const TEMPLATE_NAME: &str = "page.html";

/// A template read from an HTML file.
pub struct FileTemplate {
    name: String,
    env: Environment<'static>,
    resource_dir: Option<PathBuf>,
}

impl FileTemplate {
    /// Load and compile the template at `path`.
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(TemplateError::NotFound(path.display().to_string()))
            }
            Err(e) => return Err(TemplateError::Io(format!("{}: {}", path.display(), e))),
        };

        let resource_dir = path
            .file_stem()
            .map(|stem| path.with_file_name(stem))
            .filter(|dir| dir.is_dir());

        debug!(
            template = %path.display(),
            resources = ?resource_dir,
            "Loaded template file"
        );

        Self::from_source(path.display().to_string(), source, resource_dir)
    }

    /// Compile a template from source, with an optional resource folder.
    pub fn from_source(
        name: impl Into<String>,
        source: String,
        resource_dir: Option<PathBuf>,
    ) -> Result<Self, TemplateError> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        env.add_template_owned(TEMPLATE_NAME, source)?;
        Ok(Self {
            name: name.into(),
            env,
            resource_dir,
        })
    }

    /// Folder holding the template's own resources, if it has one.
    pub fn resource_dir(&self) -> Option<&Path> {
        self.resource_dir.as_deref()
    }
}

impl Template for FileTemplate {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&self, context: &RenderContext) -> Result<String, TemplateError> {
        let template = self.env.get_template(TEMPLATE_NAME)?;
        Ok(template.render(context.to_value())?)
    }

    fn resource(&self, name: &str) -> Result<Option<Bytes>, TemplateError> {
        let Some(dir) = &self.resource_dir else {
            return Ok(None);
        };
        let Some(segments) = resource_segments(name) else {
            return Ok(None);
        };

        let mut file = dir.clone();
        file.extend(segments);
        match fs::read(&file) {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(_) if file.is_dir() => Ok(None),
            Err(e) => Err(TemplateError::Io(format!("{}: {}", file.display(), e))),
        }
    }

    fn has_resources(&self) -> bool {
        self.resource_dir.is_some()
    }
}
