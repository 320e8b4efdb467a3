//! Page and index rendering.
//!
//! The renderer builds the content fragment (heading, body, sub-page list,
//! attachment table) and hands it to the template for the document chrome.

use crate::error::TemplateError;
use crate::store::PagePath;
use crate::template::markup::{escape_html, split_title};
use crate::template::{RenderContext, Template, TemplatePage};

use super::resolve::{IndexEntry, ResolvedIndex, ResolvedPage};

/// Renders resolved pages and indexes into HTML documents.
pub struct PageRenderer<'a> {
    template: &'a dyn Template,
    notebook: &'a str,
}

impl<'a> PageRenderer<'a> {
    pub fn new(template: &'a dyn Template, notebook: &'a str) -> Self {
        Self { template, notebook }
    }

    /// Render a page document.
    pub fn render_page(&self, page: &ResolvedPage) -> Result<String, TemplateError> {
        let path = page.path();
        let (heading, body) = split_title(&page.content.body);
        let title = heading.unwrap_or_else(|| path.basename().to_string());

        let mut content = format!(
            "<h1>{} <a name='{}'></a></h1>\n",
            escape_html(&title),
            escape_html(path.name())
        );
        content.push_str(&self.template.format_markup(path, body));

        if !page.children.is_empty() {
            content.push_str("<h2>Pages</h2>\n<ul>\n");
            for child in &page.children {
                if let Some(child_path) = path.child(&child.name) {
                    content.push_str(&format!("<li>{}</li>\n", page_link(&child_path)));
                }
            }
            content.push_str("</ul>\n");
        }

        if !page.attachments.is_empty() {
            content.push_str("<h2>Attachments</h2>\n<table class=\"attachments\">\n");
            for attachment in &page.attachments {
                content.push_str(&format!(
                    "<tr><td><a href='{}'>{}</a></td><td class=\"size\">{}</td></tr>\n",
                    path.file_url(&attachment.name),
                    escape_html(&attachment.name),
                    format_size(attachment.size)
                ));
            }
            content.push_str("</table>\n");
        }

        self.template.render(&RenderContext {
            title,
            content,
            page: TemplatePage::new(path),
            notebook: self.notebook.to_string(),
        })
    }

    /// Render an index document: the nested list of pages below the section.
    pub fn render_index(&self, index: &ResolvedIndex) -> Result<String, TemplateError> {
        let title = if index.section.is_root() {
            "Index".to_string()
        } else {
            index.section.name().to_string()
        };

        let mut content = String::new();
        push_index_list(&mut content, &index.entries);

        self.template.render(&RenderContext {
            title,
            content,
            page: TemplatePage::new(&index.section),
            notebook: self.notebook.to_string(),
        })
    }
}

fn push_index_list(out: &mut String, entries: &[IndexEntry]) {
    out.push_str("<ul>\n");
    for entry in entries {
        out.push_str("<li>");
        out.push_str(&page_link(&entry.path));
        if !entry.children.is_empty() {
            out.push('\n');
            push_index_list(out, &entry.children);
        }
        out.push_str("</li>\n");
    }
    out.push_str("</ul>\n");
}

fn page_link(path: &PagePath) -> String {
    let name = escape_html(path.basename());
    format!(
        "<a href=\"{}\" title=\"{}\" class=\"page\">{}</a>",
        path.url(),
        name,
        name
    )
}

/// Human-readable file size (`0 B`, `512 B`, `1.2 KB`, `3.0 MB`).
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut size = bytes as f64 / 1024.0;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", size, UNITS[unit])
}
