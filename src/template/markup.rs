//! Wiki markup to HTML conversion.
//!
//! Supports the subset of wiki markup that notebooks commonly use:
//!
//! ```text
//! ====== Heading 1 ======          ==== Heading 3 ====
//! **bold**  //italic//  __highlight__  ~~strike~~  ''code''
//! [[Page]]  [[+Child]]  [[:Absolute:Page|label]]  [[https://example.com]]
//! * bullet item
//! [ ] open task   [*] done task   [x] cancelled task
//! '''
//! verbatim block
//! '''
//! ----
//! ```
//!
//! All text is HTML-escaped; page links are rewritten to `.html` URLs.

use crate::store::PagePath;

/// Escape HTML special characters.
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Split a leading level-1 heading off a page body.
///
/// Returns the heading text and the remaining markup. Bodies that do not
/// start with a level-1 heading are returned unchanged.
pub fn split_title(markup: &str) -> (Option<String>, &str) {
    let mut offset = 0;
    for line in markup.split_inclusive('\n') {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            offset += line.len();
            continue;
        }
        if let Some((1, text)) = parse_heading(trimmed) {
            return (Some(text.to_string()), &markup[offset + line.len()..]);
        }
        break;
    }
    (None, markup)
}

/// Convert a page body to an HTML fragment.
///
/// `page` is the page the markup belongs to; relative links resolve against
/// its parent, `+` links against the page itself.
pub fn to_html(page: &PagePath, markup: &str) -> String {
    let mut formatter = Formatter::new(page);
    let mut verbatim: Option<Vec<&str>> = None;

    for line in markup.lines() {
        if let Some(lines) = verbatim.as_mut() {
            if line.trim() == "'''" {
                formatter.push_verbatim(lines);
                verbatim = None;
            } else {
                lines.push(line);
            }
            continue;
        }

        let trimmed = line.trim();
        if trimmed == "'''" {
            formatter.flush();
            verbatim = Some(Vec::new());
        } else if trimmed.is_empty() {
            formatter.flush();
        } else if let Some((level, text)) = parse_heading(trimmed) {
            formatter.flush();
            let text = formatter.inline(text);
            formatter.out.push_str(&format!("<h{level}>{text}</h{level}>\n"));
        } else if trimmed.len() >= 4 && trimmed.chars().all(|c| c == '-') {
            formatter.flush();
            formatter.out.push_str("<hr>\n");
        } else if let Some(item) = formatter.list_item(trimmed) {
            formatter.flush_paragraph();
            if !formatter.in_list {
                formatter.out.push_str("<ul>\n");
                formatter.in_list = true;
            }
            formatter.out.push_str(&item);
        } else {
            formatter.close_list();
            formatter.paragraph.push(trimmed);
        }
    }

    // Unterminated verbatim blocks run to the end of the page
    if let Some(lines) = verbatim {
        formatter.push_verbatim(&lines);
    }
    formatter.flush();
    formatter.out
}

// =============================================================================
// Block Formatting
// =============================================================================

struct Formatter<'a> {
    page: &'a PagePath,
    out: String,
    paragraph: Vec<&'a str>,
    in_list: bool,
}

impl<'a> Formatter<'a> {
    fn new(page: &'a PagePath) -> Self {
        Self {
            page,
            out: String::new(),
            paragraph: Vec::new(),
            in_list: false,
        }
    }

    fn inline(&self, text: &str) -> String {
        inline(self.page, text)
    }

    fn flush(&mut self) {
        self.flush_paragraph();
        self.close_list();
    }

    fn flush_paragraph(&mut self) {
        if self.paragraph.is_empty() {
            return;
        }
        let lines: Vec<String> = self.paragraph.iter().map(|l| self.inline(l)).collect();
        self.out.push_str("<p>\n");
        self.out.push_str(&lines.join("<br>\n"));
        self.out.push_str("\n</p>\n");
        self.paragraph.clear();
    }

    fn close_list(&mut self) {
        if self.in_list {
            self.out.push_str("</ul>\n");
            self.in_list = false;
        }
    }

    fn push_verbatim(&mut self, lines: &[&str]) {
        self.flush();
        self.out.push_str("<pre>\n");
        self.out.push_str(&escape_html(&lines.join("\n")));
        self.out.push_str("\n</pre>\n");
    }

    fn list_item(&self, line: &str) -> Option<String> {
        if let Some(text) = line.strip_prefix("* ") {
            return Some(format!("<li>{}</li>\n", self.inline(text)));
        }
        let (image, alt, text) = if let Some(text) = line.strip_prefix("[ ] ") {
            ("unchecked-box.png", "[ ]", text)
        } else if let Some(text) = line.strip_prefix("[*] ") {
            ("checked-box.png", "[*]", text)
        } else if let Some(text) = line.strip_prefix("[x] ") {
            ("xchecked-box.png", "[x]", text)
        } else {
            return None;
        };
        Some(format!(
            "<li><img src=\"/+resources/{}\" alt=\"{}\"> {}</li>\n",
            image,
            alt,
            self.inline(text)
        ))
    }
}

/// Parse a `== text ==` heading into `(level, text)`.
///
/// Six `=` make a level 1 heading, two make a level 5 heading.
fn parse_heading(line: &str) -> Option<(u8, &str)> {
    let leading = line.bytes().take_while(|&b| b == b'=').count();
    let trailing = line.bytes().rev().take_while(|&b| b == b'=').count();
    if leading < 2 || trailing < 2 || leading + trailing >= line.len() {
        return None;
    }
    let text = line[leading..line.len() - trailing].trim();
    if text.is_empty() {
        return None;
    }
    let level = 7usize.saturating_sub(leading).clamp(1, 6);
    Some((level as u8, text))
}

// =============================================================================
// Inline Formatting
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Span {
    Link,
    Strong,
    Emphasis,
    Mark,
    Strike,
    Code,
}

const SPANS: &[(&str, &str, Span)] = &[
    ("[[", "]]", Span::Link),
    ("**", "**", Span::Strong),
    ("//", "//", Span::Emphasis),
    ("__", "__", Span::Mark),
    ("~~", "~~", Span::Strike),
    ("''", "''", Span::Code),
];

fn inline(page: &PagePath, text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    'scan: while !rest.is_empty() {
        for (i, _) in rest.char_indices() {
            for &(open, close, span) in SPANS {
                if !rest[i..].starts_with(open) {
                    continue;
                }
                // "//" after a colon is part of a bare URL
                if span == Span::Emphasis && rest[..i].ends_with(':') {
                    continue;
                }
                let start = i + open.len();
                let Some(len) = rest[start..].find(close) else {
                    continue;
                };
                if len == 0 {
                    continue;
                }

                out.push_str(&escape_html(&rest[..i]));
                out.push_str(&render_span(page, span, &rest[start..start + len]));
                rest = &rest[start + len + close.len()..];
                continue 'scan;
            }
        }
        out.push_str(&escape_html(rest));
        break;
    }
    out
}

fn render_span(page: &PagePath, span: Span, inner: &str) -> String {
    match span {
        Span::Link => render_link(page, inner),
        Span::Strong => format!("<strong>{}</strong>", inline(page, inner)),
        Span::Emphasis => format!("<em>{}</em>", inline(page, inner)),
        Span::Mark => format!("<mark>{}</mark>", inline(page, inner)),
        Span::Strike => format!("<s>{}</s>", inline(page, inner)),
        Span::Code => format!("<code>{}</code>", escape_html(inner)),
    }
}

fn render_link(page: &PagePath, inner: &str) -> String {
    let (target, label) = match inner.split_once('|') {
        Some((target, label)) => (target.trim(), label.trim()),
        None => (inner.trim(), inner.trim()),
    };
    let label = if label.is_empty() { target } else { label };

    if is_external(target) {
        return format!(
            "<a href=\"{}\" title=\"{}\" class=\"external\">{}</a>",
            escape_html(target),
            escape_html(target),
            escape_html(label)
        );
    }

    match resolve_link(page, target) {
        Some(path) => format!(
            "<a href=\"{}\" title=\"{}\" class=\"page\">{}</a>",
            path.url(),
            escape_html(target),
            escape_html(label)
        ),
        None => escape_html(label),
    }
}

fn is_external(target: &str) -> bool {
    target.contains("://") || target.starts_with("mailto:")
}

/// Resolve a wiki link target relative to `page`.
fn resolve_link(page: &PagePath, target: &str) -> Option<PagePath> {
    if let Some(absolute) = target.strip_prefix(':') {
        return join(&PagePath::root(), absolute);
    }
    if let Some(child) = target.strip_prefix('+') {
        return join(page, child);
    }
    join(&page.parent().unwrap_or_default(), target)
}

fn join(base: &PagePath, relative: &str) -> Option<PagePath> {
    let relative = PagePath::parse(relative)?;
    if relative.is_root() {
        return None;
    }
    let joined = relative
        .segments()
        .try_fold(base.clone(), |path, segment| path.child(segment));
    joined
}
