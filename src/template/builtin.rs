//! The built-in `Default` template and resource set.

use bytes::Bytes;
use minijinja::{AutoEscape, Environment};

use crate::error::TemplateError;

use super::{RenderContext, Template, DEFAULT_TEMPLATE};

/// Resources served under `/+resources/` and `/favicon.ico` for every template.
pub const BUILTIN_RESOURCES: &[(&str, &[u8])] = &[
    ("favicon.ico", include_bytes!("../../resources/favicon.ico")),
    ("checked-box.png", include_bytes!("../../resources/checked-box.png")),
    ("unchecked-box.png", include_bytes!("../../resources/unchecked-box.png")),
    ("xchecked-box.png", include_bytes!("../../resources/xchecked-box.png")),
];

/// Look up a built-in resource by name.
pub fn builtin_resource(name: &str) -> Option<Bytes> {
    BUILTIN_RESOURCES
        .iter()
        .find(|(resource, _)| *resource == name)
        .map(|(_, data)| Bytes::from_static(data))
}

const TEMPLATE_NAME: &str = "default.html";

const TEMPLATE_SOURCE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{ title }}{% if notebook %} - {{ notebook }}{% endif %}</title>
    <link rel="icon" href="/favicon.ico">
    <style>
        body {
            max-width: 50em;
            margin: 1em auto;
            padding: 0 1em;
            font-family: sans-serif;
            line-height: 1.4;
        }
        .nav {
            border-bottom: 1px solid #ccc;
            padding-bottom: 0.5em;
            margin-bottom: 1em;
        }
        .nav a {
            margin-right: 1em;
        }
        a.page {
            text-decoration: none;
        }
        table.attachments td {
            padding: 0.1em 1em 0.1em 0;
        }
        td.size {
            color: #777;
            text-align: right;
        }
        pre {
            background: #f4f4f4;
            padding: 0.5em;
        }
    </style>
</head>
<body>
<div class="nav">
    <a href="/">Index</a>
    {%- if page.parent_url %}
    <a href="{{ page.parent_url }}">Up</a>
    {%- endif %}
</div>
<!-- Wiki content -->
{{ content }}
</body>
</html>
"##;

/// The template compiled into the binary.
///
/// It has no resource folder of its own; resources come from
/// [`BUILTIN_RESOURCES`].
pub struct BuiltinTemplate {
    env: Environment<'static>,
}

impl BuiltinTemplate {
    /// Compile the built-in template.
    pub fn new() -> Result<Self, TemplateError> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        env.add_template(TEMPLATE_NAME, TEMPLATE_SOURCE)?;
        Ok(Self { env })
    }
}

impl Template for BuiltinTemplate {
    fn name(&self) -> &str {
        DEFAULT_TEMPLATE
    }

    fn render(&self, context: &RenderContext) -> Result<String, TemplateError> {
        let template = self.env.get_template(TEMPLATE_NAME)?;
        Ok(template.render(context.to_value())?)
    }

    fn resource(&self, _name: &str) -> Result<Option<Bytes>, TemplateError> {
        Ok(None)
    }

    fn has_resources(&self) -> bool {
        false
    }
}
