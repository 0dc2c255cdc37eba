//! Content Transformers
//!
//! Transformers turn the raw content of a node (`internal.content`) into
//! display fields and field data, selected by `internal.mimeType`.
//!
//! # Built-in Transformers
//!
//! - [`JsonTransformer`] for `application/json`
//! - [`MarkdownTransformer`] for `text/markdown` (YAML front matter + HTML body)
//!
//! Custom transformers implement [`ContentTransformer`] and are registered on
//! a [`TransformerRegistry`] under every mime type they declare.

use pulldown_cmark::{html, Event, Parser, Tag, TagEnd};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Display fields and field data parsed from raw content.
///
/// Every value is a fallback: explicit node options override it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedContent {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub path: Option<String>,
    pub date: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub fields: Map<String, Value>,
}

impl ParsedContent {
    /// Build from a field object, lifting display fields that are strings
    fn from_fields(mut fields: Map<String, Value>) -> Self {
        Self {
            title: take_string(&mut fields, "title"),
            slug: take_string(&mut fields, "slug"),
            path: take_string(&mut fields, "path"),
            date: take_string(&mut fields, "date"),
            content: take_string(&mut fields, "content"),
            excerpt: take_string(&mut fields, "excerpt"),
            fields,
        }
    }
}

fn take_string(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    if !fields.get(key).is_some_and(Value::is_string) {
        return None;
    }
    match fields.remove(key) {
        Some(Value::String(value)) => Some(value),
        _ => None,
    }
}

/// Node being transformed
#[derive(Debug, Clone, Copy)]
pub struct TransformContext<'a> {
    pub type_name: &'a str,
    pub origin: Option<&'a str>,
}

/// Parses raw node content of one or more mime types.
pub trait ContentTransformer: Send + Sync {
    /// Mime types this transformer handles
    fn mime_types(&self) -> &[&'static str];

    fn parse(&self, content: &str, ctx: &TransformContext<'_>) -> anyhow::Result<ParsedContent>;
}

/// Transformers keyed by mime type
#[derive(Clone, Default)]
pub struct TransformerRegistry {
    transformers: HashMap<String, Arc<dyn ContentTransformer>>,
}

impl TransformerRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the JSON and Markdown transformers
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(JsonTransformer));
        registry.register(Arc::new(MarkdownTransformer));
        registry
    }

    /// Register a transformer under each of its mime types, replacing any
    /// previous transformer for them
    pub fn register(&mut self, transformer: Arc<dyn ContentTransformer>) {
        for mime_type in transformer.mime_types() {
            self.transformers
                .insert((*mime_type).to_string(), Arc::clone(&transformer));
        }
    }

    pub fn get(&self, mime_type: &str) -> Option<&Arc<dyn ContentTransformer>> {
        self.transformers.get(mime_type)
    }

    pub fn contains(&self, mime_type: &str) -> bool {
        self.transformers.contains_key(mime_type)
    }

    /// Registered mime types, sorted
    pub fn mime_types(&self) -> Vec<&str> {
        let mut mime_types: Vec<&str> = self.transformers.keys().map(String::as_str).collect();
        mime_types.sort_unstable();
        mime_types
    }
}

impl fmt::Debug for TransformerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformerRegistry")
            .field("mime_types", &self.mime_types())
            .finish()
    }
}

/// `application/json`: a JSON object whose keys become fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonTransformer;

impl ContentTransformer for JsonTransformer {
    fn mime_types(&self) -> &[&'static str] {
        &["application/json"]
    }

    fn parse(&self, content: &str, _ctx: &TransformContext<'_>) -> anyhow::Result<ParsedContent> {
        match serde_json::from_str::<Value>(content)? {
            Value::Object(fields) => Ok(ParsedContent::from_fields(fields)),
            other => anyhow::bail!("expected a JSON object, found {}", json_kind(&other)),
        }
    }
}

/// `text/markdown`: YAML front matter becomes fields, the body is rendered
/// to HTML.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownTransformer;

impl ContentTransformer for MarkdownTransformer {
    fn mime_types(&self) -> &[&'static str] {
        &["text/markdown"]
    }

    fn parse(&self, content: &str, _ctx: &TransformContext<'_>) -> anyhow::Result<ParsedContent> {
        let (front_matter, body) = split_front_matter(content);

        let fields = match front_matter {
            Some(yaml) if !yaml.trim().is_empty() => match serde_yaml::from_str::<Value>(yaml)? {
                Value::Object(fields) => fields,
                Value::Null => Map::new(),
                other => anyhow::bail!("front matter must be a mapping, found {}", json_kind(&other)),
            },
            _ => Map::new(),
        };

        let mut parsed = ParsedContent::from_fields(fields);

        let mut rendered = String::new();
        html::push_html(&mut rendered, Parser::new(body));

        if parsed.excerpt.is_none() {
            parsed.excerpt = first_paragraph_text(body);
        }
        parsed.content = Some(rendered);

        Ok(parsed)
    }
}

/// Split `---` delimited front matter from the body.
///
/// Content without a closed front matter block is all body.
fn split_front_matter(content: &str) -> (Option<&str>, &str) {
    let Some(rest) = content.strip_prefix("---") else {
        return (None, content);
    };
    let Some(rest) = rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n')) else {
        return (None, content);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return (Some(&rest[..offset]), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }

    (None, content)
}

/// Plain text of the first paragraph
fn first_paragraph_text(markdown: &str) -> Option<String> {
    let mut text = String::new();
    let mut in_paragraph = false;

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Paragraph) => in_paragraph = true,
            Event::End(TagEnd::Paragraph) if in_paragraph => break,
            Event::Text(chunk) | Event::Code(chunk) if in_paragraph => text.push_str(&chunk),
            Event::SoftBreak | Event::HardBreak if in_paragraph => text.push(' '),
            _ => {}
        }
    }

    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
