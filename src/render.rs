//! Rendering document bodies
//!
//! The core never renders by itself; it hands the raw body and a field
//! context to a [`Renderer`]. [`MarkdownRenderer`] is the default
//! implementation and rewrites local image references with a static prefix.

use crate::core::record::Record;
use crate::error::Result;
use once_cell::sync::Lazy;
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};
use regex::Regex;

static IMAGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[.*?\]\((.*?)\)").unwrap());

/// Turns a raw body into final markup
pub trait Renderer: Send + Sync {
    fn render(&self, content: &str, context: &Record) -> Result<String>;
}

/// Check whether an asset reference points at a local file
///
/// Anything not starting with `http://`, `https://` or `//` is local.
pub fn is_local(reference: &str) -> bool {
    !(reference.starts_with("http://")
        || reference.starts_with("https://")
        || reference.starts_with("//"))
}

/// Every `![...](<ref>)` target in `content`, in order
pub fn image_references(content: &str) -> Vec<String> {
    IMAGE_RE
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Image references that [`is_local`]
pub fn local_assets(content: &str) -> Vec<String> {
    image_references(content)
        .into_iter()
        .filter(|reference| is_local(reference))
        .collect()
}

/// Markdown to HTML via pulldown-cmark
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    static_prefix: String,
    options: Options,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        Self {
            static_prefix: String::new(),
            options,
        }
    }

    /// Prefix prepended to local image references
    pub fn with_static_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.static_prefix = prefix.into();
        self
    }

    pub fn static_prefix(&self) -> &str {
        &self.static_prefix
    }

    fn rewrite<'a>(&self, event: Event<'a>) -> Event<'a> {
        match event {
            Event::Start(Tag::Image {
                link_type,
                dest_url,
                title,
                id,
            }) if !self.static_prefix.is_empty() && is_local(&dest_url) => {
                Event::Start(Tag::Image {
                    link_type,
                    dest_url: CowStr::from(format!("{}{}", self.static_prefix, dest_url)),
                    title,
                    id,
                })
            }
            other => other,
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for MarkdownRenderer {
    fn render(&self, content: &str, _context: &Record) -> Result<String> {
        let parser = Parser::new_ext(content, self.options).map(|event| self.rewrite(event));
        let mut output = String::with_capacity(content.len() * 3 / 2);
        html::push_html(&mut output, parser);
        Ok(output)
    }
}

/// Returns the body unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct RawRenderer;

impl Renderer for RawRenderer {
    fn render(&self, content: &str, _context: &Record) -> Result<String> {
        Ok(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_local() {
        assert!(is_local("img/cat.png"));
        assert!(is_local("/img/cat.png"));
        assert!(!is_local("http://example.com/cat.png"));
        assert!(!is_local("https://example.com/cat.png"));
        assert!(!is_local("//cdn.example.com/cat.png"));
    }

    #[test]
    fn test_image_references() {
        let body = "![a](one.png) text ![b](https://x.org/two.png)\n![](three.jpg)";
        assert_eq!(
            image_references(body),
            vec!["one.png", "https://x.org/two.png", "three.jpg"]
        );
        assert_eq!(local_assets(body), vec!["one.png", "three.jpg"]);
    }

    #[test]
    fn test_markdown_render() {
        let html = MarkdownRenderer::new()
            .render("# Title\n\nSome *text*.", &Record::new())
            .unwrap();
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<em>text</em>"));
    }

    #[test]
    fn test_static_prefix_applies_to_local_images_only() {
        let renderer = MarkdownRenderer::new().with_static_prefix("/static/");
        let html = renderer
            .render(
                "![cat](cat.png) ![dog](https://x.org/dog.png)",
                &Record::new(),
            )
            .unwrap();
        assert!(html.contains("src=\"/static/cat.png\""));
        assert!(html.contains("src=\"https://x.org/dog.png\""));
    }

    #[test]
    fn test_raw_renderer() {
        let out = RawRenderer.render("# Title", &Record::new()).unwrap();
        assert_eq!(out, "# Title");
    }
}
