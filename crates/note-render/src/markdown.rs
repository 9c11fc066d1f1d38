//! Markdown to HTML.
//!
//! Uses comrak with the GFM autolink-literal extension so bare URLs become
//! links. Raw HTML in the input is not passed through and `javascript:`
//! style link targets are dropped; that is the only sanitizing done.

use comrak::{markdown_to_html, Options};

use crate::config::RenderConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkdownRenderer {
    autolink: bool,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self { autolink: true }
    }
}

impl MarkdownRenderer {
    pub fn new(autolink: bool) -> Self {
        Self { autolink }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(config.autolink)
    }

    pub fn render(&self, markdown: &str) -> String {
        let mut options = Options::default();
        options.extension.autolink = self.autolink;
        markdown_to_html(markdown, &options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_plain_text() {
        assert_eq!(
            MarkdownRenderer::default().render("Hello, world!"),
            "<p>Hello, world!</p>\n"
        );
    }

    #[test]
    fn render_empty() {
        assert_eq!(MarkdownRenderer::default().render(""), "");
    }

    #[test]
    fn bare_url_is_autolinked() {
        let html = MarkdownRenderer::default().render("visit https://example.com now");
        assert!(html.contains(r#"<a href="https://example.com">https://example.com</a>"#));
    }

    #[test]
    fn autolink_can_be_disabled() {
        let html = MarkdownRenderer::new(false).render("visit https://example.com now");
        assert!(!html.contains("<a "));
        assert!(html.contains("https://example.com"));
    }

    #[test]
    fn markdown_link_is_rendered() {
        let html = MarkdownRenderer::default().render("[@jack](https://nostr.com/npub1xyz)");
        assert_eq!(
            html,
            "<p><a href=\"https://nostr.com/npub1xyz\">@jack</a></p>\n"
        );
    }

    #[test]
    fn escaped_brackets_stay_in_link_text() {
        let html = MarkdownRenderer::default().render(r"[@a\]b](https://nostr.com/npub1xyz)");
        assert!(html.contains(">@a]b</a>"));
    }

    #[test]
    fn raw_html_is_not_passed_through() {
        let html = MarkdownRenderer::default().render("<script>alert(1)</script>");
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn javascript_links_are_dropped() {
        let html = MarkdownRenderer::default().render("[click](javascript:alert(1))");
        assert!(!html.contains("javascript:"));
    }
}
