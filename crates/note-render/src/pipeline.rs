//! Note content to HTML.
//!
//! Three stages, always in this order:
//! 1. legacy `#[N]` markers resolved against the note's tags
//! 2. `nostr:` URIs turned into markdown links
//! 3. markdown rendered to HTML with bare URLs autolinked
//!
//! Output depends only on the content, the tags and the profile snapshot
//! taken at the start of the run.

use crate::config::RenderConfig;
use crate::inline::rewrite_inline_references;
use crate::legacy::rewrite_legacy_mentions;
use crate::markdown::MarkdownRenderer;
use crate::post::Post;
use crate::profile::ProfileStore;
use crate::resolve::LinkBuilder;

#[derive(Debug, Clone)]
pub struct ContentPipeline {
    profiles: ProfileStore,
    links: LinkBuilder,
    markdown: MarkdownRenderer,
}

impl ContentPipeline {
    pub fn new(profiles: ProfileStore, config: &RenderConfig) -> Self {
        Self {
            profiles,
            links: LinkBuilder::from_config(config),
            markdown: MarkdownRenderer::from_config(config),
        }
    }

    pub fn profiles(&self) -> &ProfileStore {
        &self.profiles
    }

    /// Stages 1 and 2: the markdown handed to the renderer.
    pub fn rewrite(&self, content: &str, tags: &[Vec<String>]) -> String {
        let profiles = self.profiles.read();
        let content = rewrite_legacy_mentions(content, tags, &profiles, &self.links);
        rewrite_inline_references(&content, &self.links)
    }

    pub fn render_content(&self, content: &str, tags: &[Vec<String>]) -> String {
        self.markdown.render(&self.rewrite(content, tags))
    }

    pub fn render(&self, post: &Post) -> String {
        self.render_content(&post.content, &post.tags)
    }
}
