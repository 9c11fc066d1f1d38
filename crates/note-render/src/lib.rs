//! Nostr note content rendering for feed UIs.
//!
//! Turns a raw note body into display-ready HTML in three fixed stages:
//! legacy `#[N]` mention markers are resolved against the note's tags,
//! `nostr:` references are turned into markdown links, and the result is
//! rendered as markdown with GFM autolink literals. Small derived caches
//! used next to the renderer (profile metadata, reply counts, relative
//! timestamps) live here as well.

pub mod config;
pub mod error;
pub mod inline;
pub mod legacy;
pub mod markdown;
pub mod pipeline;
pub mod post;
pub mod profile;
pub mod reference;
pub mod resolve;
pub mod scan;
pub mod thread;
pub mod time;

// Re-export commonly used types
pub use config::{RenderConfig, DEFAULT_LINK_BASE};
pub use error::{Error, MetadataError, ReferenceError, Result};
pub use inline::rewrite_inline_references;
pub use legacy::rewrite_legacy_mentions;
pub use markdown::MarkdownRenderer;
pub use pipeline::ContentPipeline;
pub use post::{Post, TagKind, KIND_METADATA};
pub use profile::{MergeReport, ProfileEntry, ProfileStore, Profiles, DEFAULT_PICTURE};
pub use reference::{replaceable_id, Reference, NOSTR_URI_PREFIX};
pub use resolve::{shorten_encoded_id, LinkBuilder};
pub use thread::{NestedNote, ThreadRoot};
pub use time::{time_ago, time_ago_at};

// Re-export nostr-sdk for convenience
pub use nostr_sdk;
