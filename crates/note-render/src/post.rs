//! Notes as they come off the feed.

use serde::{Deserialize, Serialize};

/// Kind 0: profile metadata.
pub const KIND_METADATA: u16 = 0;

/// Kind 1: short text note.
pub const KIND_TEXT_NOTE: u16 = 1;

/// A feed note in nostr event JSON shape.
///
/// Read-only input to the pipeline; the signature is not carried because
/// verification happens upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Event id (hex).
    pub id: String,
    /// Author pubkey (hex).
    pub pubkey: String,
    /// Unix timestamp (seconds).
    pub created_at: u64,
    #[serde(default = "default_kind")]
    pub kind: u16,
    /// Ordered tags; the first element of each is its kind discriminator.
    #[serde(default)]
    pub tags: Vec<Vec<String>>,
    #[serde(default)]
    pub content: String,
}

fn default_kind() -> u16 {
    KIND_TEXT_NOTE
}

/// Tag kind discriminator for the references the renderer resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// `e`: event reference.
    Event,
    /// `a`: addressable entity reference.
    Address,
    /// `p`: author reference.
    Pubkey,
    /// Anything else (`t`, `r`, custom).
    Other,
}

impl TagKind {
    pub fn of(tag: &[String]) -> Self {
        match tag.first().map(String::as_str) {
            Some("e") => Self::Event,
            Some("a") => Self::Address,
            Some("p") => Self::Pubkey,
            _ => Self::Other,
        }
    }
}

impl Post {
    /// Tag at a zero-based index.
    pub fn tag(&self, index: usize) -> Option<&[String]> {
        self.tags.get(index).map(Vec::as_slice)
    }

    pub fn is_metadata(&self) -> bool {
        self.kind == KIND_METADATA
    }

    /// Creation time in milliseconds, as the relative-time formatter expects.
    pub fn created_at_millis(&self) -> i64 {
        i64::try_from(self.created_at)
            .unwrap_or(i64::MAX / 1000)
            .saturating_mul(1000)
    }
}

impl From<&nostr_sdk::Event> for Post {
    fn from(event: &nostr_sdk::Event) -> Self {
        Self {
            id: event.id.to_hex(),
            pubkey: event.pubkey.to_hex(),
            created_at: event.created_at.as_secs(),
            kind: event.kind.as_u16(),
            tags: event
                .tags
                .iter()
                .map(|tag| tag.as_slice().to_vec())
                .collect(),
            content: event.content.clone(),
        }
    }
}
