//! Error types for note rendering and metadata merging.

use std::convert::Infallible;

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Crate-level errors surfaced to callers.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (profile snapshot load/save).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why a reference (tag or inline token) could not be resolved.
///
/// These never escape the rewriters: an unresolvable reference is left
/// verbatim in the content.
#[derive(Debug, Error)]
pub enum ReferenceError {
    /// `#[N]` points past the end of the tag list.
    #[error("tag index {index} out of range ({len} tags)")]
    TagIndexOutOfRange { index: usize, len: usize },

    /// Tag kind other than `e`, `a` or `p`.
    #[error("unsupported tag kind '{0}'")]
    UnsupportedTagKind(String),

    /// Tag has no value after its kind discriminator.
    #[error("tag '{0}' has no value")]
    MissingValue(String),

    /// `a` tag value is not `kind:pubkey:identifier`.
    #[error("malformed address '{value}': {reason}")]
    MalformedAddress { value: String, reason: String },

    /// Event id is empty or not hex.
    #[error("invalid event id '{value}': {reason}")]
    InvalidEventId { value: String, reason: String },

    /// Public key is not 32 bytes of hex.
    #[error("invalid public key '{value}': {reason}")]
    InvalidPublicKey { value: String, reason: String },

    /// Bech32 encoding or decoding failed.
    #[error("NIP-19 error: {0}")]
    Nip19(#[from] nostr_sdk::nips::nip19::Error),

    /// Raw bech32 `note` encoding or decoding failed.
    #[error("bech32 error: {0}")]
    Bech32(String),

    /// Bech32 entity that does not map to a reference (e.g. a secret key).
    #[error("unsupported bech32 entity")]
    UnsupportedEntity,
}

// Some nostr-sdk encoders cannot fail.
impl From<Infallible> for ReferenceError {
    fn from(e: Infallible) -> Self {
        match e {}
    }
}

/// A metadata event that could not be merged into the profile store.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The event content is not a JSON object with the expected shape.
    #[error("metadata event {event_id} from {pubkey} has invalid content: {source}")]
    InvalidContent {
        pubkey: String,
        event_id: String,
        #[source]
        source: serde_json::Error,
    },
}
