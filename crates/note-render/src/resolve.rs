//! Display fragments for resolved references.
//!
//! Everything the rewriters emit is built here: the shortened form of a
//! bech32 id, the link target, and the markdown link itself.

use nostr_sdk::nips::nip19::ToBech32;
use nostr_sdk::PublicKey;

use crate::config::RenderConfig;
use crate::error::ReferenceError;
use crate::profile::Profiles;
use crate::reference::NOSTR_URI_PREFIX;

/// First 8 characters, `...`, last 4 characters.
///
/// Inputs shorter than 12 characters overlap rather than panic.
pub fn shorten_encoded_id(encoded: &str) -> String {
    let chars: Vec<char> = encoded.chars().collect();
    let head: String = chars.iter().take(8).collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("{head}...{tail}")
}

/// Builds `[@text](<base>/<bech32>)` links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkBuilder {
    base: String,
}

impl Default for LinkBuilder {
    fn default() -> Self {
        Self::from_config(&RenderConfig::default())
    }
}

impl LinkBuilder {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(config.link_base())
    }

    /// Profile or entity page for a bech32 id.
    pub fn url(&self, encoded: &str) -> String {
        format!("{}/{}", self.base, encoded)
    }

    /// Markdown link with `@text` as its visible text.
    pub fn mention(&self, text: &str, encoded: &str) -> String {
        format!("[@{}]({})", escape_link_text(text), self.url(encoded))
    }

    /// Mention whose text is the shortened id itself.
    pub fn short_mention(&self, encoded: &str) -> String {
        self.mention(&shorten_encoded_id(encoded), encoded)
    }

    /// Mention of an author: profile display name if known and non-empty,
    /// otherwise the shortened npub.
    pub fn author_mention(
        &self,
        pubkey: &PublicKey,
        profiles: &Profiles,
    ) -> Result<String, ReferenceError> {
        let npub = pubkey.to_bech32()?;
        let text = match profiles.display_name(&pubkey.to_hex()) {
            Some(name) => name.to_string(),
            None => shorten_encoded_id(&npub),
        };
        Ok(self.mention(&text, &npub))
    }
}

/// Keep display names from closing the link text early, and from carrying
/// a `nostr:` URI the inline pass would rewrite inside the link.
fn escape_link_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '[' | ']') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.replace(NOSTR_URI_PREFIX, "nostr\\:")
}
