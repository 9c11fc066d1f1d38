//! Render configuration.

use serde::{Deserialize, Serialize};

/// Base URL that profile and entity links point at.
pub const DEFAULT_LINK_BASE: &str = "https://nostr.com";

/// Settings shared by the rewriters and the markdown renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Links are built as `<link_base>/<bech32>`.
    #[serde(default = "default_link_base")]
    pub link_base: String,
    /// Turn bare URLs into links (GFM autolink literals).
    #[serde(default = "default_true")]
    pub autolink: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            link_base: default_link_base(),
            autolink: true,
        }
    }
}

impl RenderConfig {
    /// Link base without a trailing slash.
    pub fn link_base(&self) -> &str {
        self.link_base.trim_end_matches('/')
    }
}

fn default_link_base() -> String {
    DEFAULT_LINK_BASE.to_string()
}

fn default_true() -> bool {
    true
}
