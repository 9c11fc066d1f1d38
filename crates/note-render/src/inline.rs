//! Inline `nostr:` references (NIP-27) to markdown links.

use tracing::debug;

use crate::reference::Reference;
use crate::resolve::LinkBuilder;
use crate::scan::{nostr_uris, splice};

/// Replace every decodable `nostr:<bech32>` with `[@<short>](<base>/<bech32>)`.
///
/// The link text is always the shortened bech32, profile names are not
/// consulted here. Tokens that fail to decode are left untouched.
pub fn rewrite_inline_references(content: &str, links: &LinkBuilder) -> String {
    let replacements = nostr_uris(content).into_iter().filter_map(|token| {
        match Reference::decode(token.bech32) {
            Ok(_) => Some((token.span, links.short_mention(token.bech32))),
            Err(e) => {
                debug!("Leaving nostr:{} verbatim: {e}", token.bech32);
                None
            }
        }
    });
    splice(content, replacements)
}
