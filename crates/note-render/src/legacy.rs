//! Legacy positional mentions (NIP-08).
//!
//! `#[N]` is replaced according to the kind of the note's N-th tag:
//! - `e` becomes a `nostr:note1…` URI
//! - `a` becomes a `nostr:naddr1…` URI
//! - `p` becomes a markdown link to the author's profile
//!
//! Event and address references are emitted as `nostr:` URIs on purpose so
//! the inline pass turns them into links the same way as user-written ones.
//! Anything that does not resolve stays as written.

use tracing::debug;

use crate::error::ReferenceError;
use crate::profile::Profiles;
use crate::reference::Reference;
use crate::resolve::LinkBuilder;
use crate::scan::{legacy_markers, splice};

pub fn rewrite_legacy_mentions(
    content: &str,
    tags: &[Vec<String>],
    profiles: &Profiles,
    links: &LinkBuilder,
) -> String {
    let replacements = legacy_markers(content).into_iter().filter_map(|marker| {
        match resolve_marker(marker.index, tags, profiles, links) {
            Ok(replacement) => Some((marker.span, replacement)),
            Err(e) => {
                debug!("Leaving #[{}] verbatim: {e}", marker.index);
                None
            }
        }
    });
    splice(content, replacements)
}

fn resolve_marker(
    index: usize,
    tags: &[Vec<String>],
    profiles: &Profiles,
    links: &LinkBuilder,
) -> Result<String, ReferenceError> {
    let tag = tags.get(index).ok_or(ReferenceError::TagIndexOutOfRange {
        index,
        len: tags.len(),
    })?;

    match Reference::from_tag(tag)? {
        Reference::Author { pubkey } => links.author_mention(&pubkey, profiles),
        reference => reference.to_uri(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ProfileEntry;
    use crate::reference::NOSTR_URI_PREFIX;

    const PUBKEY: &str = "82341f882b6eabcd2ba7f1ef90aad961cf074af15b9ef44a09f9d2a8fbfbe6a2";
    const NPUB: &str = "npub1sg6plzptd64u62a878hep2kev88swjh3tw00gjsfl8f237lmu63q0uf63m";
    const EVENT_ID: &str = "a84c5de86efc2ec2cff7bad077c4171e09146b633b7ad117fffe088d9579ac33";

    fn tag(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn rewrite(content: &str, tags: &[Vec<String>]) -> String {
        rewrite_legacy_mentions(content, tags, &Profiles::default(), &LinkBuilder::default())
    }

    #[test]
    fn event_tag_becomes_note_uri() {
        let tags = vec![tag(&["e", EVENT_ID])];
        let result = rewrite("see #[0]", &tags);
        let expected = Reference::from_tag(&tags[0]).unwrap().to_uri().unwrap();
        assert_eq!(result, format!("see {expected}"));
        assert!(result.starts_with("see nostr:note1"));
    }

    #[test]
    fn address_tag_becomes_naddr_uri_that_decodes_back() {
        let tags = vec![tag(&["a", &format!("30023:{PUBKEY}:myid")])];
        let result = rewrite("read #[0]", &tags);
        let naddr = result
            .strip_prefix("read ")
            .and_then(|uri| uri.strip_prefix(NOSTR_URI_PREFIX))
            .unwrap();
        assert_eq!(
            Reference::decode(naddr).unwrap().coordinate_string().unwrap(),
            format!("30023:{PUBKEY}:myid")
        );
    }

    #[test]
    fn pubkey_tag_without_profile_uses_short_npub() {
        let tags = vec![tag(&["p", PUBKEY])];
        let result = rewrite("hello #[0]!", &tags);
        assert_eq!(
            result,
            format!("hello [@npub1sg6...f63m](https://nostr.com/{NPUB})!")
        );
    }

    #[test]
    fn pubkey_tag_with_profile_uses_display_name() {
        let tags = vec![tag(&["p", PUBKEY])];
        let mut profiles = Profiles::default();
        profiles.insert(
            PUBKEY,
            ProfileEntry {
                timestamp: 1,
                picture: None,
                name: Some("jack".into()),
            },
        );
        let result =
            rewrite_legacy_mentions("cc #[0]", &tags, &profiles, &LinkBuilder::default());
        assert_eq!(result, format!("cc [@jack](https://nostr.com/{NPUB})"));
    }

    #[test]
    fn short_hex_event_id_becomes_note_uri() {
        let tags = vec![tag(&["e", "abc123"])];
        let expected = Reference::from_tag(&tags[0]).unwrap().to_uri().unwrap();
        assert_eq!(rewrite("see #[0]", &tags), format!("see {expected}"));
    }

    #[test]
    fn out_of_range_marker_is_left_verbatim() {
        assert_eq!(rewrite("broken #[3]", &[]), "broken #[3]");
    }

    #[test]
    fn unknown_kind_and_malformed_tags_are_left_verbatim() {
        let tags = vec![
            tag(&["t", "nostr"]),
            tag(&["p"]),
            tag(&["e", "abc"]),
            tag(&["a", "30023:pub1:myid"]),
            tag(&["a", "not-an-address"]),
        ];
        let content = "#[0] #[1] #[2] #[3] #[4]";
        assert_eq!(rewrite(content, &tags), content);
    }

    #[test]
    fn mixed_markers_resolve_independently() {
        let tags = vec![
            tag(&["p", PUBKEY]),
            tag(&["t", "nostr"]),
            tag(&["e", EVENT_ID]),
        ];
        let result = rewrite("hello #[0], see #[2]? #[1] stays", &tags);
        assert!(result.contains("[@npub1sg6...f63m]"));
        assert!(result.contains("nostr:note1"));
        assert!(result.contains("#[1] stays"));
    }

    #[test]
    fn repeated_marker_is_rewritten_each_time() {
        let tags = vec![tag(&["e", EVENT_ID])];
        let result = rewrite("#[0] and #[0]", &tags);
        assert!(!result.contains("#[0]"));
        assert_eq!(result.matches("nostr:note1").count(), 2);
    }

    #[test]
    fn multi_digit_marker_is_not_a_marker() {
        let tags: Vec<Vec<String>> = (0..11).map(|_| tag(&["e", EVENT_ID])).collect();
        assert_eq!(rewrite("#[10]", &tags), "#[10]");
    }

    #[test]
    fn text_without_markers_is_unchanged() {
        assert_eq!(rewrite("", &[]), "");
        assert_eq!(rewrite("just plain text", &[]), "just plain text");
    }
}
