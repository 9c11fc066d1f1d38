//! Token scanning for note content.
//!
//! Scanning and rewriting are split: the scanners only report where tokens
//! are and what they carry, and [`splice`] applies replacements afterwards.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// NIP-08 positional mention: `#[` one digit `]`.
static LEGACY_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\[([0-9])\]").expect("legacy marker regex should compile"));

/// NIP-21 `nostr:` URI over the bech32 entities the renderer understands.
static NOSTR_URI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"nostr:((?:npub|nprofile|note|nevent|naddr)1[023456789acdefghjklmnpqrstuvwxyz]+)")
        .expect("nostr URI regex should compile")
});

/// A `#[N]` marker and the tag index it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyMarker {
    pub span: Range<usize>,
    pub index: usize,
}

/// A `nostr:` URI and its bech32 payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriToken<'a> {
    pub span: Range<usize>,
    pub bech32: &'a str,
}

pub fn legacy_markers(text: &str) -> Vec<LegacyMarker> {
    LEGACY_MARKER_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let index = caps[1].parse().ok()?;
            Some(LegacyMarker {
                span: whole.range(),
                index,
            })
        })
        .collect()
}

pub fn nostr_uris(text: &str) -> Vec<UriToken<'_>> {
    NOSTR_URI_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let bech32 = caps.get(1)?.as_str();
            Some(UriToken {
                span: whole.range(),
                bech32,
            })
        })
        .collect()
}

/// Replace spans of `text`. Spans must be in ascending order and must not
/// overlap; text outside them is copied unchanged.
pub fn splice<I>(text: &str, replacements: I) -> String
where
    I: IntoIterator<Item = (Range<usize>, String)>,
{
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for (span, replacement) in replacements {
        out.push_str(&text[cursor..span.start]);
        out.push_str(&replacement);
        cursor = span.end;
    }
    out.push_str(&text[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_single_digit_markers() {
        let markers = legacy_markers("hi #[0] and #[9]");
        assert_eq!(
            markers,
            vec![
                LegacyMarker { span: 3..7, index: 0 },
                LegacyMarker { span: 12..16, index: 9 },
            ]
        );
    }

    #[test]
    fn ignores_multi_digit_and_malformed_markers() {
        assert!(legacy_markers("#[10] #[] #[a] #[-1] [0] #0").is_empty());
    }

    #[test]
    fn finds_nostr_uris() {
        let npub = "npub1sg6plzptd64u62a878hep2kev88swjh3tw00gjsfl8f237lmu63q0uf63m";
        let text = format!("hey nostr:{npub}, bye");
        let tokens = nostr_uris(&text);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].bech32, npub);
        assert_eq!(&text[tokens[0].span.clone()], format!("nostr:{npub}"));
    }

    #[test]
    fn skips_unknown_entities_and_bare_bech32() {
        assert!(nostr_uris("nostr:nsec1abc nostr:lnurl1abc npub1qqqq").is_empty());
    }

    #[test]
    fn stops_at_non_bech32_chars() {
        let tokens = nostr_uris("nostr:note1qqqqb.");
        assert_eq!(tokens[0].bech32, "note1qqqq");
    }

    #[test]
    fn splice_replaces_in_order() {
        let text = "a #[0] b #[1] c";
        let out = splice(
            text,
            vec![(2..6, "X".to_string()), (9..13, "YY".to_string())],
        );
        assert_eq!(out, "a X b YY c");
    }

    #[test]
    fn splice_without_replacements_is_identity() {
        assert_eq!(splice("unchanged", Vec::new()), "unchanged");
        assert_eq!(splice("", Vec::new()), "");
    }
}
