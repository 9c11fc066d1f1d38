//! References to events, addressable entities and authors.
//!
//! A [`Reference`] is built either from a positional tag (`["e", id]`,
//! `["a", "kind:pubkey:identifier"]`, `["p", pubkey]`) or by decoding a
//! NIP-19 bech32 token. Authors and addresses go through nostr-sdk.
//!
//! Event ids are carried as hex of any non-empty byte length and encoded
//! straight to `note1…`, so a short or legacy id still gets a token.

use bech32::{Bech32, Hrp};
use nostr_sdk::nips::nip01::Coordinate;
use nostr_sdk::nips::nip19::{FromBech32, Nip19, Nip19Coordinate, ToBech32};
use nostr_sdk::{Kind, PublicKey};

use crate::error::ReferenceError;
use crate::post::TagKind;

/// Scheme prefix of inline references (NIP-21).
pub const NOSTR_URI_PREFIX: &str = "nostr:";

const NOTE_HRP: Hrp = Hrp::parse_unchecked("note");

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// `note1…` / `nevent1…`. `id` is lowercase hex.
    Event { id: String },
    /// `naddr1…`.
    Addressable {
        kind: u16,
        author: PublicKey,
        identifier: String,
    },
    /// `npub1…` / `nprofile1…`.
    Author { pubkey: PublicKey },
}

impl Reference {
    /// Build a reference from a tag. The tag kind decides the payload format.
    pub fn from_tag(tag: &[String]) -> Result<Self, ReferenceError> {
        let value = || {
            tag.get(1)
                .ok_or_else(|| ReferenceError::MissingValue(tag[0].clone()))
        };

        match TagKind::of(tag) {
            TagKind::Event => Ok(Self::Event {
                id: parse_event_id(value()?)?,
            }),
            TagKind::Address => Self::parse_address(value()?),
            TagKind::Pubkey => Ok(Self::Author {
                pubkey: parse_pubkey(value()?)?,
            }),
            TagKind::Other => Err(ReferenceError::UnsupportedTagKind(
                tag.first().cloned().unwrap_or_default(),
            )),
        }
    }

    /// Parse a `kind:pubkey:identifier` coordinate string.
    ///
    /// Kind and pubkey never contain colons, so everything after the second
    /// colon belongs to the identifier.
    pub fn parse_address(value: &str) -> Result<Self, ReferenceError> {
        let malformed = |reason: &str| ReferenceError::MalformedAddress {
            value: value.to_string(),
            reason: reason.to_string(),
        };

        let mut parts = value.splitn(3, ':');
        let (Some(kind), Some(author), Some(identifier)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed("expected kind:pubkey:identifier"));
        };

        let kind: u16 = kind
            .parse()
            .map_err(|_| malformed("kind is not a number"))?;

        Ok(Self::Addressable {
            kind,
            author: parse_pubkey(author)?,
            identifier: identifier.to_string(),
        })
    }

    /// Decode a bare bech32 token (without the `nostr:` prefix).
    pub fn decode(bech32: &str) -> Result<Self, ReferenceError> {
        if bech32.starts_with("note1") {
            return decode_note(bech32);
        }
        match Nip19::from_bech32(bech32)? {
            Nip19::Pubkey(pubkey) => Ok(Self::Author { pubkey }),
            Nip19::Profile(profile) => Ok(Self::Author {
                pubkey: profile.public_key,
            }),
            Nip19::EventId(id) => Ok(Self::Event { id: id.to_hex() }),
            Nip19::Event(event) => Ok(Self::Event {
                id: event.event_id.to_hex(),
            }),
            Nip19::Coordinate(naddr) => {
                let coordinate = naddr.coordinate;
                Ok(Self::Addressable {
                    kind: coordinate.kind.as_u16(),
                    author: coordinate.public_key,
                    identifier: coordinate.identifier,
                })
            }
            _ => Err(ReferenceError::UnsupportedEntity),
        }
    }

    /// Canonical bech32 form: `note1…`, `naddr1…` or `npub1…`.
    pub fn encode(&self) -> Result<String, ReferenceError> {
        let encoded = match self {
            Self::Event { id } => encode_note(id)?,
            Self::Addressable {
                kind,
                author,
                identifier,
            } => {
                let coordinate =
                    Coordinate::new(Kind::from(*kind), *author).identifier(identifier.clone());
                Nip19Coordinate::new(coordinate, Vec::new()).to_bech32()?
            }
            Self::Author { pubkey } => pubkey.to_bech32()?,
        };
        Ok(encoded)
    }

    /// Canonical inline token: `nostr:` followed by [`Reference::encode`].
    pub fn to_uri(&self) -> Result<String, ReferenceError> {
        Ok(format!("{NOSTR_URI_PREFIX}{}", self.encode()?))
    }

    /// `kind:pubkey:identifier` for addressable references.
    pub fn coordinate_string(&self) -> Option<String> {
        match self {
            Self::Addressable {
                kind,
                author,
                identifier,
            } => Some(format!("{kind}:{}:{identifier}", author.to_hex())),
            _ => None,
        }
    }
}

/// Decode an `naddr1…` token back into its `kind:pubkey:identifier` string.
pub fn replaceable_id(naddr: &str) -> Result<String, ReferenceError> {
    let bech32 = naddr.strip_prefix(NOSTR_URI_PREFIX).unwrap_or(naddr);
    Reference::decode(bech32)?
        .coordinate_string()
        .ok_or(ReferenceError::UnsupportedEntity)
}

/// Hex payload of an `e` tag, normalized to lowercase.
fn parse_event_id(value: &str) -> Result<String, ReferenceError> {
    let invalid = |reason: String| ReferenceError::InvalidEventId {
        value: value.to_string(),
        reason,
    };
    let bytes = hex::decode(value).map_err(|e| invalid(e.to_string()))?;
    if bytes.is_empty() {
        return Err(invalid("empty id".to_string()));
    }
    Ok(hex::encode(bytes))
}

fn encode_note(id_hex: &str) -> Result<String, ReferenceError> {
    let bytes = hex::decode(id_hex).map_err(|e| ReferenceError::InvalidEventId {
        value: id_hex.to_string(),
        reason: e.to_string(),
    })?;
    bech32::encode::<Bech32>(NOTE_HRP, &bytes).map_err(|e| ReferenceError::Bech32(e.to_string()))
}

fn decode_note(token: &str) -> Result<Reference, ReferenceError> {
    let (hrp, bytes) = bech32::decode(token).map_err(|e| ReferenceError::Bech32(e.to_string()))?;
    if hrp != NOTE_HRP || bytes.is_empty() {
        return Err(ReferenceError::UnsupportedEntity);
    }
    Ok(Reference::Event {
        id: hex::encode(bytes),
    })
}

fn parse_pubkey(value: &str) -> Result<PublicKey, ReferenceError> {
    PublicKey::from_hex(value).map_err(|e| ReferenceError::InvalidPublicKey {
        value: value.to_string(),
        reason: e.to_string(),
    })
}
