//! Profile metadata cache keyed by author pubkey.
//!
//! Entries are created lazily and only ever move forward in time: a kind 0
//! event replaces the stored avatar and display name when its `created_at`
//! is strictly newer than the entry's, regardless of arrival order.
//! The store is a cheap clonable handle; every merge runs under a single
//! write lock so the read-compare-write is never interleaved.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use nostr_sdk::nips::nip19::ToBech32;
use nostr_sdk::PublicKey;
use parking_lot::{RwLock, RwLockReadGuard};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info, warn};

use crate::error::{MetadataError, Result};
use crate::post::Post;
use crate::resolve::shorten_encoded_id;

/// Avatar shown when a profile has no picture: a dark filled circle.
pub const DEFAULT_PICTURE: &str = "data:image/svg+xml;utf-8,<svg viewBox=\"0 0 1024 1024\" xmlns=\"http://www.w3.org/2000/svg\"><circle cx=\"512\" cy=\"512\" r=\"512\" fill=\"%23333\" fill-rule=\"evenodd\" /></svg>";

// ── Data structures ──────────────────────────────────────────────

/// What the feed knows about one author.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileEntry {
    /// `created_at` of the metadata event this entry was built from (0 = never).
    pub timestamp: u64,
    /// Avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ProfileEntry {
    pub fn picture_or_default(&self) -> &str {
        self.picture.as_deref().unwrap_or(DEFAULT_PICTURE)
    }
}

/// Fields of kind 0 content the feed cares about.
///
/// Clients disagree on field names, so each value has a fallback order:
/// avatar is `image` then `picture`; name is `displayName`, then
/// `display_name`, then `name`. Empty strings and non-string values count
/// as absent.
#[derive(Debug, Default, Deserialize)]
struct MetadataContent {
    #[serde(default, deserialize_with = "non_empty_string")]
    image: Option<String>,
    #[serde(default, deserialize_with = "non_empty_string")]
    picture: Option<String>,
    #[serde(default, rename = "displayName", deserialize_with = "non_empty_string")]
    display_name_camel: Option<String>,
    #[serde(default, deserialize_with = "non_empty_string")]
    display_name: Option<String>,
    #[serde(default, deserialize_with = "non_empty_string")]
    name: Option<String>,
}

impl MetadataContent {
    fn avatar(&self) -> Option<String> {
        self.image.clone().or_else(|| self.picture.clone())
    }

    fn display_name(&self) -> Option<String> {
        self.display_name_camel
            .clone()
            .or_else(|| self.display_name.clone())
            .or_else(|| self.name.clone())
    }
}

fn non_empty_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    })
}

/// Outcome of a [`ProfileStore::merge_metadata`] batch.
#[derive(Debug, Default)]
pub struct MergeReport {
    /// Events that replaced an entry.
    pub applied: usize,
    /// Events not newer than the stored entry.
    pub stale: usize,
    /// Events that are not kind 0.
    pub ignored: usize,
    /// Events whose content could not be parsed; the store was not touched.
    pub failures: Vec<MetadataError>,
}

// ── Profiles (plain map) ─────────────────────────────────────────

/// The profile map itself. Read through a [`ProfileStore`] guard during
/// rendering so one pipeline run sees one consistent snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Profiles {
    entries: HashMap<String, ProfileEntry>,
}

impl Profiles {
    pub fn get(&self, pubkey_hex: &str) -> Option<&ProfileEntry> {
        self.entries.get(pubkey_hex)
    }

    /// Stored display name, if present and non-empty.
    pub fn display_name(&self, pubkey_hex: &str) -> Option<&str> {
        self.entries
            .get(pubkey_hex)
            .and_then(|entry| entry.name.as_deref())
            .filter(|name| !name.is_empty())
    }

    pub fn insert(&mut self, pubkey_hex: &str, entry: ProfileEntry) {
        self.entries.insert(pubkey_hex.to_string(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge one kind 0 event. Returns whether the entry was replaced.
    fn merge(&mut self, event: &Post) -> std::result::Result<bool, MetadataError> {
        let content: MetadataContent =
            serde_json::from_str(&event.content).map_err(|source| {
                MetadataError::InvalidContent {
                    pubkey: event.pubkey.clone(),
                    event_id: event.id.clone(),
                    source,
                }
            })?;

        let entry = self.entries.entry(event.pubkey.clone()).or_default();
        if entry.timestamp >= event.created_at {
            return Ok(false);
        }

        entry.timestamp = event.created_at;
        entry.picture = content.avatar();
        entry.name = content.display_name();
        Ok(true)
    }
}

// ── ProfileStore (shared handle) ─────────────────────────────────

/// Thread-safe handle to the profile map.
#[derive(Debug, Clone, Default)]
pub struct ProfileStore {
    inner: Arc<RwLock<Profiles>>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_profiles(profiles: Profiles) -> Self {
        Self {
            inner: Arc::new(RwLock::new(profiles)),
        }
    }

    /// Load a JSON snapshot. A missing file yields an empty store.
    pub fn load(path: &Path) -> Result<Self> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No profile snapshot at {}; starting empty", path.display());
                return Ok(Self::new());
            }
            Err(e) => return Err(e.into()),
        };
        let profiles: Profiles = serde_json::from_str(&json)?;
        info!(
            "Loaded {} profiles from {}",
            profiles.len(),
            path.display()
        );
        Ok(Self::from_profiles(profiles))
    }

    /// Write a JSON snapshot, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&*self.inner.read())?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        debug!("Saved profile snapshot to {}", path.display());
        Ok(())
    }

    /// Read guard over the whole map; hold it for the length of a render.
    pub fn read(&self) -> RwLockReadGuard<'_, Profiles> {
        self.inner.read()
    }

    pub fn get(&self, pubkey_hex: &str) -> Option<ProfileEntry> {
        self.inner.read().get(pubkey_hex).cloned()
    }

    pub fn display_name(&self, pubkey_hex: &str) -> Option<String> {
        self.inner.read().display_name(pubkey_hex).map(str::to_string)
    }

    /// Display name, or the shortened npub when none is known.
    pub fn display_name_or_short(&self, pubkey_hex: &str) -> String {
        if let Some(name) = self.display_name(pubkey_hex) {
            return name;
        }
        match PublicKey::from_hex(pubkey_hex).map(|pk| pk.to_bech32()) {
            Ok(Ok(npub)) => shorten_encoded_id(&npub),
            _ => shorten_encoded_id(pubkey_hex),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Merge a batch of kind 0 events in order under one write lock.
    pub fn merge_metadata<'a, I>(&self, events: I) -> MergeReport
    where
        I: IntoIterator<Item = &'a Post>,
    {
        let mut profiles = self.inner.write();
        let mut report = MergeReport::default();

        for event in events {
            if !event.is_metadata() {
                report.ignored += 1;
                continue;
            }
            match profiles.merge(event) {
                Ok(true) => report.applied += 1,
                Ok(false) => report.stale += 1,
                Err(e) => {
                    warn!("Skipping metadata event: {e}");
                    report.failures.push(e);
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::KIND_TEXT_NOTE;
    use tempfile::TempDir;

    const PUBKEY: &str = "82341f882b6eabcd2ba7f1ef90aad961cf074af15b9ef44a09f9d2a8fbfbe6a2";

    fn metadata(pubkey: &str, created_at: u64, content: &str) -> Post {
        Post {
            id: format!("ev{created_at}"),
            pubkey: pubkey.to_string(),
            created_at,
            kind: 0,
            tags: Vec::new(),
            content: content.to_string(),
        }
    }

    #[test]
    fn newer_event_wins_regardless_of_arrival_order() {
        let store = ProfileStore::new();
        let events = [
            metadata("aa", 100, r#"{"name":"new"}"#),
            metadata("aa", 50, r#"{"name":"old"}"#),
        ];
        let report = store.merge_metadata(&events);

        assert_eq!(report.applied, 1);
        assert_eq!(report.stale, 1);
        let entry = store.get("aa").unwrap();
        assert_eq!(entry.name.as_deref(), Some("new"));
        assert_eq!(entry.timestamp, 100);
    }

    #[test]
    fn equal_timestamp_does_not_overwrite() {
        let store = ProfileStore::new();
        store.merge_metadata(&[metadata("aa", 100, r#"{"name":"first"}"#)]);
        let report = store.merge_metadata(&[metadata("aa", 100, r#"{"name":"second"}"#)]);
        assert_eq!(report.stale, 1);
        assert_eq!(store.display_name("aa").as_deref(), Some("first"));
    }

    #[test]
    fn field_fallback_order() {
        let store = ProfileStore::new();
        store.merge_metadata(&[metadata(
            "aa",
            1,
            r#"{"displayName":"camel","display_name":"snake","name":"plain","image":"img","picture":"pic"}"#,
        )]);
        let entry = store.get("aa").unwrap();
        assert_eq!(entry.name.as_deref(), Some("camel"));
        assert_eq!(entry.picture.as_deref(), Some("img"));

        store.merge_metadata(&[metadata(
            "aa",
            2,
            r#"{"display_name":"snake","name":"plain","picture":"pic"}"#,
        )]);
        let entry = store.get("aa").unwrap();
        assert_eq!(entry.name.as_deref(), Some("snake"));
        assert_eq!(entry.picture.as_deref(), Some("pic"));

        store.merge_metadata(&[metadata("aa", 3, r#"{"displayName":"","name":"plain"}"#)]);
        let entry = store.get("aa").unwrap();
        assert_eq!(entry.name.as_deref(), Some("plain"));
        assert_eq!(entry.picture, None);
        assert_eq!(entry.picture_or_default(), DEFAULT_PICTURE);
    }

    #[test]
    fn non_string_fields_count_as_absent() {
        let store = ProfileStore::new();
        store.merge_metadata(&[metadata("aa", 1, r#"{"displayName":42,"name":"bob","image":null}"#)]);
        let entry = store.get("aa").unwrap();
        assert_eq!(entry.name.as_deref(), Some("bob"));
        assert_eq!(entry.picture, None);
    }

    #[test]
    fn invalid_json_is_reported_and_skipped() {
        let store = ProfileStore::new();
        store.merge_metadata(&[metadata("aa", 10, r#"{"name":"kept"}"#)]);

        let report = store.merge_metadata(&[
            metadata("aa", 20, "{broken"),
            metadata("bb", 5, "\"just a string\""),
        ]);

        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.applied, 0);
        assert_eq!(store.display_name("aa").as_deref(), Some("kept"));
        assert_eq!(store.get("aa").unwrap().timestamp, 10);
        assert!(store.get("bb").is_none());
    }

    #[test]
    fn non_metadata_events_are_ignored() {
        let store = ProfileStore::new();
        let mut note = metadata("aa", 10, r#"{"name":"x"}"#);
        note.kind = KIND_TEXT_NOTE;
        let report = store.merge_metadata(&[note]);
        assert_eq!(report.ignored, 1);
        assert!(store.is_empty());
    }

    #[test]
    fn missing_entry_lookups_do_not_fail() {
        let store = ProfileStore::new();
        assert!(store.get(PUBKEY).is_none());
        assert_eq!(store.display_name(PUBKEY), None);
        assert_eq!(store.display_name_or_short(PUBKEY), "npub1sg6...f63m");
        assert_eq!(store.display_name_or_short("not-hex-at-all"), "not-hex-...-all");
    }

    #[test]
    fn clones_share_state() {
        let store = ProfileStore::new();
        let handle = store.clone();
        handle.merge_metadata(&[metadata("aa", 1, r#"{"name":"shared"}"#)]);
        assert_eq!(store.display_name("aa").as_deref(), Some("shared"));
    }

    #[test]
    fn snapshot_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache").join("profiles.json");

        {
            let store = ProfileStore::load(&path).unwrap();
            assert!(store.is_empty());
            store.merge_metadata(&[metadata("ff", 500, r#"{"name":"Frank","picture":"p.png"}"#)]);
            store.save(&path).unwrap();
        }

        let reloaded = ProfileStore::load(&path).unwrap();
        let entry = reloaded.get("ff").unwrap();
        assert_eq!(entry.name.as_deref(), Some("Frank"));
        assert_eq!(entry.picture.as_deref(), Some("p.png"));
        assert_eq!(entry.timestamp, 500);
    }

    #[test]
    fn corrupt_snapshot_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("profiles.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(ProfileStore::load(&path).is_err());
    }
}
