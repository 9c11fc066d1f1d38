//! Feed input and per-post output.
//!
//! A feed is a list of nostr events, either one JSON array or one event per
//! line. Kind 0 events feed the profile store; everything else is a note.
//! Notes are nested by their `e` tags into reply trees, newest root first.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone};
use note_render::{time_ago_at, ContentPipeline, NestedNote, Post, TagKind};
use serde::Serialize;

/// Parse a JSON array of events or newline-delimited events.
pub fn parse_feed(input: &str) -> Result<Vec<Post>> {
    let trimmed = input.trim_start();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).with_context(|| "Failed to parse feed JSON array");
    }

    let mut posts = Vec::new();
    for (number, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let post: Post = serde_json::from_str(line)
            .with_context(|| format!("Failed to parse event on line {}", number + 1))?;
        posts.push(post);
    }
    Ok(posts)
}

fn chronological(a: &Post, b: &Post) -> Ordering {
    a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id))
}

/// Parent of a reply among the notes in `position`.
///
/// A `reply`-marked `e` tag wins; otherwise the last `e` tag that points
/// at a note in the feed.
fn reply_parent(post: &Post, position: &HashMap<&str, usize>) -> Option<usize> {
    let in_feed = |tag: &&Vec<String>| {
        TagKind::of(tag) == TagKind::Event
            && tag.get(1).is_some_and(|id| *id != post.id && position.contains_key(id.as_str()))
    };
    let candidates: Vec<&Vec<String>> = post.tags.iter().filter(in_feed).collect();

    candidates
        .iter()
        .find(|tag| tag.get(3).map(String::as_str) == Some("reply"))
        .or(candidates.last())
        .and_then(|tag| position.get(tag[1].as_str()).copied())
}

/// Nest notes into reply trees. Duplicate ids keep the first copy.
///
/// A reply only attaches to a note that is strictly earlier in
/// `(created_at, id)` order, so the result is always a forest.
pub fn build_threads(posts: &[Post]) -> Vec<NestedNote> {
    let mut seen = HashSet::new();
    let mut notes: Vec<&Post> = posts
        .iter()
        .filter(|post| !post.is_metadata() && seen.insert(post.id.as_str()))
        .collect();
    notes.sort_by(|a, b| chronological(a, b));

    let position: HashMap<&str, usize> = notes
        .iter()
        .enumerate()
        .map(|(i, post)| (post.id.as_str(), i))
        .collect();
    let parents: Vec<Option<usize>> = notes
        .iter()
        .enumerate()
        .map(|(i, post)| reply_parent(post, &position).filter(|&parent| parent < i))
        .collect();

    let mut built: Vec<Option<NestedNote>> = notes
        .iter()
        .map(|post| Some(NestedNote::new((*post).clone())))
        .collect();
    let mut roots = Vec::new();

    // Latest first: by the time a note is detached all of its replies are
    // already attached to it.
    for i in (0..notes.len()).rev() {
        let Some(mut node) = built[i].take() else {
            continue;
        };
        node.children.reverse();
        match parents[i].and_then(|parent| built[parent].as_mut()) {
            Some(parent) => parent.children.push(node),
            None => roots.push(node),
        }
    }

    roots
}

/// One top-level post, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedPost {
    pub id: String,
    pub author: String,
    pub picture: String,
    pub time: String,
    pub replies: usize,
    pub html: String,
}

pub fn render_thread<Tz: TimeZone>(
    pipeline: &ContentPipeline,
    thread: &NestedNote,
    now: &DateTime<Tz>,
) -> RenderedPost {
    let post = &thread.note;
    let profiles = pipeline.profiles();
    let picture = profiles
        .get(&post.pubkey)
        .unwrap_or_default()
        .picture_or_default()
        .to_string();

    RenderedPost {
        id: post.id.clone(),
        author: profiles.display_name_or_short(&post.pubkey),
        picture,
        time: time_ago_at(post.created_at_millis(), now),
        replies: thread.total_children(),
        html: pipeline.render(post),
    }
}

pub fn render_feed<Tz: TimeZone>(
    pipeline: &ContentPipeline,
    threads: &[NestedNote],
    now: &DateTime<Tz>,
) -> Vec<RenderedPost> {
    threads
        .iter()
        .map(|thread| render_thread(pipeline, thread, now))
        .collect()
}

impl RenderedPost {
    /// Plain-text block for terminal output.
    pub fn to_text(&self) -> String {
        let replies = match self.replies {
            1 => "1 reply".to_string(),
            n => format!("{n} replies"),
        };
        format!(
            "{} · {} · {}\n{}",
            self.author,
            self.time,
            replies,
            self.html.trim_end()
        )
    }
}
