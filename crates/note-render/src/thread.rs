//! Reply threads.

use crate::post::Post;

/// A note with its replies. Built upstream; acyclic by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedNote {
    pub note: Post,
    pub children: Vec<NestedNote>,
}

impl NestedNote {
    pub fn new(note: Post) -> Self {
        Self {
            note,
            children: Vec::new(),
        }
    }

    /// Number of descendants: direct replies plus all of their replies.
    pub fn total_children(&self) -> usize {
        let mut total = 0;
        let mut stack: Vec<&NestedNote> = vec![self];
        while let Some(node) = stack.pop() {
            total += node.children.len();
            stack.extend(node.children.iter());
        }
        total
    }
}

/// The note or addressable entity a reply thread hangs off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadRoot {
    /// Hex event id.
    Event(String),
    /// `kind:pubkey:identifier` coordinate.
    Address(String),
}

impl ThreadRoot {
    /// Marked root tag for a reply: `["e", id, "", "root"]` or `["a", coord, "", "root"]`.
    pub fn root_tag(&self) -> Vec<String> {
        let (kind, value) = match self {
            Self::Event(id) => ("e", id),
            Self::Address(coordinate) => ("a", coordinate),
        };
        vec![
            kind.to_string(),
            value.clone(),
            String::new(),
            "root".to_string(),
        ]
    }
}
