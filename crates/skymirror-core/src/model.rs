// ── Domain model ──
//
// Canonical thread types, decoupled from the AppView wire shapes in
// `skymirror-api`. A tree is built fresh at the start of every fetch
// cycle and discarded wholesale at the start of the next one; nothing
// here is merged incrementally.

use chrono::{DateTime, Utc};

/// One post in the discussion tree: a root-level reply or a nested reply.
///
/// `children` is an ownership relationship -- dropping a node drops its
/// entire subtree. Sibling order is exactly the order the API delivered
/// (chronological); it is never re-sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadNode {
    /// Canonical AT-URI, unique per post, immutable.
    pub uri: String,
    pub author: Author,
    /// Post body, plain text.
    pub text: String,
    pub published_at: DateTime<Utc>,
    pub counts: EngagementCounts,
    pub children: Vec<ThreadNode>,
}

/// Author identity of a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub handle: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

/// Engagement counters. Unsigned by construction; absent payload fields
/// arrive here as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngagementCounts {
    pub replies: u64,
    pub reposts: u64,
    pub likes: u64,
}

impl ThreadNode {
    /// Total number of nodes in this subtree, the node itself included.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(ThreadNode::subtree_len)
            .sum::<usize>()
    }
}
