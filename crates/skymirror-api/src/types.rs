// Wire types for `app.bsky.feed.getPostThread`.
//
// Shapes mirror the AppView JSON envelope. Only the fields the mirror
// consumes are modeled; everything else is ignored by serde.

use serde::Deserialize;

/// Response envelope: `{ "thread": { ... } }`.
#[derive(Debug, Clone, Deserialize)]
pub struct ThreadResponse {
    pub thread: ThreadView,
}

/// One node of the thread tree: a post plus its direct replies.
///
/// `post` is optional because the live API substitutes union variants
/// (`notFoundPost`, `blockedPost`, ...) for posts it cannot show; those
/// nodes carry no `post` object and are skipped during conversion rather
/// than failing the whole parse. `replies` is absent for leaf nodes and
/// for brand-new threads — both deserialize to an empty list.
#[derive(Debug, Clone, Deserialize)]
pub struct ThreadView {
    #[serde(default)]
    pub post: Option<PostView>,
    #[serde(default)]
    pub replies: Vec<ThreadView>,
}

/// The post payload of a thread node.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub uri: String,
    pub author: AuthorView,
    #[serde(default)]
    pub record: PostRecord,
    #[serde(default)]
    pub indexed_at: String,
    #[serde(default)]
    pub reply_count: u64,
    #[serde(default)]
    pub repost_count: u64,
    #[serde(default)]
    pub like_count: u64,
}

/// Author identity as delivered by the AppView.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorView {
    pub handle: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// The record embedded in a post. Only the body text is consumed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostRecord {
    #[serde(default)]
    pub text: String,
}
