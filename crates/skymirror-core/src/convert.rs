// ── Wire → domain conversion ──
//
// Flattens the AppView envelope into the canonical tree. Reply nodes
// without a `post` object (blocked / not-found union variants) are
// skipped; their subtrees go with them.

use chrono::{DateTime, Utc};

use skymirror_api::types::{PostView, ThreadResponse, ThreadView};

use crate::model::{Author, EngagementCounts, ThreadNode};

/// Extract the root's reply list from a thread response.
///
/// The root post itself is not part of the mirror's output -- the host
/// page already shows it -- so only `thread.replies` is converted.
pub fn thread_replies(resp: ThreadResponse) -> Vec<ThreadNode> {
    views_to_nodes(resp.thread.replies)
}

fn views_to_nodes(views: Vec<ThreadView>) -> Vec<ThreadNode> {
    views.into_iter().filter_map(node_from_view).collect()
}

fn node_from_view(view: ThreadView) -> Option<ThreadNode> {
    let post = view.post?;
    let children = views_to_nodes(view.replies);
    Some(node_from_post(post, children))
}

fn node_from_post(post: PostView, children: Vec<ThreadNode>) -> ThreadNode {
    let display_name = match post.author.display_name {
        Some(name) if !name.trim().is_empty() => name,
        // The web app falls back to the handle when no display name is set.
        _ => post.author.handle.clone(),
    };

    ThreadNode {
        uri: post.uri,
        author: Author {
            handle: post.author.handle,
            display_name,
            avatar_url: post.author.avatar,
        },
        text: post.record.text,
        published_at: parse_timestamp(&post.indexed_at),
        counts: EngagementCounts {
            replies: post.reply_count,
            reposts: post.repost_count,
            likes: post.like_count,
        },
        children,
    }
}

/// Parse an RFC 3339 timestamp, degrading to the Unix epoch when the
/// payload carries something unparsable.
fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}
