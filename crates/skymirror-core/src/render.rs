// ── Thread rendering ──
//
// Recursive, depth-bounded HTML rendering of a reply tree. Depth is an
// explicit parameter: the root reply level renders at depth 1, and a
// node at the boundary depth stops descending -- if it has fetched
// children OR a nonzero server-reported reply count, a single
// continue-on-Bluesky link stands in for the rest of its branch. The
// count check matters: the fetched tree may be shallower than the real
// thread, so the link fires even when no nested nodes arrived.
//
// Sibling order is preserved exactly as delivered; no re-sorting by
// recency or engagement at any level.

use chrono::{DateTime, Utc};

use crate::config::MirrorConfig;
use crate::model::ThreadNode;
use crate::translate::post_web_url;

/// Rendering knobs, derived from [`MirrorConfig`] for mounted views.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Maximum nesting level rendered locally (≥ 1).
    pub depth_limit: usize,
    /// Escape body text before embedding. Disabling trusts the payload.
    pub escape_body: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            depth_limit: crate::config::DEFAULT_DEPTH_LIMIT,
            escape_body: true,
        }
    }
}

impl From<&MirrorConfig> for RenderOptions {
    fn from(cfg: &MirrorConfig) -> Self {
        Self {
            depth_limit: cfg.depth_limit,
            escape_body: cfg.escape_body,
        }
    }
}

/// Render a reply tree to an HTML fragment for the list region.
pub fn render_thread(nodes: &[ThreadNode], opts: &RenderOptions) -> String {
    render_thread_at(nodes, opts, Utc::now())
}

/// Render with an explicit "now" for deterministic relative timestamps.
pub fn render_thread_at(nodes: &[ThreadNode], opts: &RenderOptions, now: DateTime<Utc>) -> String {
    if nodes.is_empty() {
        return "<p class=\"skymirror-empty\">No comments yet.</p>\n".to_owned();
    }

    let mut out = String::new();
    out.push_str("<ol class=\"skymirror-thread\">\n");
    for node in nodes {
        render_node(&mut out, node, 1, opts, now);
    }
    out.push_str("</ol>\n");
    out
}

fn render_node(
    out: &mut String,
    node: &ThreadNode,
    depth: usize,
    opts: &RenderOptions,
    now: DateTime<Utc>,
) {
    let url = post_web_url(&node.uri, &node.author.handle);

    out.push_str("<li class=\"skymirror-comment\">\n");
    render_header(out, node, now);
    render_body(out, node, opts);
    render_counts(out, node, &url);

    // Boundary: stop descending here. The link also fires when the
    // fetched tree has no further nodes but the server-reported count
    // says more replies exist remotely.
    let at_boundary = depth >= opts.depth_limit;
    let has_more = !node.children.is_empty() || node.counts.replies > 0;

    if at_boundary && has_more {
        out.push_str(&format!(
            "<a class=\"skymirror-continue\" href=\"{}\">Continue thread on Bluesky</a>\n",
            escape_html(&url)
        ));
    } else if !node.children.is_empty() {
        out.push_str("<ol class=\"skymirror-replies\">\n");
        for child in &node.children {
            render_node(out, child, depth + 1, opts, now);
        }
        out.push_str("</ol>\n");
    }

    out.push_str("</li>\n");
}

fn render_header(out: &mut String, node: &ThreadNode, now: DateTime<Utc>) {
    out.push_str("<header class=\"skymirror-author\">\n");
    if let Some(ref avatar) = node.author.avatar_url {
        out.push_str(&format!(
            "<img class=\"skymirror-avatar\" src=\"{}\" alt=\"\">\n",
            escape_html(avatar)
        ));
    }
    out.push_str(&format!(
        "<span class=\"skymirror-name\">{}</span>\n",
        escape_html(&node.author.display_name)
    ));
    out.push_str(&format!(
        "<span class=\"skymirror-handle\">@{}</span>\n",
        escape_html(&node.author.handle)
    ));
    out.push_str(&format!(
        "<time class=\"skymirror-published\" datetime=\"{}\">{}</time>\n",
        node.published_at.to_rfc3339(),
        relative_time(node.published_at, now)
    ));
    out.push_str("</header>\n");
}

fn render_body(out: &mut String, node: &ThreadNode, opts: &RenderOptions) {
    let body = if opts.escape_body {
        escape_html(&node.text)
    } else {
        node.text.clone()
    };
    out.push_str(&format!("<p class=\"skymirror-body\">{body}</p>\n"));
}

/// Three engagement counters, each a deep link to the post itself.
fn render_counts(out: &mut String, node: &ThreadNode, url: &str) {
    let href = escape_html(url);
    out.push_str("<footer class=\"skymirror-counts\">\n");
    out.push_str(&format!(
        "<a class=\"skymirror-count-replies\" href=\"{href}\">{} replies</a>\n",
        node.counts.replies
    ));
    out.push_str(&format!(
        "<a class=\"skymirror-count-reposts\" href=\"{href}\">{} reposts</a>\n",
        node.counts.reposts
    ));
    out.push_str(&format!(
        "<a class=\"skymirror-count-likes\" href=\"{href}\">{} likes</a>\n",
        node.counts.likes
    ));
    out.push_str("</footer>\n");
}

/// Minimal HTML entity escaping for text and attribute positions.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Human-readable age of a timestamp ("just now", "5m ago", "3d ago"),
/// falling back to an absolute date past thirty days.
pub fn relative_time(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = now.signed_duration_since(ts).num_seconds();
    if secs < 60 {
        // Covers clock skew: slightly-future timestamps read as fresh.
        "just now".to_owned()
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else if secs < 86_400 {
        format!("{}h ago", secs / 3600)
    } else if secs < 30 * 86_400 {
        format!("{}d ago", secs / 86_400)
    } else {
        ts.format("%b %-d, %Y").to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{Author, EngagementCounts, ThreadNode};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn node(rkey: &str, text: &str, replies: u64, children: Vec<ThreadNode>) -> ThreadNode {
        ThreadNode {
            uri: format!("at://did:plc:t/app.bsky.feed.post/{rkey}"),
            author: Author {
                handle: "alice.bsky.social".into(),
                display_name: "Alice".into(),
                avatar_url: Some("https://cdn.test/a.jpg".into()),
            },
            text: text.into(),
            published_at: Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap(),
            counts: EngagementCounts {
                replies,
                reposts: 2,
                likes: 7,
            },
            children,
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn empty_thread_renders_placeholder() {
        let html = render_thread_at(&[], &RenderOptions::default(), fixed_now());
        assert_eq!(html, "<p class=\"skymirror-empty\">No comments yet.</p>\n");
    }

    #[test]
    fn renders_author_body_counts_and_timestamp() {
        let html = render_thread_at(
            &[node("r1", "hello world", 0, vec![])],
            &RenderOptions::default(),
            fixed_now(),
        );

        assert!(html.contains("<span class=\"skymirror-name\">Alice</span>"));
        assert!(html.contains("@alice.bsky.social"));
        assert!(html.contains("<p class=\"skymirror-body\">hello world</p>"));
        assert!(html.contains(">0 replies</a>"));
        assert!(html.contains(">2 reposts</a>"));
        assert!(html.contains(">7 likes</a>"));
        assert!(html.contains("2h ago"));
        assert!(
            html.contains("href=\"https://bsky.app/profile/alice.bsky.social/post/r1\""),
            "counters should deep-link to the post: {html}"
        );
    }

    #[test]
    fn depth_limit_truncates_with_single_continue_link() {
        // Two direct replies; the first nests four levels deep. With
        // limit 3: depths 1-3 render, depth 4 does not, and exactly one
        // continuation link appears on the depth-3 node that has more.
        let deep = node(
            "d1",
            "depth 1",
            1,
            vec![node(
                "d2",
                "depth 2",
                1,
                vec![node("d3", "depth 3", 1, vec![node("d4", "depth 4", 0, vec![])])],
            )],
        );
        let flat = node("f1", "flat", 0, vec![]);

        let opts = RenderOptions {
            depth_limit: 3,
            ..RenderOptions::default()
        };
        let html = render_thread_at(&[deep, flat], &opts, fixed_now());

        assert!(html.contains("depth 1"));
        assert!(html.contains("depth 2"));
        assert!(html.contains("depth 3"));
        assert!(!html.contains("depth 4"));
        assert_eq!(html.matches("skymirror-continue").count(), 1);
        assert!(html.contains("https://bsky.app/profile/alice.bsky.social/post/d3"));
    }

    #[test]
    fn boundary_leaf_without_reply_count_gets_no_link() {
        let chain = node(
            "c1",
            "one",
            1,
            vec![node("c2", "two", 1, vec![node("c3", "three", 0, vec![])])],
        );

        let opts = RenderOptions {
            depth_limit: 3,
            ..RenderOptions::default()
        };
        let html = render_thread_at(&[chain], &opts, fixed_now());

        assert!(html.contains("three"));
        assert_eq!(html.matches("skymirror-continue").count(), 0);
    }

    #[test]
    fn boundary_count_fires_link_even_without_fetched_children() {
        // The server says replies exist but the fetched tree stops here.
        let truncated = node("t1", "shallow", 5, vec![]);

        let opts = RenderOptions {
            depth_limit: 1,
            ..RenderOptions::default()
        };
        let html = render_thread_at(&[truncated], &opts, fixed_now());

        assert_eq!(html.matches("skymirror-continue").count(), 1);
    }

    #[test]
    fn body_is_escaped_by_default() {
        let html = render_thread_at(
            &[node("x", "<script>alert('x')</script> & more", 0, vec![])],
            &RenderOptions::default(),
            fixed_now(),
        );

        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; more"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn raw_body_is_explicit_opt_in() {
        let opts = RenderOptions {
            escape_body: false,
            ..RenderOptions::default()
        };
        let html = render_thread_at(&[node("x", "<em>styled</em>", 0, vec![])], &opts, fixed_now());

        assert!(html.contains("<p class=\"skymirror-body\"><em>styled</em></p>"));
    }

    #[test]
    fn sibling_order_is_preserved() {
        let html = render_thread_at(
            &[
                node("first", "aaa", 0, vec![]),
                node("second", "zzz", 0, vec![]),
                node("third", "mmm", 0, vec![]),
            ],
            &RenderOptions::default(),
            fixed_now(),
        );

        let a = html.find("aaa").unwrap();
        let z = html.find("zzz").unwrap();
        let m = html.find("mmm").unwrap();
        assert!(a < z && z < m);
    }

    #[test]
    fn default_counts_render_as_zero() {
        let mut n = node("z", "no counters", 0, vec![]);
        n.counts = EngagementCounts::default();

        let html = render_thread_at(&[n], &RenderOptions::default(), fixed_now());

        assert!(html.contains(">0 replies</a>"));
        assert!(html.contains(">0 reposts</a>"));
        assert!(html.contains(">0 likes</a>"));
    }

    #[test]
    fn relative_time_tiers() {
        let now = fixed_now();
        let at = |secs: i64| now - chrono::Duration::seconds(secs);

        assert_eq!(relative_time(at(10), now), "just now");
        assert_eq!(relative_time(at(5 * 60), now), "5m ago");
        assert_eq!(relative_time(at(3 * 3600), now), "3h ago");
        assert_eq!(relative_time(at(2 * 86_400), now), "2d ago");
        assert_eq!(relative_time(at(90 * 86_400), now), "Mar 17, 2024");
    }
}
