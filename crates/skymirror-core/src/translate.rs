// ── Identifier translation ──
//
// AT-URIs are protocol-native identifiers
// (`at://did:plc:abc123/app.bsky.feed.post/xyz789`); humans navigate via
// the web app (`https://bsky.app/profile/<handle>/post/<rkey>`). The
// translation is pure string work: no I/O, no failure path.

/// Base URL of the human-navigable web app.
pub const WEB_APP_BASE: &str = "https://bsky.app";

/// Compose the web URL for a post from its AT-URI and author handle.
///
/// The record key is the trailing path segment of the URI. Malformed
/// input yields a best-effort URL from whatever trailing segment exists
/// rather than an error -- a degraded link beats an aborted render.
/// Deterministic and idempotent for identical inputs.
pub fn post_web_url(uri: &str, author_handle: &str) -> String {
    let record_key = uri
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(uri);
    format!("{WEB_APP_BASE}/profile/{author_handle}/post/{record_key}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_uri() {
        assert_eq!(
            post_web_url(
                "at://did:plc:abc123/app.bsky.feed.post/xyz789",
                "alice.bsky.social"
            ),
            "https://bsky.app/profile/alice.bsky.social/post/xyz789"
        );
    }

    #[test]
    fn translation_is_deterministic() {
        let first = post_web_url(
            "at://did:plc:abc123/app.bsky.feed.post/xyz789",
            "alice.bsky.social",
        );
        let second = post_web_url(
            "at://did:plc:abc123/app.bsky.feed.post/xyz789",
            "alice.bsky.social",
        );
        assert_eq!(first, second);
    }

    #[test]
    fn trailing_slash_is_ignored() {
        assert_eq!(
            post_web_url("at://did:plc:abc123/app.bsky.feed.post/xyz789/", "a.test"),
            "https://bsky.app/profile/a.test/post/xyz789"
        );
    }

    #[test]
    fn segmentless_uri_degrades_to_itself() {
        assert_eq!(
            post_web_url("xyz789", "a.test"),
            "https://bsky.app/profile/a.test/post/xyz789"
        );
    }

    #[test]
    fn empty_uri_never_panics() {
        assert_eq!(
            post_web_url("", "a.test"),
            "https://bsky.app/profile/a.test/post/"
        );
    }
}
