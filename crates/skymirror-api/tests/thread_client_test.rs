#![allow(clippy::unwrap_used)]
// Integration tests for `ThreadClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use skymirror_api::{ClientConfig, Error, ThreadClient};

// ── Helpers ─────────────────────────────────────────────────────────

const ROOT_URI: &str = "at://did:plc:abc123/app.bsky.feed.post/xyz789";
const THREAD_PATH: &str = "/xrpc/app.bsky.feed.getPostThread";

async fn setup() -> (MockServer, ThreadClient) {
    let server = MockServer::start().await;
    let client = ThreadClient::new(ClientConfig {
        base_url: server.uri(),
        ..ClientConfig::default()
    })
    .unwrap();
    (server, client)
}

fn reply(uri: &str, handle: &str, text: &str, replies: serde_json::Value) -> serde_json::Value {
    json!({
        "post": {
            "uri": uri,
            "author": { "handle": handle, "displayName": "Test User", "avatar": "https://cdn.test/a.jpg" },
            "record": { "text": text },
            "indexedAt": "2024-06-15T10:30:00Z",
            "replyCount": 0,
            "repostCount": 0,
            "likeCount": 1
        },
        "replies": replies
    })
}

// ── Success path ────────────────────────────────────────────────────

#[tokio::test]
async fn fetches_nested_reply_tree() {
    let (server, client) = setup().await;

    let envelope = json!({
        "thread": {
            "post": {
                "uri": ROOT_URI,
                "author": { "handle": "alice.bsky.social", "displayName": "Alice" },
                "record": { "text": "root post" },
                "indexedAt": "2024-06-15T10:00:00Z",
                "replyCount": 2,
                "repostCount": 1,
                "likeCount": 9
            },
            "replies": [
                reply("at://did:plc:b/app.bsky.feed.post/r1", "bob.bsky.social", "first", json!([
                    reply("at://did:plc:c/app.bsky.feed.post/r1a", "carol.bsky.social", "nested", json!([]))
                ])),
                reply("at://did:plc:d/app.bsky.feed.post/r2", "dave.bsky.social", "second", json!([]))
            ]
        }
    });

    Mock::given(method("GET"))
        .and(path(THREAD_PATH))
        .and(query_param("uri", ROOT_URI))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&envelope))
        .mount(&server)
        .await;

    let resp = client.get_post_thread(ROOT_URI).await.unwrap();

    let root = resp.thread.post.unwrap();
    assert_eq!(root.uri, ROOT_URI);
    assert_eq!(root.author.handle, "alice.bsky.social");
    assert_eq!(root.reply_count, 2);

    assert_eq!(resp.thread.replies.len(), 2);
    let first = &resp.thread.replies[0];
    assert_eq!(first.post.as_ref().unwrap().record.text, "first");
    assert_eq!(first.replies.len(), 1);
    assert_eq!(
        first.replies[0].post.as_ref().unwrap().author.handle,
        "carol.bsky.social"
    );
    assert!(resp.thread.replies[1].replies.is_empty());
}

#[tokio::test]
async fn absent_replies_deserialize_as_empty() {
    let (server, client) = setup().await;

    // Brand-new thread: no `replies` key at all.
    let envelope = json!({
        "thread": {
            "post": {
                "uri": ROOT_URI,
                "author": { "handle": "alice.bsky.social" },
                "record": { "text": "lonely post" },
                "indexedAt": "2024-06-15T10:00:00Z"
            }
        }
    });

    Mock::given(method("GET"))
        .and(path(THREAD_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(&envelope))
        .mount(&server)
        .await;

    let resp = client.get_post_thread(ROOT_URI).await.unwrap();
    assert!(resp.thread.replies.is_empty());

    // Counts absent from the payload default to zero.
    let post = resp.thread.post.unwrap();
    assert_eq!(post.reply_count, 0);
    assert_eq!(post.like_count, 0);
}

#[tokio::test]
async fn blocked_reply_node_parses_without_post() {
    let (server, client) = setup().await;

    let envelope = json!({
        "thread": {
            "post": {
                "uri": ROOT_URI,
                "author": { "handle": "alice.bsky.social" },
                "record": { "text": "root" },
                "indexedAt": "2024-06-15T10:00:00Z"
            },
            "replies": [
                { "$type": "app.bsky.feed.defs#blockedPost", "uri": "at://did:plc:x/app.bsky.feed.post/gone", "blocked": true },
                reply("at://did:plc:b/app.bsky.feed.post/ok", "bob.bsky.social", "visible", json!([]))
            ]
        }
    });

    Mock::given(method("GET"))
        .and(path(THREAD_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(&envelope))
        .mount(&server)
        .await;

    let resp = client.get_post_thread(ROOT_URI).await.unwrap();
    assert_eq!(resp.thread.replies.len(), 2);
    assert!(resp.thread.replies[0].post.is_none());
    assert!(resp.thread.replies[1].post.is_some());
}

// ── Error paths ─────────────────────────────────────────────────────

#[tokio::test]
async fn server_error_carries_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(THREAD_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = client.get_post_thread(ROOT_URI).await;

    match result {
        Err(Error::Api {
            status, message, ..
        }) => {
            assert_eq!(status, 500);
            assert!(message.contains("500"), "expected '500' in: {message}");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn xrpc_error_body_is_parsed() {
    let (server, client) = setup().await;

    let body = json!({
        "error": "InvalidRequest",
        "message": "Error: Params must have the property \"uri\""
    });

    Mock::given(method("GET"))
        .and(path(THREAD_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(&body))
        .mount(&server)
        .await;

    let err = client.get_post_thread(ROOT_URI).await.unwrap_err();

    assert_eq!(err.api_error_code(), Some("InvalidRequest"));
    assert!(err.to_string().contains("400"));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(THREAD_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let result = client.get_post_thread(ROOT_URI).await;

    match result {
        Err(Error::Deserialization { ref message, .. }) => {
            assert!(
                message.contains("body preview"),
                "expected body preview in: {message}"
            );
        }
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn rate_limit_is_transient() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(THREAD_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let err = client.get_post_thread(ROOT_URI).await.unwrap_err();
    assert!(err.is_transient());
}
