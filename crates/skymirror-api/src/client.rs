// Hand-crafted async HTTP client for the public Bluesky AppView XRPC API.
//
// Endpoint: /xrpc/app.bsky.feed.getPostThread
// Auth: none (read-only public surface)

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::types::ThreadResponse;

/// Default base URL of the unauthenticated public AppView.
pub const PUBLIC_APPVIEW_BASE: &str = "https://public.api.bsky.app";

const GET_POST_THREAD: &str = "xrpc/app.bsky.feed.getPostThread";

// ── Error response shape from the XRPC surface ───────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

// ── Configuration ────────────────────────────────────────────────────

/// Construction options for [`ThreadClient`].
///
/// The client itself imposes no per-request deadline; `timeout` is the
/// caller's execution-context deadline, applied at the `reqwest` client
/// level. Supplying `http_client` bypasses both `timeout` and the default
/// header setup — the caller manages the transport wholesale.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub http_client: Option<reqwest::Client>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: PUBLIC_APPVIEW_BASE.to_owned(),
            timeout: Duration::from_secs(30),
            http_client: None,
        }
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the thread-retrieval endpoint.
///
/// One instance is shared (via `Arc`) by every mounted view; it holds no
/// mutable state beyond the connection pool inside `reqwest`.
pub struct ThreadClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ThreadClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client from configuration.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let http = match config.http_client {
            Some(client) => client,
            None => {
                let mut headers = HeaderMap::new();
                headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
                reqwest::Client::builder()
                    .default_headers(headers)
                    .timeout(config.timeout)
                    .build()?
            }
        };

        let base_url = Self::normalize_base_url(&config.base_url)?;
        Ok(Self { http, base_url })
    }

    /// Client against the default public AppView.
    pub fn public() -> Result<Self, Error> {
        Self::new(ClientConfig::default())
    }

    /// Wrap an existing `reqwest::Client` (caller manages headers/timeout).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Ensure the base URL ends with a single `/` so joins stay relative.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"xrpc/…"`) onto the base URL.
    fn url(&self, path: &str) -> Url {
        // base_url always ends with `/`, so joining `xrpc/…` works.
        self.base_url
            .join(path)
            .expect("path should be valid relative URL")
    }

    // ── HTTP plumbing ────────────────────────────────────────────────

    async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview = &body[..body.len().min(200)];
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        if let Ok(err) = serde_json::from_str::<ErrorResponse>(&raw) {
            if err.error.is_some() || err.message.is_some() {
                return Error::Api {
                    status: status.as_u16(),
                    message: err.message.unwrap_or_else(|| status.to_string()),
                    code: err.error,
                };
            }
        }

        Error::Api {
            status: status.as_u16(),
            message: if raw.is_empty() {
                status.to_string()
            } else {
                raw
            },
            code: None,
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Fetch the full reply tree below a canonical post URI.
    ///
    /// One request per refresh cycle. The URI travels percent-encoded as
    /// the `uri` query parameter. An empty `thread.replies` is a valid,
    /// non-error result — a brand-new thread simply has no replies yet.
    pub async fn get_post_thread(&self, uri: &str) -> Result<ThreadResponse, Error> {
        self.get_with_params(GET_POST_THREAD, &[("uri", uri)]).await
    }
}
