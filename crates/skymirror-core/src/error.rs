// ── Core error types ──
//
// User-facing errors from skymirror-core. Consumers never see raw
// reqwest failures or JSON parse errors directly -- the
// `From<skymirror_api::Error>` impl collapses the transport layer into
// a per-cycle fetch failure carrying a human-readable cause.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── View initialization ──────────────────────────────────────────
    /// A container template is missing one of the required slot markers.
    /// Fatal for that view only; sibling views are unaffected.
    #[error("Container '{container}' is missing required slot marker '{slot}'")]
    MissingSlot {
        container: String,
        slot: &'static str,
    },

    /// A container template could not be read at mount time.
    #[error("Cannot read template for container '{container}' at {path}: {source}")]
    Template {
        container: String,
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ── Per-cycle fetch failures ─────────────────────────────────────
    /// Transport error, non-2xx status, or unparsable body. Caught per
    /// cycle; the scheduler survives and later cycles still run.
    #[error("Fetch failed: {message}")]
    Fetch { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── IO (manifest loading) ────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<skymirror_api::Error> for CoreError {
    fn from(err: skymirror_api::Error) -> Self {
        match err {
            // Invalid base URLs are a configuration problem, not a cycle
            // failure -- they can never succeed on retry.
            skymirror_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            // Everything else becomes a per-cycle failure whose message
            // carries the underlying cause (status code or reqwest text).
            other => CoreError::Fetch {
                message: other.to_string(),
            },
        }
    }
}
