//! Thread mirroring engine between `skymirror-api` and host consumers.
//!
//! This crate owns the domain model and the full view lifecycle for
//! mirrored discussion threads:
//!
//! - **[`MirrorController`]** — Composition root: scans a host page's
//!   manifest once, starts one independent view per eligible container,
//!   and owns deterministic teardown via [`dispose_all`](MirrorController::dispose_all).
//!
//! - **[`ViewHandle`]** — One running view: immediate initial cycle,
//!   periodic refresh, [`refresh_now()`](ViewHandle::refresh_now) manual
//!   trigger, and an explicit disposal capability. State transitions are
//!   published through a `tokio::sync::watch` channel as [`ViewSnapshot`]s
//!   and replaced wholesale each cycle; a monotonic generation counter
//!   keeps a slow superseded fetch from overwriting newer content.
//!
//! - **Renderer** ([`render`]) — Depth-bounded recursive HTML rendering
//!   with escaping on by default and a continue-on-Bluesky link where a
//!   branch is truncated.
//!
//! - **Translator** ([`translate`]) — Pure AT-URI → web URL composition.
//!
//! - **Host-page contract** ([`page`]) — TOML manifest plus per-container
//!   templates validated for the four required slot markers at mount time.

pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod model;
pub mod page;
pub mod render;
pub mod translate;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::MirrorConfig;
pub use controller::{MirrorController, MountReport, MountedView};
pub use error::CoreError;
pub use model::{Author, EngagementCounts, ThreadNode};
pub use page::{ContainerSpec, MountedContainer, PageManifest};
pub use render::{RenderOptions, render_thread};
pub use translate::post_web_url;
pub use view::{ViewContent, ViewHandle, ViewSnapshot};
