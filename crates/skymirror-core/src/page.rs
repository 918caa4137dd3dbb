// ── Host-page contract ──
//
// A page manifest (TOML) lists the containers eligible for mounting.
// Each container points at an HTML template that must carry four stable
// slot markers; the instantiated document is the template with every
// marker replaced by that slot's current content. Missing markers are
// fatal at mount time -- for that container only.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::CoreError;
use crate::view::{ViewContent, ViewSnapshot};

/// Marker replaced by the loading indicator while a cycle is in flight.
pub const MARKER_LOADING: &str = "<!-- skymirror:loading -->";
/// Marker replaced by the failure message after a failed cycle.
pub const MARKER_ERROR: &str = "<!-- skymirror:error -->";
/// Marker replaced by the rendered comment list.
pub const MARKER_COMMENTS: &str = "<!-- skymirror:comments -->";
/// Marker replaced by the manual-refresh control.
pub const MARKER_REFRESH: &str = "<!-- skymirror:refresh -->";

const REQUIRED_MARKERS: [(&str, &str); 4] = [
    ("loading", MARKER_LOADING),
    ("error", MARKER_ERROR),
    ("comments", MARKER_COMMENTS),
    ("refresh", MARKER_REFRESH),
];

// ── Manifest ────────────────────────────────────────────────────────

/// The host page: every thread container it declares.
#[derive(Debug, Default, Deserialize)]
pub struct PageManifest {
    #[serde(default)]
    pub container: Vec<ContainerSpec>,
}

/// One eligible container: a canonical root identifier plus the
/// template and output documents it owns.
#[derive(Debug, Clone, Deserialize)]
pub struct ContainerSpec {
    pub id: String,
    /// Canonical AT-URI of the thread root.
    pub uri: String,
    pub template: PathBuf,
    pub output: PathBuf,
}

impl PageManifest {
    /// Load a manifest, resolving relative template/output paths against
    /// the manifest's own directory.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let raw = std::fs::read_to_string(path)?;
        let mut manifest: PageManifest =
            toml::from_str(&raw).map_err(|e| CoreError::Config {
                message: format!("invalid page manifest {}: {e}", path.display()),
            })?;

        if let Some(dir) = path.parent() {
            for spec in &mut manifest.container {
                if spec.template.is_relative() {
                    spec.template = dir.join(&spec.template);
                }
                if spec.output.is_relative() {
                    spec.output = dir.join(&spec.output);
                }
            }
        }

        Ok(manifest)
    }
}

// ── Mounted container ───────────────────────────────────────────────

/// A container whose template passed mount-time validation.
#[derive(Debug, Clone)]
pub struct MountedContainer {
    pub spec: ContainerSpec,
    template: String,
}

impl MountedContainer {
    /// Read the template and locate every required slot marker.
    ///
    /// Absence of any marker is a fatal initialization error scoped to
    /// this container; callers keep mounting the rest of the page.
    pub fn mount(spec: &ContainerSpec) -> Result<Self, CoreError> {
        let template =
            std::fs::read_to_string(&spec.template).map_err(|source| CoreError::Template {
                container: spec.id.clone(),
                path: spec.template.display().to_string(),
                source,
            })?;

        for (name, marker) in REQUIRED_MARKERS {
            if !template.contains(marker) {
                return Err(CoreError::MissingSlot {
                    container: spec.id.clone(),
                    slot: name,
                });
            }
        }

        Ok(Self {
            spec: spec.clone(),
            template,
        })
    }

    /// Produce the full document for the current view snapshot.
    ///
    /// Every slot is rewritten on every call -- the output region is
    /// replaced wholesale, never patched.
    pub fn instantiate(&self, snapshot: &ViewSnapshot) -> String {
        let loading = if snapshot.loading {
            "<div class=\"skymirror-loading\">Loading comments\u{2026}</div>"
        } else {
            ""
        };

        let error = match snapshot.content {
            ViewContent::Failed(ref message) => format!(
                "<div class=\"skymirror-error\">Could not load comments: {}</div>",
                crate::render::escape_html(message)
            ),
            _ => String::new(),
        };

        let comments = match snapshot.content {
            ViewContent::Rendered(ref html) => html.as_ref(),
            _ => "",
        };

        let refresh = "<button class=\"skymirror-refresh\" type=\"button\">Refresh</button>";

        self.template
            .replace(MARKER_LOADING, loading)
            .replace(MARKER_ERROR, &error)
            .replace(MARKER_COMMENTS, comments)
            .replace(MARKER_REFRESH, refresh)
    }
}
