// ── Controller abstraction ──
//
// Explicit composition root for a mirrored page: owns construction,
// start, and disposal of every view. Replaces implicit whole-page
// scanning with a deterministic mount pass whose per-container failures
// never take down sibling views.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use skymirror_api::{ClientConfig, ThreadClient};

use crate::config::MirrorConfig;
use crate::error::CoreError;
use crate::page::{MountedContainer, PageManifest};
use crate::view::ViewHandle;

/// One successfully mounted view with its container contract.
pub struct MountedView {
    pub handle: ViewHandle,
    pub container: MountedContainer,
}

/// Outcome of a mount pass: how many views started, and which
/// containers failed initialization (scoped to themselves).
#[derive(Debug, Default)]
pub struct MountReport {
    pub mounted: usize,
    pub failures: Vec<(String, CoreError)>,
}

/// Owns every view mounted from a host page.
///
/// Views are fully independent of each other at runtime; the controller
/// only holds the shared HTTP client and the parent cancellation token
/// that makes teardown deterministic.
pub struct MirrorController {
    client: Arc<ThreadClient>,
    config: MirrorConfig,
    views: Vec<MountedView>,
    cancel: CancellationToken,
}

impl MirrorController {
    /// Build a controller and its shared client from configuration.
    pub fn new(config: MirrorConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let client = ThreadClient::new(ClientConfig {
            base_url: config.api_base.clone(),
            timeout: config.timeout,
            http_client: None,
        })?;
        Ok(Self::with_client(Arc::new(client), config))
    }

    /// Build around an existing client (tests inject a mock-server one).
    pub fn with_client(client: Arc<ThreadClient>, config: MirrorConfig) -> Self {
        Self {
            client,
            config,
            views: Vec::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Scan the page once and start one independent view per eligible
    /// container. A container missing a required slot fails alone; the
    /// rest of the page mounts normally.
    pub fn mount_page(&mut self, manifest: &PageManifest) -> MountReport {
        let mut report = MountReport::default();

        for spec in &manifest.container {
            match MountedContainer::mount(spec) {
                Ok(container) => {
                    let handle = ViewHandle::spawn_with_cancel(
                        spec.id.clone(),
                        spec.uri.clone(),
                        Arc::clone(&self.client),
                        &self.config,
                        self.cancel.child_token(),
                    );
                    info!(view = %spec.id, uri = %spec.uri, "view mounted");
                    self.views.push(MountedView { handle, container });
                    report.mounted += 1;
                }
                Err(err) => {
                    warn!(container = %spec.id, error = %err, "container failed to initialize");
                    report.failures.push((spec.id.clone(), err));
                }
            }
        }

        report
    }

    pub fn views(&self) -> &[MountedView] {
        &self.views
    }

    /// Trigger a manual cycle on every mounted view.
    pub fn refresh_all(&self) {
        for view in &self.views {
            view.handle.refresh_now();
        }
    }

    /// Tear down every view: stop the timers, invalidate in-flight
    /// cycles, and wait for the tasks to exit.
    pub async fn dispose_all(&mut self) {
        self.cancel.cancel();
        for view in self.views.drain(..) {
            view.handle.wait().await;
        }
        info!("all views disposed");
    }
}
