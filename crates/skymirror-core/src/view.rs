// ── Per-view refresh scheduling ──
//
// Each mounted container gets one long-lived task that drives its
// fetch→render cycles: an immediate initial cycle, a periodic timer,
// and a manual trigger. Cycles are spawned as their own tasks so a
// manual refresh can overlap a slow scheduled fetch; a monotonic
// generation counter decides which cycle's results are still current,
// and stale results are discarded instead of overwriting newer content.
//
// Views share nothing mutable with each other. State is published
// through a `watch` channel and replaced wholesale -- there is no
// partial-update path.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use skymirror_api::ThreadClient;

use crate::config::MirrorConfig;
use crate::convert;
use crate::error::CoreError;
use crate::render::{self, RenderOptions};

// ── Published state ─────────────────────────────────────────────────

/// What the view's output region currently holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewContent {
    /// Nothing rendered yet (before the first cycle completes).
    #[default]
    Empty,
    /// The rendered list region from the last successful cycle.
    Rendered(Arc<str>),
    /// A failed cycle cleared prior content; the message carries the
    /// underlying cause (status code or transport text).
    Failed(String),
}

/// Full per-view state, replaced atomically on every transition.
#[derive(Debug, Clone, Default)]
pub struct ViewSnapshot {
    /// True while a cycle is in flight.
    pub loading: bool,
    pub content: ViewContent,
    /// Completion time of the last cycle that applied (success or failure).
    pub last_fetch_at: Option<DateTime<Utc>>,
    /// Generation of the cycle that last touched this snapshot.
    pub generation: u64,
}

// ── View internals ──────────────────────────────────────────────────

struct ViewShared {
    id: String,
    root_uri: String,
    client: Arc<ThreadClient>,
    options: RenderOptions,
    state: watch::Sender<ViewSnapshot>,
    /// Monotonic cycle counter. A cycle's results apply only while the
    /// value it captured at start is still current.
    generation: AtomicU64,
    cancel: CancellationToken,
}

/// Handle to a running view: state subscription, manual refresh, and
/// the disposal capability that stops the timer for good.
pub struct ViewHandle {
    shared: Arc<ViewShared>,
    refresh_tx: mpsc::Sender<()>,
    task: tokio::task::JoinHandle<()>,
}

impl ViewHandle {
    /// Spawn an independent view. Runs its first cycle immediately and
    /// repeats every `config.refresh_interval` until disposed.
    ///
    /// Must be called within a Tokio runtime.
    pub fn spawn(
        id: impl Into<String>,
        root_uri: impl Into<String>,
        client: Arc<ThreadClient>,
        config: &MirrorConfig,
    ) -> Self {
        Self::spawn_with_cancel(id, root_uri, client, config, CancellationToken::new())
    }

    /// Spawn with an externally owned token (the controller passes a
    /// child of its own so `dispose_all` reaches every view).
    pub(crate) fn spawn_with_cancel(
        id: impl Into<String>,
        root_uri: impl Into<String>,
        client: Arc<ThreadClient>,
        config: &MirrorConfig,
        cancel: CancellationToken,
    ) -> Self {
        let (state, _) = watch::channel(ViewSnapshot::default());
        let (refresh_tx, refresh_rx) = mpsc::channel(1);

        let shared = Arc::new(ViewShared {
            id: id.into(),
            root_uri: root_uri.into(),
            client,
            options: RenderOptions::from(config),
            state,
            generation: AtomicU64::new(0),
            cancel,
        });

        let task = tokio::spawn(view_task(
            Arc::clone(&shared),
            refresh_rx,
            config.refresh_interval,
        ));

        Self {
            shared,
            refresh_tx,
            task,
        }
    }

    pub fn id(&self) -> &str {
        &self.shared.id
    }

    pub fn root_uri(&self) -> &str {
        &self.shared.root_uri
    }

    /// Subscribe to state transitions.
    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot> {
        self.shared.state.subscribe()
    }

    /// Current state (cheap clone of the latest snapshot).
    pub fn snapshot(&self) -> ViewSnapshot {
        self.shared.state.borrow().clone()
    }

    /// Trigger an extra cycle on demand. If a manual refresh is already
    /// queued, this one coalesces with it.
    pub fn refresh_now(&self) {
        if self.refresh_tx.try_send(()).is_err() {
            debug!(view = %self.shared.id, "manual refresh already queued");
        }
    }

    /// Stop the timer and prevent any in-flight cycle from publishing.
    /// Idempotent.
    pub fn dispose(&self) {
        self.shared.cancel.cancel();
    }

    pub fn is_disposed(&self) -> bool {
        self.shared.cancel.is_cancelled()
    }

    /// Wait for the view task to exit (after [`dispose`](Self::dispose)).
    pub async fn wait(self) {
        let _ = self.task.await;
    }
}

// ── Scheduler task ──────────────────────────────────────────────────

async fn view_task(shared: Arc<ViewShared>, mut refresh_rx: mpsc::Receiver<()>, period: Duration) {
    let mut ticker = tokio::time::interval(period);
    // The first tick completes immediately: that is the initial cycle.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = shared.cancel.cancelled() => break,
            _ = ticker.tick() => spawn_cycle(&shared, "timer"),
            Some(()) = refresh_rx.recv() => spawn_cycle(&shared, "manual"),
        }
    }

    debug!(view = %shared.id, "view task stopped");
}

/// Start one fetch→render cycle as its own task. Bumping the generation
/// here (not inside the cycle) means a newly triggered cycle immediately
/// invalidates every older one still in flight.
fn spawn_cycle(shared: &Arc<ViewShared>, trigger: &'static str) {
    let generation = shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
    debug!(view = %shared.id, generation, trigger, "starting refresh cycle");

    let shared = Arc::clone(shared);
    tokio::spawn(run_cycle(shared, generation));
}

async fn run_cycle(shared: Arc<ViewShared>, generation: u64) {
    publish_if_current(&shared, generation, |snap| {
        snap.loading = true;
        snap.generation = generation;
    });

    let result = shared
        .client
        .get_post_thread(&shared.root_uri)
        .await
        .map_err(CoreError::from);

    match result {
        Ok(resp) => {
            let nodes = convert::thread_replies(resp);
            let html: Arc<str> = render::render_thread(&nodes, &shared.options).into();
            let applied = publish_if_current(&shared, generation, |snap| {
                snap.content = ViewContent::Rendered(html);
                snap.last_fetch_at = Some(Utc::now());
                snap.loading = false;
            });
            if applied {
                debug!(view = %shared.id, generation, replies = nodes.len(), "cycle rendered");
            }
        }
        Err(err) => {
            warn!(view = %shared.id, generation, error = %err, "refresh cycle failed");
            publish_if_current(&shared, generation, |snap| {
                // Failure clears prior output; the message is what the
                // error slot shows.
                snap.content = ViewContent::Failed(err.to_string());
                snap.last_fetch_at = Some(Utc::now());
                snap.loading = false;
            });
        }
    }
}

/// Apply a state mutation only if this cycle is still the newest one and
/// the view has not been disposed. Returns whether it applied.
fn publish_if_current(
    shared: &ViewShared,
    generation: u64,
    mutate: impl FnOnce(&mut ViewSnapshot),
) -> bool {
    if shared.cancel.is_cancelled() {
        return false;
    }
    if shared.generation.load(Ordering::SeqCst) != generation {
        debug!(view = %shared.id, generation, "stale cycle result discarded");
        return false;
    }
    shared.state.send_modify(mutate);
    true
}
