//! `skymirror watch` -- mount a page manifest and keep it fresh.
//!
//! Each mounted view gets a writer task that re-instantiates its output
//! document on every state transition. SIGHUP triggers a manual refresh
//! on all views; Ctrl-C disposes them and exits cleanly.

use tokio::sync::watch;
use tracing::{info, warn};

use skymirror_core::{
    MirrorConfig, MirrorController, MountedContainer, PageManifest, ViewSnapshot,
};

use crate::cli::WatchArgs;
use crate::error::CliError;

pub async fn handle(args: &WatchArgs, config: MirrorConfig) -> Result<(), CliError> {
    let manifest = PageManifest::load(&args.manifest).map_err(CliError::from)?;
    if manifest.container.is_empty() {
        return Err(CliError::NoContainers {
            path: args.manifest.display().to_string(),
        });
    }

    let mut controller = MirrorController::new(config)?;
    let report = controller.mount_page(&manifest);

    for (id, err) in &report.failures {
        warn!(container = %id, error = %err, "container skipped");
    }
    if report.mounted == 0 {
        return Err(CliError::AllContainersFailed {
            path: args.manifest.display().to_string(),
        });
    }

    // One writer per view; they outlive state transitions, not views.
    let mut writers = Vec::with_capacity(controller.views().len());
    for view in controller.views() {
        let container = view.container.clone();
        let rx = view.handle.subscribe();
        writers.push(tokio::spawn(write_loop(container, rx)));
    }

    info!(
        views = report.mounted,
        "watching -- SIGHUP refreshes, Ctrl-C exits"
    );

    wait_for_shutdown(&controller).await?;

    controller.dispose_all().await;
    for writer in writers {
        let _ = writer.await;
    }
    Ok(())
}

/// Block until Ctrl-C; on Unix, SIGHUP refreshes every view in between.
#[cfg(unix)]
async fn wait_for_shutdown(controller: &MirrorController) -> Result<(), CliError> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut hangup = signal(SignalKind::hangup())?;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = hangup.recv() => {
                info!("SIGHUP received: refreshing all views");
                controller.refresh_all();
            }
        }
    }
    Ok(())
}

#[cfg(not(unix))]
async fn wait_for_shutdown(_controller: &MirrorController) -> Result<(), CliError> {
    tokio::signal::ctrl_c().await?;
    Ok(())
}

/// Materialize every state transition of one view into its output file.
async fn write_loop(container: MountedContainer, mut rx: watch::Receiver<ViewSnapshot>) {
    if let Some(parent) = container.spec.output.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    loop {
        let doc = {
            let snapshot = rx.borrow_and_update().clone();
            container.instantiate(&snapshot)
        };
        if let Err(e) = std::fs::write(&container.spec.output, &doc) {
            warn!(
                output = %container.spec.output.display(),
                error = %e,
                "failed to write view output"
            );
        }

        // Channel closes when the view is disposed.
        if rx.changed().await.is_err() {
            break;
        }
    }
}
