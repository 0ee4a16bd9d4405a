//! Watch mode
//!
//! Watches both pack source trees and reruns the whole build after a burst
//! of file changes settles.

use std::time::Duration;

use bedpack_core::ProjectConfig;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::build::Builder;
use crate::error::BuildError;

/// Quiet period after the last change before rebuilding
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Rebuild on every settled change until the watcher shuts down.
///
/// Failed rebuilds are logged and do not stop the loop.
pub async fn watch(builder: &Builder, config: &ProjectConfig, debounce: Duration) -> Result<(), BuildError> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| match res {
            Ok(event) if is_relevant(&event.kind) => {
                let _ = tx.send(event);
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("Watch error: {}", e),
        },
        Config::default(),
    )?;

    for pack in config.packs() {
        watcher.watch(&pack.src_dir, RecursiveMode::Recursive)?;
        tracing::info!("Watching {}", pack.src_dir.display());
    }

    while let Some(event) = rx.recv().await {
        tracing::debug!("Change detected: {:?}", event.paths);

        // Swallow the rest of the burst
        while let Ok(Some(_)) = tokio::time::timeout(debounce, rx.recv()).await {}

        tracing::info!("Source changed, rebuilding...");
        match builder.build(config).await {
            Ok(report) => tracing::info!("Rebuilt in {:.2?}", report.elapsed),
            Err(e) => tracing::error!("Rebuild failed: {}", e),
        }
    }

    Ok(())
}

fn is_relevant(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}
