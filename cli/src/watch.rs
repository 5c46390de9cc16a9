//! Re-apply a schema file whenever it is written.
//!
//! Writes that arrive while an apply is in flight are folded into one
//! follow-up apply, so a burst of saves never queues a burst of uploads.

use std::future::Future;
use std::path::{Path, PathBuf};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, warn};

/// Written to a schema path that does not exist yet.
pub const EMPTY_SCHEMA: &str = "entities {}";

/// Watches one file through its parent directory, so editors that replace
/// the file on save are still seen.
pub struct SchemaWatcher {
    // Dropping the watcher stops the events.
    _watcher: RecommendedWatcher,
    writes: UnboundedReceiver<()>,
}

impl SchemaWatcher {
    pub fn new(path: &Path) -> notify::Result<Self> {
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file_name = path.file_name().map(|name| name.to_os_string());

        let (tx, writes) = mpsc::unbounded_channel();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) if is_write(&event) => {
                let ours = match &file_name {
                    Some(name) => event.paths.iter().any(|p| p.file_name() == Some(name.as_os_str())),
                    None => true,
                };
                if ours {
                    let _ = tx.send(());
                }
            }
            Ok(event) => debug!(?event.kind, "ignored"),
            Err(e) => warn!(error = %e, "watch error"),
        })?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        Ok(Self {
            _watcher: watcher,
            writes,
        })
    }

    /// Run `apply` once per coalesced burst of writes, until the watcher
    /// stops.
    pub async fn run<F, Fut>(mut self, apply: F) -> usize
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ()>,
    {
        coalesce(&mut self.writes, apply).await
    }
}

fn is_write(event: &Event) -> bool {
    matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
}

/// Call `apply` for each write signal, merging the signals that queue up
/// before and during a call into at most one further call. Returns how
/// many times `apply` ran.
pub async fn coalesce<F, Fut>(writes: &mut UnboundedReceiver<()>, mut apply: F) -> usize
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    let mut applied = 0;
    while writes.recv().await.is_some() {
        drain(writes);
        loop {
            apply().await;
            applied += 1;
            if !drain(writes) {
                break;
            }
        }
    }
    applied
}

/// Empty the queue; true if anything was in it.
fn drain(writes: &mut UnboundedReceiver<()>) -> bool {
    let mut any = false;
    while writes.try_recv().is_ok() {
        any = true;
    }
    any
}
