//! Visibility port: turns "sentinel became visible" and "load more clicked"
//! signals into page loads.
//!
//! Any environment mechanism (viewport observer, scroll listener, polling,
//! a button) feeds [`SentinelEvent`]s into a stream; the driver reacts to each
//! one by triggering `load_next_page`. Triggers that arrive while a page is
//! loading are ignored by the loader itself.

use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tracing::debug;

use crate::loader::ProgressiveLoader;
use crate::state::LoadOutcome;

/// A load trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentinelEvent {
    /// The "load more" sentinel entered the viewport.
    Visible,
    /// The user pressed the "load more" button.
    LoadMoreClicked,
}

/// What happened to the triggers a driver received.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SentinelStats {
    pub triggers: usize,
    pub pages_loaded: usize,
    pub ignored_while_loading: usize,
    pub ignored_exhausted: usize,
    pub superseded: usize,
}

impl SentinelStats {
    fn record(&mut self, outcome: LoadOutcome) {
        match outcome {
            LoadOutcome::Loaded { .. } => self.pages_loaded += 1,
            LoadOutcome::AlreadyLoading => self.ignored_while_loading += 1,
            LoadOutcome::Exhausted => self.ignored_exhausted += 1,
            LoadOutcome::Superseded => self.superseded += 1,
            LoadOutcome::Unchanged => {}
        }
    }
}

/// Consume `events`, firing a page load for each one, until the stream ends.
///
/// Each trigger runs as its own task so a trigger arriving mid-load reaches
/// the loader (and is ignored there) instead of queueing behind the load.
pub async fn drive_sentinel<S>(loader: ProgressiveLoader, events: S) -> SentinelStats
where
    S: Stream<Item = SentinelEvent>,
{
    let mut stats = SentinelStats::default();
    let mut loads = JoinSet::new();
    let mut events = std::pin::pin!(events);

    while let Some(event) = events.next().await {
        stats.triggers += 1;
        debug!(?event, "load trigger received");
        let loader = loader.clone();
        loads.spawn(async move { loader.load_next_page().await });

        while let Some(done) = loads.try_join_next() {
            if let Ok(outcome) = done {
                stats.record(outcome);
            }
        }
    }

    while let Some(done) = loads.join_next().await {
        if let Ok(outcome) = done {
            stats.record(outcome);
        }
    }
    stats
}

/// Sending half of a spawned sentinel driver.
#[derive(Debug, Clone)]
pub struct SentinelHandle {
    tx: mpsc::UnboundedSender<SentinelEvent>,
}

impl SentinelHandle {
    /// Forward a trigger. Returns `false` once the driver has stopped.
    pub fn trigger(&self, event: SentinelEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn visible(&self) -> bool {
        self.trigger(SentinelEvent::Visible)
    }

    pub fn load_more(&self) -> bool {
        self.trigger(SentinelEvent::LoadMoreClicked)
    }
}

/// Spawn a driver fed through a channel. The driver stops when every
/// [`SentinelHandle`] has been dropped.
pub fn spawn_sentinel(loader: ProgressiveLoader) -> (SentinelHandle, JoinHandle<SentinelStats>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let events = futures::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|event| (event, rx))
    });
    let join = tokio::spawn(drive_sentinel(loader, events));
    (SentinelHandle { tx }, join)
}
