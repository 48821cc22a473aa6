use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::sync::oneshot;
use tokio::task::JoinSet;
use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::counters::CounterStore;
use crate::error::FlushError;
use crate::metrics::{FLUSH_FAILURES, FLUSH_LATENCY, FLUSH_TOTAL, TRACKED_KEYS};

// Destination for serialized snapshots. Each write replaces whatever the
// previous write left behind.
pub trait SnapshotSink: Send + Sync + 'static {
    fn name(&self) -> String;
    fn write(&self, payload: &[u8]) -> Result<(), FlushError>;
}

// Local JSON file, replaced via temp file + rename
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotSink for FileSink {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn write(&self, payload: &[u8]) -> Result<(), FlushError> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));

        // Concurrent flushes each get their own temp file, the rename is atomic.
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(payload)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

// Snapshot the store, serialize it and hand it to the sink. Returns the
// number of entries written.
pub async fn flush(store: &CounterStore, sink: Arc<dyn SnapshotSink>) -> Result<usize, FlushError> {
    let timer = FLUSH_LATENCY.start_timer();

    let snapshot = store.snapshot();
    let entries = snapshot.len();
    TRACKED_KEYS.set(entries as f64);
    let payload = serde_json::to_vec(&snapshot)?;

    tokio::task::spawn_blocking(move || sink.write(&payload)).await??;

    timer.observe_duration();
    Ok(entries)
}

async fn flush_and_report(store: Arc<CounterStore>, sink: Arc<dyn SnapshotSink>) {
    let sink_name = sink.name();
    match flush(&store, sink).await {
        Ok(entries) => {
            FLUSH_TOTAL.inc();
            debug!(sink = %sink_name, entries, "counters flushed");
        }
        Err(e) => {
            FLUSH_FAILURES.inc();
            warn!(sink = %sink_name, error = %e, "flush failed, retrying next tick");
        }
    }
}

// Background flush loop.
//
// Every `period` a flush is spawned without waiting for the previous one, so
// a slow sink never delays the schedule. When `shutdown` fires (or its
// sender is dropped) the loop stops, waits out every in-flight flush and
// then runs one last flush, which is always the final write to the sink.
pub async fn run_flusher(
    store: Arc<CounterStore>,
    sink: Arc<dyn SnapshotSink>,
    period: Duration,
    mut shutdown: oneshot::Receiver<()>,
) {
    info!(sink = %sink.name(), ?period, "flush scheduler started");

    let mut ticker = interval(period);
    // first tick completes immediately
    ticker.tick().await;

    let mut in_flight = JoinSet::new();
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // reap finished flushes so the set only holds running ones
                while in_flight.try_join_next().is_some() {}
                in_flight.spawn(flush_and_report(Arc::clone(&store), Arc::clone(&sink)));
            }
            _ = &mut shutdown => break,
        }
    }

    // older snapshots must land before the final one
    if !in_flight.is_empty() {
        debug!(pending = in_flight.len(), "waiting for in-flight flushes");
    }
    while in_flight.join_next().await.is_some() {}

    info!("flush scheduler stopping, writing final snapshot");
    flush_and_report(store, sink).await;
}
