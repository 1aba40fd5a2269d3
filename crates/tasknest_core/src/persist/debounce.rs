//! Debounced background snapshot writer.
//!
//! # Responsibility
//! - Coalesce rapid state changes into one storage write of the latest
//!   snapshot.
//!
//! # Invariants
//! - Every new snapshot cancels the pending timer and starts a new one.
//! - Only the most recent snapshot is ever written.
//! - Dropping the writer flushes the pending snapshot before the task exits.
//! - Write failures are logged once and never retried.
//! - Storage writes run on the blocking pool, never on a runtime worker.

use crate::persist::STORAGE_KEY;
use crate::repo::snapshot_repo::SnapshotStore;
use log::{debug, error};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

enum WriterMessage {
    Snapshot(String),
    Flush(oneshot::Sender<()>),
}

/// Handle to the background writer task.
///
/// Must be created inside a tokio runtime.
pub struct DebouncedWriter {
    tx: mpsc::UnboundedSender<WriterMessage>,
    task: JoinHandle<()>,
}

impl DebouncedWriter {
    /// Spawns the writer task for `store` with the given quiet period.
    pub fn spawn<S>(store: Arc<S>, debounce: Duration) -> Self
    where
        S: SnapshotStore + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_writer(store, debounce, rx));
        Self { tx, task }
    }

    /// Replaces the pending snapshot and restarts the quiet period.
    pub fn schedule(&self, blob: String) {
        if self.tx.send(WriterMessage::Snapshot(blob)).is_err() {
            error!("event=snapshot_schedule module=persist status=error error_code=writer_closed");
        }
    }

    /// Writes the pending snapshot now and waits for the write to finish.
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(WriterMessage::Flush(ack_tx)).is_err() {
            return;
        }
        let _ = ack_rx.await;
    }

    /// Stops accepting snapshots, writes the pending one and waits for the
    /// task to exit.
    pub async fn shutdown(self) {
        drop(self.tx);
        let _ = self.task.await;
    }
}

async fn run_writer<S>(
    store: Arc<S>,
    debounce: Duration,
    mut rx: mpsc::UnboundedReceiver<WriterMessage>,
) where
    S: SnapshotStore + 'static,
{
    let mut pending: Option<String> = None;

    loop {
        let message = if pending.is_some() {
            tokio::select! {
                message = rx.recv() => message,
                _ = tokio::time::sleep(debounce) => {
                    write_pending(&store, &mut pending).await;
                    continue;
                }
            }
        } else {
            rx.recv().await
        };

        match message {
            Some(WriterMessage::Snapshot(blob)) => {
                if pending.replace(blob).is_some() {
                    debug!("event=snapshot_schedule module=persist status=coalesced");
                }
            }
            Some(WriterMessage::Flush(ack)) => {
                write_pending(&store, &mut pending).await;
                let _ = ack.send(());
            }
            None => {
                write_pending(&store, &mut pending).await;
                break;
            }
        }
    }
}

/// Saves the pending snapshot on the blocking pool so storage I/O never
/// stalls other tasks on the runtime.
async fn write_pending<S>(store: &Arc<S>, pending: &mut Option<String>)
where
    S: SnapshotStore + 'static,
{
    let Some(blob) = pending.take() else {
        return;
    };
    let bytes = blob.len();
    let started_at = Instant::now();
    let store = Arc::clone(store);
    let outcome = tokio::task::spawn_blocking(move || store.save_blob(STORAGE_KEY, &blob)).await;

    match outcome {
        Ok(Ok(())) => debug!(
            "event=snapshot_write module=persist status=ok bytes={} duration_ms={}",
            bytes,
            started_at.elapsed().as_millis()
        ),
        Ok(Err(err)) => error!(
            "event=snapshot_write module=persist status=error bytes={} error={}",
            bytes, err
        ),
        Err(err) => error!(
            "event=snapshot_write module=persist status=error bytes={} error_code=write_task_failed error={}",
            bytes, err
        ),
    }
}
