//! Background snapshot persister.
//!
//! The store serializes the in-memory engine into a uniquely named staging
//! file and hands it to this thread, which publishes it with an atomic
//! rename over the snapshot path.  Jobs are processed in order, so the
//! snapshot on disk is always the product of some prefix of the write
//! history (last writer wins, never a torn blob).
//!
//! Publishing is fire-and-forget: a rename failure is logged and the
//! staging file removed, never surfaced to the caller.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;

pub(crate) enum PersistJob {
    /// Rename a staged snapshot over the live one.
    Publish { staged: PathBuf },
    /// Ack once every previously queued job has been processed.
    Flush(Sender<()>),
}

pub(crate) struct Persister {
    tx: Option<Sender<PersistJob>>,
    handle: Option<JoinHandle<()>>,
    snapshot_path: PathBuf,
    seq: AtomicU64,
}

impl Persister {
    /// Spawn the persister thread for the given snapshot path.
    pub fn spawn(snapshot_path: PathBuf) -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let thread_path = snapshot_path.clone();
        let handle = std::thread::Builder::new()
            .name("mailforge-persist".to_string())
            .spawn(move || run(rx, thread_path))?;

        Ok(Self {
            tx: Some(tx),
            handle: Some(handle),
            snapshot_path,
            seq: AtomicU64::new(0),
        })
    }

    pub fn snapshot_path(&self) -> &PathBuf {
        &self.snapshot_path
    }

    /// Unique staging path for the next snapshot, in the same directory as
    /// the live snapshot so the publish rename stays on one filesystem.
    pub fn next_staging_path(&self) -> PathBuf {
        let n = self.seq.fetch_add(1, Ordering::Relaxed);
        let mut name = self
            .snapshot_path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| "snapshot.db".to_string());
        name.push_str(&format!(".{n}.staging"));
        self.snapshot_path.with_file_name(name)
    }

    /// Queue a staged snapshot for publication and return immediately.
    pub fn publish(&self, staged: PathBuf) {
        let Some(tx) = &self.tx else { return };
        if tx.send(PersistJob::Publish { staged }).is_err() {
            tracing::error!("persister thread is gone; snapshot left in staging");
        }
    }

    /// Block until every queued publish has completed.
    pub fn flush(&self) {
        let Some(tx) = &self.tx else { return };
        let (ack_tx, ack_rx) = mpsc::channel();
        if tx.send(PersistJob::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.recv();
        }
    }
}

impl Drop for Persister {
    fn drop(&mut self) {
        // Closing the channel lets the thread finish its queue and exit.
        drop(self.tx.take());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run(rx: Receiver<PersistJob>, snapshot_path: PathBuf) {
    while let Ok(job) = rx.recv() {
        match job {
            PersistJob::Publish { staged } => {
                if let Err(e) = std::fs::rename(&staged, &snapshot_path) {
                    tracing::error!(
                        error = %e,
                        staged = %staged.display(),
                        "failed to publish snapshot"
                    );
                    let _ = std::fs::remove_file(&staged);
                }
            }
            PersistJob::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
}
