use std::sync::Arc;

use status_core::Snapshot;
use status_logging::{status_debug, status_info, status_warn};
use tokio::sync::{watch, Mutex};

use crate::{FailureKind, FetchError, Published, RefreshOutcome, SnapshotFetcher};

/// Process-wide holder of the current snapshot.
///
/// Readers always see one whole snapshot: a refresh builds the new one off to
/// the side and publishes it with a single swap. Refreshes run one at a time,
/// in the order they were requested.
pub struct StatusStore {
    fetcher: Arc<dyn SnapshotFetcher>,
    published: watch::Sender<Published>,
    refresh_lock: Mutex<()>,
}

impl StatusStore {
    /// An empty store; nothing is fetched until [`StatusStore::refresh`].
    pub fn new(fetcher: Arc<dyn SnapshotFetcher>) -> Self {
        let (published, _) = watch::channel(Published::default());
        Self {
            fetcher,
            published,
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn current(&self) -> Published {
        self.published.borrow().clone()
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.published.borrow().snapshot.clone()
    }

    pub fn generation(&self) -> u64 {
        self.published.borrow().generation
    }

    /// Receivers are notified after every successful replace.
    pub fn subscribe(&self) -> watch::Receiver<Published> {
        self.published.subscribe()
    }

    /// Swaps in `snapshot` wholesale. Keys missing from it are gone afterwards.
    pub fn replace(&self, snapshot: Snapshot) -> RefreshOutcome {
        let record_count = snapshot.len();
        let snapshot = Arc::new(snapshot);
        let mut generation = 0;
        self.published.send_modify(|published| {
            published.generation += 1;
            published.snapshot = snapshot;
            generation = published.generation;
        });
        RefreshOutcome {
            generation,
            record_count,
        }
    }

    /// Fetches and decodes the snapshot, then replaces the store content. On
    /// any failure the previous content stays untouched. No retries.
    pub async fn refresh(&self) -> Result<RefreshOutcome, FetchError> {
        let _serialized = self.refresh_lock.lock().await;
        status_debug!("Refreshing snapshot");

        let output = match self.fetcher.fetch().await {
            Ok(output) => output,
            Err(err) => {
                status_warn!("Snapshot fetch failed: {}", err);
                return Err(err);
            }
        };

        let snapshot = match Snapshot::from_json_slice(&output.bytes) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                status_warn!(
                    "Snapshot from {} could not be decoded: {}",
                    output.metadata.final_url,
                    err
                );
                return Err(FetchError::new(FailureKind::Decode, err.to_string()));
            }
        };

        let outcome = self.replace(snapshot);
        status_info!(
            "Snapshot replaced generation={} records={} bytes={}",
            outcome.generation,
            outcome.record_count,
            output.metadata.byte_len
        );
        Ok(outcome)
    }
}
