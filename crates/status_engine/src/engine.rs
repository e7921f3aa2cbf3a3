use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use status_core::RequestId;
use status_logging::status_error;

use crate::fetch::{FetchSettings, ReqwestFetcher, SnapshotFetcher};
use crate::store::StatusStore;
use crate::{EngineEvent, FailureKind, FetchError};

enum EngineCommand {
    Refresh { request_id: RequestId },
}

/// Runs refreshes on a background tokio runtime and reports completions over
/// a channel.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
    event_rx: mpsc::Receiver<EngineEvent>,
    store: Arc<StatusStore>,
    worker: thread::JoinHandle<()>,
}

impl EngineHandle {
    pub fn new(settings: FetchSettings) -> Self {
        Self::with_fetcher(Arc::new(ReqwestFetcher::new(settings)))
    }

    pub fn with_fetcher(fetcher: Arc<dyn SnapshotFetcher>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let store = Arc::new(StatusStore::new(fetcher));

        let worker_store = store.clone();
        let worker_events = event_tx.clone();
        let worker = thread::spawn(move || run_worker(cmd_rx, worker_store, worker_events));

        Self {
            cmd_tx,
            event_tx,
            event_rx,
            store,
            worker,
        }
    }

    pub fn refresh(&self, request_id: RequestId) {
        if self
            .cmd_tx
            .send(EngineCommand::Refresh { request_id })
            .is_err()
        {
            let _ = self.event_tx.send(EngineEvent::RefreshCompleted {
                request_id,
                result: Err(FetchError::new(
                    FailureKind::EngineStopped,
                    "background engine is not running",
                )),
            });
        }
    }

    pub fn store(&self) -> Arc<StatusStore> {
        self.store.clone()
    }

    /// False once the worker thread has exited; no further completions will
    /// arrive beyond those already queued.
    pub fn is_running(&self) -> bool {
        !self.worker.is_finished()
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

/// Every command received gets exactly one `RefreshCompleted` back, even when
/// the runtime cannot start or the refresh task panics.
fn run_worker(
    cmd_rx: mpsc::Receiver<EngineCommand>,
    store: Arc<StatusStore>,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            status_error!("Engine runtime failed to start: {}", err);
            let message = format!("engine runtime failed to start: {err}");
            while let Ok(EngineCommand::Refresh { request_id }) = cmd_rx.recv() {
                let _ = event_tx.send(EngineEvent::RefreshCompleted {
                    request_id,
                    result: Err(FetchError::new(FailureKind::EngineStopped, message.clone())),
                });
            }
            return;
        }
    };

    while let Ok(command) = cmd_rx.recv() {
        let EngineCommand::Refresh { request_id } = command;
        let store = store.clone();
        let task_events = event_tx.clone();
        let task = runtime.spawn(async move {
            handle_command(&store, command, task_events).await;
        });
        let panic_events = event_tx.clone();
        runtime.spawn(async move {
            if let Err(err) = task.await {
                status_error!("Refresh task {} aborted: {}", request_id, err);
                let _ = panic_events.send(EngineEvent::RefreshCompleted {
                    request_id,
                    result: Err(FetchError::new(
                        FailureKind::TaskFailed,
                        format!("refresh task aborted: {err}"),
                    )),
                });
            }
        });
    }
}

async fn handle_command(
    store: &StatusStore,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Refresh { request_id } => {
            let result = store.refresh().await;
            let _ = event_tx.send(EngineEvent::RefreshCompleted { request_id, result });
        }
    }
}
