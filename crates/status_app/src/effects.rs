use std::sync::Arc;
use std::time::Duration;

use status_core::{Effect, Msg};
use status_engine::{EngineEvent, EngineHandle, FetchSettings, StatusStore};
use status_logging::{status_info, status_warn};

/// Executes core effects on the background engine and turns engine events
/// back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: FetchSettings) -> Self {
        status_info!("Snapshot source url={}", settings.url);
        Self {
            engine: EngineHandle::new(settings),
        }
    }

    pub fn store(&self) -> Arc<StatusStore> {
        self.engine.store()
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchSnapshot { request_id } => {
                    status_info!("FetchSnapshot request_id={}", request_id);
                    self.engine.refresh(request_id);
                }
            }
        }
    }

    pub fn engine_running(&self) -> bool {
        self.engine.is_running()
    }

    /// Waits up to `timeout` for the next engine completion.
    pub fn next_msg(&self, timeout: Duration) -> Option<Msg> {
        self.engine.recv_timeout(timeout).map(map_event)
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::RefreshCompleted { request_id, result } => match result {
            Ok(outcome) => Msg::RefreshSucceeded {
                request_id,
                generation: outcome.generation,
            },
            Err(err) => {
                status_warn!("Refresh {} failed: {}", request_id, err);
                Msg::RefreshFailed {
                    request_id,
                    message: err.to_string(),
                }
            }
        },
    }
}
