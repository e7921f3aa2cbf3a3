use std::sync::Arc;
use std::time::Duration;

use status_core::{update, AppState, AppViewModel, Msg, RefreshStatus};
use status_engine::{FetchSettings, StatusStore};
use status_logging::{status_debug, status_warn};

use crate::effects::EffectRunner;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Owns the UI state and routes messages through `update`, handing the
/// resulting effects to the engine.
pub struct App {
    state: AppState,
    runner: EffectRunner,
    store: Arc<StatusStore>,
}

impl App {
    pub fn new(settings: FetchSettings) -> Self {
        let runner = EffectRunner::new(settings);
        let store = runner.store();
        Self {
            state: AppState::new(),
            runner,
            store,
        }
    }

    pub fn store(&self) -> &Arc<StatusStore> {
        &self.store
    }

    pub fn dispatch(&mut self, msg: Msg) {
        status_debug!("dispatch {:?}", msg);
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.enqueue(effects);
    }

    /// Requests a refresh and blocks until no refresh is in flight.
    pub fn refresh_blocking(&mut self) {
        self.dispatch(Msg::RefreshRequested);
        self.drain_until_idle();
    }

    fn drain_until_idle(&mut self) {
        while let RefreshStatus::InFlight { request_id } = self.state.refresh_status() {
            match self.runner.next_msg(POLL_INTERVAL) {
                Some(msg) => self.dispatch(msg),
                None if !self.runner.engine_running() => {
                    status_warn!("Engine stopped with refresh {} in flight", request_id);
                    self.dispatch(Msg::RefreshFailed {
                        request_id,
                        message: "background engine stopped".to_string(),
                    });
                }
                None => {}
            }
        }
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view(&self.store.snapshot())
    }

    pub fn consume_dirty(&mut self) -> bool {
        self.state.consume_dirty()
    }
}
