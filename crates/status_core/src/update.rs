use crate::view_model::SortOrder;
use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::RefreshRequested => {
            // Overlapping requests are all issued; the engine serializes them
            // and only the latest one drives the banner.
            let request_id = state.begin_refresh();
            vec![Effect::FetchSnapshot { request_id }]
        }
        Msg::RefreshSucceeded {
            request_id,
            generation,
        } => {
            state.apply_success(request_id, generation);
            Vec::new()
        }
        Msg::RefreshFailed {
            request_id,
            message,
        } => {
            state.apply_failure(request_id, message);
            Vec::new()
        }
        Msg::ViewSelected(view) => {
            state.select_view(view);
            Vec::new()
        }
        Msg::ColumnToggled {
            view,
            label,
            enabled,
        } => {
            state.toggle_column(view, &label, enabled);
            Vec::new()
        }
        Msg::RowToggled { key } => {
            state.toggle_row(key);
            Vec::new()
        }
        Msg::SearchChanged(text) => {
            state.set_search(text);
            Vec::new()
        }
        Msg::SortChanged { label, descending } => {
            state.set_sort(label.map(|label| SortOrder { label, descending }));
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
