use std::collections::{BTreeMap, BTreeSet};

use crate::view_model::{AppViewModel, SortOrder};
use crate::views::{project, sort_rows, ColumnSelection, ViewKind};
use crate::{Snapshot, SnapshotCounts};

pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshStatus {
    #[default]
    Idle,
    InFlight {
        request_id: RequestId,
    },
}

/// View-local UI state. The snapshot itself lives in the shared store and is
/// passed in when a view model is built.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    active_view: ViewKind,
    selections: BTreeMap<ViewKind, ColumnSelection>,
    expanded: BTreeSet<String>,
    search: String,
    sort: Option<SortOrder>,
    refresh: RefreshStatus,
    next_request_id: RequestId,
    generation: u64,
    last_error: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_view(&self) -> ViewKind {
        self.active_view
    }

    pub fn refresh_status(&self) -> RefreshStatus {
        self.refresh
    }

    pub fn selection(&self, view: ViewKind) -> ColumnSelection {
        self.selections.get(&view).cloned().unwrap_or_default()
    }

    pub fn view(&self, snapshot: &Snapshot) -> AppViewModel {
        let selection = self.selection(self.active_view);
        let mut projected = project(self.active_view, snapshot, &selection, &self.expanded);
        projected.rows.retain(|row| row.matches_search(&self.search));
        if let Some(order) = &self.sort {
            if let Some(index) = projected.column_index(&order.label) {
                sort_rows(&mut projected.rows, index, order.descending);
            }
        }
        AppViewModel {
            active_view: self.active_view,
            projected,
            counts: SnapshotCounts::from_snapshot(snapshot),
            error_banner: self.last_error.clone(),
            refreshing: matches!(self.refresh, RefreshStatus::InFlight { .. }),
            generation: self.generation,
            search: self.search.clone(),
            sort: self.sort.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn begin_refresh(&mut self) -> RequestId {
        self.next_request_id += 1;
        let request_id = self.next_request_id;
        self.refresh = RefreshStatus::InFlight { request_id };
        self.mark_dirty();
        request_id
    }

    fn is_latest(&self, request_id: RequestId) -> bool {
        request_id == self.next_request_id
    }

    pub(crate) fn apply_success(&mut self, request_id: RequestId, generation: u64) {
        if generation > self.generation {
            self.generation = generation;
            self.mark_dirty();
        }
        if self.is_latest(request_id) {
            self.refresh = RefreshStatus::Idle;
            self.last_error = None;
            self.mark_dirty();
        }
    }

    pub(crate) fn apply_failure(&mut self, request_id: RequestId, message: String) {
        if !self.is_latest(request_id) {
            return;
        }
        self.refresh = RefreshStatus::Idle;
        self.last_error = Some(message);
        self.mark_dirty();
    }

    pub(crate) fn select_view(&mut self, view: ViewKind) {
        if self.active_view != view {
            self.active_view = view;
            self.sort = None;
            self.mark_dirty();
        }
    }

    pub(crate) fn toggle_column(&mut self, view: ViewKind, label: &str, enabled: bool) {
        if !view.declares(label) {
            return;
        }
        if self
            .selections
            .entry(view)
            .or_default()
            .set_enabled(label, enabled)
        {
            self.mark_dirty();
        }
    }

    pub(crate) fn toggle_row(&mut self, key: String) {
        if !self.expanded.remove(&key) {
            self.expanded.insert(key);
        }
        self.mark_dirty();
    }

    pub(crate) fn set_search(&mut self, search: String) {
        if self.search != search {
            self.search = search;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_sort(&mut self, sort: Option<SortOrder>) {
        if self.sort != sort {
            self.sort = sort;
            self.mark_dirty();
        }
    }
}
