use crate::views::{ProjectedView, ViewKind};
use crate::SnapshotCounts;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub label: String,
    pub descending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub active_view: ViewKind,
    pub projected: ProjectedView,
    pub counts: SnapshotCounts,
    /// Last refresh failure; stays until a refresh succeeds.
    pub error_banner: Option<String>,
    pub refreshing: bool,
    pub generation: u64,
    pub search: String,
    pub sort: Option<SortOrder>,
    pub dirty: bool,
}
