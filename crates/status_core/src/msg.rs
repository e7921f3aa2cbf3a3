#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User asked for a fresh snapshot.
    RefreshRequested,
    /// The store now holds the snapshot fetched for `request_id`.
    RefreshSucceeded {
        request_id: crate::RequestId,
        generation: u64,
    },
    /// Fetching for `request_id` failed; the store kept its content.
    RefreshFailed {
        request_id: crate::RequestId,
        message: String,
    },
    /// User switched to another view.
    ViewSelected(crate::ViewKind),
    /// User enabled or disabled a column of a view.
    ColumnToggled {
        view: crate::ViewKind,
        label: String,
        enabled: bool,
    },
    /// User expanded or collapsed a row's detail panel.
    RowToggled { key: String },
    /// Free-text filter over the rendered cells.
    SearchChanged(String),
    /// Sort the active view by a column label, or clear the sort.
    SortChanged {
        label: Option<String>,
        descending: bool,
    },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
