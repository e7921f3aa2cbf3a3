//! Recipe status core: snapshot schema, classification, derived fields and
//! view projection. Pure; no IO.
mod classify;
mod derive;
mod effect;
mod links;
mod msg;
mod report;
mod schema;
mod state;
mod update;
mod view_model;
mod views;

pub use classify::{
    inconsistent, unsupported, up_to_date, updatable_all, updatable_eligible, FilterPreset,
    SnapshotCounts,
};
pub use derive::{
    commit_delta, elapsed_seconds, format_commit_delta, format_duration, parse_date,
    DerivedFields, UNKNOWN,
};
pub use effect::Effect;
pub use links::{links_to_markdown, new_pull_request_url, resolve_pr_links, DisplayLink};
pub use msg::Msg;
pub use report::status_report;
pub use schema::{
    PullRequest, RecipeStatus, Snapshot, SnapshotError, SnapshotMeta, UpdatedBranch,
    VersionState,
};
pub use state::{AppState, RefreshStatus, RequestId};
pub use update::update;
pub use view_model::{AppViewModel, SortOrder};
pub use views::{
    cell_for, effective_columns, project, sort_rows, CellValue, ColumnDef, ColumnSelection,
    ProjectedView, RowView, ViewKind, EXPANSION_COLUMN,
};
