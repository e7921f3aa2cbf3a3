use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::derive::{format_commit_delta, format_duration, DerivedFields};
use crate::links::{resolve_pr_links, DisplayLink};
use crate::{FilterPreset, RecipeStatus, Snapshot};

/// A declared table column, keyed by the record field it shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub field: &'static str,
    pub label: &'static str,
    pub sortable: bool,
}

const fn column(field: &'static str, label: &'static str) -> ColumnDef {
    ColumnDef {
        field,
        label,
        sortable: true,
    }
}

const fn unsorted(field: &'static str, label: &'static str) -> ColumnDef {
    ColumnDef {
        field,
        label,
        sortable: false,
    }
}

/// Trailing synthetic column of views that expand rows into a detail panel.
pub const EXPANSION_COLUMN: ColumnDef = unsorted("expand", "");

const UPDATABLE_COLUMNS: &[ColumnDef] = &[
    column("name", "Name"),
    column("current.version", "Recipe version"),
    column("new.version", "New version"),
    column("new.tag", "Upstream tag"),
    unsorted("prs", "Pull request"),
];

const UPDATES_COLUMNS: &[ColumnDef] = &[
    column("name", "Name"),
    column("current.version", "Current version"),
    column("current.tag", "Current tag"),
    column("current.date", "Current date"),
    column("new.version", "New version"),
    column("new.tag", "New tag"),
    column("new.date", "New date"),
    column("time_interval", "Time interval"),
    column("commit_delta", "Commits"),
    unsorted("prs", "Pull request"),
];

const UNSUPPORTED_COLUMNS: &[ColumnDef] = &[column("name", "Name"), column("details", "Details")];

const INCONSISTENT_COLUMNS: &[ColumnDef] = &[
    column("name", "Name"),
    column("current.version", "Recipe version"),
    column("new.tag", "Upstream tag"),
];

const UP_TO_DATE_COLUMNS: &[ColumnDef] = &[
    column("name", "Name"),
    column("current.version", "Version"),
    column("current.tag", "Tag"),
    column("current.date", "Date"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum ViewKind {
    /// Every updatable recipe, including deprecated ones.
    #[default]
    Updatable,
    /// Updatable and not deprecated, with elapsed time and commit columns.
    Updates,
    Unsupported,
    Inconsistent,
    UpToDate,
}

impl ViewKind {
    pub const ALL: [ViewKind; 5] = [
        ViewKind::Updatable,
        ViewKind::Updates,
        ViewKind::Unsupported,
        ViewKind::Inconsistent,
        ViewKind::UpToDate,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ViewKind::Updatable => "updatable",
            ViewKind::Updates => "updates",
            ViewKind::Unsupported => "unsupported",
            ViewKind::Inconsistent => "inconsistent",
            ViewKind::UpToDate => "up-to-date",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ViewKind::Updatable => "Updatable recipes",
            ViewKind::Updates => "Recipe updates",
            ViewKind::Unsupported => "Unsupported recipes",
            ViewKind::Inconsistent => "Inconsistent recipes",
            ViewKind::UpToDate => "Up-to-date recipes",
        }
    }

    pub fn preset(self) -> FilterPreset {
        match self {
            ViewKind::Updatable => FilterPreset::UpdatableAll,
            ViewKind::Updates => FilterPreset::UpdatableEligible,
            ViewKind::Unsupported => FilterPreset::Unsupported,
            ViewKind::Inconsistent => FilterPreset::Inconsistent,
            ViewKind::UpToDate => FilterPreset::UpToDate,
        }
    }

    pub fn columns(self) -> &'static [ColumnDef] {
        match self {
            ViewKind::Updatable => UPDATABLE_COLUMNS,
            ViewKind::Updates => UPDATES_COLUMNS,
            ViewKind::Unsupported => UNSUPPORTED_COLUMNS,
            ViewKind::Inconsistent => INCONSISTENT_COLUMNS,
            ViewKind::UpToDate => UP_TO_DATE_COLUMNS,
        }
    }

    pub fn expandable(self) -> bool {
        matches!(self, ViewKind::Updates)
    }

    pub fn declares(self, label: &str) -> bool {
        self.columns().iter().any(|c| c.label == label)
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ViewKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViewKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("unknown view {s:?}"))
    }
}

/// User-controlled column visibility for one view. Everything starts enabled.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnSelection {
    disabled: BTreeSet<String>,
}

impl ColumnSelection {
    pub fn is_enabled(&self, label: &str) -> bool {
        !self.disabled.contains(label)
    }

    /// Returns whether the selection changed.
    pub fn set_enabled(&mut self, label: &str, enabled: bool) -> bool {
        if enabled {
            self.disabled.remove(label)
        } else {
            self.disabled.insert(label.to_string())
        }
    }

    pub fn disabled(&self) -> impl Iterator<Item = &str> {
        self.disabled.iter().map(String::as_str)
    }
}

/// Declared columns that are enabled, in declaration order, plus the
/// expansion column for expandable views.
pub fn effective_columns(kind: ViewKind, selection: &ColumnSelection) -> Vec<ColumnDef> {
    let mut columns: Vec<ColumnDef> = kind
        .columns()
        .iter()
        .filter(|c| selection.is_enabled(c.label))
        .copied()
        .collect();
    if kind.expandable() {
        columns.push(EXPANSION_COLUMN);
    }
    columns
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Empty,
    Text(String),
    /// Seconds, rendered through [`format_duration`].
    Duration(Option<i64>),
    Count(Option<i64>),
    Links(Vec<DisplayLink>),
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    Number(i64),
    Text(String),
}

impl CellValue {
    pub fn display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(text) => text.clone(),
            CellValue::Duration(seconds) => format_duration(seconds.map(|s| s as f64)),
            CellValue::Count(count) => format_commit_delta(*count),
            CellValue::Links(links) => links
                .iter()
                .map(|l| l.label.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    fn sort_key(&self) -> Option<SortKey> {
        match self {
            CellValue::Empty => None,
            CellValue::Duration(value) | CellValue::Count(value) => value.map(SortKey::Number),
            other => Some(SortKey::Text(other.display().to_lowercase())),
        }
    }
}

/// Value for a declared field path. Unknown paths render empty.
pub fn cell_for(field: &str, record: &RecipeStatus, derived: &DerivedFields) -> CellValue {
    let text = |value: &Option<String>| match value {
        Some(v) => CellValue::Text(v.clone()),
        None => CellValue::Empty,
    };
    match field {
        "name" => CellValue::Links(vec![match &record.homepage {
            Some(homepage) => DisplayLink::to(record.name.clone(), homepage.clone()),
            None => DisplayLink::plain(record.name.clone()),
        }]),
        "homepage" => text(&record.homepage),
        "current.version" => text(&record.current.version),
        "current.tag" => text(&record.current.tag),
        "current.date" => text(&record.current.date),
        "current.commit_count" => CellValue::Count(record.current.commit_count.map(|c| c as i64)),
        "new.version" => text(&record.new.version),
        "new.tag" => text(&record.new.tag),
        "new.date" => text(&record.new.date),
        "new.commit_count" => CellValue::Count(record.new.commit_count.map(|c| c as i64)),
        "time_interval" => CellValue::Duration(derived.time_interval),
        "commit_delta" => CellValue::Count(derived.commit_delta),
        "prs" => CellValue::Links(resolve_pr_links(&record.prs_opened, &record.updated_branch)),
        "details" => text(&record.details),
        "update_error" => text(&record.update_error),
        "test_error" => text(&record.test_error),
        _ => CellValue::Empty,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    /// Record name; stable row identity across refreshes.
    pub key: String,
    pub cells: Vec<CellValue>,
    pub detail: Option<String>,
    pub expanded: bool,
}

impl RowView {
    /// Case-insensitive substring match over every rendered cell.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.cells
            .iter()
            .any(|cell| cell.display().to_lowercase().contains(&needle))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedView {
    pub kind: ViewKind,
    pub columns: Vec<ColumnDef>,
    pub rows: Vec<RowView>,
}

impl ProjectedView {
    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.label == label)
    }
}

/// Assembles the rows and columns handed to the table surface.
pub fn project(
    kind: ViewKind,
    snapshot: &Snapshot,
    selection: &ColumnSelection,
    expanded: &BTreeSet<String>,
) -> ProjectedView {
    let columns = effective_columns(kind, selection);
    let rows = kind
        .preset()
        .apply(snapshot)
        .into_iter()
        .map(|record| {
            let derived = DerivedFields::for_record(record);
            let cells = columns
                .iter()
                .map(|c| cell_for(c.field, record, &derived))
                .collect();
            let detail = kind.expandable().then(|| detail_for(record)).flatten();
            RowView {
                key: record.name.clone(),
                cells,
                expanded: detail.is_some() && expanded.contains(&record.name),
                detail,
            }
        })
        .collect();
    ProjectedView {
        kind,
        columns,
        rows,
    }
}

fn detail_for(record: &RecipeStatus) -> Option<String> {
    let sections: Vec<String> = [
        ("Update error", &record.update_error),
        ("Test error", &record.test_error),
        ("Details", &record.details),
    ]
    .into_iter()
    .filter_map(|(title, body)| body.as_ref().map(|b| format!("{title}:\n{b}")))
    .collect();
    (!sections.is_empty()).then(|| sections.join("\n\n"))
}

/// Stable sort on one column. Unknown and empty cells go last in either
/// direction.
pub fn sort_rows(rows: &mut [RowView], column: usize, descending: bool) {
    rows.sort_by(|a, b| {
        let ka = a.cells.get(column).and_then(CellValue::sort_key);
        let kb = b.cells.get(column).and_then(CellValue::sort_key);
        match (ka, kb) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(ka), Some(kb)) if descending => kb.cmp(&ka),
            (Some(ka), Some(kb)) => ka.cmp(&kb),
        }
    });
}
