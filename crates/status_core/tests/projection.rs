use std::collections::BTreeSet;

use pretty_assertions::assert_eq;
use status_core::{
    effective_columns, project, sort_rows, CellValue, ColumnSelection, DisplayLink, ProjectedView,
    PullRequest, RecipeStatus, Snapshot, ViewKind, EXPANSION_COLUMN,
};

fn labels(kind: ViewKind, selection: &ColumnSelection) -> Vec<&'static str> {
    effective_columns(kind, selection)
        .into_iter()
        .map(|c| c.label)
        .collect()
}

fn cell<'a>(view: &'a ProjectedView, label: &str) -> &'a CellValue {
    &view.rows[0].cells[view.column_index(label).expect("column")]
}

fn updatable(name: &str, current_date: &str, new_date: &str) -> RecipeStatus {
    let mut record = RecipeStatus::named(name);
    record.updatable = true;
    record.current.date = Some(current_date.to_string());
    record.new.date = Some(new_date.to_string());
    record
}

#[test]
fn all_columns_enabled_by_default() {
    let selection = ColumnSelection::default();

    assert_eq!(
        labels(ViewKind::Updatable, &selection),
        vec!["Name", "Recipe version", "New version", "Upstream tag", "Pull request"]
    );
}

#[test]
fn expandable_view_appends_expansion_column() {
    let columns = effective_columns(ViewKind::Updates, &ColumnSelection::default());

    assert_eq!(columns.last(), Some(&EXPANSION_COLUMN));
    assert!(!EXPANSION_COLUMN.sortable);
}

#[test]
fn disabling_preserves_declared_order_regardless_of_toggle_order() {
    let mut first = ColumnSelection::default();
    first.set_enabled("Current tag", false);
    first.set_enabled("New date", false);
    first.set_enabled("Current date", false);

    let mut second = ColumnSelection::default();
    second.set_enabled("Current date", false);
    second.set_enabled("Current tag", false);
    second.set_enabled("New date", false);

    let expected = vec![
        "Name",
        "Current version",
        "New version",
        "New tag",
        "Time interval",
        "Commits",
        "Pull request",
        "",
    ];
    assert_eq!(labels(ViewKind::Updates, &first), expected);
    assert_eq!(labels(ViewKind::Updates, &second), expected);
}

#[test]
fn re_enabling_restores_the_declared_position() {
    let mut selection = ColumnSelection::default();
    assert!(selection.set_enabled("New version", false));
    assert!(!selection.set_enabled("New version", false));
    assert!(selection.set_enabled("New version", true));

    assert_eq!(
        labels(ViewKind::Inconsistent, &selection),
        vec!["Name", "Recipe version", "Upstream tag"]
    );
    assert_eq!(labels(ViewKind::Updatable, &selection)[2], "New version");
}

#[test]
fn rows_merge_derived_fields_and_links() {
    let mut record = updatable("fmt", "2020-01-01T00:00:00Z", "2020-01-01T00:01:05Z");
    record.homepage = Some("https://fmt.dev".to_string());
    record.current.commit_count = Some(100);
    record.new.commit_count = Some(120);
    record.prs_opened = vec![PullRequest {
        number: 5,
        url: "https://github.com/o/r/pull/5".to_string(),
    }];
    let snapshot = Snapshot::from_records(vec![record.clone()]);

    let view = project(
        ViewKind::Updates,
        &snapshot,
        &ColumnSelection::default(),
        &BTreeSet::new(),
    );

    assert_eq!(view.rows[0].key, "fmt");
    assert_eq!(
        cell(&view, "Name"),
        &CellValue::Links(vec![DisplayLink::to("fmt", "https://fmt.dev")])
    );
    assert_eq!(cell(&view, "Time interval"), &CellValue::Duration(Some(65)));
    assert_eq!(cell(&view, "Time interval").display(), "1m 5s");
    assert_eq!(cell(&view, "Commits").display(), "20");
    assert_eq!(cell(&view, "Pull request").display(), "#5");
    assert_eq!(cell(&view, "").display(), "");

    // Derived values never leak back into the canonical record.
    assert_eq!(snapshot.get("fmt"), Some(&record));
}

#[test]
fn unknown_derived_values_render_as_unknown() {
    let mut record = RecipeStatus::named("zlib");
    record.updatable = true;
    record.current.commit_count = Some(0);
    record.new.commit_count = Some(5);
    let snapshot = Snapshot::from_records(vec![record]);

    let view = project(
        ViewKind::Updates,
        &snapshot,
        &ColumnSelection::default(),
        &BTreeSet::new(),
    );

    let row = &view.rows[0];
    assert_eq!(
        row.cells[view.column_index("Time interval").unwrap()].display(),
        "Unknown"
    );
    assert_eq!(
        row.cells[view.column_index("Commits").unwrap()].display(),
        "Unknown"
    );
}

#[test]
fn detail_panel_only_for_rows_with_errors() {
    let mut failing = updatable("boost", "2020-01-01", "2020-02-01");
    failing.update_error = Some("conan create failed".to_string());
    let clean = updatable("fmt", "2020-01-01", "2020-02-01");
    let snapshot = Snapshot::from_records(vec![failing, clean]);
    let expanded: BTreeSet<String> = ["boost".to_string(), "fmt".to_string()].into();

    let view = project(
        ViewKind::Updates,
        &snapshot,
        &ColumnSelection::default(),
        &expanded,
    );

    assert_eq!(
        view.rows[0].detail.as_deref(),
        Some("Update error:\nconan create failed")
    );
    assert!(view.rows[0].expanded);
    assert_eq!(view.rows[1].detail, None);
    assert!(!view.rows[1].expanded);
}

#[test]
fn unsupported_view_shows_details_column() {
    let mut broken = RecipeStatus::named("broken");
    broken.supported = false;
    broken.details = Some("No config.yml file".to_string());
    let snapshot = Snapshot::from_records(vec![broken, RecipeStatus::named("ok")]);

    let view = project(
        ViewKind::Unsupported,
        &snapshot,
        &ColumnSelection::default(),
        &BTreeSet::new(),
    );

    assert_eq!(view.rows.len(), 1);
    assert_eq!(view.rows[0].cells[1].display(), "No config.yml file");
}

#[test]
fn search_matches_any_rendered_cell() {
    let mut record = updatable("spdlog", "2020-01-01", "2020-01-02");
    record.new.version = Some("1.8.2".to_string());
    let snapshot = Snapshot::from_records(vec![record]);
    let view = project(
        ViewKind::Updatable,
        &snapshot,
        &ColumnSelection::default(),
        &BTreeSet::new(),
    );
    let row = &view.rows[0];

    assert!(row.matches_search("SPD"));
    assert!(row.matches_search("1.8"));
    assert!(row.matches_search("  "));
    assert!(!row.matches_search("boost"));
}

#[test]
fn sorting_is_numeric_and_keeps_unknown_last() {
    let snapshot = Snapshot::from_records(vec![
        updatable("slow", "2020-01-01", "2021-01-01"),
        RecipeStatus {
            updatable: true,
            ..RecipeStatus::named("unknown")
        },
        updatable("fast", "2020-01-01", "2020-01-02"),
    ]);
    let view = project(
        ViewKind::Updates,
        &snapshot,
        &ColumnSelection::default(),
        &BTreeSet::new(),
    );
    let column = view.column_index("Time interval").unwrap();

    let mut ascending = view.rows.clone();
    sort_rows(&mut ascending, column, false);
    let keys: Vec<_> = ascending.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["fast", "slow", "unknown"]);

    let mut descending = view.rows.clone();
    sort_rows(&mut descending, column, true);
    let keys: Vec<_> = descending.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["slow", "fast", "unknown"]);
}

#[test]
fn view_names_round_trip_through_from_str() {
    for kind in ViewKind::ALL {
        assert_eq!(kind.name().parse::<ViewKind>(), Ok(kind));
    }
    assert!("nope".parse::<ViewKind>().is_err());
}
