use status_core::{AppViewModel, ProjectedView, RowView};

const MAX_CELL_WIDTH: usize = 48;

pub fn render(view: &AppViewModel) -> String {
    let counts = &view.counts;
    let mut out = String::new();

    out.push_str(&format!(
        "{} ({} shown)\n",
        view.active_view.title(),
        view.projected.rows.len()
    ));
    out.push_str(&format!(
        "Recipes: {} | Up-to-date: {} | Updatable: {} | Inconsistent: {} | Unsupported: {} | Deprecated: {}\n",
        counts.total,
        counts.up_to_date,
        counts.updatable,
        counts.inconsistent,
        counts.unsupported,
        counts.deprecated
    ));
    if let Some(error) = &view.error_banner {
        out.push_str(&format!("!! Refresh failed: {error}\n"));
    }
    if !view.search.is_empty() {
        out.push_str(&format!("Filter: {:?}\n", view.search));
    }
    out.push('\n');
    out.push_str(&render_table(&view.projected));
    out
}

pub fn render_table(projected: &ProjectedView) -> String {
    let header: Vec<String> = projected
        .columns
        .iter()
        .map(|c| c.label.to_string())
        .collect();
    let rows: Vec<Vec<String>> = projected.rows.iter().map(row_cells).collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    out.push_str(&format_line(&header, &widths));
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    out.push('\n');
    for (row, cells) in projected.rows.iter().zip(&rows) {
        out.push_str(&format_line(cells, &widths));
        if let (true, Some(detail)) = (row.expanded, &row.detail) {
            for line in detail.lines() {
                out.push_str(&format!("    {line}\n"));
            }
        }
    }
    out
}

fn row_cells(row: &RowView) -> Vec<String> {
    row.cells
        .iter()
        .map(|cell| truncate(&cell.display()))
        .collect()
}

fn truncate(text: &str) -> String {
    let single_line = text.lines().next().unwrap_or_default();
    if single_line.chars().count() > MAX_CELL_WIDTH || single_line.len() < text.len() {
        let kept: String = single_line.chars().take(MAX_CELL_WIDTH - 1).collect();
        format!("{kept}…")
    } else {
        single_line.to_string()
    }
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    format!("{}\n", padded.join(" | ").trim_end())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use status_core::{project, ColumnSelection, RecipeStatus, Snapshot, ViewKind};

    use super::*;

    fn projected(records: Vec<RecipeStatus>, kind: ViewKind, expanded: &[&str]) -> ProjectedView {
        let expanded: BTreeSet<String> = expanded.iter().map(|k| k.to_string()).collect();
        project(
            kind,
            &Snapshot::from_records(records),
            &ColumnSelection::default(),
            &expanded,
        )
    }

    #[test]
    fn table_aligns_columns() {
        let mut fmt = RecipeStatus::named("fmt");
        fmt.inconsistent_versioning = true;
        fmt.current.version = Some("7.1.3".to_string());
        fmt.new.tag = Some("v8".to_string());

        let table = render_table(&projected(vec![fmt], ViewKind::Inconsistent, &[]));

        assert_eq!(
            table,
            "Name | Recipe version | Upstream tag\n\
             -----+----------------+-------------\n\
             fmt  | 7.1.3          | v8\n"
        );
    }

    #[test]
    fn expanded_rows_print_detail_lines() {
        let mut boost = RecipeStatus::named("boost");
        boost.updatable = true;
        boost.update_error = Some("first\nsecond".to_string());

        let table = render_table(&projected(vec![boost], ViewKind::Updates, &["boost"]));

        assert!(table.contains("    Update error:\n    first\n    second\n"));
    }

    #[test]
    fn long_cells_are_truncated() {
        let long = "x".repeat(100);
        let cut = truncate(&long);

        assert_eq!(cut.chars().count(), MAX_CELL_WIDTH);
        assert!(cut.ends_with('…'));
        assert_eq!(truncate("a\nb"), "a…");
        assert_eq!(truncate("short"), "short");
    }
}
