//! Markdown summary of a snapshot, suitable for a tracking issue body.

use crate::derive::{format_duration, parse_date};
use crate::links::{links_to_markdown, resolve_pr_links};
use crate::{FilterPreset, RecipeStatus, Snapshot, SnapshotCounts};

const ACTION_RUNS_URL: &str = "https://github.com/qchateau/conan-center-bot/actions/runs";
const PAGES_URL: &str = "https://qchateau.github.io/conan-center-bot/";
const BOT_URL: &str = "https://github.com/qchateau/conan-center-bot";

pub fn status_report(snapshot: &Snapshot) -> String {
    let meta = snapshot.meta();
    let counts = SnapshotCounts::from_snapshot(snapshot);
    let date = meta
        .date
        .as_deref()
        .and_then(parse_date)
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let run = match meta.github_action_run_id.as_deref() {
        Some(id) => format!("[{id}]({ACTION_RUNS_URL}/{id})"),
        None => "unknown".to_string(),
    };

    let mut lines = vec![
        "# Conan Center Bot".to_string(),
        String::new(),
        format!("* Date: {date}"),
        format!("* GitHub Action run: {run}"),
        format!("* Parsed recipes: {}", counts.total),
        format!("* Up-to-date recipes: {}", counts.up_to_date),
        format!("* Updatable recipes: {}", counts.updatable),
        format!("* Inconsistent recipes: {}", counts.inconsistent),
        format!("* Unsupported recipes: {}", counts.unsupported),
        format!("* Duration: {}", format_duration(meta.duration)),
        String::new(),
        format!("Find more details in the [GitHub Pages]({PAGES_URL})."),
        String::new(),
        format!(
            "This list is auto-generated by [Conan Center Bot]({BOT_URL}) \
             and the updatability detection or version parsing can be flawed. \
             Any help improving this tool is welcome !"
        ),
        String::new(),
        format!(
            "You can also use [Conan Center Bot]({BOT_URL}) \
             to automatically generate an update for a recipe."
        ),
        String::new(),
        "### Updatable recipes".to_string(),
        String::new(),
        "|Name|Recipe version|New version|Upstream version|Pull request|".to_string(),
        "|----|--------------|-----------|----------------|------------|".to_string(),
    ];

    let updatable = FilterPreset::UpdatableAll.apply(snapshot);
    lines.extend(updatable.iter().map(|r| {
        table_row(&[
            name_link(r),
            field(&r.current.version),
            field(&r.new.version),
            field(&r.new.tag),
            links_to_markdown(&resolve_pr_links(&r.prs_opened, &r.updated_branch)),
        ])
    }));

    lines.extend([
        String::new(),
        "### Inconsistent recipes".to_string(),
        String::new(),
        "The following recipes are not consistent with their upstream versioning scheme. \
         Most of the times it means the current recipe version is not related to any upstream tag."
            .to_string(),
        String::new(),
        "|Name|Current recipe version|Upstream version|".to_string(),
        "|----|----------------------|----------------|".to_string(),
    ]);
    lines.extend(
        FilterPreset::Inconsistent
            .apply(snapshot)
            .iter()
            .map(|r| table_row(&[name_link(r), field(&r.current.version), field(&r.new.tag)])),
    );

    lines.extend([
        String::new(),
        "### Updatable recipes with errors".to_string(),
        String::new(),
        "The following recipes are detected as updatable but the bot \
         failed to automatically update the recipe."
            .to_string(),
        String::new(),
        "<table>".to_string(),
        "<tr><th>Name</th><th>Error</th></tr>".to_string(),
    ]);
    lines.extend(updatable.iter().filter_map(|r| {
        let error = r.test_error.as_deref()?;
        let name = match &r.homepage {
            Some(homepage) => format!("<a href=\"{homepage}\">{}</a>", r.name),
            None => r.name.clone(),
        };
        Some(format!(
            "<tr><td>{name}</td><td>{}</td></tr>",
            preformatted(error)
        ))
    }));
    lines.push("</table>".to_string());

    lines.join("\n")
}

fn name_link(record: &RecipeStatus) -> String {
    match &record.homepage {
        Some(homepage) => format!("[{}]({homepage})", record.name),
        None => record.name.clone(),
    }
}

fn field(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn table_row(cells: &[String]) -> String {
    format!("|{}|", cells.join("|"))
}

fn preformatted(text: &str) -> String {
    format!("<pre>{}</pre>", text.replace('\n', "<br/>"))
}
