use crate::{PullRequest, UpdatedBranch};

/// A display label that may point somewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLink {
    pub label: String,
    pub href: Option<String>,
}

impl DisplayLink {
    pub fn to(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: Some(href.into()),
        }
    }

    pub fn plain(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: None,
        }
    }

    pub fn is_actionable(&self) -> bool {
        self.href.is_some()
    }

    pub fn to_markdown(&self) -> String {
        match &self.href {
            Some(href) => format!("[{}]({})", self.label, href),
            None => self.label.clone(),
        }
    }
}

/// GitHub's "open a pull request from this branch" page.
pub fn new_pull_request_url(owner: &str, repo: &str, branch: &str) -> String {
    format!("https://github.com/{owner}/{repo}/pull/new/{branch}")
}

/// One `#<number>` link per opened PR in the given order; otherwise an
/// "Open one" link for a fully described branch, or a bare "No".
pub fn resolve_pr_links(prs_opened: &[PullRequest], branch: &UpdatedBranch) -> Vec<DisplayLink> {
    if !prs_opened.is_empty() {
        return prs_opened
            .iter()
            .map(|pr| DisplayLink::to(format!("#{}", pr.number), pr.url.clone()))
            .collect();
    }
    match branch.parts() {
        Some((owner, repo, branch)) => vec![DisplayLink::to(
            "Open one",
            new_pull_request_url(owner, repo, branch),
        )],
        None => vec![DisplayLink::plain("No")],
    }
}

pub fn links_to_markdown(links: &[DisplayLink]) -> String {
    links
        .iter()
        .map(DisplayLink::to_markdown)
        .collect::<Vec<_>>()
        .join(", ")
}
