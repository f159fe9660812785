use anyhow::Result;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use tracing::{debug, warn};

use super::client::{gh_command, gh_json};

const PR_LIST_FIELDS: &str = "number,title,body,additions,deletions,changedFiles,mergedAt,author,url";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
}

/// A merged pull request as returned by `gh pr list --json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedPr {
    pub number: u32,
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub additions: u32,
    pub deletions: u32,
    pub changed_files: u32,
    pub merged_at: DateTime<Utc>,
    pub author: User,
    pub url: String,
}

impl MergedPr {
    pub fn changes(&self) -> u32 {
        self.additions + self.deletions
    }
}

/// Size thresholds and excerpt limits for per-PR detail collection
#[derive(Debug, Clone, Copy)]
pub struct CollectLimits {
    pub large_files: u32,
    pub large_changes: u32,
    pub diff_max_lines: usize,
}

impl CollectLimits {
    /// Large PRs are listed without their diff.
    pub fn is_large(&self, pr: &MergedPr) -> bool {
        pr.changed_files > self.large_files || pr.changes() > self.large_changes
    }
}

/// Formatted text of every collected PR plus the merge date range
#[derive(Debug, Clone, PartialEq)]
pub struct CollectedPrs {
    pub text: String,
    pub count: usize,
    pub start_date: String,
    pub end_date: String,
}

/// `gh` search qualifier for PRs merged since `since`, optionally on one base branch
pub fn build_search_query(since: NaiveDate, base_branch: &str) -> String {
    let mut search = format!("merged:>={}", since.format("%Y-%m-%d"));
    if !base_branch.is_empty() {
        search.push_str(" base:");
        search.push_str(base_branch);
    }
    search
}

pub async fn list_merged_prs(
    repo: &str,
    days: u32,
    base_branch: &str,
    limit: u32,
) -> Result<Vec<MergedPr>> {
    let since = (Utc::now() - Duration::days(i64::from(days))).date_naive();
    let search = build_search_query(since, base_branch);
    let limit = limit.to_string();
    debug!(repo, %search, "listing merged PRs");

    gh_json(
        &[
            "pr",
            "list",
            "--repo",
            repo,
            "--state",
            "merged",
            "--search",
            &search,
            "--limit",
            &limit,
            "--json",
            PR_LIST_FIELDS,
        ],
        "Failed to parse PR list response",
    )
    .await
}

/// Fetch the raw diff for a PR, keeping the first `max_lines` lines
pub async fn fetch_pr_diff(repo: &str, pr_number: u32, max_lines: usize) -> Result<String> {
    let diff = gh_command(&["pr", "diff", &pr_number.to_string(), "--repo", repo]).await?;
    Ok(truncate_lines(&diff, max_lines))
}

fn truncate_lines(text: &str, max_lines: usize) -> String {
    text.lines().take(max_lines).collect::<Vec<_>>().join("\n")
}

#[derive(Debug, Deserialize)]
struct PrComments {
    comments: Vec<PrComment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PrComment {
    author: User,
    #[serde(default)]
    author_association: String,
    body: String,
}

/// Conversation comments by people associated with the repo, one line each
pub async fn fetch_review_comments(repo: &str, pr_number: u32) -> Result<String> {
    let parsed: PrComments = gh_json(
        &[
            "pr",
            "view",
            &pr_number.to_string(),
            "--repo",
            repo,
            "--json",
            "comments",
        ],
        "Failed to parse PR comments response",
    )
    .await?;
    Ok(format_comments(&parsed.comments))
}

fn format_comments(comments: &[PrComment]) -> String {
    comments
        .iter()
        .filter(|c| c.author_association != "NONE")
        .map(|c| {
            let first_line = c.body.lines().next().unwrap_or("").trim();
            format!("- **{}**: {}", c.author.login, first_line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render one PR as a markdown section for the summarizer prompt
pub fn format_pr_section(
    pr: &MergedPr,
    large: bool,
    diff: Option<&str>,
    comments: Option<&str>,
) -> String {
    let mut b = String::new();
    let _ = writeln!(b, "## PR #{}: {}", pr.number, pr.title);
    let _ = writeln!(b, "- Author: {}", pr.author.login);
    let _ = writeln!(b, "- Merged: {}", pr.merged_at.format("%Y-%m-%d"));
    let _ = writeln!(
        b,
        "- Stats: +{} -{} ({} files)",
        pr.additions, pr.deletions, pr.changed_files
    );
    let _ = writeln!(b, "- URL: {}", pr.url);
    let _ = writeln!(b, "\n### Description\n{}", pr.body);

    if large {
        b.push_str("\n> Large PR - showing summary only\n");
    } else if let Some(diff) = diff.filter(|d| !d.is_empty()) {
        let _ = writeln!(b, "\n### Code Changes (excerpt)\n```diff\n{}\n```", diff);
    }

    if let Some(comments) = comments.filter(|c| !c.is_empty()) {
        let _ = writeln!(b, "\n### Review Comments\n{}", comments);
    }

    b
}

/// Collect the section for a single PR. Never fails: missing pieces are omitted.
pub async fn collect_pr_detail(repo: &str, pr: &MergedPr, limits: CollectLimits) -> String {
    let large = limits.is_large(pr);

    let diff = if large {
        None
    } else {
        match fetch_pr_diff(repo, pr.number, limits.diff_max_lines).await {
            Ok(diff) => Some(diff),
            Err(e) => {
                warn!(pr = pr.number, "Failed to fetch diff: {:#}", e);
                None
            }
        }
    };

    let comments = match fetch_review_comments(repo, pr.number).await {
        Ok(c) => Some(c),
        Err(e) => {
            debug!(pr = pr.number, "Failed to fetch comments: {:#}", e);
            None
        }
    };

    format_pr_section(pr, large, diff.as_deref(), comments.as_deref())
}

/// Oldest and newest merge date, formatted as YYYY-MM-DD
pub fn merge_date_range(prs: &[MergedPr]) -> Option<(String, String)> {
    let start = prs.iter().map(|pr| pr.merged_at).min()?;
    let end = prs.iter().map(|pr| pr.merged_at).max()?;
    Some((
        start.format("%Y-%m-%d").to_string(),
        end.format("%Y-%m-%d").to_string(),
    ))
}

/// Collect all PRs sequentially, reporting progress before each one.
pub async fn collect_prs(
    repo: &str,
    prs: &[MergedPr],
    limits: CollectLimits,
    mut on_progress: impl FnMut(usize, usize, &MergedPr),
) -> CollectedPrs {
    let mut text = String::new();
    for (i, pr) in prs.iter().enumerate() {
        on_progress(i + 1, prs.len(), pr);
        text.push_str(&collect_pr_detail(repo, pr, limits).await);
        text.push_str("\n---\n");
    }

    let (start_date, end_date) = merge_date_range(prs).unwrap_or_default();
    CollectedPrs {
        text,
        count: prs.len(),
        start_date,
        end_date,
    }
}
