mod client;
mod pr;
mod repo;

pub use client::{gh_command, gh_json};
pub use pr::{
    build_search_query, collect_pr_detail, collect_prs, fetch_pr_diff, fetch_review_comments,
    format_pr_section, list_merged_prs, merge_date_range, CollectLimits, CollectedPrs, MergedPr,
    User,
};
pub use repo::list_repos;

#[cfg(test)]
pub(crate) use pr::tests::sample_pr;
