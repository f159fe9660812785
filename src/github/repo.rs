use anyhow::{Context, Result};
use std::collections::BTreeSet;
use tracing::{info, warn};

use super::client::{gh_command, non_empty_lines};

/// List repositories the user can read: their own plus every organization's.
///
/// The personal listing must succeed. Organization listings are best effort,
/// a failing org is logged and skipped. The result is deduplicated.
pub async fn list_repos(limit: u32, include_orgs: bool) -> Result<Vec<String>> {
    let mut repos = BTreeSet::new();

    let own = list_owner_repos(None, limit)
        .await
        .context("listing repos")?;
    repos.extend(own);

    if include_orgs {
        match gh_command(&["api", "user/orgs", "--jq", ".[].login"]).await {
            Ok(out) => {
                for org in non_empty_lines(&out) {
                    match list_owner_repos(Some(org), limit).await {
                        Ok(org_repos) => repos.extend(org_repos),
                        Err(e) => warn!(org, "Failed to list org repos: {:#}", e),
                    }
                }
            }
            Err(e) => warn!("Failed to list orgs: {:#}", e),
        }
    }

    info!(count = repos.len(), "repositories discovered");
    Ok(repos.into_iter().collect())
}

async fn list_owner_repos(owner: Option<&str>, limit: u32) -> Result<Vec<String>> {
    let limit = limit.to_string();
    let mut args = vec!["repo", "list"];
    if let Some(owner) = owner {
        args.push(owner);
    }
    args.extend([
        "--limit",
        limit.as_str(),
        "--json",
        "nameWithOwner",
        "-q",
        ".[].nameWithOwner",
    ]);
    let out = gh_command(&args).await?;
    Ok(non_empty_lines(&out).map(str::to_string).collect())
}
