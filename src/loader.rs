use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

use crate::ai;
use crate::app::{AppEvent, Work};
use crate::config::Config;
use crate::github::{self, CollectLimits};

/// Runs [`Work`] items on tokio tasks and sends their results back as [`AppEvent`]s.
///
/// The controller never waits on anything: each item becomes a detached task
/// whose only output is one (or, for collection progress, several) events.
pub struct Executor {
    tx: mpsc::Sender<AppEvent>,
    config: Config,
    /// Pending "clear copy feedback" timer; re-armed on every copy
    feedback_timer: Option<AbortHandle>,
}

impl Executor {
    pub fn new(tx: mpsc::Sender<AppEvent>, config: Config) -> Self {
        Self {
            tx,
            config,
            feedback_timer: None,
        }
    }

    pub fn dispatch_all(&mut self, work: Vec<Work>) {
        for item in work {
            self.dispatch(item);
        }
    }

    pub fn dispatch(&mut self, work: Work) {
        debug!(kind = work.kind(), "dispatch");
        let tx = self.tx.clone();
        match work {
            Work::LoadRepositories {
                limit,
                include_orgs,
            } => {
                tokio::spawn(async move {
                    let result = github::list_repos(limit, include_orgs)
                        .await
                        .map_err(|e| format!("{:#}", e));
                    send(&tx, AppEvent::ReposLoaded(result)).await;
                });
            }
            Work::FetchMergedPrs {
                attempt,
                repo,
                days,
                branch,
            } => {
                let limit = self.config.github.pr_limit;
                tokio::spawn(async move {
                    let result = github::list_merged_prs(&repo, days, &branch, limit)
                        .await
                        .map_err(|e| format!("{:#}", e));
                    send(&tx, AppEvent::PrsFetched { attempt, result }).await;
                });
            }
            Work::CollectDetails { attempt, repo, prs } => {
                let limits = CollectLimits {
                    large_files: self.config.github.large_pr_files,
                    large_changes: self.config.github.large_pr_changes,
                    diff_max_lines: self.config.github.diff_max_lines,
                };
                tokio::spawn(async move {
                    let progress_tx = tx.clone();
                    let collected = github::collect_prs(&repo, &prs, limits, |current, total, pr| {
                        // Progress is cosmetic; drop it if the loop is behind
                        let _ = progress_tx.try_send(AppEvent::CollectProgress {
                            attempt,
                            current,
                            total,
                            title: format!("#{} {}", pr.number, pr.title),
                        });
                    })
                    .await;
                    send(&tx, AppEvent::DetailsCollected { attempt, collected }).await;
                });
            }
            Work::Summarize { attempt, request } => {
                let summary_config = self.config.summary.clone();
                tokio::spawn(async move {
                    let result = ai::summarize(&summary_config, &request)
                        .await
                        .map_err(|e| e.to_string());
                    send(&tx, AppEvent::SummaryReady { attempt, result }).await;
                });
            }
            Work::ClearFeedbackAfter { generation, delay } => {
                if let Some(handle) = self.feedback_timer.take() {
                    handle.abort();
                }
                let handle = tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    send(&tx, AppEvent::FeedbackTimerFired { generation }).await;
                });
                self.feedback_timer = Some(handle.abort_handle());
            }
        }
    }

    /// Abort the pending feedback timer, if any
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.feedback_timer.take() {
            handle.abort();
        }
    }
}

async fn send(tx: &mpsc::Sender<AppEvent>, event: AppEvent) {
    if tx.send(event).await.is_err() {
        warn!("event loop closed before a result could be delivered");
    }
}
