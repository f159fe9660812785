use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::types::{AppEvent, Phase, Work};
use super::App;
use crate::ai::SummaryRequest;
use crate::config::DEFAULT_LOOKBACK_DAYS;
use crate::github::{CollectedPrs, MergedPr};
use crate::panel::InputAction;

pub(crate) const NO_PRS_MESSAGE: &str = "No merged PRs found";
const COPIED_FEEDBACK: &str = "Copied!";

/// Lookback window from the days field; anything but a positive integer falls back to the default
pub fn parse_days(input: &str) -> u32 {
    input
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|&days| days > 0)
        .unwrap_or(DEFAULT_LOOKBACK_DAYS)
}

/// Inner panel sizes for a terminal of `width` x `height`: 40/60 split minus border and padding.
/// The output panel takes whatever the input panel leaves, as the renderer does.
pub fn panel_sizes(width: u16, height: u16) -> ((u16, u16), (u16, u16)) {
    let inner_height = height.saturating_sub(2);
    let left = (u32::from(width) * 4 / 10) as u16;
    let right = width - left;
    ((left.saturating_sub(4), inner_height), (right.saturating_sub(4), inner_height))
}

impl App {
    pub fn handle(&mut self, event: AppEvent) -> Vec<Work> {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Paste(text) => {
                if self.phase.accepts_input() {
                    self.input.paste(&text);
                }
                Vec::new()
            }
            AppEvent::Resize { width, height } => {
                self.resize(width, height);
                Vec::new()
            }
            AppEvent::Tick => {
                self.input.tick();
                self.output.tick();
                Vec::new()
            }
            AppEvent::ReposLoaded(result) => self.on_repos_loaded(result),
            AppEvent::StartRequested => self.start_fetch(),
            AppEvent::PrsFetched { attempt, result } => self.on_prs_fetched(attempt, result),
            AppEvent::CollectProgress {
                attempt,
                current,
                total,
                title,
            } => {
                if self.is_current(attempt, Phase::Fetching) {
                    self.output
                        .set_progress(format!("Collecting {}/{}: {}", current, total, title));
                }
                Vec::new()
            }
            AppEvent::DetailsCollected { attempt, collected } => {
                self.on_details_collected(attempt, collected)
            }
            AppEvent::SummaryReady { attempt, result } => self.on_summary_ready(attempt, result),
            AppEvent::FeedbackTimerFired { generation } => {
                if generation == self.feedback_generation {
                    self.output.clear_copy_feedback();
                } else {
                    debug!(generation, current = self.feedback_generation, "stale feedback timer");
                }
                Vec::new()
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Work> {
        if key.kind != KeyEventKind::Press {
            return Vec::new();
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Vec::new();
        }

        if self.phase.is_terminal() && key.modifiers.is_empty() {
            match key.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                    return Vec::new();
                }
                KeyCode::Char('r') if self.output.retryable => {
                    self.restart();
                    return Vec::new();
                }
                KeyCode::Char('c') if self.phase == Phase::Done => return self.copy_document(),
                _ => {}
            }
        }

        if self.phase.accepts_input() {
            match self.input.handle_key(key) {
                Some(InputAction::StartRequested) => self.handle(AppEvent::StartRequested),
                None => Vec::new(),
            }
        } else {
            self.output.handle_key(key);
            Vec::new()
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let ((input_w, input_h), (output_w, output_h)) = panel_sizes(width, height);
        self.input.set_size(input_w, input_h);
        self.output.set_size(output_w, output_h);
    }

    /// Whether a pipeline result belongs to the attempt in progress
    fn is_current(&self, attempt: u64, phase: Phase) -> bool {
        if attempt != self.attempt || self.phase != phase {
            debug!(
                attempt,
                current = self.attempt,
                phase = ?self.phase,
                "discarding stale result"
            );
            return false;
        }
        true
    }

    fn on_repos_loaded(&mut self, result: Result<Vec<String>, String>) -> Vec<Work> {
        if self.phase != Phase::Loading {
            return Vec::new();
        }
        match result {
            Ok(repos) => {
                info!(count = repos.len(), "repositories loaded");
                self.input.set_repos(repos);
                self.output.set_idle();
                self.phase = Phase::AwaitingInput;
            }
            Err(e) => {
                // Discovery runs once per session, so there is nothing to restart into
                self.input.stop_loading();
                self.fail(e);
                self.output.retryable = false;
            }
        }
        Vec::new()
    }

    fn start_fetch(&mut self) -> Vec<Work> {
        if self.phase != Phase::AwaitingInput {
            return Vec::new();
        }
        let Some(repo) = self.input.selected_repo().map(str::to_string) else {
            return Vec::new();
        };

        let days = parse_days(self.input.days_value());
        let branch = self.input.branch_value().trim().to_string();

        self.attempt += 1;
        self.selected_repo = Some(repo.clone());
        self.phase = Phase::Fetching;
        self.output
            .set_fetching(format!("Fetching merged PRs from {}...", repo));
        info!(attempt = self.attempt, %repo, days, %branch, "starting fetch");

        vec![Work::FetchMergedPrs {
            attempt: self.attempt,
            repo,
            days,
            branch,
        }]
    }

    fn on_prs_fetched(&mut self, attempt: u64, result: Result<Vec<MergedPr>, String>) -> Vec<Work> {
        if !self.is_current(attempt, Phase::Fetching) {
            return Vec::new();
        }
        let prs = match result {
            Ok(prs) => prs,
            Err(e) => {
                self.fail(e);
                return Vec::new();
            }
        };
        if prs.is_empty() {
            self.fail(NO_PRS_MESSAGE.to_string());
            return Vec::new();
        }
        let Some(repo) = self.selected_repo.clone() else {
            return Vec::new();
        };

        self.item_count = prs.len();
        self.output
            .set_status(format!("Collecting data from {} PRs...", prs.len()));

        vec![Work::CollectDetails {
            attempt,
            repo,
            prs,
        }]
    }

    fn on_details_collected(&mut self, attempt: u64, collected: CollectedPrs) -> Vec<Work> {
        if !self.is_current(attempt, Phase::Fetching) {
            return Vec::new();
        }
        let Some(repo) = self.selected_repo.clone() else {
            return Vec::new();
        };

        let date_range = format!("{} ~ {}", collected.start_date, collected.end_date);
        self.collected_text = collected.text;
        self.item_count = collected.count;
        self.date_range = Some(date_range.clone());
        self.phase = Phase::Summarizing;
        self.output.set_summarizing(
            format!("Summarizing with {}...", self.config.summary.command),
            format!("{} PRs collected ({})", self.item_count, date_range),
        );

        vec![Work::Summarize {
            attempt,
            request: SummaryRequest {
                repo,
                pr_count: self.item_count,
                date_range,
                collected_text: self.collected_text.clone(),
            },
        }]
    }

    fn on_summary_ready(&mut self, attempt: u64, result: Result<String, String>) -> Vec<Work> {
        if !self.is_current(attempt, Phase::Summarizing) {
            return Vec::new();
        }
        match result {
            Ok(document) => {
                info!(attempt, bytes = document.len(), "summary ready");
                self.phase = Phase::Done;
                self.output.set_document(document);
            }
            Err(e) => self.fail(e),
        }
        Vec::new()
    }

    fn fail(&mut self, message: String) {
        warn!(phase = ?self.phase, "{}", message);
        self.phase = Phase::Failed;
        self.output.set_error(message);
    }

    fn restart(&mut self) {
        info!(from = ?self.phase, "restart");
        self.phase = Phase::AwaitingInput;
        self.selected_repo = None;
        self.collected_text.clear();
        self.item_count = 0;
        self.date_range = None;
        self.output.set_idle();
        self.input.stop_loading();
        self.input.reset_focus();
    }

    fn copy_document(&mut self) -> Vec<Work> {
        if self.output.raw_document().is_empty() {
            return Vec::new();
        }
        if let Err(e) = self.clipboard.copy(self.output.raw_document()) {
            debug!("Clipboard copy failed: {:#}", e);
            return Vec::new();
        }

        self.feedback_generation += 1;
        self.output.set_copy_feedback(COPIED_FEEDBACK);
        vec![Work::ClearFeedbackAfter {
            generation: self.feedback_generation,
            delay: Duration::from_millis(self.config.ui.copy_feedback_ms),
        }]
    }
}
