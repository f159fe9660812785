use crossterm::event::KeyEvent;
use std::time::Duration;

use crate::ai::SummaryRequest;
use crate::github::{CollectedPrs, MergedPr};

/// Stage of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Loading,
    AwaitingInput,
    Fetching,
    Summarizing,
    Done,
    Failed,
}

impl Phase {
    /// Phases whose keys belong to the input panel
    pub fn accepts_input(self) -> bool {
        matches!(self, Phase::Loading | Phase::AwaitingInput)
    }

    /// Phases that only leave through restart or quit
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Done | Phase::Failed)
    }
}

/// Everything the controller reacts to: terminal input, work results and timers.
///
/// Pipeline results carry the `attempt` they were issued for so that results
/// of an abandoned attempt can be told apart from the current one.
#[derive(Debug, Clone)]
pub enum AppEvent {
    Key(KeyEvent),
    Paste(String),
    Resize {
        width: u16,
        height: u16,
    },
    /// Spinner animation
    Tick,
    ReposLoaded(Result<Vec<String>, String>),
    StartRequested,
    PrsFetched {
        attempt: u64,
        result: Result<Vec<MergedPr>, String>,
    },
    CollectProgress {
        attempt: u64,
        current: usize,
        total: usize,
        title: String,
    },
    DetailsCollected {
        attempt: u64,
        collected: CollectedPrs,
    },
    SummaryReady {
        attempt: u64,
        result: Result<String, String>,
    },
    FeedbackTimerFired {
        generation: u64,
    },
}

/// Work items returned by the controller and run off the event loop
#[derive(Debug, Clone, PartialEq)]
pub enum Work {
    LoadRepositories {
        limit: u32,
        include_orgs: bool,
    },
    FetchMergedPrs {
        attempt: u64,
        repo: String,
        days: u32,
        branch: String,
    },
    CollectDetails {
        attempt: u64,
        repo: String,
        prs: Vec<MergedPr>,
    },
    Summarize {
        attempt: u64,
        request: SummaryRequest,
    },
    ClearFeedbackAfter {
        generation: u64,
        delay: Duration,
    },
}

impl Work {
    pub fn kind(&self) -> &'static str {
        match self {
            Work::LoadRepositories { .. } => "load_repositories",
            Work::FetchMergedPrs { .. } => "fetch_merged_prs",
            Work::CollectDetails { .. } => "collect_details",
            Work::Summarize { .. } => "summarize",
            Work::ClearFeedbackAfter { .. } => "clear_feedback",
        }
    }

    /// True for the fetch/collect/summarize stages
    pub fn is_pipeline_stage(&self) -> bool {
        matches!(
            self,
            Work::FetchMergedPrs { .. } | Work::CollectDetails { .. } | Work::Summarize { .. }
        )
    }
}
