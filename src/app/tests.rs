use super::update::{panel_sizes, parse_days, NO_PRS_MESSAGE};
use super::*;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::github::{merge_date_range, sample_pr, CollectedPrs, MergedPr};
use crate::panel::{FocusField, OutputPhase};

fn make_key(code: KeyCode) -> KeyEvent {
    make_key_with(code, KeyModifiers::NONE)
}

fn make_key_with(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent {
        code,
        modifiers,
        kind: KeyEventKind::Press,
        state: KeyEventState::NONE,
    }
}

#[derive(Default, Clone)]
struct FakeClipboard {
    copied: Rc<RefCell<Vec<String>>>,
    fail: bool,
}

impl ClipboardSink for FakeClipboard {
    fn copy(&mut self, text: &str) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("no clipboard available");
        }
        self.copied.borrow_mut().push(text.to_string());
        Ok(())
    }
}

fn new_app() -> App {
    App::new_for_test(Box::new(FakeClipboard::default()))
}

fn press(app: &mut App, code: KeyCode) -> Vec<Work> {
    app.handle(AppEvent::Key(make_key(code)))
}

fn type_str(app: &mut App, s: &str) {
    for c in s.chars() {
        press(app, KeyCode::Char(c));
    }
}

fn loaded_app(repos: &[&str]) -> App {
    let mut app = new_app();
    app.handle(AppEvent::ReposLoaded(Ok(repos
        .iter()
        .map(|s| s.to_string())
        .collect())));
    app
}

/// Enter through the days and branch fields, as a user accepting the defaults would
fn confirm(app: &mut App) -> Vec<Work> {
    for _ in 0..3 {
        let work = press(app, KeyCode::Enter);
        if !work.is_empty() {
            return work;
        }
    }
    Vec::new()
}

fn three_prs() -> Vec<MergedPr> {
    vec![
        sample_pr(3, 2026, 1, 30),
        sample_pr(2, 2026, 2, 2),
        sample_pr(1, 2026, 1, 26),
    ]
}

fn collected_for(prs: &[MergedPr]) -> CollectedPrs {
    let (start_date, end_date) = merge_date_range(prs).unwrap();
    CollectedPrs {
        text: "## PR #1: Change 1\n---\n".to_string(),
        count: prs.len(),
        start_date,
        end_date,
    }
}

/// Drive an app all the way to Done with the given document
fn done_app(document: &str, clipboard: FakeClipboard) -> App {
    let mut app = App::new_for_test(Box::new(clipboard));
    app.handle(AppEvent::ReposLoaded(Ok(vec!["org/a".to_string()])));
    confirm(&mut app);
    let attempt = app.attempt;
    let prs = three_prs();
    app.handle(AppEvent::PrsFetched {
        attempt,
        result: Ok(prs.clone()),
    });
    app.handle(AppEvent::DetailsCollected {
        attempt,
        collected: collected_for(&prs),
    });
    app.handle(AppEvent::SummaryReady {
        attempt,
        result: Ok(document.to_string()),
    });
    assert_eq!(app.phase, Phase::Done);
    app
}

#[test]
fn test_init_issues_discovery_once() {
    let mut app = new_app();
    let work = app.init();
    assert_eq!(
        work,
        vec![Work::LoadRepositories {
            limit: 30,
            include_orgs: true,
        }]
    );
    assert_eq!(app.phase, Phase::Loading);
    assert_eq!(app.output.phase, OutputPhase::Loading);
}

#[test]
fn test_repos_loaded_moves_to_awaiting_input() {
    let app = loaded_app(&["org/a", "org/b"]);
    assert_eq!(app.phase, Phase::AwaitingInput);
    assert_eq!(app.output.phase, OutputPhase::Idle);
    assert_eq!(app.input.selected_repo(), Some("org/a"));
}

#[test]
fn test_discovery_failure_is_shown() {
    let mut app = new_app();
    app.handle(AppEvent::ReposLoaded(Err("gh: not logged in".to_string())));
    assert_eq!(app.phase, Phase::Failed);
    assert_eq!(app.output.phase, OutputPhase::Error);
    assert_eq!(app.output.error, "gh: not logged in");
    assert!(!app.input.loading);
}

#[test]
fn test_repos_loaded_ignored_outside_loading() {
    let mut app = loaded_app(&["org/a"]);
    app.handle(AppEvent::ReposLoaded(Ok(vec!["org/z".to_string()])));
    assert_eq!(app.input.repos(), ["org/a".to_string()]);
}

#[test]
fn test_scenario_a_filter_and_start_with_defaults() {
    let mut app = loaded_app(&["org/a", "org/b"]);
    type_str(&mut app, "a");

    let filtered: Vec<&str> = app.input.filtered_repos().collect();
    assert_eq!(filtered, vec!["org/a"]);
    assert_eq!(app.input.filter.selected, Some(0));

    let work = confirm(&mut app);
    assert_eq!(
        work,
        vec![Work::FetchMergedPrs {
            attempt: 1,
            repo: "org/a".to_string(),
            days: 7,
            branch: String::new(),
        }]
    );
    assert_eq!(app.phase, Phase::Fetching);
    assert_eq!(app.selected_repo.as_deref(), Some("org/a"));
    assert_eq!(app.output.status, "Fetching merged PRs from org/a...");
}

#[test]
fn test_scenario_b_date_range_and_count() {
    let mut app = loaded_app(&["org/a"]);
    confirm(&mut app);
    let prs = three_prs();

    let work = app.handle(AppEvent::PrsFetched {
        attempt: 1,
        result: Ok(prs.clone()),
    });
    assert_eq!(app.item_count, 3);
    assert_eq!(app.output.status, "Collecting data from 3 PRs...");
    assert!(matches!(&work[..], [Work::CollectDetails { attempt: 1, prs: p, .. }] if p.len() == 3));

    let work = app.handle(AppEvent::DetailsCollected {
        attempt: 1,
        collected: collected_for(&prs),
    });
    assert_eq!(app.phase, Phase::Summarizing);
    assert_eq!(app.date_range.as_deref(), Some("2026-01-26 ~ 2026-02-02"));
    assert_eq!(app.item_count, 3);
    assert_eq!(app.output.status, "Summarizing with claude...");
    assert_eq!(
        app.output.progress,
        "3 PRs collected (2026-01-26 ~ 2026-02-02)"
    );
    match &work[..] {
        [Work::Summarize { attempt: 1, request }] => {
            assert_eq!(request.repo, "org/a");
            assert_eq!(request.pr_count, 3);
            assert_eq!(request.date_range, "2026-01-26 ~ 2026-02-02");
            assert_eq!(request.collected_text, app.collected_text);
        }
        other => panic!("unexpected work: {other:?}"),
    }
}

#[test]
fn test_scenario_c_invalid_days_fall_back() {
    let mut app = loaded_app(&["org/a"]);
    press(&mut app, KeyCode::Tab);
    type_str(&mut app, "abc");
    press(&mut app, KeyCode::Tab);
    type_str(&mut app, "  main ");

    let work = press(&mut app, KeyCode::Enter);
    assert_eq!(
        work,
        vec![Work::FetchMergedPrs {
            attempt: 1,
            repo: "org/a".to_string(),
            days: 7,
            branch: "main".to_string(),
        }]
    );
}

#[test]
fn test_parse_days() {
    assert_eq!(parse_days("14"), 14);
    assert_eq!(parse_days(" 3 "), 3);
    assert_eq!(parse_days(""), 7);
    assert_eq!(parse_days("abc"), 7);
    assert_eq!(parse_days("0"), 7);
    assert_eq!(parse_days("-5"), 7);
}

#[test]
fn test_scenario_d_summary_failure_then_restart() {
    let mut app = loaded_app(&["org/a"]);
    confirm(&mut app);
    let prs = three_prs();
    app.handle(AppEvent::PrsFetched {
        attempt: 1,
        result: Ok(prs.clone()),
    });
    app.handle(AppEvent::DetailsCollected {
        attempt: 1,
        collected: collected_for(&prs),
    });
    app.handle(AppEvent::SummaryReady {
        attempt: 1,
        result: Err("'claude' exited with exit status: 1: rate limited".to_string()),
    });

    assert_eq!(app.phase, Phase::Failed);
    assert_eq!(
        app.output.error,
        "'claude' exited with exit status: 1: rate limited"
    );

    let work = press(&mut app, KeyCode::Char('r'));
    assert!(work.is_empty());
    assert_eq!(app.phase, Phase::AwaitingInput);
    assert_eq!(app.selected_repo, None);
    assert!(app.collected_text.is_empty());
    assert_eq!(app.item_count, 0);
    assert_eq!(app.date_range, None);
    assert_eq!(app.output.phase, OutputPhase::Idle);
    assert_eq!(app.input.focus, FocusField::Filter);
}

#[test]
fn test_scenario_e_copy_feedback_and_clear() {
    let clipboard = FakeClipboard::default();
    let copied = clipboard.copied.clone();
    let mut app = done_app("# Digest", clipboard);

    let work = press(&mut app, KeyCode::Char('c'));
    assert_eq!(copied.borrow().as_slice(), ["# Digest".to_string()]);
    assert_eq!(app.output.copy_feedback.as_deref(), Some("Copied!"));
    assert_eq!(
        work,
        vec![Work::ClearFeedbackAfter {
            generation: 1,
            delay: Duration::from_secs(2),
        }]
    );

    app.handle(AppEvent::FeedbackTimerFired { generation: 1 });
    assert_eq!(app.output.copy_feedback, None);
}

#[test]
fn test_stale_feedback_timer_does_not_clear_newer_feedback() {
    let mut app = done_app("# Digest", FakeClipboard::default());
    press(&mut app, KeyCode::Char('c'));
    let work = press(&mut app, KeyCode::Char('c'));
    assert!(matches!(&work[..], [Work::ClearFeedbackAfter { generation: 2, .. }]));

    app.handle(AppEvent::FeedbackTimerFired { generation: 1 });
    assert_eq!(app.output.copy_feedback.as_deref(), Some("Copied!"));

    app.handle(AppEvent::FeedbackTimerFired { generation: 2 });
    assert_eq!(app.output.copy_feedback, None);
}

#[test]
fn test_clipboard_failure_is_silent() {
    let clipboard = FakeClipboard {
        fail: true,
        ..FakeClipboard::default()
    };
    let mut app = done_app("# Digest", clipboard);

    let work = press(&mut app, KeyCode::Char('c'));
    assert!(work.is_empty());
    assert_eq!(app.output.copy_feedback, None);
    assert_eq!(app.phase, Phase::Done);
    assert_eq!(app.feedback_generation, 0);
}

#[test]
fn test_copy_ignored_outside_done() {
    let clipboard = FakeClipboard::default();
    let copied = clipboard.copied.clone();
    let mut app = App::new_for_test(Box::new(clipboard));
    app.handle(AppEvent::ReposLoaded(Ok(vec!["org/a".to_string()])));

    let work = press(&mut app, KeyCode::Char('c'));
    assert!(work.is_empty());
    assert!(copied.borrow().is_empty());
    assert_eq!(app.input.query.value(), "c");
}

#[test]
fn test_zero_results_is_failure() {
    let mut app = loaded_app(&["org/a"]);
    confirm(&mut app);
    let work = app.handle(AppEvent::PrsFetched {
        attempt: 1,
        result: Ok(Vec::new()),
    });

    assert!(work.is_empty());
    assert_eq!(app.phase, Phase::Failed);
    assert_eq!(app.output.error, NO_PRS_MESSAGE);
    assert!(app.output.raw_document().is_empty());
}

#[test]
fn test_fetch_error_is_failure() {
    let mut app = loaded_app(&["org/a"]);
    confirm(&mut app);
    app.handle(AppEvent::PrsFetched {
        attempt: 1,
        result: Err("HTTP 404: Not Found".to_string()),
    });
    assert_eq!(app.phase, Phase::Failed);
    assert_eq!(app.output.error, "HTTP 404: Not Found");
}

#[test]
fn test_stale_attempt_results_are_discarded() {
    let mut app = loaded_app(&["org/a", "org/b"]);
    confirm(&mut app);
    app.handle(AppEvent::PrsFetched {
        attempt: 1,
        result: Err("timeout".to_string()),
    });
    press(&mut app, KeyCode::Char('r'));
    press(&mut app, KeyCode::Down);
    confirm(&mut app);
    assert_eq!(app.attempt, 2);
    assert_eq!(app.selected_repo.as_deref(), Some("org/b"));

    // A late result from the abandoned first attempt
    let work = app.handle(AppEvent::PrsFetched {
        attempt: 1,
        result: Ok(three_prs()),
    });
    assert!(work.is_empty());
    assert_eq!(app.phase, Phase::Fetching);
    assert_eq!(app.item_count, 0);

    let work = app.handle(AppEvent::PrsFetched {
        attempt: 2,
        result: Ok(three_prs()),
    });
    assert_eq!(work.len(), 1);
}

#[test]
fn test_results_for_wrong_phase_are_discarded() {
    let mut app = loaded_app(&["org/a"]);
    confirm(&mut app);
    let work = app.handle(AppEvent::SummaryReady {
        attempt: 1,
        result: Ok("# too early".to_string()),
    });
    assert!(work.is_empty());
    assert_eq!(app.phase, Phase::Fetching);
    assert!(app.output.raw_document().is_empty());
}

#[test]
fn test_collect_progress_updates_progress_line() {
    let mut app = loaded_app(&["org/a"]);
    confirm(&mut app);
    app.handle(AppEvent::PrsFetched {
        attempt: 1,
        result: Ok(three_prs()),
    });
    app.handle(AppEvent::CollectProgress {
        attempt: 1,
        current: 2,
        total: 3,
        title: "#2 Change 2".to_string(),
    });
    assert_eq!(app.output.progress, "Collecting 2/3: #2 Change 2");

    app.handle(AppEvent::CollectProgress {
        attempt: 0,
        current: 3,
        total: 3,
        title: "#9 stale".to_string(),
    });
    assert_eq!(app.output.progress, "Collecting 2/3: #2 Change 2");
}

#[test]
fn test_single_pipeline_stage_outstanding() {
    let mut app = loaded_app(&["org/a"]);
    let mut outstanding = 0;

    outstanding += confirm(&mut app).iter().filter(|w| w.is_pipeline_stage()).count();
    assert_eq!(outstanding, 1);

    // Pressing Enter again while fetching must not start anything new
    let again = press(&mut app, KeyCode::Enter);
    assert!(again.is_empty());
    assert!(app.handle(AppEvent::StartRequested).is_empty());

    let prs = three_prs();
    let work = app.handle(AppEvent::PrsFetched {
        attempt: 1,
        result: Ok(prs.clone()),
    });
    assert!(work.iter().all(|w| matches!(w, Work::CollectDetails { .. })));

    let work = app.handle(AppEvent::DetailsCollected {
        attempt: 1,
        collected: collected_for(&prs),
    });
    assert!(work.iter().all(|w| matches!(w, Work::Summarize { .. })));

    // A duplicate collection result must not dispatch a second summarization
    let work = app.handle(AppEvent::DetailsCollected {
        attempt: 1,
        collected: collected_for(&prs),
    });
    assert!(work.is_empty());
}

#[test]
fn test_keys_during_fetching_do_not_touch_filter() {
    let mut app = loaded_app(&["org/a", "org/b"]);
    confirm(&mut app);
    let focus = app.input.focus;

    type_str(&mut app, "xyz");
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Down);
    app.handle(AppEvent::Paste("pasted".to_string()));

    assert_eq!(app.input.query.value(), "");
    assert_eq!(app.input.focus, focus);
    assert_eq!(app.input.filter.matched_indices, vec![0, 1]);
}

#[test]
fn test_q_and_r_only_in_terminal_phases() {
    let mut app = loaded_app(&["org/a"]);
    press(&mut app, KeyCode::Char('q'));
    press(&mut app, KeyCode::Char('r'));
    assert!(!app.should_quit);
    assert_eq!(app.input.query.value(), "qr");

    let mut app = done_app("# Digest", FakeClipboard::default());
    press(&mut app, KeyCode::Char('q'));
    assert!(app.should_quit);
}

#[test]
fn test_ctrl_c_quits_from_any_phase() {
    let mut app = loaded_app(&["org/a"]);
    confirm(&mut app);
    app.handle(AppEvent::Key(make_key_with(
        KeyCode::Char('c'),
        KeyModifiers::CONTROL,
    )));
    assert!(app.should_quit);
}

#[test]
fn test_restart_from_done_clears_session() {
    let mut app = done_app("# Digest\n\nBody", FakeClipboard::default());
    press(&mut app, KeyCode::Char('c'));

    press(&mut app, KeyCode::Char('r'));
    assert_eq!(app.phase, Phase::AwaitingInput);
    assert_eq!(app.selected_repo, None);
    assert!(app.collected_text.is_empty());
    assert_eq!(app.item_count, 0);
    assert_eq!(app.date_range, None);
    assert_eq!(app.output.phase, OutputPhase::Idle);
    assert!(app.output.raw_document().is_empty());
    assert_eq!(app.output.copy_feedback, None);
    // The repository list survives a restart
    assert_eq!(app.input.selected_repo(), Some("org/a"));
}

#[test]
fn test_discovery_failure_is_not_restartable() {
    let mut app = new_app();
    app.handle(AppEvent::ReposLoaded(Err("boom".to_string())));
    assert!(!app.output.retryable);

    assert!(press(&mut app, KeyCode::Char('r')).is_empty());
    assert_eq!(app.phase, Phase::Failed);
    assert_eq!(app.output.phase, OutputPhase::Error);
    assert_eq!(app.output.error, "boom");

    press(&mut app, KeyCode::Char('q'));
    assert!(app.should_quit);
}

#[test]
fn test_pipeline_failure_stays_restartable() {
    let mut app = loaded_app(&["org/a"]);
    confirm(&mut app);
    let attempt = app.attempt;
    app.handle(AppEvent::PrsFetched {
        attempt,
        result: Err("gh failed".to_string()),
    });
    assert_eq!(app.phase, Phase::Failed);
    assert!(app.output.retryable);

    assert!(press(&mut app, KeyCode::Char('r')).is_empty());
    assert_eq!(app.phase, Phase::AwaitingInput);
    assert_eq!(app.input.selected_repo(), Some("org/a"));
}

#[test]
fn test_scroll_keys_only_in_done() {
    let long_doc: String = (0..60).map(|i| format!("- line {i}\n")).collect();
    let mut app = done_app(&long_doc, FakeClipboard::default());

    press(&mut app, KeyCode::Char('j'));
    press(&mut app, KeyCode::Char('j'));
    assert_eq!(app.output.view().map(|v| v.offset()), Some(2));

    press(&mut app, KeyCode::Char('G'));
    assert_eq!(app.output.scroll_percent(), 100);
}

#[test]
fn test_document_before_first_resize_is_buffered() {
    let mut app = App::new(Config::default(), Box::new(FakeClipboard::default()));
    app.handle(AppEvent::ReposLoaded(Ok(vec!["org/a".to_string()])));
    confirm(&mut app);
    let prs = three_prs();
    app.handle(AppEvent::PrsFetched {
        attempt: 1,
        result: Ok(prs.clone()),
    });
    app.handle(AppEvent::DetailsCollected {
        attempt: 1,
        collected: collected_for(&prs),
    });
    app.handle(AppEvent::SummaryReady {
        attempt: 1,
        result: Ok("# Digest\n\nBody".to_string()),
    });
    assert!(app.output.has_pending_document());

    app.handle(AppEvent::Resize {
        width: 100,
        height: 30,
    });
    assert!(!app.output.has_pending_document());
    assert_eq!(app.output.document().lines.len(), 3);
}

#[test]
fn test_resize_propagates_panel_sizes() {
    let mut app = new_app();
    app.handle(AppEvent::Resize {
        width: 100,
        height: 30,
    });
    assert_eq!((app.width, app.height), (100, 30));
    assert_eq!((app.input.width, app.input.height), (36, 28));
    assert_eq!(panel_sizes(100, 30), ((36, 28), (56, 28)));
    assert_eq!(panel_sizes(5, 1), ((0, 0), (0, 0)));
}

#[test]
fn test_output_width_matches_drawn_area_on_odd_widths() {
    // 101 columns: the input panel gets 40, the output panel the remaining 61
    assert_eq!(panel_sizes(101, 30), ((36, 28), (57, 28)));
    assert_eq!(panel_sizes(99, 30), ((35, 28), (56, 28)));
}

#[test]
fn test_tick_advances_spinners() {
    let mut app = new_app();
    let before = (app.input.spinner_frame(), app.output.spinner_frame());
    app.handle(AppEvent::Tick);
    assert_eq!(
        (app.input.spinner_frame(), app.output.spinner_frame()),
        (before.0 + 1, before.1 + 1)
    );
}

#[test]
fn test_config_defaults_prefill_fields() {
    let mut config = Config::default();
    config.search.default_days = 14;
    config.search.default_branch = "main".to_string();
    let app = App::new(config, Box::new(FakeClipboard::default())).with_filter("org");

    assert_eq!(app.input.days_value(), "14");
    assert_eq!(app.input.branch_value(), "main");
    assert_eq!(app.input.query.value(), "org");

    let app = new_app();
    assert_eq!(app.input.days_value(), "");
}

#[test]
fn test_release_events_are_ignored() {
    let mut app = loaded_app(&["org/a"]);
    let mut key = make_key(KeyCode::Char('x'));
    key.kind = KeyEventKind::Release;
    app.handle(AppEvent::Key(key));
    assert_eq!(app.input.query.value(), "");
}
