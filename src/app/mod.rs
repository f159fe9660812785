use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::Stdout;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::clipboard::ClipboardSink;
use crate::config::{Config, DEFAULT_LOOKBACK_DAYS};
use crate::loader::Executor;
use crate::panel::{InputPanel, OutputPanel};
use crate::ui::{self, THEME};

mod types;
mod update;
pub use types::*;

#[cfg(test)]
mod tests;

const TICK_RATE: Duration = Duration::from_millis(100);

/// Session controller.
///
/// Owns both panels and is the only writer of session state. Every event is
/// handled by [`App::handle`], which returns the work to run next.
pub struct App {
    pub phase: Phase,
    pub selected_repo: Option<String>,
    pub collected_text: String,
    pub item_count: usize,
    pub date_range: Option<String>,
    pub width: u16,
    pub height: u16,
    pub input: InputPanel,
    pub output: OutputPanel,
    /// Bumped on every pipeline start; results for other attempts are stale
    pub attempt: u64,
    /// Bumped on every copy; only the latest clear timer may clear feedback
    pub feedback_generation: u64,
    pub should_quit: bool,
    config: Config,
    clipboard: Box<dyn ClipboardSink>,
}

impl App {
    pub fn new(config: Config, clipboard: Box<dyn ClipboardSink>) -> Self {
        let days = if config.search.default_days == DEFAULT_LOOKBACK_DAYS {
            String::new()
        } else {
            config.search.default_days.to_string()
        };
        let input = InputPanel::new(&days, &config.search.default_branch, "");

        Self {
            phase: Phase::Loading,
            selected_repo: None,
            collected_text: String::new(),
            item_count: 0,
            date_range: None,
            width: 0,
            height: 0,
            input,
            output: OutputPanel::new(THEME),
            attempt: 0,
            feedback_generation: 0,
            should_quit: false,
            config,
            clipboard,
        }
    }

    /// Pre-fill the repository filter (from `--filter`)
    pub fn with_filter(mut self, query: &str) -> Self {
        self.input.paste(query);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Initial work: repository discovery, issued exactly once
    pub fn init(&mut self) -> Vec<Work> {
        vec![Work::LoadRepositories {
            limit: self.config.github.repo_limit,
            include_orgs: self.config.github.include_orgs,
        }]
    }

    pub async fn run(&mut self, mut executor: Executor, mut rx: mpsc::Receiver<AppEvent>) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal, &mut executor, &mut rx).await;
        executor.shutdown();
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
        executor: &mut Executor,
        rx: &mut mpsc::Receiver<AppEvent>,
    ) -> Result<()> {
        let size = terminal.size()?;
        let work = self.handle(AppEvent::Resize {
            width: size.width,
            height: size.height,
        });
        executor.dispatch_all(work);
        let work = self.init();
        executor.dispatch_all(work);

        let mut last_tick = Instant::now();
        while !self.should_quit {
            while let Ok(app_event) = rx.try_recv() {
                let work = self.handle(app_event);
                executor.dispatch_all(work);
            }

            terminal.draw(|frame| ui::render(frame, self, &THEME))?;

            if event::poll(TICK_RATE)? {
                let app_event = match event::read()? {
                    // Kitty keyboard protocol also reports Release/Repeat
                    Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
                    Event::Paste(text) => Some(AppEvent::Paste(text)),
                    Event::Resize(width, height) => Some(AppEvent::Resize { width, height }),
                    _ => None,
                };
                if let Some(app_event) = app_event {
                    let work = self.handle(app_event);
                    executor.dispatch_all(work);
                }
            }

            if last_tick.elapsed() >= TICK_RATE {
                self.handle(AppEvent::Tick);
                last_tick = Instant::now();
            }
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn new_for_test(clipboard: Box<dyn ClipboardSink>) -> Self {
        let mut app = Self::new(Config::default(), clipboard);
        app.handle(AppEvent::Resize {
            width: 120,
            height: 40,
        });
        app
    }
}
