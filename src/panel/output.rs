use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::text::Text;

use super::scroll_view::ScrollView;
use crate::markdown;
use crate::ui::Theme;

/// Rows under the document reserved for the footer
const FOOTER_ROWS: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputPhase {
    #[default]
    Loading,
    Idle,
    Fetching,
    Summarizing,
    Done,
    Error,
}

/// Progress and result panel.
///
/// Purely a projection of what the controller routes to it; it never starts
/// work of its own.
#[derive(Debug, Clone)]
pub struct OutputPanel {
    pub phase: OutputPhase,
    pub status: String,
    pub progress: String,
    pub error: String,
    pub copy_feedback: Option<String>,
    /// Whether the current error can be left with restart
    pub retryable: bool,
    raw_document: String,
    document: Text<'static>,
    /// Set before the first `set_size`; rendered once a width is known
    pending_document: Option<String>,
    view: Option<ScrollView>,
    width: u16,
    theme: Theme,
    spinner_frame: usize,
}

impl OutputPanel {
    pub fn new(theme: Theme) -> Self {
        Self {
            phase: OutputPhase::Loading,
            status: String::new(),
            progress: String::new(),
            error: String::new(),
            copy_feedback: None,
            retryable: true,
            raw_document: String::new(),
            document: Text::default(),
            pending_document: None,
            view: None,
            width: 0,
            theme,
            spinner_frame: 0,
        }
    }

    pub fn set_size(&mut self, width: u16, height: u16) {
        let view_height = height.saturating_sub(FOOTER_ROWS) as usize;
        let width_changed = self.width != width;
        self.width = width;

        match self.view.as_mut() {
            Some(view) => {
                view.set_height(view_height);
                if width_changed && !self.raw_document.is_empty() {
                    self.document = markdown::render(&self.raw_document, width, &self.theme);
                    view.update_content_lines(self.document.lines.len());
                }
            }
            None => {
                self.view = Some(ScrollView::new(view_height));
                if let Some(raw) = self.pending_document.take() {
                    self.apply_document(&raw);
                }
            }
        }
    }

    /// Store the digest. Rendering waits for the first `set_size` if needed.
    pub fn set_document(&mut self, raw: String) {
        self.phase = OutputPhase::Done;
        if self.view.is_some() {
            self.apply_document(&raw);
        } else {
            self.pending_document = Some(raw.clone());
        }
        self.raw_document = raw;
    }

    fn apply_document(&mut self, raw: &str) {
        self.document = markdown::render(raw, self.width, &self.theme);
        let lines = self.document.lines.len();
        if let Some(view) = self.view.as_mut() {
            view.set_content_lines(lines);
        }
    }

    pub fn raw_document(&self) -> &str {
        &self.raw_document
    }

    pub fn document(&self) -> &Text<'static> {
        &self.document
    }

    pub fn view(&self) -> Option<&ScrollView> {
        self.view.as_ref()
    }

    pub fn has_pending_document(&self) -> bool {
        self.pending_document.is_some()
    }

    pub fn set_idle(&mut self) {
        self.phase = OutputPhase::Idle;
        self.status.clear();
        self.progress.clear();
        self.error.clear();
        self.copy_feedback = None;
        self.raw_document.clear();
        self.document = Text::default();
        self.pending_document = None;
        if let Some(view) = self.view.as_mut() {
            view.set_content_lines(0);
        }
    }

    pub fn set_fetching(&mut self, status: String) {
        self.phase = OutputPhase::Fetching;
        self.status = status;
        self.progress.clear();
    }

    pub fn set_status(&mut self, status: String) {
        self.status = status;
    }

    pub fn set_progress(&mut self, progress: String) {
        self.progress = progress;
    }

    pub fn set_summarizing(&mut self, status: String, progress: String) {
        self.phase = OutputPhase::Summarizing;
        self.status = status;
        self.progress = progress;
    }

    pub fn set_error(&mut self, error: String) {
        self.phase = OutputPhase::Error;
        self.error = error;
        self.retryable = true;
    }

    pub fn set_copy_feedback(&mut self, feedback: &str) {
        self.copy_feedback = Some(feedback.to_string());
    }

    pub fn clear_copy_feedback(&mut self) {
        self.copy_feedback = None;
    }

    pub fn scroll_percent(&self) -> u16 {
        self.view.as_ref().map_or(100, ScrollView::scroll_percent)
    }

    pub fn tick(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }

    pub fn spinner_frame(&self) -> usize {
        self.spinner_frame
    }

    /// Scroll keys; ignored unless a document is shown
    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.phase != OutputPhase::Done {
            return;
        }
        let Some(view) = self.view.as_mut() else {
            return;
        };

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('d') if ctrl => view.half_page_down(),
            KeyCode::Char('u') if ctrl => view.half_page_up(),
            KeyCode::Char('j') | KeyCode::Down => view.scroll_down(1),
            KeyCode::Char('k') | KeyCode::Up => view.scroll_up(1),
            KeyCode::PageDown | KeyCode::Char(' ') => view.page_down(),
            KeyCode::PageUp => view.page_up(),
            KeyCode::Char('g') | KeyCode::Home => view.to_top(),
            KeyCode::Char('G') | KeyCode::End => view.to_bottom(),
            _ => {}
        }
    }
}
