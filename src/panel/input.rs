use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::text_field::{TextField, TextFieldAction};
use crate::filter::{contains_ignore_case, ListFilter};

const DAYS_CHAR_LIMIT: usize = 4;
const MIN_VISIBLE_ROWS: usize = 3;
/// Rows taken by the fields, labels and help line around the list
const LIST_CHROME_ROWS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusField {
    #[default]
    Filter,
    Days,
    Branch,
}

impl FocusField {
    pub fn next(self) -> Self {
        match self {
            FocusField::Filter => FocusField::Days,
            FocusField::Days => FocusField::Branch,
            FocusField::Branch => FocusField::Filter,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FocusField::Filter => FocusField::Branch,
            FocusField::Days => FocusField::Filter,
            FocusField::Branch => FocusField::Days,
        }
    }
}

/// Signals the panel raises for the controller to act on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    StartRequested,
}

/// Repository picker with filter, lookback and branch fields
#[derive(Debug, Clone)]
pub struct InputPanel {
    repos: Vec<String>,
    pub filter: ListFilter,
    pub query: TextField,
    pub days: TextField,
    pub branch: TextField,
    pub focus: FocusField,
    pub loading: bool,
    pub width: u16,
    pub height: u16,
    spinner_frame: usize,
}

impl InputPanel {
    /// `days`, `branch` and `query` pre-fill the fields
    pub fn new(days: &str, branch: &str, query: &str) -> Self {
        Self {
            repos: Vec::new(),
            filter: ListFilter::new(),
            query: TextField::new("type to filter...").with_value(query),
            days: TextField::new("7")
                .with_char_limit(DAYS_CHAR_LIMIT)
                .with_value(days),
            branch: TextField::new("all branches").with_value(branch),
            focus: FocusField::Filter,
            loading: true,
            width: 0,
            height: 0,
            spinner_frame: 0,
        }
    }

    pub fn set_repos(&mut self, repos: Vec<String>) {
        self.repos = repos;
        self.loading = false;
        self.filter.selected = None;
        self.refilter();
    }

    /// Discovery finished without a list
    pub fn stop_loading(&mut self) {
        self.loading = false;
    }

    pub fn repos(&self) -> &[String] {
        &self.repos
    }

    /// Repositories matching the filter, in original order
    pub fn filtered_repos(&self) -> impl Iterator<Item = &str> {
        self.filter
            .matched_indices
            .iter()
            .map(|&i| self.repos[i].as_str())
    }

    pub fn selected_repo(&self) -> Option<&str> {
        self.filter
            .current_original_index()
            .map(|i| self.repos[i].as_str())
    }

    pub fn days_value(&self) -> &str {
        self.days.value()
    }

    pub fn branch_value(&self) -> &str {
        self.branch.value()
    }

    pub fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    /// Number of list rows that fit in the panel
    pub fn visible_rows(&self) -> usize {
        (self.height as usize)
            .saturating_sub(LIST_CHROME_ROWS)
            .max(MIN_VISIBLE_ROWS)
    }

    /// First list row to draw so that the selection stays visible
    pub fn list_offset(&self) -> usize {
        let rows = self.visible_rows();
        match self.filter.selected {
            Some(sel) if sel >= rows => sel + 1 - rows,
            _ => 0,
        }
    }

    /// Back to the filter field; typed values stay for the next attempt
    pub fn reset_focus(&mut self) {
        self.focus = FocusField::Filter;
    }

    pub fn tick(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }

    pub fn spinner_frame(&self) -> usize {
        self.spinner_frame
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<InputAction> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Tab => {
                self.focus = self.focus.next();
                None
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                None
            }
            KeyCode::Enter => {
                if self.focus == FocusField::Branch {
                    Some(InputAction::StartRequested)
                } else {
                    self.focus = self.focus.next();
                    None
                }
            }
            KeyCode::Up if self.focus == FocusField::Filter => {
                self.filter.navigate_up();
                None
            }
            KeyCode::Down if self.focus == FocusField::Filter => {
                self.filter.navigate_down();
                None
            }
            KeyCode::Char('p') if ctrl && self.focus == FocusField::Filter => {
                self.filter.navigate_up();
                None
            }
            KeyCode::Char('n') if ctrl && self.focus == FocusField::Filter => {
                self.filter.navigate_down();
                None
            }
            KeyCode::Up | KeyCode::Down => None,
            _ => {
                let action = self.focused_field_mut().input(key);
                if action == TextFieldAction::Changed && self.focus == FocusField::Filter {
                    self.refilter();
                }
                None
            }
        }
    }

    pub fn paste(&mut self, text: &str) {
        let action = self.focused_field_mut().insert_str(text);
        if action == TextFieldAction::Changed && self.focus == FocusField::Filter {
            self.refilter();
        }
    }

    fn focused_field_mut(&mut self) -> &mut TextField {
        match self.focus {
            FocusField::Filter => &mut self.query,
            FocusField::Days => &mut self.days,
            FocusField::Branch => &mut self.branch,
        }
    }

    fn refilter(&mut self) {
        self.filter
            .apply(&self.repos, self.query.value(), contains_ignore_case);
        self.filter.sync_selection();
    }
}
