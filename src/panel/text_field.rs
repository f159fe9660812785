use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_width::UnicodeWidthStr;

/// Outcome of feeding a key to a [`TextField`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFieldAction {
    /// Text content changed
    Changed,
    /// Only the cursor moved
    Moved,
    /// Key not handled by the field
    Ignored,
}

/// Single-line text input.
///
/// `cursor` is a char index into `value`, always in `0..=value.chars().count()`.
#[derive(Debug, Clone, Default)]
pub struct TextField {
    value: String,
    cursor: usize,
    placeholder: String,
    char_limit: Option<usize>,
}

impl TextField {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
            ..Self::default()
        }
    }

    pub fn with_char_limit(mut self, limit: usize) -> Self {
        self.char_limit = Some(limit);
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.set_value(value);
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the content, respecting the char limit, and move the cursor to the end
    pub fn set_value(&mut self, value: &str) {
        self.value = match self.char_limit {
            Some(limit) => value.chars().take(limit).collect(),
            None => value.to_string(),
        };
        self.cursor = self.char_len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Display width of the text before the cursor
    pub fn cursor_offset(&self) -> usize {
        self.value[..self.byte_index(self.cursor)].width()
    }

    pub fn input(&mut self, key: KeyEvent) -> TextFieldAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('a') if ctrl => self.move_to(0),
            KeyCode::Char('e') if ctrl => self.move_to(self.char_len()),
            KeyCode::Char('u') if ctrl => {
                if self.value.is_empty() {
                    return TextFieldAction::Ignored;
                }
                self.clear();
                TextFieldAction::Changed
            }
            KeyCode::Char('w') if ctrl => self.delete_word_before_cursor(),
            KeyCode::Char(_) if ctrl || key.modifiers.contains(KeyModifiers::ALT) => {
                TextFieldAction::Ignored
            }
            KeyCode::Char(c) => self.insert_str(&c.to_string()),
            KeyCode::Backspace => {
                if self.cursor == 0 {
                    return TextFieldAction::Ignored;
                }
                let start = self.byte_index(self.cursor - 1);
                let end = self.byte_index(self.cursor);
                self.value.replace_range(start..end, "");
                self.cursor -= 1;
                TextFieldAction::Changed
            }
            KeyCode::Delete => {
                if self.cursor >= self.char_len() {
                    return TextFieldAction::Ignored;
                }
                let start = self.byte_index(self.cursor);
                let end = self.byte_index(self.cursor + 1);
                self.value.replace_range(start..end, "");
                TextFieldAction::Changed
            }
            KeyCode::Left => self.move_to(self.cursor.saturating_sub(1)),
            KeyCode::Right => self.move_to((self.cursor + 1).min(self.char_len())),
            KeyCode::Home => self.move_to(0),
            KeyCode::End => self.move_to(self.char_len()),
            _ => TextFieldAction::Ignored,
        }
    }

    /// Insert text at the cursor. Newlines are dropped and the char limit applies.
    pub fn insert_str(&mut self, text: &str) -> TextFieldAction {
        let room = self
            .char_limit
            .map_or(usize::MAX, |limit| limit.saturating_sub(self.char_len()));
        let insert: String = text
            .chars()
            .filter(|c| !c.is_control())
            .take(room)
            .collect();
        if insert.is_empty() {
            return TextFieldAction::Ignored;
        }
        let at = self.byte_index(self.cursor);
        self.value.insert_str(at, &insert);
        self.cursor += insert.chars().count();
        TextFieldAction::Changed
    }

    fn delete_word_before_cursor(&mut self) -> TextFieldAction {
        if self.cursor == 0 {
            return TextFieldAction::Ignored;
        }
        let chars: Vec<char> = self.value.chars().collect();
        let mut start = self.cursor;
        while start > 0 && chars[start - 1].is_whitespace() {
            start -= 1;
        }
        while start > 0 && !chars[start - 1].is_whitespace() {
            start -= 1;
        }
        let from = self.byte_index(start);
        let to = self.byte_index(self.cursor);
        self.value.replace_range(from..to, "");
        self.cursor = start;
        TextFieldAction::Changed
    }

    fn move_to(&mut self, cursor: usize) -> TextFieldAction {
        if cursor == self.cursor {
            return TextFieldAction::Ignored;
        }
        self.cursor = cursor;
        TextFieldAction::Moved
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map_or(self.value.len(), |(i, _)| i)
    }
}
