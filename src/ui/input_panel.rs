use ratatui::{
    layout::{Position, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::Theme;
use crate::panel::{spinner_char, FocusField, InputPanel, TextField};

const FILTER_PROMPT: &str = "› ";
const DAYS_LABEL: &str = "Days    ";
const BRANCH_LABEL: &str = "Branch  ";
const HELP: &str = "Enter next  Tab skip  Ctrl+C quit";

pub(super) fn render(frame: &mut Frame, area: Rect, panel: &InputPanel, theme: &Theme) {
    let mut lines: Vec<Line> = Vec::new();
    // (row, column) of the terminal cursor for the focused field
    let mut cursor: Option<(usize, usize)> = None;

    let label_style = |focused: bool| {
        if focused {
            theme.active_label()
        } else {
            theme.label()
        }
    };

    lines.push(Line::styled(
        "Repository",
        label_style(panel.focus == FocusField::Filter),
    ));
    if panel.focus == FocusField::Filter {
        cursor = Some((lines.len(), FILTER_PROMPT.width() + panel.query.cursor_offset()));
    }
    lines.push(field_line(
        Span::styled(FILTER_PROMPT, theme.cursor()),
        &panel.query,
        theme,
    ));

    if panel.loading {
        lines.push(Line::from(vec![
            Span::styled(spinner_char(panel.spinner_frame()), theme.cursor()),
            Span::styled(" Loading repositories...", theme.status()),
        ]));
    } else {
        let offset = panel.list_offset();
        let rows = panel.visible_rows();
        for (i, repo) in panel.filtered_repos().enumerate().skip(offset).take(rows) {
            if panel.filter.selected == Some(i) {
                lines.push(Line::from(vec![
                    Span::styled("> ", theme.cursor()),
                    Span::styled(repo.to_string(), theme.selected_item()),
                ]));
            } else {
                lines.push(Line::from(vec![
                    Span::raw("  "),
                    Span::styled(repo.to_string(), theme.unselected_item()),
                ]));
            }
        }
        if panel.filter.is_empty() && !panel.repos().is_empty() {
            lines.push(Line::styled("  (no match)", theme.status()));
        }
        if !panel.filter.is_empty() {
            lines.push(Line::styled(
                format!("  {}/{} repos", panel.filter.len(), panel.repos().len()),
                theme.status(),
            ));
        }
    }

    lines.push(Line::default());

    for (focus, label, field) in [
        (FocusField::Days, DAYS_LABEL, &panel.days),
        (FocusField::Branch, BRANCH_LABEL, &panel.branch),
    ] {
        if panel.focus == focus {
            cursor = Some((lines.len(), label.width() + field.cursor_offset()));
        }
        lines.push(field_line(
            Span::styled(label, label_style(panel.focus == focus)),
            field,
            theme,
        ));
    }

    lines.push(Line::default());
    lines.push(Line::styled(HELP, theme.help()));

    frame.render_widget(Paragraph::new(lines), area);

    if let Some((row, col)) = cursor {
        let (row, col) = (row as u16, col as u16);
        if row < area.height && col < area.width {
            frame.set_cursor_position(Position::new(area.x + col, area.y + row));
        }
    }
}

/// Prefix followed by the field value, or its placeholder when empty
fn field_line<'a>(prefix: Span<'a>, field: &'a TextField, theme: &Theme) -> Line<'a> {
    let content = if field.value().is_empty() {
        Span::styled(field.placeholder(), theme.status())
    } else {
        Span::styled(field.value(), theme.unselected_item())
    };
    Line::from(vec![prefix, content])
}
