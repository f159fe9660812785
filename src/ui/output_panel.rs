use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use super::Theme;
use crate::panel::{spinner_char, OutputPanel, OutputPhase};

pub(super) fn render(frame: &mut Frame, area: Rect, panel: &OutputPanel, theme: &Theme) {
    let spinner = || Span::styled(spinner_char(panel.spinner_frame()), theme.cursor());

    let lines: Vec<Line> = match panel.phase {
        OutputPhase::Loading => vec![Line::from(vec![
            spinner(),
            Span::styled(" Loading repositories...", theme.status()),
        ])],
        OutputPhase::Idle => vec![Line::styled(
            "Select a repository and press Enter to start.",
            theme.status(),
        )],
        OutputPhase::Fetching | OutputPhase::Summarizing => {
            let mut lines = vec![Line::from(vec![
                spinner(),
                Span::raw(" "),
                Span::styled(panel.status.as_str(), theme.unselected_item()),
            ])];
            if !panel.progress.is_empty() {
                lines.push(Line::styled(panel.progress.as_str(), theme.status()));
            }
            lines
        }
        OutputPhase::Error => vec![
            Line::styled(format!("Error: {}", panel.error), theme.error_text()),
            Line::default(),
            Line::styled(
                if panel.retryable { "r retry  q quit" } else { "q quit" },
                theme.help(),
            ),
        ],
        OutputPhase::Done => {
            render_document(frame, area, panel, theme);
            return;
        }
    };

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn render_document(frame: &mut Frame, area: Rect, panel: &OutputPanel, theme: &Theme) {
    let Some(view) = panel.view() else {
        return;
    };
    let [body, footer] = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);

    let visible: Vec<Line> = panel
        .document()
        .lines
        .iter()
        .skip(view.offset())
        .take(body.height as usize)
        .cloned()
        .collect();
    frame.render_widget(Paragraph::new(visible), body);

    let mut spans = vec![Span::styled(
        format!(
            "j/k scroll  c copy  r restart  q quit  {}%",
            panel.scroll_percent()
        ),
        theme.help(),
    )];
    if let Some(feedback) = &panel.copy_feedback {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(feedback.as_str(), theme.success()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), footer);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::test_support::buffer_lines;
    use crate::ui::THEME;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(panel: &OutputPanel, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render(frame, area, panel, &THEME);
            })
            .unwrap();
        buffer_lines(terminal.backend().buffer())
    }

    #[test]
    fn test_idle_prompt() {
        let mut panel = OutputPanel::new(THEME);
        panel.set_idle();
        let lines = draw(&panel, 60, 5);
        assert_eq!(lines[0], "Select a repository and press Enter to start.");
    }

    #[test]
    fn test_progress_lines() {
        let mut panel = OutputPanel::new(THEME);
        panel.set_summarizing(
            "Summarizing with claude...".to_string(),
            "3 PRs collected (2026-01-26 ~ 2026-02-02)".to_string(),
        );
        let lines = draw(&panel, 60, 5);
        assert!(lines[0].ends_with(" Summarizing with claude..."));
        assert_eq!(lines[1], "3 PRs collected (2026-01-26 ~ 2026-02-02)");
    }

    #[test]
    fn test_done_shows_document_and_footer() {
        let mut panel = OutputPanel::new(THEME);
        panel.set_size(60, 6);
        panel.set_document("# Digest\n\n- first\n- second".to_string());
        panel.set_copy_feedback("Copied!");

        let lines = draw(&panel, 60, 6);
        assert_eq!(lines[0], "Digest");
        assert_eq!(lines[2], "• first");
        assert_eq!(lines[3], "• second");
        assert_eq!(lines[5], "j/k scroll  c copy  r restart  q quit  100%  Copied!");
    }

    #[test]
    fn test_done_scrolled_view_starts_at_offset() {
        let mut panel = OutputPanel::new(THEME);
        panel.set_size(30, 4);
        let doc = (1..=10).map(|i| format!("- item {i}")).collect::<Vec<_>>().join("\n");
        panel.set_document(doc);
        panel.handle_key(crossterm::event::KeyEvent::from(crossterm::event::KeyCode::Char('j')));

        let lines = draw(&panel, 30, 4);
        assert_eq!(lines[0], "• item 2");
        assert!(lines[3].starts_with("j/k scroll"));
    }
}
