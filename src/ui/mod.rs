mod input_panel;
mod output_panel;
mod theme;

use anyhow::Result;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::Style,
    symbols::border,
    widgets::{Block, Borders, Padding},
    Frame, Terminal,
};
use std::io::{self, Stdout};

use crate::app::App;
pub use theme::{Theme, THEME};

pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

pub fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Draw the two-column session view. Reads `app`, never mutates it.
pub fn render(frame: &mut Frame, app: &App, theme: &Theme) {
    let area = frame.area();
    let [left, right] = split_columns(area);

    let input_block = panel_block(" Search ", theme.input_border(), theme);
    let input_inner = input_block.inner(left);
    frame.render_widget(input_block, left);
    input_panel::render(frame, input_inner, &app.input, theme);

    let output_block = panel_block(" Output ", theme.output_border(), theme);
    let output_inner = output_block.inner(right);
    frame.render_widget(output_block, right);
    output_panel::render(frame, output_inner, &app.output, theme);
}

/// 40/60 column split
fn split_columns(area: Rect) -> [Rect; 2] {
    let left_width = (u32::from(area.width) * 4 / 10) as u16;
    Layout::horizontal([Constraint::Length(left_width), Constraint::Fill(1)]).areas(area)
}

fn panel_block<'a>(title: &'a str, border_style: Style, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .border_style(border_style)
        .title(title)
        .title_style(theme.panel_title())
        .padding(Padding::horizontal(1))
}
