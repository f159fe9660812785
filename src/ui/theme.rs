use ratatui::style::{Color, Modifier, Style};

/// Read-only style table handed to the renderer.
///
/// Two-color palette (soft blue + soft green) on top of a dim gray.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub primary: Color,
    pub accent: Color,
    pub dim: Color,
    pub text: Color,
    pub error: Color,
}

pub const THEME: Theme = Theme {
    primary: Color::Rgb(0x82, 0xAA, 0xFF),
    accent: Color::Rgb(0xC3, 0xE8, 0x8D),
    dim: Color::Rgb(0x55, 0x55, 0x55),
    text: Color::Rgb(0xCD, 0xD6, 0xF4),
    error: Color::Rgb(0xF3, 0x8B, 0xA8),
};

impl Default for Theme {
    fn default() -> Self {
        THEME
    }
}

impl Theme {
    pub fn input_border(&self) -> Style {
        Style::default().fg(self.primary)
    }

    pub fn output_border(&self) -> Style {
        Style::default().fg(self.dim)
    }

    pub fn panel_title(&self) -> Style {
        Style::default().fg(self.primary).add_modifier(Modifier::BOLD)
    }

    pub fn status(&self) -> Style {
        Style::default().fg(self.dim)
    }

    pub fn error_text(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn success(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn selected_item(&self) -> Style {
        Style::default().fg(self.primary).add_modifier(Modifier::BOLD)
    }

    pub fn unselected_item(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn cursor(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn label(&self) -> Style {
        Style::default().fg(self.primary)
    }

    pub fn active_label(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn help(&self) -> Style {
        Style::default().fg(self.dim)
    }

    pub fn heading(&self, level: u8) -> Style {
        let style = Style::default().fg(self.primary).add_modifier(Modifier::BOLD);
        if level == 1 {
            style.add_modifier(Modifier::UNDERLINED)
        } else {
            style
        }
    }

    pub fn code(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn quote(&self) -> Style {
        Style::default().fg(self.dim).add_modifier(Modifier::ITALIC)
    }

    pub fn link(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::UNDERLINED)
    }
}
