//! Markdown → styled terminal text for the digest view.
//!
//! Rendering is best effort: anything the renderer does not understand is
//! emitted as plain text, so the caller never sees an error. Lines are
//! wrapped to the target width here so the scroll view can count them.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::ui::Theme;

/// Width used when the caller does not know the panel size yet
const FALLBACK_WIDTH: usize = 80;
const RULE_WIDTH: usize = 40;

pub fn render(markdown: &str, width: u16, theme: &Theme) -> Text<'static> {
    let width = if width == 0 {
        FALLBACK_WIDTH
    } else {
        width as usize
    };

    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut renderer = Renderer::new(theme, width);
    for event in Parser::new_ext(markdown, options) {
        renderer.event(event);
    }
    Text::from(renderer.finish())
}

struct Renderer<'t> {
    theme: &'t Theme,
    width: usize,
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    styles: Vec<Style>,
    /// `None` = bullet list, `Some(n)` = ordered list with next number
    lists: Vec<Option<u64>>,
    pending_marker: Option<String>,
    quote_depth: usize,
    in_code_block: bool,
}

impl<'t> Renderer<'t> {
    fn new(theme: &'t Theme, width: usize) -> Self {
        Self {
            theme,
            width,
            lines: Vec::new(),
            current: Vec::new(),
            styles: vec![Style::default().fg(theme.text)],
            lists: Vec::new(),
            pending_marker: None,
            quote_depth: 0,
            in_code_block: false,
        }
    }

    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or_default()
    }

    fn push_style(&mut self, patch: Style) {
        let style = self.style().patch(patch);
        self.styles.push(style);
    }

    fn pop_style(&mut self) {
        if self.styles.len() > 1 {
            self.styles.pop();
        }
    }

    fn blank_line(&mut self) {
        if self.lines.last().is_some_and(|l| l.width() > 0) {
            self.lines.push(Line::default());
        }
    }

    fn event(&mut self, event: Event<'_>) {
        if self.in_code_block {
            match event {
                Event::End(TagEnd::CodeBlock) => {
                    self.in_code_block = false;
                    self.blank_line();
                }
                Event::Text(t) => {
                    for code_line in t.lines() {
                        self.push_code_line(code_line);
                    }
                }
                _ => {}
            }
            return;
        }

        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(t) => {
                let style = self.style();
                self.current.push(Span::styled(t.into_string(), style));
            }
            Event::Code(t) => {
                let style = self.style().patch(self.theme.code());
                self.current.push(Span::styled(t.into_string(), style));
            }
            Event::Html(t) | Event::InlineHtml(t) => {
                let style = self.style();
                self.current
                    .push(Span::styled(t.trim_end().to_string(), style));
            }
            Event::SoftBreak => self.current.push(Span::raw(" ")),
            Event::HardBreak => self.flush(),
            Event::Rule => {
                self.flush();
                self.lines.push(Line::styled(
                    "─".repeat(self.width.min(RULE_WIDTH)),
                    self.theme.status(),
                ));
                self.lines.push(Line::default());
            }
            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                self.current
                    .push(Span::styled(marker, self.theme.cursor()));
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush();
                let style = self.theme.heading(heading_level(level));
                self.push_style(style);
            }
            Tag::BlockQuote(_) => {
                self.flush();
                self.quote_depth += 1;
                let style = self.theme.quote();
                self.push_style(style);
            }
            Tag::CodeBlock(kind) => {
                self.flush();
                if let CodeBlockKind::Fenced(lang) = kind {
                    if !lang.is_empty() {
                        self.lines
                            .push(Line::styled(format!("  {}", lang), self.theme.status()));
                    }
                }
                self.in_code_block = true;
            }
            Tag::List(start) => {
                self.flush();
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush();
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{}. ", n);
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.pending_marker = Some(marker);
            }
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::Link { .. } => {
                let style = self.theme.link();
                self.push_style(style);
            }
            Tag::TableHead | Tag::TableRow => self.flush(),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                self.flush();
                if self.lists.is_empty() {
                    self.blank_line();
                }
            }
            TagEnd::Heading(_) => {
                self.flush();
                self.pop_style();
                self.blank_line();
            }
            TagEnd::BlockQuote(_) => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.pop_style();
                self.blank_line();
            }
            TagEnd::List(_) => {
                self.flush();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank_line();
                }
            }
            TagEnd::Item => self.flush(),
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link => {
                self.pop_style()
            }
            TagEnd::TableCell => self.current.push(Span::styled(" │ ", self.theme.status())),
            TagEnd::TableHead | TagEnd::TableRow => self.flush(),
            TagEnd::Table => self.blank_line(),
            _ => {}
        }
    }

    /// Prefix for the first and following wrapped lines of the current block
    fn prefixes(&mut self) -> (Vec<Span<'static>>, Vec<Span<'static>>) {
        let mut first = Vec::new();
        let mut rest = Vec::new();

        if self.quote_depth > 0 {
            let bar = "│ ".repeat(self.quote_depth);
            first.push(Span::styled(bar.clone(), self.theme.status()));
            rest.push(Span::styled(bar, self.theme.status()));
        }

        let depth = self.lists.len();
        if depth > 0 {
            let indent = "  ".repeat(depth - 1);
            match self.pending_marker.take() {
                Some(marker) => {
                    let pad = " ".repeat(marker.width());
                    first.push(Span::raw(indent.clone()));
                    first.push(Span::styled(marker, self.theme.cursor()));
                    rest.push(Span::raw(format!("{}{}", indent, pad)));
                }
                None => {
                    let pad = format!("{}  ", indent);
                    first.push(Span::raw(pad.clone()));
                    rest.push(Span::raw(pad));
                }
            }
        }
        (first, rest)
    }

    fn flush(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let spans = std::mem::take(&mut self.current);
        if spans.iter().all(|s| s.content.trim().is_empty()) && self.pending_marker.is_none() {
            return;
        }
        let (first, rest) = self.prefixes();
        let wrapped = wrap_spans(spans, first, rest, self.width);
        self.lines.extend(wrapped);
    }

    fn push_code_line(&mut self, code_line: &str) {
        let indent = "  ";
        let avail = self.width.saturating_sub(indent.len()).max(1);
        let chunks = split_by_width(code_line, avail);
        if chunks.is_empty() {
            self.lines.push(Line::raw(indent));
            return;
        }
        for chunk in chunks {
            self.lines.push(Line::from(vec![
                Span::raw(indent),
                Span::styled(chunk, self.theme.code()),
            ]));
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush();
        while self.lines.last().is_some_and(|l| l.width() == 0) {
            self.lines.pop();
        }
        self.lines
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn spans_width(spans: &[Span<'_>]) -> usize {
    spans.iter().map(|s| s.content.width()).sum()
}

/// Greedy word wrap of styled spans. Words wider than a full line are split.
fn wrap_spans(
    spans: Vec<Span<'static>>,
    first_prefix: Vec<Span<'static>>,
    rest_prefix: Vec<Span<'static>>,
    width: usize,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let rest_width = spans_width(&rest_prefix);
    let mut line = first_prefix;
    let mut line_width = spans_width(&line);
    let mut prefix_width = line_width;
    let mut pending_space: Option<Style> = None;

    for span in spans {
        let style = span.style;
        for token in tokens(&span.content) {
            if token.chars().all(char::is_whitespace) {
                if line_width > prefix_width {
                    pending_space = Some(style);
                }
                continue;
            }

            let token_width = token.width();
            let space = usize::from(pending_space.is_some());
            if line_width > prefix_width && line_width + space + token_width > width {
                lines.push(Line::from(std::mem::take(&mut line)));
                line = rest_prefix.clone();
                line_width = rest_width;
                prefix_width = rest_width;
                pending_space = None;
            }

            if let Some(space_style) = pending_space.take() {
                line.push(Span::styled(" ", space_style));
                line_width += 1;
            }

            if line_width + token_width <= width {
                line.push(Span::styled(token.to_string(), style));
                line_width += token_width;
                continue;
            }

            // Token does not fit even on an empty line
            let avail = width.saturating_sub(line_width).max(1);
            let mut chunks = split_by_width(token, avail).into_iter();
            if let Some(head) = chunks.next() {
                line.push(Span::styled(head, style));
            }
            let remainder: String = chunks.collect();
            for chunk in split_by_width(&remainder, width.saturating_sub(rest_width).max(1)) {
                lines.push(Line::from(std::mem::take(&mut line)));
                line = rest_prefix.clone();
                line_width = rest_width + chunk.width();
                prefix_width = rest_width;
                line.push(Span::styled(chunk, style));
            }
            if remainder.is_empty() {
                line_width = spans_width(&line);
            }
        }
    }

    if line_width > prefix_width || lines.is_empty() {
        lines.push(Line::from(line));
    }
    lines
}

/// Split text into alternating runs of whitespace and non-whitespace
fn tokens(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut prev_ws: Option<bool> = None;
    for (i, c) in text.char_indices() {
        let ws = c.is_whitespace();
        if prev_ws.is_some_and(|p| p != ws) {
            out.push(&text[start..i]);
            start = i;
        }
        prev_ws = Some(ws);
    }
    if start < text.len() {
        out.push(&text[start..]);
    }
    out
}

/// Hard split by display width
fn split_by_width(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut chunk = String::new();
    let mut chunk_width = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if chunk_width + w > width && !chunk.is_empty() {
            out.push(std::mem::take(&mut chunk));
            chunk_width = 0;
        }
        chunk.push(c);
        chunk_width += w;
    }
    if !chunk.is_empty() {
        out.push(chunk);
    }
    out
}
