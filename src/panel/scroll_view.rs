/// Vertical viewport over a fixed number of content lines.
///
/// Invariant: `offset <= max_offset()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrollView {
    offset: usize,
    height: usize,
    content_lines: usize,
}

impl ScrollView {
    pub fn new(height: usize) -> Self {
        Self {
            height,
            ..Self::default()
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn content_lines(&self) -> usize {
        self.content_lines
    }

    pub fn set_height(&mut self, height: usize) {
        self.height = height;
        self.clamp();
    }

    /// New content resets the position to the top
    pub fn set_content_lines(&mut self, lines: usize) {
        self.content_lines = lines;
        self.offset = 0;
    }

    /// Keep the position but re-clamp after the content was re-rendered
    pub fn update_content_lines(&mut self, lines: usize) {
        self.content_lines = lines;
        self.clamp();
    }

    pub fn max_offset(&self) -> usize {
        self.content_lines.saturating_sub(self.height)
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.offset = self.offset.saturating_add(n).min(self.max_offset());
    }

    pub fn scroll_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.height.max(1));
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.height.max(1));
    }

    pub fn half_page_down(&mut self) {
        self.scroll_down((self.height / 2).max(1));
    }

    pub fn half_page_up(&mut self) {
        self.scroll_up((self.height / 2).max(1));
    }

    pub fn to_top(&mut self) {
        self.offset = 0;
    }

    pub fn to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    /// Scroll position in percent; content that fits entirely counts as 100
    pub fn scroll_percent(&self) -> u16 {
        let max = self.max_offset();
        if max == 0 {
            return 100;
        }
        ((self.offset * 100) / max) as u16
    }

    fn clamp(&mut self) {
        self.offset = self.offset.min(self.max_offset());
    }
}
