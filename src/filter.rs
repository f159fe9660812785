//! List filtering for the repository picker.
//!
//! `matched_indices` holds indices into the original list, in original order,
//! so the filtered view is always a subsequence of the source list.

/// Filter state over a list owned elsewhere
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    /// Indices into the original list (matching items only)
    pub matched_indices: Vec<usize>,
    /// Position inside `matched_indices` (None when nothing matches)
    pub selected: Option<usize>,
}

impl ListFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `query` using a closure-based matcher.
    ///
    /// The closure receives each item and the lowercased query. An empty
    /// query matches everything.
    pub fn apply<T>(&mut self, items: &[T], query: &str, matches: impl Fn(&T, &str) -> bool) {
        let query_lower = query.to_lowercase();
        self.matched_indices = if query_lower.is_empty() {
            (0..items.len()).collect()
        } else {
            items
                .iter()
                .enumerate()
                .filter(|(_, item)| matches(item, &query_lower))
                .map(|(i, _)| i)
                .collect()
        };
    }

    /// Clamp `selected` after `matched_indices` changed.
    ///
    /// Returns the original-list index of the selection.
    pub fn sync_selection(&mut self) -> Option<usize> {
        self.selected = if self.matched_indices.is_empty() {
            None
        } else {
            Some(
                self.selected
                    .unwrap_or(0)
                    .min(self.matched_indices.len() - 1),
            )
        };
        self.current_original_index()
    }

    /// Move selection down, staying put at the end
    pub fn navigate_down(&mut self) -> Option<usize> {
        if let Some(sel) = self.selected {
            if sel + 1 < self.matched_indices.len() {
                self.selected = Some(sel + 1);
            }
        }
        self.current_original_index()
    }

    /// Move selection up, staying put at the top
    pub fn navigate_up(&mut self) -> Option<usize> {
        if let Some(sel) = self.selected {
            self.selected = Some(sel.saturating_sub(1));
        }
        self.current_original_index()
    }

    pub fn current_original_index(&self) -> Option<usize> {
        self.selected.map(|s| self.matched_indices[s])
    }

    pub fn len(&self) -> usize {
        self.matched_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matched_indices.is_empty()
    }
}

/// Case-insensitive substring match used for repository names
pub fn contains_ignore_case(item: &String, query_lower: &str) -> bool {
    item.to_lowercase().contains(query_lower)
}
