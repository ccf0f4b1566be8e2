/// Table display state
pub struct TableState {
    pub selected: Option<usize>,
    pub scroll_offset: usize,
    pub visible_rows: usize,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            selected: None,
            scroll_offset: 0,
            visible_rows: 20,
        }
    }
}

impl TableState {
    /// Start over at the top for a freshly loaded list of `total` rows.
    pub fn reset(&mut self, total: usize) {
        self.selected = if total == 0 { None } else { Some(0) };
        self.scroll_offset = 0;
    }

    pub fn select_next(&mut self, total: usize) {
        let target = self.selected.map_or(0, |i| i + 1);
        self.move_to(target, total);
    }

    pub fn select_prev(&mut self, total: usize) {
        let target = self.selected.map_or(0, |i| i.saturating_sub(1));
        self.move_to(target, total);
    }

    pub fn page_down(&mut self, total: usize) {
        let page = self.page();
        let target = self.selected.map_or(page, |i| i + page);
        self.move_to(target, total);
    }

    pub fn page_up(&mut self, total: usize) {
        let target = self.selected.map_or(0, |i| i.saturating_sub(self.page()));
        self.move_to(target, total);
    }

    pub fn select_first(&mut self, total: usize) {
        self.move_to(0, total);
    }

    pub fn select_last(&mut self, total: usize) {
        self.move_to(usize::MAX, total);
    }

    /// Rows a page jump moves by; one row of overlap stays on screen.
    fn page(&self) -> usize {
        self.visible_rows.saturating_sub(1).max(1)
    }

    /// Select `index` clamped to the list and scroll it into view. An empty
    /// list clears the selection.
    fn move_to(&mut self, index: usize, total: usize) {
        let Some(last) = total.checked_sub(1) else {
            self.selected = None;
            self.scroll_offset = 0;
            return;
        };
        let index = index.min(last);
        self.selected = Some(index);

        let rows = self.visible_rows.max(1);
        if index < self.scroll_offset {
            self.scroll_offset = index;
        } else if index >= self.scroll_offset + rows {
            self.scroll_offset = index + 1 - rows;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrolling_keeps_selection_visible() {
        let mut t = TableState {
            visible_rows: 3,
            ..Default::default()
        };
        t.reset(10);
        for _ in 0..4 {
            t.select_next(10);
        }
        assert_eq!(t.selected, Some(4));
        assert_eq!(t.scroll_offset, 2);

        t.select_last(10);
        assert_eq!(t.scroll_offset, 7);
        t.page_up(10);
        assert_eq!(t.selected, Some(7));
        t.select_first(10);
        assert_eq!((t.selected, t.scroll_offset), (Some(0), 0));
    }

    #[test]
    fn moves_clamp_to_the_list() {
        let mut t = TableState {
            visible_rows: 4,
            ..Default::default()
        };
        t.reset(5);
        t.page_down(5);
        assert_eq!(t.selected, Some(3));
        t.page_down(5);
        assert_eq!(t.selected, Some(4));
        t.select_next(5);
        assert_eq!(t.selected, Some(4));
        t.select_prev(5);
        t.select_prev(5);
        assert_eq!(t.selected, Some(2));
    }

    #[test]
    fn empty_table_has_no_selection() {
        let mut t = TableState::default();
        t.reset(0);
        t.select_next(0);
        t.select_prev(0);
        t.page_down(0);
        t.page_up(0);
        t.select_first(0);
        t.select_last(0);
        assert_eq!(t.selected, None);
        assert_eq!(t.scroll_offset, 0);
    }
}
