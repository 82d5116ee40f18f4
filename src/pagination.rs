//! Page arithmetic over the active view.
//!
//! Pages are 1-based. A page past the end is allowed and simply renders empty,
//! so deletions never leave the window in an invalid state.

/// Number of pages needed for `total` items, never less than 1.
pub fn page_count(total: usize, row_limit: usize) -> usize {
    let limit = row_limit.max(1);
    total.div_ceil(limit).max(1)
}

/// The items of `view` that belong on `page`, clipped to the view.
pub fn slice<T>(view: &[T], page: usize, row_limit: usize) -> &[T] {
    let limit = row_limit.max(1);
    let start = page.saturating_sub(1).saturating_mul(limit);
    if page == 0 || start >= view.len() {
        return &[];
    }
    let end = start.saturating_add(limit).min(view.len());
    &view[start..end]
}

/// Current page plus the fixed row limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageWindow {
    pub current_page: usize,
    pub row_limit: usize,
}

impl PageWindow {
    pub fn new(row_limit: usize) -> Self {
        Self {
            current_page: 1,
            row_limit: row_limit.max(1),
        }
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    pub fn page_count(&self, total: usize) -> usize {
        page_count(total, self.row_limit)
    }

    pub fn slice<'a, T>(&self, view: &'a [T]) -> &'a [T] {
        slice(view, self.current_page, self.row_limit)
    }

    /// Jump to `page`, clamped into `1..=page_count(total)`.
    pub fn set_page(&mut self, page: usize, total: usize) {
        self.current_page = page.clamp(1, self.page_count(total));
    }

    pub fn next(&mut self, total: usize) {
        self.set_page(self.current_page.saturating_add(1), total);
    }

    /// Step back one page; from a page past the end this lands on the last valid page.
    pub fn prev(&mut self, total: usize) {
        self.set_page(self.current_page.saturating_sub(1), total);
    }

    pub fn first(&mut self) {
        self.current_page = 1;
    }

    pub fn last(&mut self, total: usize) {
        self.current_page = self.page_count(total);
    }

    /// Whether the current page lies past the end of a view of `total` items.
    pub fn is_past_end(&self, total: usize) -> bool {
        self.current_page > self.page_count(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_is_at_least_one() {
        assert_eq!(page_count(0, 10), 1);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(25, 10), 3);
        assert_eq!(page_count(5, 0), 5);
    }

    #[test]
    fn slice_clips_to_view() {
        let view: Vec<u32> = (0..25).collect();
        assert_eq!(slice(&view, 1, 10), &view[0..10]);
        assert_eq!(slice(&view, 3, 10), &view[20..25]);
        assert!(slice(&view, 4, 10).is_empty());
        assert!(slice(&view, 0, 10).is_empty());
        assert!(slice::<u32>(&[], 1, 10).is_empty());
    }

    #[test]
    fn window_navigation_stays_in_range() {
        let mut w = PageWindow::new(10);
        w.prev(25);
        assert_eq!(w.current_page, 1);
        w.next(25);
        w.next(25);
        w.next(25);
        assert_eq!(w.current_page, 3);
        w.last(0);
        assert_eq!(w.current_page, 1);
    }

    #[test]
    fn prev_from_past_end_returns_to_valid_page() {
        let mut w = PageWindow::new(10);
        w.last(25);
        assert_eq!(w.current_page, 3);
        // the view shrinks underneath the window
        assert!(w.is_past_end(12));
        assert!(w.slice(&(0..12).collect::<Vec<_>>()).is_empty());
        w.prev(12);
        assert_eq!(w.current_page, 2);
        assert!(!w.is_past_end(12));
    }
}
