//! Fixed-size page slicing with clamped navigation

use std::ops::Range;

/// Most numbered page buttons shown at once
pub const MAX_PAGE_BUTTONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-indexed
    pub current_page: usize,
    pub page_size: usize,
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn total_pages(&self, total_rows: usize) -> usize {
        total_rows.div_ceil(self.page_size)
    }

    pub fn start_index(&self) -> usize {
        (self.current_page - 1) * self.page_size
    }

    /// Slice bounds of the current page within `total_rows`
    pub fn page_range(&self, total_rows: usize) -> Range<usize> {
        let start = self.start_index().min(total_rows);
        let end = (self.current_page * self.page_size).min(total_rows);
        start..end
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Jump to a page, clamped to `[1, total_pages]`
    pub fn go_to(&mut self, page: usize, total_rows: usize) {
        let last = self.total_pages(total_rows).max(1);
        self.current_page = page.clamp(1, last);
    }

    pub fn next(&mut self, total_rows: usize) {
        self.go_to(self.current_page + 1, total_rows);
    }

    pub fn previous(&mut self, total_rows: usize) {
        self.go_to(self.current_page.saturating_sub(1), total_rows);
    }

    pub fn first(&mut self) {
        self.current_page = 1;
    }

    pub fn last(&mut self, total_rows: usize) {
        self.go_to(self.total_pages(total_rows), total_rows);
    }

    /// Pull the current page back in range after the row count shrank
    pub fn clamp(&mut self, total_rows: usize) {
        self.go_to(self.current_page, total_rows);
    }

    /// Numbered page buttons: a window of at most five pages around the
    /// current one, pinned to the start or end near the edges.
    pub fn page_numbers(&self, total_rows: usize) -> Vec<usize> {
        let total = self.total_pages(total_rows);
        if total <= MAX_PAGE_BUTTONS {
            return (1..=total).collect();
        }
        let current = self.current_page;
        let first = if current <= 3 {
            1
        } else if current >= total - 2 {
            total - 4
        } else {
            current - 2
        };
        (first..first + MAX_PAGE_BUTTONS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        let p = Pagination::new(10);
        assert_eq!(p.total_pages(0), 0);
        assert_eq!(p.total_pages(10), 1);
        assert_eq!(p.total_pages(25), 3);
    }

    #[test]
    fn test_page_range_last_page_is_partial() {
        let mut p = Pagination::new(10);
        p.go_to(3, 25);
        assert_eq!(p.page_range(25), 20..25);
    }

    #[test]
    fn test_navigation_clamps() {
        let mut p = Pagination::new(10);
        p.previous(25);
        assert_eq!(p.current_page, 1);
        p.go_to(99, 25);
        assert_eq!(p.current_page, 3);
        p.next(25);
        assert_eq!(p.current_page, 3);
        p.go_to(0, 25);
        assert_eq!(p.current_page, 1);
        p.go_to(4, 0);
        assert_eq!(p.current_page, 1);
    }

    #[test]
    fn test_clamp_after_shrink() {
        let mut p = Pagination::new(10);
        p.go_to(5, 50);
        p.clamp(12);
        assert_eq!(p.current_page, 2);
    }

    #[test]
    fn test_pages_concatenate_to_whole_sequence() {
        for total_rows in [0usize, 1, 9, 10, 11, 37] {
            let mut p = Pagination::new(10);
            let mut seen = Vec::new();
            for page in 1..=p.total_pages(total_rows) {
                p.go_to(page, total_rows);
                seen.extend(p.page_range(total_rows));
            }
            assert_eq!(seen, (0..total_rows).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_page_window() {
        let mut p = Pagination::new(1);
        assert_eq!(p.page_numbers(4), vec![1, 2, 3, 4]);

        p.go_to(2, 10);
        assert_eq!(p.page_numbers(10), vec![1, 2, 3, 4, 5]);
        p.go_to(3, 10);
        assert_eq!(p.page_numbers(10), vec![1, 2, 3, 4, 5]);
        p.go_to(6, 10);
        assert_eq!(p.page_numbers(10), vec![4, 5, 6, 7, 8]);
        p.go_to(8, 10);
        assert_eq!(p.page_numbers(10), vec![6, 7, 8, 9, 10]);
        p.go_to(10, 10);
        assert_eq!(p.page_numbers(10), vec![6, 7, 8, 9, 10]);
    }
}
