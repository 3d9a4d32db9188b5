//! Selected rows, tracked as absolute indices into the sorted view

use std::collections::BTreeSet;
use std::ops::Range;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    indices: BTreeSet<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, index: usize) {
        if !self.indices.remove(&index) {
            self.indices.insert(index);
        }
    }

    /// Select-all for the current page: if every row on the page is already
    /// selected the whole selection is cleared, otherwise the selection
    /// becomes exactly the page's rows.
    pub fn toggle_page(&mut self, page: Range<usize>) {
        if page.is_empty() {
            return;
        }
        if self.is_page_selected(page.clone()) {
            self.clear();
        } else {
            self.indices = page.collect();
        }
    }

    pub fn is_page_selected(&self, page: Range<usize>) -> bool {
        !page.is_empty()
            && page.len() == self.indices.len()
            && page.into_iter().all(|i| self.indices.contains(&i))
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Selected indices in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_row() {
        let mut selection = Selection::new();
        selection.toggle(4);
        assert!(selection.contains(4));
        selection.toggle(4);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_select_all_selects_only_current_page() {
        // page size 10, 25 rows, page 2
        let mut selection = Selection::new();
        selection.toggle_page(10..20);
        assert_eq!(selection.iter().collect::<Vec<_>>(), (10..20).collect::<Vec<_>>());
        assert!(!selection.contains(9));
        assert!(!selection.contains(20));
    }

    #[test]
    fn test_select_all_twice_clears() {
        let mut selection = Selection::new();
        selection.toggle_page(0..10);
        selection.toggle_page(0..10);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_select_all_replaces_other_pages() {
        let mut selection = Selection::new();
        selection.toggle(2);
        selection.toggle_page(10..20);
        assert!(!selection.contains(2));
        assert_eq!(selection.len(), 10);
    }

    #[test]
    fn test_partial_page_selection_selects_page() {
        let mut selection = Selection::new();
        selection.toggle(12);
        selection.toggle_page(10..20);
        assert_eq!(selection.len(), 10);
    }
}
