//! Tabular data viewer state
//!
//! `TableView` owns the rows and columns supplied by the host and derives
//! every view from them: raw rows → filtered → sorted → paginated. Column
//! order, drag session and selection are overlays on top of that pipeline.
//!
//! The sorted view is cached as indices into the source rows and
//! recomputed after every change to search, filters, sort or data.

use super::column::ColumnDescriptor;
use super::column_order::{ColumnOrder, DragSession};
use super::export::{
    default_file_name, Artifact, ExportError, ExportFormat, ExportHandler, ExportRequest,
};
use super::filter::{self, FilterEntry, Filters};
use super::pagination::Pagination;
use super::selection::Selection;
use super::sort::{self, SortState};
use super::value::Row;
use std::ops::Range;

/// Host callbacks. Missing callbacks fall back to built-in behaviour
/// (export) or do nothing (row click, reorder).
#[derive(Default)]
pub struct TableCallbacks {
    pub on_row_click: Option<Box<dyn FnMut(usize, &Row)>>,
    pub on_column_reorder: Option<Box<dyn FnMut(&[String])>>,
    pub on_export: Option<Box<dyn ExportHandler>>,
}

/// Result of an export request
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    /// A custom handler took care of it
    Delegated { row_count: usize },
    /// Built-in encoder produced an artifact for the host to save
    Built(Artifact),
}

pub struct TableView {
    rows: Vec<Row>,
    order: ColumnOrder,
    search: String,
    search_enabled: bool,
    filters: Filters,
    sort: Option<SortState>,
    pagination: Pagination,
    selection: Selection,
    drag: DragSession,
    /// Filtered+sorted indices into `rows`
    view: Vec<usize>,
    callbacks: TableCallbacks,
}

impl TableView {
    pub fn new(columns: Vec<ColumnDescriptor>, rows: Vec<Row>, page_size: usize) -> Self {
        let mut table = Self {
            rows,
            order: ColumnOrder::new(columns),
            search: String::new(),
            search_enabled: true,
            filters: Filters::new(),
            sort: None,
            pagination: Pagination::new(page_size),
            selection: Selection::new(),
            drag: DragSession::Idle,
            view: Vec::new(),
            callbacks: TableCallbacks::default(),
        };
        table.recompute();
        table
    }

    pub fn set_callbacks(&mut self, callbacks: TableCallbacks) {
        self.callbacks = callbacks;
    }

    pub fn set_search_enabled(&mut self, enabled: bool) {
        self.search_enabled = enabled;
        self.recompute();
    }

    pub fn search_enabled(&self) -> bool {
        self.search_enabled
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Data
    // ─────────────────────────────────────────────────────────────────────────

    /// Mount a different column list; the display order resets to it
    pub fn set_columns(&mut self, columns: Vec<ColumnDescriptor>) {
        self.order.reset(columns);
        self.drag.cancel();
        let sort_key_gone = self
            .sort
            .as_ref()
            .is_some_and(|s| self.order.position(&s.key).is_none());
        if sort_key_gone {
            self.sort = None;
        }
        self.filters.retain(|key, _| self.order.position(key).is_some());
        self.pagination.reset();
        self.selection.clear();
        self.recompute();
    }

    /// Replace the rows, keeping columns, filters and sort
    pub fn set_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
        self.pagination.reset();
        self.selection.clear();
        self.recompute();
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        self.order.columns()
    }

    pub fn column(&self, key: &str) -> Option<&ColumnDescriptor> {
        self.order.position(key).and_then(|i| self.order.get(i))
    }

    pub fn column_keys(&self) -> Vec<String> {
        self.order.keys()
    }

    pub fn total_count(&self) -> usize {
        self.rows.len()
    }

    pub fn filtered_count(&self) -> usize {
        self.view.len()
    }

    /// Rows in filtered+sorted order
    pub fn sorted_rows(&self) -> Vec<&Row> {
        self.view.iter().map(|&i| &self.rows[i]).collect()
    }

    /// Row at an absolute position in the sorted view
    pub fn sorted_row(&self, index: usize) -> Option<&Row> {
        self.view.get(index).map(|&i| &self.rows[i])
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Search & Filters
    // ─────────────────────────────────────────────────────────────────────────

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        let term = term.into();
        if term == self.search {
            return;
        }
        self.search = term;
        self.composition_changed();
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn filter(&self, key: &str) -> Option<&FilterEntry> {
        self.filters.get(key)
    }

    /// Set or replace the filter on a column. Columns that are unknown or
    /// not filterable are ignored.
    pub fn set_filter(&mut self, key: &str, entry: FilterEntry) -> bool {
        match self.column(key) {
            Some(column) if column.filterable => {}
            _ => return false,
        }
        log::debug!("filter {} {}", key, entry.describe());
        self.filters.insert(key.to_string(), entry);
        self.composition_changed();
        true
    }

    pub fn clear_filter(&mut self, key: &str) {
        if self.filters.remove(key).is_some() {
            self.composition_changed();
        }
    }

    /// Drop every filter and the search term
    pub fn clear_all_filters(&mut self) {
        if self.filters.is_empty() && self.search.is_empty() {
            return;
        }
        self.filters.clear();
        self.search.clear();
        self.composition_changed();
    }

    pub fn has_active_filters(&self) -> bool {
        !self.search.is_empty() || self.filters.values().any(FilterEntry::is_active)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Sort
    // ─────────────────────────────────────────────────────────────────────────

    pub fn sort(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    /// Sort by a column: same key flips direction, new key starts ascending.
    /// Returns false for unknown or non-sortable columns.
    pub fn request_sort(&mut self, key: &str) -> bool {
        match self.column(key) {
            Some(column) if column.sortable => {}
            _ => {
                log::debug!("ignoring sort request on {}", key);
                return false;
            }
        }
        let next = sort::toggle(self.sort.as_ref(), key);
        log::debug!("sort {} {}", next.key, next.direction);
        self.sort = Some(next);
        self.selection.clear();
        self.recompute();
        true
    }

    pub fn clear_sort(&mut self) {
        if self.sort.take().is_some() {
            self.selection.clear();
            self.recompute();
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Pagination
    // ─────────────────────────────────────────────────────────────────────────

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn current_page(&self) -> usize {
        self.pagination.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.pagination.total_pages(self.view.len())
    }

    pub fn page_numbers(&self) -> Vec<usize> {
        self.pagination.page_numbers(self.view.len())
    }

    /// Absolute index range of the current page within the sorted view
    pub fn page_range(&self) -> Range<usize> {
        self.pagination.page_range(self.view.len())
    }

    /// Rows of the current page with their absolute indices
    pub fn page_rows(&self) -> Vec<(usize, &Row)> {
        self.page_range()
            .map(|abs| (abs, &self.rows[self.view[abs]]))
            .collect()
    }

    pub fn next_page(&mut self) {
        self.pagination.next(self.view.len());
    }

    pub fn previous_page(&mut self) {
        self.pagination.previous(self.view.len());
    }

    pub fn first_page(&mut self) {
        self.pagination.first();
    }

    pub fn last_page(&mut self) {
        self.pagination.last(self.view.len());
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.pagination.go_to(page, self.view.len());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Selection & Row Click
    // ─────────────────────────────────────────────────────────────────────────

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn toggle_row(&mut self, index: usize) {
        if index < self.view.len() {
            self.selection.toggle(index);
        }
    }

    /// Select-all scoped to the current page
    pub fn toggle_select_page(&mut self) {
        self.selection.toggle_page(self.page_range());
    }

    pub fn is_page_selected(&self) -> bool {
        self.selection.is_page_selected(self.page_range())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Notify the row-click listener, if any
    pub fn click_row(&mut self, index: usize) {
        let Some(&source) = self.view.get(index) else {
            return;
        };
        if let Some(ref mut on_click) = self.callbacks.on_row_click {
            on_click(index, &self.rows[source]);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Column Order
    // ─────────────────────────────────────────────────────────────────────────

    pub fn drag(&self) -> &DragSession {
        &self.drag
    }

    pub fn start_drag(&mut self, key: &str) -> bool {
        if self.order.position(key).is_none() {
            return false;
        }
        self.drag.start(key)
    }

    pub fn drag_over(&mut self, key: &str) {
        if self.order.position(key).is_some() {
            self.drag.over_target(key);
        }
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    /// Finish the drag session; moves the source column onto the drop
    /// target (or the last hovered one). Returns true when the order changed.
    pub fn drop_drag(&mut self, target: Option<&str>) -> bool {
        match self.drag.drop_on(target) {
            Some((source, target)) => self.move_column(&source, &target),
            None => false,
        }
    }

    /// Move `source` to `target`'s position and notify the reorder listener
    pub fn move_column(&mut self, source: &str, target: &str) -> bool {
        if !self.order.move_column(source, target) {
            return false;
        }
        let keys = self.order.keys();
        log::debug!("columns reordered: {}", keys.join(","));
        if let Some(ref mut on_reorder) = self.callbacks.on_column_reorder {
            on_reorder(&keys);
        }
        true
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Export
    // ─────────────────────────────────────────────────────────────────────────

    /// Rows an export would contain: the selection when there is one,
    /// otherwise the whole filtered+sorted view. Never paginated.
    pub fn export_rows(&self) -> Vec<&Row> {
        if self.selection.is_empty() {
            self.sorted_rows()
        } else {
            self.selection
                .iter()
                .filter_map(|i| self.sorted_row(i))
                .collect()
        }
    }

    pub fn export(&mut self, format: ExportFormat) -> Result<ExportOutcome, ExportError> {
        let selection_only = !self.selection.is_empty();
        let rows: Vec<&Row> = if selection_only {
            self.selection
                .iter()
                .filter_map(|i| self.view.get(i).map(|&src| &self.rows[src]))
                .collect()
        } else {
            self.view.iter().map(|&i| &self.rows[i]).collect()
        };
        let row_count = rows.len();
        let columns = self.order.columns();

        if let Some(ref mut handler) = self.callbacks.on_export {
            let request = ExportRequest {
                format,
                columns,
                rows,
                selection_only,
            };
            handler.export(&request)?;
            log::info!("export of {} rows as {} delegated", row_count, format);
            return Ok(ExportOutcome::Delegated { row_count });
        }

        let contents = format.encode(columns, &rows)?;
        log::info!("encoded {} rows as {}", row_count, format);
        Ok(ExportOutcome::Built(Artifact {
            file_name: default_file_name(format),
            format,
            contents,
            row_count,
        }))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Pipeline
    // ─────────────────────────────────────────────────────────────────────────

    /// Search or filters changed: back to page one, drop the selection
    fn composition_changed(&mut self) {
        self.pagination.reset();
        self.selection.clear();
        self.recompute();
    }

    fn recompute(&mut self) {
        let search = self.search_enabled.then_some(self.search.as_str());
        let columns = self.order.keys();
        let mut view = filter::apply_filters(&self.rows, &columns, search, &self.filters);
        sort::sort_indices(&self.rows, &mut view, self.sort.as_ref());
        self.view = view;
        self.pagination.clamp(self.view.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::column::FilterType;
    use crate::model::filter::TextOperator;
    use crate::model::value::Value;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn columns() -> Vec<ColumnDescriptor> {
        vec![
            ColumnDescriptor::new("id", "ID").sortable().filter(FilterType::Number),
            ColumnDescriptor::new("name", "Name").sortable().filter(FilterType::Text),
            ColumnDescriptor::new("note", "Note"),
        ]
    }

    fn numbered(count: usize) -> Vec<Row> {
        (0..count)
            .map(|i| {
                Row::new()
                    .with("id", i as f64)
                    .with("name", format!("row {}", i))
                    .with("note", if i % 2 == 0 { "even" } else { "odd" })
            })
            .collect()
    }

    #[test]
    fn test_invariants_hold() {
        let mut table = TableView::new(columns(), numbered(23), 10);
        table.set_search("1");
        assert!(table.filtered_count() <= table.total_count());
        assert_eq!(table.sorted_rows().len(), table.filtered_count());
        assert!(table.page_rows().len() <= 10);
        assert_eq!(table.total_pages(), table.filtered_count().div_ceil(10));
    }

    #[test]
    fn test_search_change_resets_page() {
        let mut table = TableView::new(columns(), numbered(50), 10);
        table.go_to_page(3);
        assert_eq!(table.current_page(), 3);
        table.set_search("row");
        assert_eq!(table.current_page(), 1);
    }

    #[test]
    fn test_filter_change_resets_page_and_selection() {
        let mut table = TableView::new(columns(), numbered(50), 10);
        table.go_to_page(2);
        table.toggle_row(12);
        assert!(table.set_filter(
            "name",
            FilterEntry::Text {
                value: "row".into(),
                operator: TextOperator::Contains
            }
        ));
        assert_eq!(table.current_page(), 1);
        assert!(table.selection().is_empty());
    }

    #[test]
    fn test_non_filterable_and_non_sortable_columns_are_ignored() {
        let mut table = TableView::new(columns(), numbered(5), 10);
        assert!(!table.set_filter(
            "note",
            FilterEntry::Text {
                value: "odd".into(),
                operator: TextOperator::Equals
            }
        ));
        assert_eq!(table.filtered_count(), 5);
        assert!(!table.request_sort("note"));
        assert!(table.sort().is_none());
    }

    #[test]
    fn test_request_sort_toggles() {
        let mut table = TableView::new(columns(), numbered(3), 10);
        table.request_sort("id");
        table.request_sort("id");
        let ids: Vec<Value> = table.sorted_rows().iter().map(|r| r.get("id").clone()).collect();
        assert_eq!(ids, vec![Value::from(2.0), Value::from(1.0), Value::from(0.0)]);
    }

    #[test]
    fn test_select_all_on_page_two() {
        let mut table = TableView::new(columns(), numbered(25), 10);
        table.go_to_page(2);
        table.toggle_select_page();
        assert_eq!(table.selection().iter().collect::<Vec<_>>(), (10..20).collect::<Vec<_>>());
        assert!(table.is_page_selected());
        table.toggle_select_page();
        assert!(table.selection().is_empty());
    }

    #[test]
    fn test_empty_view_clamps_to_page_one() {
        let mut table = TableView::new(columns(), numbered(30), 10);
        table.go_to_page(3);
        table.set_search("no such row");
        assert_eq!(table.total_pages(), 0);
        assert_eq!(table.current_page(), 1);
        assert!(table.page_rows().is_empty());
        table.clear_all_filters();
        assert_eq!(table.filtered_count(), 30);
    }

    #[test]
    fn test_reorder_notifies_listener() {
        let seen: Rc<RefCell<Vec<Vec<String>>>> = Rc::default();
        let sink = Rc::clone(&seen);
        let mut table = TableView::new(columns(), numbered(1), 10);
        table.set_callbacks(TableCallbacks {
            on_column_reorder: Some(Box::new(move |keys: &[String]| {
                sink.borrow_mut().push(keys.to_vec())
            })),
            ..Default::default()
        });

        assert!(table.start_drag("id"));
        table.drag_over("note");
        assert!(table.drop_drag(None));
        assert!(!table.move_column("name", "name"));

        assert_eq!(table.column_keys(), vec!["name", "note", "id"]);
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(seen.borrow()[0], vec!["name", "note", "id"]);
    }

    #[test]
    fn test_set_columns_resets_order() {
        let mut table = TableView::new(columns(), numbered(1), 10);
        table.move_column("note", "id");
        table.request_sort("name");
        table.set_columns(vec![ColumnDescriptor::new("id", "ID")]);
        assert_eq!(table.column_keys(), vec!["id"]);
        assert!(table.sort().is_none());
    }

    #[test]
    fn test_row_click_reports_absolute_index() {
        let clicked: Rc<RefCell<Option<(usize, Value)>>> = Rc::default();
        let sink = Rc::clone(&clicked);
        let mut table = TableView::new(columns(), numbered(15), 10);
        table.set_callbacks(TableCallbacks {
            on_row_click: Some(Box::new(move |i: usize, row: &Row| {
                *sink.borrow_mut() = Some((i, row.get("id").clone()));
            })),
            ..Default::default()
        });
        table.request_sort("id");
        table.request_sort("id");
        table.click_row(11);
        assert_eq!(*clicked.borrow(), Some((11, Value::from(3.0))));
    }

    #[test]
    fn test_export_defaults_to_full_sorted_view() {
        let mut table = TableView::new(columns(), numbered(25), 10);
        table.go_to_page(2);
        match table.export(ExportFormat::Csv).unwrap() {
            ExportOutcome::Built(artifact) => {
                assert_eq!(artifact.file_name, "data.csv");
                assert_eq!(artifact.row_count, 25);
                assert!(artifact.contents.starts_with("ID,Name,Note\n0,\"row 0\",\"even\""));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_export_honours_selection() {
        let mut table = TableView::new(columns(), numbered(5), 10);
        table.toggle_row(3);
        table.toggle_row(1);
        assert_eq!(table.export_rows().len(), 2);
        match table.export(ExportFormat::Csv).unwrap() {
            ExportOutcome::Built(artifact) => {
                assert_eq!(artifact.row_count, 2);
                let lines: Vec<&str> = artifact.contents.lines().collect();
                assert_eq!(lines[1], "1,\"row 1\",\"odd\"");
                assert_eq!(lines[2], "3,\"row 3\",\"odd\"");
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    struct Recorder(Rc<RefCell<Vec<(ExportFormat, usize, bool)>>>);

    impl ExportHandler for Recorder {
        fn export(&mut self, request: &ExportRequest<'_>) -> Result<(), ExportError> {
            self.0
                .borrow_mut()
                .push((request.format, request.rows.len(), request.selection_only));
            Ok(())
        }
    }

    #[test]
    fn test_custom_export_handler_replaces_encoder() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut table = TableView::new(columns(), numbered(4), 10);
        table.set_callbacks(TableCallbacks {
            on_export: Some(Box::new(Recorder(Rc::clone(&calls)))),
            ..Default::default()
        });
        let outcome = table.export(ExportFormat::Pdf).unwrap();
        assert_eq!(outcome, ExportOutcome::Delegated { row_count: 4 });
        assert_eq!(*calls.borrow(), vec![(ExportFormat::Pdf, 4, false)]);
    }
}
