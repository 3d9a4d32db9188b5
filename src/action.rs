//! Action enum - All possible application actions
//!
//! Actions are discrete operations that the application can perform.
//! Components emit Actions in response to events, and the App processes
//! them to update state.

use crate::model::{ExportFormat, FilterEntry};
use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick; drains table callbacks
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Force quit without confirmation
    ForceQuit,

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────
    /// Move the row cursor down within the page
    NextRow,
    /// Move the row cursor up within the page
    PrevRow,
    /// Move the column cursor right (drags the header while a drag is active)
    NextColumn,
    /// Move the column cursor left
    PrevColumn,
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,
    /// Jump to a 1-indexed page
    GoToPage(usize),
    /// Move to next dataset tab
    NextTab,
    /// Move to previous dataset tab
    PrevTab,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    OpenQuitDialog,
    /// Open help dialog showing all keyboard shortcuts
    OpenHelp,
    /// Open the filter editor for a column
    OpenFilter(String),
    OpenExport,
    /// Open the go-to-page prompt
    OpenGoToPage,
    /// Close the current modal
    CloseModal,

    // ─────────────────────────────────────────────────────────────────────────
    // Search
    // ─────────────────────────────────────────────────────────────────────────
    EnterSearchMode,
    ExitSearchMode,
    /// Add character to search query
    SearchInput(char),
    /// Remove last character from search query
    SearchBackspace,

    // ─────────────────────────────────────────────────────────────────────────
    // Sort & Filter
    // ─────────────────────────────────────────────────────────────────────────
    /// Sort by a column (flips direction when already sorted by it)
    SortColumn(String),
    ClearSort,
    /// Set the filter on a column
    ApplyFilter(String, FilterEntry),
    ClearFilter(String),
    /// Drop every filter and the search term
    ClearAllFilters,

    // ─────────────────────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────────────────────
    /// Toggle selection of a row (absolute index in the sorted view)
    ToggleRowSelection(usize),
    /// Select or clear the current page
    TogglePageSelection,
    ClearSelection,
    /// Activate a row (absolute index in the sorted view)
    ClickRow(usize),

    // ─────────────────────────────────────────────────────────────────────────
    // Column Order
    // ─────────────────────────────────────────────────────────────────────────
    /// Begin dragging a column header
    StartDrag(String),
    /// Dragged header is over another header
    DragOver(String),
    /// Release the dragged header, optionally on an explicit target
    DropColumn(Option<String>),
    CancelDrag,

    // ─────────────────────────────────────────────────────────────────────────
    // Export
    // ─────────────────────────────────────────────────────────────────────────
    Export(ExportFormat),

    // ─────────────────────────────────────────────────────────────────────────
    // Table Callbacks
    // ─────────────────────────────────────────────────────────────────────────
    /// A row was clicked (absolute index in the sorted view)
    RowClicked(usize),
    /// The column order changed
    ColumnsReordered(Vec<String>),

    // ─────────────────────────────────────────────────────────────────────────
    // Data
    // ─────────────────────────────────────────────────────────────────────────
    /// Reload the active dataset from disk
    ReloadDataset,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::NextRow => write!(f, "NextRow"),
            Action::PrevRow => write!(f, "PrevRow"),
            Action::NextColumn => write!(f, "NextColumn"),
            Action::PrevColumn => write!(f, "PrevColumn"),
            Action::NextPage => write!(f, "NextPage"),
            Action::PrevPage => write!(f, "PrevPage"),
            Action::FirstPage => write!(f, "FirstPage"),
            Action::LastPage => write!(f, "LastPage"),
            Action::GoToPage(page) => write!(f, "GoToPage({})", page),
            Action::NextTab => write!(f, "NextTab"),
            Action::PrevTab => write!(f, "PrevTab"),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::OpenFilter(key) => write!(f, "OpenFilter({})", key),
            Action::OpenExport => write!(f, "OpenExport"),
            Action::OpenGoToPage => write!(f, "OpenGoToPage"),
            Action::CloseModal => write!(f, "CloseModal"),
            Action::EnterSearchMode => write!(f, "EnterSearchMode"),
            Action::ExitSearchMode => write!(f, "ExitSearchMode"),
            Action::SearchInput(c) => write!(f, "SearchInput('{}')", c),
            Action::SearchBackspace => write!(f, "SearchBackspace"),
            Action::SortColumn(key) => write!(f, "SortColumn({})", key),
            Action::ClearSort => write!(f, "ClearSort"),
            Action::ApplyFilter(key, entry) => write!(f, "ApplyFilter({} {})", key, entry.describe()),
            Action::ClearFilter(key) => write!(f, "ClearFilter({})", key),
            Action::ClearAllFilters => write!(f, "ClearAllFilters"),
            Action::ToggleRowSelection(index) => write!(f, "ToggleRowSelection({})", index),
            Action::TogglePageSelection => write!(f, "TogglePageSelection"),
            Action::ClearSelection => write!(f, "ClearSelection"),
            Action::ClickRow(index) => write!(f, "ClickRow({})", index),
            Action::StartDrag(key) => write!(f, "StartDrag({})", key),
            Action::DragOver(key) => write!(f, "DragOver({})", key),
            Action::DropColumn(Some(key)) => write!(f, "DropColumn({})", key),
            Action::DropColumn(None) => write!(f, "DropColumn"),
            Action::CancelDrag => write!(f, "CancelDrag"),
            Action::Export(format) => write!(f, "Export({})", format),
            Action::RowClicked(index) => write!(f, "RowClicked({})", index),
            Action::ColumnsReordered(keys) => write!(f, "ColumnsReordered({})", keys.join(",")),
            Action::ReloadDataset => write!(f, "ReloadDataset"),
        }
    }
}
