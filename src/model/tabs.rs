//! Open datasets and the controller that owns the active tab

use super::table::TableView;
use std::path::PathBuf;

/// One loaded file and the table built over it
pub struct Dataset {
    pub name: String,
    pub source: Option<PathBuf>,
    pub table: TableView,
}

impl Dataset {
    pub fn new(name: impl Into<String>, source: Option<PathBuf>, table: TableView) -> Self {
        Self {
            name: name.into(),
            source,
            table,
        }
    }
}

/// Owns which tab is active. Passed explicitly to whatever needs to read
/// or change it.
#[derive(Debug, Clone, Default)]
pub struct TabsController {
    titles: Vec<String>,
    active: usize,
}

impl TabsController {
    pub fn new(titles: Vec<String>) -> Self {
        Self { titles, active: 0 }
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Activate a tab. Returns true when the active tab changed.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.titles.len() || index == self.active {
            return false;
        }
        self.active = index;
        true
    }

    pub fn next(&mut self) -> bool {
        if self.titles.len() < 2 {
            return false;
        }
        self.select((self.active + 1) % self.titles.len())
    }

    pub fn previous(&mut self) -> bool {
        if self.titles.len() < 2 {
            return false;
        }
        let prev = if self.active == 0 {
            self.titles.len() - 1
        } else {
            self.active - 1
        };
        self.select(prev)
    }
}
