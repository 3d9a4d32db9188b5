//! Column order controller and the drag session that drives it

use super::column::ColumnDescriptor;

/// Explicit drag-and-drop session for moving one column header
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragSession {
    #[default]
    Idle,
    Dragging {
        source: String,
        over: Option<String>,
    },
}

impl DragSession {
    pub fn is_active(&self) -> bool {
        matches!(self, DragSession::Dragging { .. })
    }

    pub fn source(&self) -> Option<&str> {
        match self {
            DragSession::Dragging { source, .. } => Some(source),
            DragSession::Idle => None,
        }
    }

    pub fn over(&self) -> Option<&str> {
        match self {
            DragSession::Dragging { over, .. } => over.as_deref(),
            DragSession::Idle => None,
        }
    }

    /// Begin dragging `source`. Returns false if a session is already running.
    pub fn start(&mut self, source: &str) -> bool {
        if self.is_active() {
            return false;
        }
        *self = DragSession::Dragging {
            source: source.to_string(),
            over: None,
        };
        true
    }

    /// Record the header currently under the dragged one
    pub fn over_target(&mut self, target: &str) {
        if let DragSession::Dragging { over, .. } = self {
            *over = Some(target.to_string());
        }
    }

    /// End the session, yielding `(source, target)` when dropped on a target
    pub fn drop_on(&mut self, target: Option<&str>) -> Option<(String, String)> {
        match std::mem::take(self) {
            DragSession::Dragging { source, over } => {
                let target = target.map(str::to_string).or(over)?;
                Some((source, target))
            }
            DragSession::Idle => None,
        }
    }

    pub fn cancel(&mut self) {
        *self = DragSession::Idle;
    }
}

/// The user-visible column sequence
#[derive(Debug, Clone, Default)]
pub struct ColumnOrder {
    columns: Vec<ColumnDescriptor>,
}

impl ColumnOrder {
    pub fn new(columns: Vec<ColumnDescriptor>) -> Self {
        Self { columns }
    }

    /// Replace the order with a freshly supplied column list
    pub fn reset(&mut self, columns: Vec<ColumnDescriptor>) {
        self.columns = columns;
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn keys(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.key.clone()).collect()
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.key == key)
    }

    pub fn get(&self, index: usize) -> Option<&ColumnDescriptor> {
        self.columns.get(index)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Move `source` to the index `target` occupied before the move.
    ///
    /// Returns true when the order changed.
    pub fn move_column(&mut self, source: &str, target: &str) -> bool {
        if source == target {
            return false;
        }
        let (Some(from), Some(to)) = (self.position(source), self.position(target)) else {
            return false;
        };
        let column = self.columns.remove(from);
        self.columns.insert(to, column);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(keys: &[&str]) -> ColumnOrder {
        ColumnOrder::new(keys.iter().map(|k| ColumnDescriptor::new(*k, *k)).collect())
    }

    #[test]
    fn test_move_is_remove_then_insert() {
        let mut columns = order(&["A", "B", "C", "D"]);
        assert!(columns.move_column("A", "C"));
        assert_eq!(columns.keys(), vec!["B", "C", "A", "D"]);
    }

    #[test]
    fn test_move_backwards() {
        let mut columns = order(&["A", "B", "C", "D"]);
        assert!(columns.move_column("D", "B"));
        assert_eq!(columns.keys(), vec!["A", "D", "B", "C"]);
    }

    #[test]
    fn test_move_onto_self_or_unknown_is_no_op() {
        let mut columns = order(&["A", "B"]);
        assert!(!columns.move_column("A", "A"));
        assert!(!columns.move_column("A", "Z"));
        assert_eq!(columns.keys(), vec!["A", "B"]);
    }

    #[test]
    fn test_reorder_keeps_key_set() {
        let mut columns = order(&["A", "B", "C", "D", "E"]);
        columns.move_column("E", "A");
        columns.move_column("B", "D");
        let mut keys = columns.keys();
        keys.sort();
        assert_eq!(keys, vec!["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn test_drag_session_transitions() {
        let mut drag = DragSession::default();
        assert!(drag.drop_on(Some("B")).is_none());

        assert!(drag.start("A"));
        assert!(!drag.start("C"));
        assert_eq!(drag.source(), Some("A"));

        drag.over_target("B");
        drag.over_target("C");
        assert_eq!(drag.over(), Some("C"));
        assert_eq!(drag.drop_on(None), Some(("A".to_string(), "C".to_string())));
        assert_eq!(drag, DragSession::Idle);
    }

    #[test]
    fn test_drag_cancel_and_drop_without_target() {
        let mut drag = DragSession::default();
        drag.start("A");
        drag.cancel();
        assert!(!drag.is_active());

        drag.start("A");
        assert!(drag.drop_on(None).is_none());
        assert!(!drag.is_active());
    }
}
