//! Model layer - table engine and application state
//!
//! - `value` / `column` - rows, cell values and column descriptors
//! - `filter` / `sort` / `pagination` - the derived-view pipeline
//! - `column_order` / `selection` - overlays applied at render time
//! - `export` - artifact encoders and the custom handler seam
//! - `table` - `TableView`, which coordinates all of the above
//! - `tabs` / `modal` - application-level state holders

pub mod column;
pub mod column_order;
pub mod export;
pub mod filter;
pub mod modal;
pub mod pagination;
pub mod selection;
pub mod sort;
pub mod table;
pub mod tabs;
pub mod value;

pub use column::{Align, CellFormat, ColumnDescriptor, FilterType};
pub use column_order::DragSession;
pub use export::{Artifact, ExportError, ExportFormat, ExportHandler, ExportRequest};
pub use filter::{FilterEntry, NumberOperator, TextOperator};
pub use sort::{SortDirection, SortState};
pub use table::{ExportOutcome, TableCallbacks, TableView};
pub use tabs::{Dataset, TabsController};
pub use value::{Row, Value};
