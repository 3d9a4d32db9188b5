//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

pub mod data_table;
pub mod export_dialog;
pub mod filter_dialog;
pub mod help_dialog;
pub mod home;
pub mod layout;
pub mod quit_dialog;
pub mod row_detail_dialog;

pub use data_table::DataTableComponent;
pub use export_dialog::ExportDialog;
pub use filter_dialog::FilterDialog;
pub use help_dialog::HelpDialog;
pub use home::{draw_home_screen, HomeRenderContext};
pub use layout::{calculate_main_layout, centered_popup};
pub use quit_dialog::QuitDialog;
pub use row_detail_dialog::RowDetailDialog;
