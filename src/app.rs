//! Root application component
//!
//! The App struct implements the Component trait, acting as the root component
//! that delegates event handling and rendering to child components.
//! It owns the open datasets and the tab controller, routes actions to the
//! active table and turns table callbacks back into actions.

use crate::action::Action;
use crate::component::Component;
use crate::components::{
    centered_popup, draw_home_screen, DataTableComponent, ExportDialog, FilterDialog, HelpDialog,
    HomeRenderContext, QuitDialog, RowDetailDialog,
};
use crate::config::Config;
use crate::model::modal::{Modal, ModalStack};
use crate::model::{
    ColumnDescriptor, Dataset, ExportFormat, ExportHandler, ExportOutcome, Row, TableCallbacks,
    TableView, TabsController,
};
use crate::services::{self, loader, CommandExportHandler};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};

// ═══════════════════════════════════════════════════════════════════════════════
// App Struct
// ═══════════════════════════════════════════════════════════════════════════════

/// Main application state - coordinates between components
pub struct App {
    /// Open datasets, one per tab
    pub datasets: Vec<Dataset>,

    /// Which dataset is shown
    pub tabs: TabsController,

    /// Modal overlay stack
    pub modals: ModalStack,

    pub config: Config,

    /// Column schema shared by every dataset, if one was given
    pub schema: Option<Vec<ColumnDescriptor>>,

    /// Flag to indicate the app should quit
    pub should_quit: bool,

    /// Error message to display
    pub error: Option<String>,

    /// Status message to display
    pub status_message: Option<String>,

    /// Table callbacks post here; drained on every tick
    events: Receiver<Action>,
    sender: Sender<Action>,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub data_table: DataTableComponent,
    pub filter_dialog: FilterDialog,
    pub export_dialog: ExportDialog,
    pub row_detail: RowDetailDialog,
    pub help_dialog: HelpDialog,
    pub quit_dialog: QuitDialog,
}

impl App {
    pub fn new(
        datasets: Vec<Dataset>,
        schema: Option<Vec<ColumnDescriptor>>,
        config: Config,
    ) -> App {
        let (sender, events) = mpsc::channel();
        let tabs = TabsController::new(datasets.iter().map(|d| d.name.clone()).collect());

        let mut export_dialog = ExportDialog::new();
        export_dialog.command = config.export_command.clone();

        let mut app = App {
            datasets,
            tabs,
            modals: ModalStack::new(),
            help_dialog: HelpDialog::new(config.search_enabled),
            config,
            schema,
            should_quit: false,
            error: None,
            status_message: None,
            events,
            sender,
            data_table: DataTableComponent::new(),
            filter_dialog: FilterDialog::new(),
            export_dialog,
            row_detail: RowDetailDialog::default(),
            quit_dialog: QuitDialog::default(),
        };

        for index in 0..app.datasets.len() {
            app.wire_callbacks(index);
        }
        app
    }

    /// Route a dataset's callbacks into the action channel and apply the
    /// table-level settings from config
    fn wire_callbacks(&mut self, index: usize) {
        let Some(dataset) = self.datasets.get_mut(index) else {
            return;
        };

        let clicks = self.sender.clone();
        let reorders = self.sender.clone();
        let on_export = self.config.export_command.as_ref().map(|command| {
            Box::new(CommandExportHandler::new(command.clone())) as Box<dyn ExportHandler>
        });

        dataset.table.set_callbacks(TableCallbacks {
            on_row_click: Some(Box::new(move |index: usize, _row: &Row| {
                let _ = clicks.send(Action::RowClicked(index));
            })),
            on_column_reorder: Some(Box::new(move |keys: &[String]| {
                let _ = reorders.send(Action::ColumnsReordered(keys.to_vec()));
            })),
            on_export,
        });
        dataset.table.set_search_enabled(self.config.search_enabled);
    }

    pub fn active_dataset(&self) -> Option<&Dataset> {
        self.datasets.get(self.tabs.active())
    }

    /// Process callback actions queued since the last tick
    fn drain_events(&mut self) -> Result<()> {
        let pending: Vec<Action> = self.events.try_iter().collect();
        for action in pending {
            let mut current = Some(action);
            while let Some(a) = current {
                current = self.update(a)?;
            }
        }
        Ok(())
    }

    fn switch_tab(&mut self, forward: bool) {
        let leaving = self.tabs.active();
        let moved = if forward {
            self.tabs.next()
        } else {
            self.tabs.previous()
        };
        if !moved {
            return;
        }

        if let Some(dataset) = self.datasets.get_mut(leaving) {
            dataset.table.clear_selection();
            dataset.table.cancel_drag();
        }
        self.data_table.reset_cursor();
        self.data_table.cursor_col = 0;
        self.data_table.search_mode = false;
        log::debug!("switched to dataset {}", self.tabs.active());
    }

    /// Handle actions that target the active table
    fn update_table(&mut self, action: Action) -> Result<Option<Action>> {
        let Some(dataset) = self.datasets.get_mut(self.tabs.active()) else {
            return Ok(None);
        };
        let table = &mut dataset.table;
        let grid = &mut self.data_table;

        match action {
            // ─────────────────────────────────────────────────────────────────
            // Navigation
            // ─────────────────────────────────────────────────────────────────
            Action::NextRow => grid.next_row(table),
            Action::PrevRow => grid.previous_row(table),
            Action::NextColumn => {
                grid.next_column(table.columns().len());
                drag_to_cursor(table, grid.cursor_col);
            }
            Action::PrevColumn => {
                grid.previous_column();
                drag_to_cursor(table, grid.cursor_col);
            }
            Action::NextPage => {
                table.next_page();
                grid.reset_cursor();
            }
            Action::PrevPage => {
                table.previous_page();
                grid.reset_cursor();
            }
            Action::FirstPage => {
                table.first_page();
                grid.reset_cursor();
            }
            Action::LastPage => {
                table.last_page();
                grid.reset_cursor();
            }
            Action::GoToPage(page) => {
                if matches!(self.modals.top(), Some(Modal::GoToPage { .. })) {
                    self.modals.pop();
                }
                table.go_to_page(page);
                grid.reset_cursor();
            }

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenFilter(key) => match table.column(&key) {
                Some(column) if column.filterable => {
                    self.filter_dialog.open(column, table.filter(&key), table.rows());
                    self.modals.push(Modal::Filter { column: key });
                }
                Some(column) => {
                    self.status_message = Some(format!("{} has no filter", column.label));
                }
                None => {}
            },
            Action::OpenExport => {
                self.export_dialog
                    .open(table.export_rows().len(), !table.selection().is_empty());
                self.modals.push(Modal::Export);
            }
            Action::OpenGoToPage => {
                if table.total_pages() > 0 {
                    self.modals.push(Modal::GoToPage {
                        input: String::new(),
                    });
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Search
            // ─────────────────────────────────────────────────────────────────
            Action::EnterSearchMode => {
                if table.search_enabled() {
                    grid.search_mode = true;
                }
            }
            Action::ExitSearchMode => grid.search_mode = false,
            Action::SearchInput(c) => {
                let mut term = table.search().to_string();
                term.push(c);
                table.set_search(term);
                grid.reset_cursor();
            }
            Action::SearchBackspace => {
                let mut term = table.search().to_string();
                term.pop();
                table.set_search(term);
                grid.reset_cursor();
            }

            // ─────────────────────────────────────────────────────────────────
            // Sort & Filter
            // ─────────────────────────────────────────────────────────────────
            Action::SortColumn(key) => {
                if table.request_sort(&key) {
                    grid.reset_cursor();
                } else if let Some(column) = table.column(&key) {
                    self.status_message = Some(format!("{} is not sortable", column.label));
                }
            }
            Action::ClearSort => {
                table.clear_sort();
                grid.reset_cursor();
            }
            Action::ApplyFilter(key, entry) => {
                if matches!(self.modals.top(), Some(Modal::Filter { .. })) {
                    self.modals.pop();
                }
                table.set_filter(&key, entry);
                grid.reset_cursor();
            }
            Action::ClearFilter(key) => {
                if matches!(self.modals.top(), Some(Modal::Filter { .. })) {
                    self.modals.pop();
                }
                table.clear_filter(&key);
                grid.reset_cursor();
            }
            Action::ClearAllFilters => {
                table.clear_all_filters();
                grid.search_mode = false;
                grid.reset_cursor();
            }

            // ─────────────────────────────────────────────────────────────────
            // Selection
            // ─────────────────────────────────────────────────────────────────
            Action::ToggleRowSelection(index) => table.toggle_row(index),
            Action::TogglePageSelection => table.toggle_select_page(),
            Action::ClearSelection => table.clear_selection(),
            Action::ClickRow(index) => {
                table.click_row(index);
                return Ok(Some(Action::Tick));
            }
            Action::RowClicked(index) => {
                if let Some(row) = table.sorted_row(index) {
                    self.row_detail.set_row(index, table.columns(), row);
                    self.modals.push(Modal::RowDetail { index });
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Column Order
            // ─────────────────────────────────────────────────────────────────
            Action::StartDrag(key) => {
                if table.start_drag(&key) {
                    if let Some(position) = table.columns().iter().position(|c| c.key == key) {
                        grid.cursor_col = position;
                    }
                }
            }
            Action::DragOver(key) => table.drag_over(&key),
            Action::DropColumn(target) => {
                let source = table.drag().source().map(str::to_string);
                if table.drop_drag(target.as_deref()) {
                    if let Some(position) = source
                        .and_then(|s| table.columns().iter().position(|c| c.key == s))
                    {
                        grid.cursor_col = position;
                    }
                }
                return Ok(Some(Action::Tick));
            }
            Action::CancelDrag => table.cancel_drag(),
            Action::ColumnsReordered(keys) => {
                let labels: Vec<&str> = keys
                    .iter()
                    .filter_map(|k| table.column(k).map(|c| c.label.as_str()))
                    .collect();
                log::info!("{}: column order {}", dataset.name, keys.join(","));
                self.status_message = Some(format!("Column order: {}", labels.join(", ")));
            }

            // ─────────────────────────────────────────────────────────────────
            // Export
            // ─────────────────────────────────────────────────────────────────
            Action::Export(format) => {
                if matches!(self.modals.top(), Some(Modal::Export)) {
                    self.modals.pop();
                }
                let result = export_table(&self.config, dataset, format);
                match result {
                    Ok(message) => {
                        self.error = None;
                        self.status_message = Some(message);
                    }
                    Err(message) => {
                        log::warn!("{}", message);
                        self.error = Some(message);
                    }
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Data
            // ─────────────────────────────────────────────────────────────────
            Action::ReloadDataset => {
                let Some(path) = dataset.source.clone() else {
                    self.status_message = Some(format!("{} has no source file", dataset.name));
                    return Ok(None);
                };
                match loader::load_rows(&path) {
                    Ok(loaded) => {
                        let current: BTreeSet<&str> =
                            table.columns().iter().map(|c| c.key.as_str()).collect();
                        let incoming: BTreeSet<&str> =
                            loaded.keys.iter().map(String::as_str).collect();
                        if self.schema.is_none() && current != incoming {
                            table.set_columns(loader::columns_for(&loaded, None));
                        }
                        let count = loaded.rows.len();
                        table.set_rows(loaded.rows);
                        grid.reset_cursor();
                        log::info!("reloaded {} rows from {}", count, path.display());
                        self.error = None;
                        self.status_message =
                            Some(format!("Reloaded {} rows from {}", count, path.display()));
                    }
                    Err(e) => {
                        log::warn!("reload failed: {}", e);
                        self.error = Some(e.to_string());
                    }
                }
            }

            _ => {}
        }
        Ok(None)
    }
}

/// While a header is being moved, the column cursor picks the drop target
fn drag_to_cursor(table: &mut TableView, cursor_col: usize) {
    if !table.drag().is_active() {
        return;
    }
    if let Some(key) = table.columns().get(cursor_col).map(|c| c.key.clone()) {
        table.drag_over(&key);
    }
}

/// Run an export on a dataset's table and describe the result for the
/// status line
fn export_table(config: &Config, dataset: &mut Dataset, format: ExportFormat) -> Result<String, String> {
    let outcome = dataset
        .table
        .export(format)
        .map_err(|e| format!("{} export failed: {}", format, e))?;

    match outcome {
        ExportOutcome::Built(artifact) => {
            let path = services::write_artifact(
                Path::new(&config.export_dir),
                &artifact,
                config.export_naming,
                &dataset.name,
            )
            .map_err(|e| format!("{} export failed: {}", format, e))?;
            Ok(services::saved_message(&path, artifact.row_count))
        }
        ExportOutcome::Delegated { row_count } => Ok(format!(
            "Sent {} rows as {} to `{}`",
            row_count,
            format,
            config.export_command.as_deref().unwrap_or_default()
        )),
    }
}

impl Component for App {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(Some(Action::ForceQuit));
        }
        self.status_message = None;

        if let Some(modal) = self.modals.top().cloned() {
            self.handle_modal_key_event(&modal, key)
        } else {
            if self.error.is_some() && key.code == KeyCode::Esc {
                self.error = None;
                return Ok(None);
            }
            self.data_table.handle_key_event(key)
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if !self.modals.is_empty() {
            return Ok(None);
        }
        self.data_table.handle_mouse_event(mouse)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => self.drain_events()?,
            Action::Resize(_, _) => {}
            Action::ForceQuit => self.should_quit = true,

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => {
                self.quit_dialog.selected_rows = self
                    .datasets
                    .iter()
                    .map(|d| d.table.selection().len())
                    .sum();
                self.modals.push(Modal::QuitConfirm);
            }
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.push(Modal::Help);
            }
            Action::CloseModal => {
                self.modals.pop();
            }

            // ─────────────────────────────────────────────────────────────────
            // Tabs
            // ─────────────────────────────────────────────────────────────────
            Action::NextTab => self.switch_tab(true),
            Action::PrevTab => self.switch_tab(false),

            other => return self.update_table(other),
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let active = self.tabs.active();
        let Some(dataset) = self.datasets.get(active) else {
            let empty = Paragraph::new("No datasets open")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(empty, area);
            return Ok(());
        };

        let ctx = HomeRenderContext {
            titles: self.tabs.titles(),
            active_tab: active,
            table: &dataset.table,
            error: self.error.as_deref(),
            status_message: self.status_message.as_deref(),
        };
        draw_home_screen(frame, area, &mut self.data_table, &ctx);

        if let Some(modal) = self.modals.top().cloned() {
            self.draw_modal(frame, area, &modal)?;
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helper Methods
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    fn handle_modal_key_event(&mut self, modal: &Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
            Modal::Help => self.help_dialog.handle_key_event(key),
            Modal::Filter { .. } => self.filter_dialog.handle_key_event(key),
            Modal::Export => self.export_dialog.handle_key_event(key),
            Modal::RowDetail { .. } => self.row_detail.handle_key_event(key),
            Modal::GoToPage { input } => {
                let action = match key.code {
                    KeyCode::Esc => Some(Action::CloseModal),
                    KeyCode::Enter => match input.parse::<usize>() {
                        Ok(page) => Some(Action::GoToPage(page)),
                        Err(_) => Some(Action::CloseModal),
                    },
                    KeyCode::Backspace => {
                        if let Some(Modal::GoToPage { input }) = self.modals.top_mut() {
                            input.pop();
                        }
                        None
                    }
                    KeyCode::Char(c) if c.is_ascii_digit() => {
                        if let Some(Modal::GoToPage { input }) = self.modals.top_mut() {
                            input.push(c);
                        }
                        None
                    }
                    _ => None,
                };
                Ok(action)
            }
        }
    }

    fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: &Modal) -> Result<()> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.draw(frame, area)?,
            Modal::Help => self.help_dialog.draw(frame, area)?,
            Modal::Filter { .. } => self.filter_dialog.draw(frame, area)?,
            Modal::Export => self.export_dialog.draw(frame, area)?,
            Modal::RowDetail { .. } => self.row_detail.draw(frame, area)?,
            Modal::GoToPage { input } => {
                let total_pages = self
                    .active_dataset()
                    .map(|d| d.table.total_pages())
                    .unwrap_or(0);
                self.draw_go_to_page(frame, area, input, total_pages);
            }
        }
        Ok(())
    }

    fn draw_go_to_page(&self, frame: &mut Frame, area: Rect, input: &str, total_pages: usize) {
        let popup_area = centered_popup(area, 40, 9);
        frame.render_widget(Clear, popup_area);

        let content = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("Page number (1-{}):", total_pages),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("> {}_", input),
                Style::default().fg(Color::Cyan),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled(" Enter ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                Span::raw("Go  "),
                Span::styled(" Esc ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                Span::raw("Cancel"),
            ]),
        ];

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan))
                    .title(" Go to Page ")
                    .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            )
            .alignment(Alignment::Center);

        frame.render_widget(paragraph, popup_area);
    }
}
