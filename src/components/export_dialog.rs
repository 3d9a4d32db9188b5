//! Export dialog component
//!
//! Picks an export format. The note under the list says which rows will
//! be written: the selection when there is one, otherwise every filtered row.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::model::ExportFormat;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

pub struct ExportDialog {
    pub selected_index: usize,
    list_state: ListState,
    /// Rows the export will contain
    pub row_count: usize,
    /// Whether those rows are the user's selection
    pub selection_only: bool,
    /// Shell command that replaces the built-in encoders
    pub command: Option<String>,
}

impl Default for ExportDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl ExportDialog {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            selected_index: 0,
            list_state,
            row_count: 0,
            selection_only: false,
            command: None,
        }
    }

    pub fn open(&mut self, row_count: usize, selection_only: bool) {
        self.row_count = row_count;
        self.selection_only = selection_only;
    }

    pub fn selected_format(&self) -> ExportFormat {
        ExportFormat::all()[self.selected_index]
    }

    fn select(&mut self, index: usize) {
        self.selected_index = index.min(ExportFormat::all().len() - 1);
        self.list_state.select(Some(self.selected_index));
    }

    /// One-line description of what will be exported
    pub fn scope_note(&self) -> String {
        let rows = if self.row_count == 1 { "row" } else { "rows" };
        if self.selection_only {
            format!("Exporting {} selected {}", self.row_count, rows)
        } else {
            format!("Exporting all {} filtered {}", self.row_count, rows)
        }
    }
}

impl Component for ExportDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::CloseModal),
            KeyCode::Enter => Some(Action::Export(self.selected_format())),
            KeyCode::Char('c') => Some(Action::Export(ExportFormat::Csv)),
            KeyCode::Char('x') => Some(Action::Export(ExportFormat::Excel)),
            KeyCode::Char('p') => Some(Action::Export(ExportFormat::Pdf)),
            KeyCode::Up | KeyCode::Char('k') => {
                self.select(self.selected_index.saturating_sub(1));
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select(self.selected_index + 1);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let height = if self.command.is_some() { 14 } else { 13 };
        let popup_area = centered_popup(area, 48, height);
        frame.render_widget(Clear, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(5),    // Formats
                Constraint::Length(if self.command.is_some() { 4 } else { 3 }),
                Constraint::Length(3), // Help bar
            ])
            .split(popup_area);

        let shortcuts = ['c', 'x', 'p'];
        let items: Vec<ListItem> = ExportFormat::all()
            .iter()
            .zip(shortcuts)
            .map(|(format, key)| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("[{}] ", key), Style::default().fg(Color::Cyan)),
                    Span::styled(format.name(), Style::default().fg(Color::White)),
                    Span::styled(
                        format!("  .{}", format.extension()),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Export ")
                    .title_style(
                        Style::default()
                            .fg(Color::Magenta)
                            .add_modifier(Modifier::BOLD),
                    ),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");
        frame.render_stateful_widget(list, chunks[0], &mut self.list_state);

        let mut note = vec![Line::from(Span::styled(
            self.scope_note(),
            Style::default().fg(if self.selection_only { Color::Green } else { Color::Cyan }),
        ))];
        if let Some(ref command) = self.command {
            note.push(Line::from(Span::styled(
                format!("Sent to `{}`", command),
                Style::default().fg(Color::DarkGray),
            )));
        }
        let note = Paragraph::new(note).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(note, chunks[1]);

        let help = Paragraph::new(Line::from(vec![
            Span::styled(" Enter ", Style::default().fg(Color::Yellow)),
            Span::raw("Export  "),
            Span::styled(" j/k ", Style::default().fg(Color::Cyan)),
            Span::raw("Navigate  "),
            Span::styled(" Esc ", Style::default().fg(Color::Yellow)),
            Span::raw("Cancel"),
        ]))
        .alignment(ratatui::layout::Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[2]);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(dialog: &mut ExportDialog, code: KeyCode) -> Option<Action> {
        dialog
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    #[test]
    fn test_navigation_stays_in_bounds() {
        let mut dialog = ExportDialog::new();
        press(&mut dialog, KeyCode::Up);
        assert_eq!(dialog.selected_format(), ExportFormat::Csv);

        for _ in 0..5 {
            press(&mut dialog, KeyCode::Down);
        }
        assert_eq!(
            press(&mut dialog, KeyCode::Enter),
            Some(Action::Export(ExportFormat::Pdf))
        );
    }

    #[test]
    fn test_shortcut_exports_directly() {
        let mut dialog = ExportDialog::new();
        assert_eq!(
            press(&mut dialog, KeyCode::Char('x')),
            Some(Action::Export(ExportFormat::Excel))
        );
    }

    #[test]
    fn test_scope_note_names_selection() {
        let mut dialog = ExportDialog::new();
        dialog.open(3, true);
        assert_eq!(dialog.scope_note(), "Exporting 3 selected rows");
        dialog.open(1, false);
        assert_eq!(dialog.scope_note(), "Exporting all 1 filtered row");
    }
}
