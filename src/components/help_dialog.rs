//! Help dialog component
//!
//! Lists every key binding of the table view and its dialogs.

use crate::action::Action;
use crate::component::Component;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

/// Help dialog showing all keyboard shortcuts
#[derive(Default)]
pub struct HelpDialog {
    pub scroll_offset: usize,
    /// Whether the search key is listed
    pub search_enabled: bool,
}

impl HelpDialog {
    pub fn new(search_enabled: bool) -> Self {
        Self {
            scroll_offset: 0,
            search_enabled,
        }
    }
}

impl Component for HelpDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Some(Action::CloseModal),
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                None
            }
            KeyCode::PageDown => {
                self.scroll_offset = self.scroll_offset.saturating_add(10);
                None
            }
            KeyCode::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(10);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let dialog_area = area.inner(Margin {
            vertical: 2,
            horizontal: 4,
        });
        frame.render_widget(Clear, dialog_area);

        let content = build_help_content(self.search_enabled);
        let total = content.len();
        let visible_height = dialog_area.height.saturating_sub(2) as usize;

        let max_scroll = total.saturating_sub(visible_height);
        self.scroll_offset = self.scroll_offset.min(max_scroll);

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Keyboard Shortcuts ")
                    .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .scroll((self.scroll_offset as u16, 0));
        frame.render_widget(paragraph, dialog_area);

        if total > visible_height {
            let mut scrollbar_state = ScrollbarState::new(max_scroll).position(self.scroll_offset);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                dialog_area.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        Ok(())
    }
}

fn section(lines: &mut Vec<Line<'static>>, title: &str) {
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("  {} ", title),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        format!("  {}", "─".repeat(title.len() + 2)),
        Style::default().fg(Color::DarkGray),
    )));
}

fn shortcut(lines: &mut Vec<Line<'static>>, keys: &str, description: &str) {
    lines.push(Line::from(vec![
        Span::styled(
            format!("  {:14}", keys),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(description.to_string(), Style::default().fg(Color::White)),
    ]));
}

/// Build the help content with all keyboard shortcuts
fn build_help_content(search_enabled: bool) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    section(&mut lines, "Rows & Columns");
    shortcut(&mut lines, "j / ↓", "Next row (continues onto the next page)");
    shortcut(&mut lines, "k / ↑", "Previous row");
    shortcut(&mut lines, "h / ←", "Previous column");
    shortcut(&mut lines, "l / →", "Next column");
    shortcut(&mut lines, "Enter / click", "Show the row's fields");

    section(&mut lines, "Pages");
    shortcut(&mut lines, "n / ] / PgDn", "Next page");
    shortcut(&mut lines, "p / [ / PgUp", "Previous page");
    shortcut(&mut lines, "g / G", "First / last page");
    shortcut(&mut lines, ":", "Go to page number");

    section(&mut lines, "Datasets");
    shortcut(&mut lines, "Tab", "Next dataset");
    shortcut(&mut lines, "Shift+Tab", "Previous dataset");
    shortcut(&mut lines, "r", "Reload dataset from disk");

    section(&mut lines, "Sort & Filter");
    shortcut(&mut lines, "s / click", "Sort by column (again to reverse)");
    shortcut(&mut lines, "S", "Clear sort");
    shortcut(&mut lines, "f", "Edit the column's filter");
    shortcut(&mut lines, "x", "Clear all filters and search");
    if search_enabled {
        shortcut(&mut lines, "/", "Search all fields");
        shortcut(&mut lines, "Esc / Enter", "Leave search");
    }

    section(&mut lines, "Selection");
    shortcut(&mut lines, "Space", "Toggle row selection");
    shortcut(&mut lines, "a", "Select / unselect the page");
    shortcut(&mut lines, "Esc", "Clear selection");

    section(&mut lines, "Column Order");
    shortcut(&mut lines, "m", "Pick up column, press again to drop");
    shortcut(&mut lines, "drag header", "Move column with the mouse");
    shortcut(&mut lines, "Esc", "Cancel move");

    section(&mut lines, "Export");
    shortcut(&mut lines, "e", "Export selection or filtered rows");

    section(&mut lines, "General");
    shortcut(&mut lines, "?", "Show this help");
    shortcut(&mut lines, "q", "Quit");
    shortcut(&mut lines, "Ctrl+c", "Quit immediately");

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Press q, Esc, or ? to close",
        Style::default().fg(Color::DarkGray),
    )));

    lines
}
