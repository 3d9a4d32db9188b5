//! Row detail dialog - every field of a clicked row

use crate::action::Action;
use crate::component::Component;
use crate::model::{ColumnDescriptor, Row};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

#[derive(Default)]
pub struct RowDetailDialog {
    /// Absolute index in the sorted view
    pub index: usize,
    /// (label, rendered value) in display order
    pub fields: Vec<(String, String)>,
    pub scroll_offset: usize,
}

impl RowDetailDialog {
    pub fn set_row(&mut self, index: usize, columns: &[ColumnDescriptor], row: &Row) {
        self.index = index;
        self.scroll_offset = 0;
        self.fields = columns
            .iter()
            .map(|c| (c.label.clone(), c.render_cell(row)))
            .collect();
    }

    fn content(&self) -> Vec<Line<'static>> {
        let label_width = self
            .fields
            .iter()
            .map(|(label, _)| label.width())
            .max()
            .unwrap_or(0);

        let mut lines = vec![Line::from("")];
        for (label, value) in &self.fields {
            let mut value_lines = value.lines();
            let first = value_lines.next().unwrap_or("");
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {}{}  ", label, " ".repeat(label_width - label.width())),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::styled(first.to_string(), Style::default().fg(Color::White)),
            ]));
            for rest in value_lines {
                lines.push(Line::from(Span::styled(
                    format!("  {}  {}", " ".repeat(label_width), rest),
                    Style::default().fg(Color::White),
                )));
            }
        }
        lines
    }
}

impl Component for RowDetailDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => Some(Action::CloseModal),
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let dialog_area = area.inner(Margin {
            vertical: 3,
            horizontal: 8,
        });
        frame.render_widget(Clear, dialog_area);

        let content = self.content();
        let total = content.len();
        let visible_height = dialog_area.height.saturating_sub(2) as usize;
        let max_scroll = total.saturating_sub(visible_height);
        self.scroll_offset = self.scroll_offset.min(max_scroll);

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" Row {} ", self.index + 1))
                    .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .wrap(Wrap { trim: false })
            .scroll((self.scroll_offset as u16, 0));
        frame.render_widget(paragraph, dialog_area);

        if total > visible_height {
            let mut scrollbar_state = ScrollbarState::new(max_scroll).position(self.scroll_offset);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Value;

    #[test]
    fn test_fields_follow_column_order_and_placeholder() {
        let columns = vec![
            ColumnDescriptor::new("b", "Beta"),
            ColumnDescriptor::new("a", "Alpha"),
        ];
        let row = Row::new().with("a", "one").with("b", Value::Null);

        let mut dialog = RowDetailDialog::default();
        dialog.set_row(4, &columns, &row);

        assert_eq!(
            dialog.fields,
            vec![
                ("Beta".to_string(), "-".to_string()),
                ("Alpha".to_string(), "one".to_string()),
            ]
        );
    }

    #[test]
    fn test_multiline_values_are_indented() {
        let columns = vec![ColumnDescriptor::new("note", "Note")];
        let row = Row::new().with("note", "first\nsecond");

        let mut dialog = RowDetailDialog::default();
        dialog.set_row(0, &columns, &row);

        // Blank line, then one line per value line
        assert_eq!(dialog.content().len(), 3);
    }
}
