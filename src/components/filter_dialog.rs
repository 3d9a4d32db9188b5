//! Filter dialog component
//!
//! Edits the filter entry of one column. The editor follows the column's
//! filter type: free text with an operator, a number with a comparison, a
//! min/max range, a checklist of values, or a date (accepted, not applied).

use crate::action::Action;
use crate::component::Component;
use crate::model::{
    ColumnDescriptor, FilterEntry, FilterType, NumberOperator, Row, TextOperator, Value,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum RangeField {
    #[default]
    Min,
    Max,
}

/// Filter dialog
pub struct FilterDialog {
    /// Key of the column being filtered
    pub column: String,
    /// Column label shown in the title
    pub label: String,
    pub filter_type: FilterType,
    /// Text, number or date input
    input: String,
    text_operator: TextOperator,
    number_operator: NumberOperator,
    min_input: String,
    max_input: String,
    range_field: RangeField,
    /// Select choices and which are checked
    options: Vec<(Value, bool)>,
    list_state: ListState,
    /// Why the last Enter was rejected
    pub error: Option<String>,
}

impl Default for FilterDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterDialog {
    pub fn new() -> Self {
        Self {
            column: String::new(),
            label: String::new(),
            filter_type: FilterType::Text,
            input: String::new(),
            text_operator: TextOperator::default(),
            number_operator: NumberOperator::default(),
            min_input: String::new(),
            max_input: String::new(),
            range_field: RangeField::Min,
            options: Vec::new(),
            list_state: ListState::default(),
            error: None,
        }
    }

    /// Load a column and its current entry into the editor
    pub fn open(&mut self, column: &ColumnDescriptor, current: Option<&FilterEntry>, rows: &[Row]) {
        *self = Self::new();
        self.column = column.key.clone();
        self.label = column.label.clone();
        self.filter_type = column.filter_type.unwrap_or(FilterType::Text);

        if self.filter_type == FilterType::Select {
            let checked: &[Value] = match current {
                Some(FilterEntry::Select { values }) => values,
                _ => &[],
            };
            self.options = column
                .select_options(rows)
                .into_iter()
                .map(|v| {
                    let on = checked.contains(&v);
                    (v, on)
                })
                .collect();
            self.list_state.select((!self.options.is_empty()).then_some(0));
        }

        match current {
            Some(FilterEntry::Text { value, operator }) => {
                self.input = value.clone();
                self.text_operator = *operator;
            }
            Some(FilterEntry::Number { value, operator }) => {
                self.input = value.clone();
                self.number_operator = *operator;
            }
            Some(FilterEntry::Range { min, max }) => {
                self.min_input = bound_text(*min);
                self.max_input = bound_text(*max);
            }
            Some(FilterEntry::Date { value }) => self.input = value.clone(),
            Some(FilterEntry::Select { .. }) | None => {}
        }
    }

    /// Entry described by the editor. `Ok(None)` means the filter should be
    /// cleared; `Err` carries a message for the user.
    pub fn build_entry(&self) -> Result<Option<FilterEntry>, String> {
        let entry = match self.filter_type {
            FilterType::Text => {
                if self.input.is_empty() {
                    return Ok(None);
                }
                FilterEntry::Text {
                    value: self.input.clone(),
                    operator: self.text_operator,
                }
            }
            FilterType::Number => {
                let value = self.input.trim();
                if value.is_empty() {
                    return Ok(None);
                }
                value
                    .parse::<f64>()
                    .map_err(|_| format!("'{}' is not a number", value))?;
                FilterEntry::Number {
                    value: value.to_string(),
                    operator: self.number_operator,
                }
            }
            FilterType::Range => {
                let min = parse_bound(&self.min_input)?;
                let max = parse_bound(&self.max_input)?;
                match (min, max) {
                    (None, None) => return Ok(None),
                    (min, max) => {
                        let min = min.unwrap_or(f64::NEG_INFINITY);
                        let max = max.unwrap_or(f64::INFINITY);
                        if min > max {
                            return Err(format!("minimum {} is above maximum {}", min, max));
                        }
                        FilterEntry::Range { min, max }
                    }
                }
            }
            FilterType::Select => {
                let values: Vec<Value> = self
                    .options
                    .iter()
                    .filter(|(_, on)| *on)
                    .map(|(v, _)| v.clone())
                    .collect();
                if values.is_empty() {
                    return Ok(None);
                }
                FilterEntry::Select { values }
            }
            FilterType::Date => {
                if self.input.trim().is_empty() {
                    return Ok(None);
                }
                FilterEntry::Date {
                    value: self.input.trim().to_string(),
                }
            }
        };
        Ok(Some(entry))
    }

    fn submit(&mut self) -> Option<Action> {
        match self.build_entry() {
            Ok(Some(entry)) => Some(Action::ApplyFilter(self.column.clone(), entry)),
            Ok(None) => Some(Action::ClearFilter(self.column.clone())),
            Err(message) => {
                self.error = Some(message);
                None
            }
        }
    }

    fn focused_input(&mut self) -> &mut String {
        match (self.filter_type, self.range_field) {
            (FilterType::Range, RangeField::Min) => &mut self.min_input,
            (FilterType::Range, RangeField::Max) => &mut self.max_input,
            _ => &mut self.input,
        }
    }

    /// Tab: operator for text and number, field for range
    fn cycle(&mut self) {
        match self.filter_type {
            FilterType::Text => {
                self.text_operator = match self.text_operator {
                    TextOperator::Equals => TextOperator::Contains,
                    TextOperator::Contains => TextOperator::Equals,
                }
            }
            FilterType::Number => {
                self.number_operator = match self.number_operator {
                    NumberOperator::Equals => NumberOperator::GreaterThan,
                    NumberOperator::GreaterThan => NumberOperator::LessThan,
                    NumberOperator::LessThan => NumberOperator::Equals,
                }
            }
            FilterType::Range => {
                self.range_field = match self.range_field {
                    RangeField::Min => RangeField::Max,
                    RangeField::Max => RangeField::Min,
                }
            }
            FilterType::Select | FilterType::Date => {}
        }
    }

    fn select_next(&mut self) {
        let next = self.list_state.selected().map_or(0, |i| i + 1);
        if next < self.options.len() {
            self.list_state.select(Some(next));
        }
    }

    fn select_prev(&mut self) {
        if let Some(i) = self.list_state.selected() {
            self.list_state.select(Some(i.saturating_sub(1)));
        }
    }

    fn toggle_option(&mut self) {
        if let Some(option) = self
            .list_state
            .selected()
            .and_then(|i| self.options.get_mut(i))
        {
            option.1 = !option.1;
        }
    }

    fn operator_text(&self) -> &'static str {
        match self.filter_type {
            FilterType::Text => match self.text_operator {
                TextOperator::Equals => "equals",
                TextOperator::Contains => "contains",
            },
            FilterType::Number => self.number_operator.symbol(),
            _ => "",
        }
    }

    fn input_line(&self, label: &str, value: &str, focused: bool) -> Line<'static> {
        let cursor = if focused { "▏" } else { "" };
        let style = if focused {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        Line::from(vec![
            Span::styled(format!("{:>10} ", label), Style::default().fg(Color::Cyan)),
            Span::styled(format!("{}{}", value, cursor), style),
        ])
    }

    fn draw_editor(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        if self.filter_type == FilterType::Select {
            if self.options.is_empty() {
                let empty = Paragraph::new(vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        "No values to choose from",
                        Style::default().fg(Color::Yellow),
                    )),
                ])
                .block(block);
                frame.render_widget(empty, area);
                return;
            }

            let items: Vec<ListItem> = self
                .options
                .iter()
                .map(|(value, on)| {
                    ListItem::new(Line::from(vec![
                        Span::styled(
                            if *on { "[x] " } else { "[ ] " },
                            Style::default().fg(Color::Green),
                        ),
                        Span::styled(value.to_string(), Style::default().fg(Color::White)),
                    ]))
                })
                .collect();

            let list = List::new(items)
                .block(block)
                .highlight_style(
                    Style::default()
                        .bg(Color::Blue)
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("▶ ");
            frame.render_stateful_widget(list, area, &mut self.list_state);
            return;
        }

        let mut lines = vec![Line::from("")];
        match self.filter_type {
            FilterType::Range => {
                lines.push(self.input_line("min", &self.min_input, self.range_field == RangeField::Min));
                lines.push(self.input_line("max", &self.max_input, self.range_field == RangeField::Max));
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "  Leave a bound empty for no limit",
                    Style::default().fg(Color::DarkGray),
                )));
            }
            FilterType::Date => {
                lines.push(self.input_line("date", &self.input, true));
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "  Date filters are not applied yet; rows are kept",
                    Style::default().fg(Color::Yellow),
                )));
            }
            _ => {
                lines.push(self.input_line(self.operator_text(), &self.input, true));
            }
        }

        if let Some(ref error) = self.error {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("  {}", error),
                Style::default().fg(Color::Red),
            )));
        }

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

/// Empty bound means unbounded
fn parse_bound(text: &str) -> Result<Option<f64>, String> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<f64>()
        .map(Some)
        .map_err(|_| format!("'{}' is not a number", text))
}

fn bound_text(bound: f64) -> String {
    if bound.is_infinite() {
        String::new()
    } else {
        bound.to_string()
    }
}

impl Component for FilterDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc => Some(Action::CloseModal),
            KeyCode::Enter => self.submit(),
            KeyCode::Delete => Some(Action::ClearFilter(self.column.clone())),
            KeyCode::Tab => {
                self.cycle();
                None
            }
            _ if self.filter_type == FilterType::Select => {
                match key.code {
                    KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
                    KeyCode::Down | KeyCode::Char('j') => self.select_next(),
                    KeyCode::Char(' ') => self.toggle_option(),
                    _ => {}
                }
                None
            }
            KeyCode::Backspace => {
                self.error = None;
                self.focused_input().pop();
                None
            }
            KeyCode::Char(c) => {
                self.error = None;
                self.focused_input().push(c);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let popup_width = 56u16.min(area.width.saturating_sub(4));
        let body_height = match self.filter_type {
            FilterType::Select => self.options.len().max(2) as u16 + 2,
            _ => 8,
        };
        let popup_height = (body_height + 6)
            .min(area.height.saturating_sub(4))
            .max(12);

        let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
        let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
        let popup_area = Rect::new(x, y, popup_width, popup_height);
        frame.render_widget(Clear, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(3),    // Editor
                Constraint::Length(3), // Help bar
            ])
            .split(popup_area);

        let header = Paragraph::new(Line::from(vec![
            Span::styled(
                format!("{} filter", self.filter_type.name()),
                Style::default().fg(Color::Cyan),
            ),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Filter: {} ", self.label))
                .title_style(
                    Style::default()
                        .fg(Color::Magenta)
                        .add_modifier(Modifier::BOLD),
                ),
        );
        frame.render_widget(header, chunks[0]);

        self.draw_editor(frame, chunks[1]);

        let mut help = vec![
            Span::styled(" Enter ", Style::default().fg(Color::Yellow)),
            Span::raw("Apply  "),
        ];
        match self.filter_type {
            FilterType::Select => {
                help.push(Span::styled(" Space ", Style::default().fg(Color::Cyan)));
                help.push(Span::raw("Toggle  "));
            }
            FilterType::Range => {
                help.push(Span::styled(" Tab ", Style::default().fg(Color::Cyan)));
                help.push(Span::raw("Min/Max  "));
            }
            FilterType::Text | FilterType::Number => {
                help.push(Span::styled(" Tab ", Style::default().fg(Color::Cyan)));
                help.push(Span::raw("Operator  "));
            }
            FilterType::Date => {}
        }
        help.extend([
            Span::styled(" Del ", Style::default().fg(Color::Red)),
            Span::raw("Clear  "),
            Span::styled(" Esc ", Style::default().fg(Color::Yellow)),
            Span::raw("Cancel"),
        ]);

        let help = Paragraph::new(Line::from(help))
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

    fn press(dialog: &mut FilterDialog, code: KeyCode) -> Option<Action> {
        dialog
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    fn type_text(dialog: &mut FilterDialog, text: &str) {
        for c in text.chars() {
            press(dialog, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_text_filter_with_operator_toggle() {
        let mut dialog = FilterDialog::new();
        dialog.open(&ColumnDescriptor::new("name", "Name").filter(FilterType::Text), None, &[]);
        type_text(&mut dialog, "an");
        press(&mut dialog, KeyCode::Tab);

        assert_eq!(
            press(&mut dialog, KeyCode::Enter),
            Some(Action::ApplyFilter(
                "name".to_string(),
                FilterEntry::Text {
                    value: "an".to_string(),
                    operator: TextOperator::Contains,
                }
            ))
        );
    }

    #[test]
    fn test_empty_input_clears_filter() {
        let mut dialog = FilterDialog::new();
        dialog.open(&ColumnDescriptor::new("age", "Age").filter(FilterType::Number), None, &[]);
        assert_eq!(
            press(&mut dialog, KeyCode::Enter),
            Some(Action::ClearFilter("age".to_string()))
        );
    }

    #[test]
    fn test_number_filter_rejects_garbage() {
        let mut dialog = FilterDialog::new();
        dialog.open(&ColumnDescriptor::new("age", "Age").filter(FilterType::Number), None, &[]);
        type_text(&mut dialog, "abc");
        assert_eq!(press(&mut dialog, KeyCode::Enter), None);
        assert!(dialog.error.is_some());

        press(&mut dialog, KeyCode::Backspace);
        assert!(dialog.error.is_none());
    }

    #[test]
    fn test_range_with_open_bound() {
        let mut dialog = FilterDialog::new();
        dialog.open(&ColumnDescriptor::new("age", "Age").filter(FilterType::Range), None, &[]);
        press(&mut dialog, KeyCode::Tab);
        type_text(&mut dialog, "40");

        assert_eq!(
            dialog.build_entry(),
            Ok(Some(FilterEntry::Range {
                min: f64::NEG_INFINITY,
                max: 40.0
            }))
        );
    }

    #[test]
    fn test_range_prefills_and_rejects_inverted_bounds() {
        let mut dialog = FilterDialog::new();
        let current = FilterEntry::Range { min: 50.0, max: f64::INFINITY };
        dialog.open(
            &ColumnDescriptor::new("age", "Age").filter(FilterType::Range),
            Some(&current),
            &[],
        );
        press(&mut dialog, KeyCode::Tab);
        type_text(&mut dialog, "10");

        assert!(dialog.build_entry().is_err());
    }

    #[test]
    fn test_select_checklist_from_rows() {
        let rows = vec![
            Row::new().with("dept", "Sales"),
            Row::new().with("dept", "Ops"),
            Row::new().with("dept", "Sales"),
        ];
        let mut dialog = FilterDialog::new();
        dialog.open(&ColumnDescriptor::new("dept", "Dept").filter(FilterType::Select), None, &rows);
        assert_eq!(dialog.options.len(), 2);

        // Options are sorted: Ops, Sales
        press(&mut dialog, KeyCode::Char('j'));
        press(&mut dialog, KeyCode::Char(' '));
        assert_eq!(
            dialog.build_entry(),
            Ok(Some(FilterEntry::Select {
                values: vec![Value::from("Sales")]
            }))
        );
    }
}
