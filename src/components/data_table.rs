//! Data table component
//!
//! Renders the current page of a `TableView`: a header row with sort,
//! filter and drag markers, body rows with selection markers and a cursor,
//! and the pagination bar. The geometry of the last frame is kept so key
//! and mouse events can be resolved to column keys and row indices.

use crate::action::Action;
use crate::component::Component;
use crate::model::{Align, ColumnDescriptor, TableView};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const MIN_COLUMN_WIDTH: usize = 3;
const MAX_COLUMN_WIDTH: usize = 40;
/// Upper bound for widths fixed by a column descriptor
const MAX_FIXED_WIDTH: usize = 200;
const SEPARATOR: &str = " │ ";
const SEPARATOR_WIDTH: u16 = 3;
/// Selection marker column in front of every row
const GUTTER_WIDTH: u16 = 2;
/// Header line plus the rule under it
const HEADER_HEIGHT: u16 = 2;

// ═══════════════════════════════════════════════════════════════════════════════
// Text Helpers
// ═══════════════════════════════════════════════════════════════════════════════

/// Cut `text` to at most `width` display columns, marking the cut with `…`
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Truncate and pad `text` to exactly `width` display columns
pub fn align_cell(text: &str, width: usize, align: Align) -> String {
    let text = truncate(text, width);
    let pad = width.saturating_sub(text.width());
    match align {
        Align::Left => format!("{}{}", text, " ".repeat(pad)),
        Align::Right => format!("{}{}", " ".repeat(pad), text),
        Align::Center => {
            let left = pad / 2;
            format!("{}{}{}", " ".repeat(left), text, " ".repeat(pad - left))
        }
    }
}

/// Display width per column: the descriptor's width when set, otherwise the
/// widest of label (plus room for the sort arrow) and visible cells
pub fn column_widths(columns: &[ColumnDescriptor], cells: &[Vec<String>]) -> Vec<usize> {
    columns
        .iter()
        .enumerate()
        .map(|(i, column)| match column.width {
            Some(width) => (width as usize).clamp(MIN_COLUMN_WIDTH, MAX_FIXED_WIDTH),
            None => cells
                .iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.width())
                .chain(std::iter::once(column.label.width() + 2))
                .max()
                .unwrap_or(0)
                .clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH),
        })
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Data Table Component
// ═══════════════════════════════════════════════════════════════════════════════

/// State of the table as last drawn
#[derive(Debug, Clone, Default)]
struct Snapshot {
    keys: Vec<String>,
    page_start: usize,
    page_len: usize,
    dragging: bool,
    has_selection: bool,
}

/// Screen span of something clickable on a single line
#[derive(Debug, Clone, PartialEq)]
struct HitBox<T> {
    target: T,
    x: u16,
    width: u16,
}

impl<T> HitBox<T> {
    fn contains(&self, column: u16) -> bool {
        column >= self.x && column < self.x.saturating_add(self.width)
    }
}

#[derive(Default)]
pub struct DataTableComponent {
    /// Cursor row, relative to the current page
    pub cursor_row: usize,
    /// Cursor column, index into the display order
    pub cursor_col: usize,
    /// Whether key presses edit the search term
    pub search_mode: bool,
    /// First page row shown when the page is taller than the screen
    row_offset: usize,
    /// First column shown when the columns are wider than the screen
    col_offset: usize,
    snapshot: Snapshot,
    header_y: Option<u16>,
    headers: Vec<HitBox<String>>,
    body: Option<Rect>,
    gutter_x: u16,
    pagination_y: Option<u16>,
    page_buttons: Vec<HitBox<usize>>,
    /// Header under the mouse when the left button went down
    pressed_header: Option<String>,
    /// Whether the pressed header has been dragged
    dragged: bool,
}

impl DataTableComponent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh what input resolves against and keep the cursor in bounds
    pub fn sync(&mut self, table: &TableView) {
        let range = table.page_range();
        self.snapshot = Snapshot {
            keys: table.column_keys(),
            page_start: range.start,
            page_len: range.len(),
            dragging: table.drag().is_active(),
            has_selection: !table.selection().is_empty(),
        };
        self.cursor_row = self.cursor_row.min(self.snapshot.page_len.saturating_sub(1));
        self.cursor_col = self.cursor_col.min(self.snapshot.keys.len().saturating_sub(1));
    }

    pub fn reset_cursor(&mut self) {
        self.cursor_row = 0;
        self.row_offset = 0;
    }

    /// Key of the column under the cursor
    pub fn focused_key(&self) -> Option<&str> {
        self.snapshot.keys.get(self.cursor_col).map(String::as_str)
    }

    /// Absolute sorted-view index of the row under the cursor
    pub fn focused_row(&self) -> Option<usize> {
        (self.cursor_row < self.snapshot.page_len).then_some(self.snapshot.page_start + self.cursor_row)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Cursor Movement
    // ─────────────────────────────────────────────────────────────────────────

    /// Move down one row, continuing onto the next page at the bottom
    pub fn next_row(&mut self, table: &mut TableView) {
        let page_len = table.page_range().len();
        if self.cursor_row + 1 < page_len {
            self.cursor_row += 1;
        } else if table.current_page() < table.total_pages() {
            table.next_page();
            self.reset_cursor();
        }
    }

    /// Move up one row, continuing onto the previous page at the top
    pub fn previous_row(&mut self, table: &mut TableView) {
        if self.cursor_row > 0 {
            self.cursor_row -= 1;
        } else if table.current_page() > 1 {
            table.previous_page();
            self.cursor_row = table.page_range().len().saturating_sub(1);
        }
    }

    pub fn next_column(&mut self, column_count: usize) {
        if self.cursor_col + 1 < column_count {
            self.cursor_col += 1;
        }
    }

    pub fn previous_column(&mut self) {
        self.cursor_col = self.cursor_col.saturating_sub(1);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Hit Testing
    // ─────────────────────────────────────────────────────────────────────────

    fn header_at(&self, column: u16, row: u16) -> Option<String> {
        if self.header_y != Some(row) {
            return None;
        }
        self.headers
            .iter()
            .find(|h| h.contains(column))
            .map(|h| h.target.clone())
    }

    /// Page-relative row index under the pointer
    fn row_at(&self, row: u16) -> Option<usize> {
        let body = self.body?;
        if row < body.y || row >= body.bottom() {
            return None;
        }
        let local = self.row_offset + (row - body.y) as usize;
        (local < self.snapshot.page_len).then_some(local)
    }

    fn page_button_at(&self, column: u16, row: u16) -> Option<usize> {
        if self.pagination_y != Some(row) {
            return None;
        }
        self.page_buttons
            .iter()
            .find(|b| b.contains(column))
            .map(|b| b.target)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────────

    /// Keep the cursor column on screen; returns how many columns fit
    fn scroll_columns(&mut self, widths: &[usize], available: usize) -> usize {
        if self.cursor_col < self.col_offset {
            self.col_offset = self.cursor_col;
        }
        let span = |from: usize, to: usize| -> usize {
            widths[from..=to].iter().sum::<usize>() + (to - from) * SEPARATOR_WIDTH as usize
        };
        while self.col_offset < self.cursor_col && span(self.col_offset, self.cursor_col) > available {
            self.col_offset += 1;
        }

        let mut count = 0;
        let mut used = 0;
        for width in &widths[self.col_offset.min(widths.len())..] {
            let needed = if count == 0 { *width } else { width + SEPARATOR_WIDTH as usize };
            if count > 0 && used + needed > available {
                break;
            }
            used += needed;
            count += 1;
        }
        count
    }

    fn scroll_rows(&mut self, visible: usize) {
        if self.cursor_row < self.row_offset {
            self.row_offset = self.cursor_row;
        } else if visible > 0 && self.cursor_row >= self.row_offset + visible {
            self.row_offset = self.cursor_row + 1 - visible;
        }
        if self.row_offset >= self.snapshot.page_len {
            self.row_offset = 0;
        }
    }

    /// Draw headers and the current page inside a bordered block
    pub fn draw_table(&mut self, frame: &mut Frame, area: Rect, title: &str, table: &TableView) {
        self.sync(table);

        let mut title = format!(" {} ({} of {}) ", title, table.filtered_count(), table.total_count());
        if !table.selection().is_empty() {
            title = format!("{}[{}✓] ", title, table.selection().len());
        }
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let columns = table.columns();
        let page = table.page_rows();
        let cells: Vec<Vec<String>> = page
            .iter()
            .map(|(_, row)| {
                columns
                    .iter()
                    .map(|c| c.render_cell(row).replace('\n', " "))
                    .collect()
            })
            .collect();
        let widths = column_widths(columns, &cells);

        let available = inner.width.saturating_sub(GUTTER_WIDTH) as usize;
        let visible_cols = if columns.is_empty() {
            0
        } else {
            self.scroll_columns(&widths, available)
        };
        let shown = self.col_offset..self.col_offset + visible_cols;

        // Header geometry
        self.gutter_x = inner.x;
        self.header_y = (inner.height > 0).then_some(inner.y);
        self.headers.clear();
        let mut x = inner.x.saturating_add(GUTTER_WIDTH);
        for i in shown.clone() {
            let width = u16::try_from(widths[i]).unwrap_or(u16::MAX);
            self.headers.push(HitBox {
                target: columns[i].key.clone(),
                x,
                width,
            });
            x = x.saturating_add(width).saturating_add(SEPARATOR_WIDTH);
        }

        let mut lines = vec![self.header_line(table, &widths, shown.clone())];
        let rule: String = shown
            .clone()
            .map(|i| "─".repeat(widths[i]))
            .collect::<Vec<_>>()
            .join("─┼─");
        lines.push(Line::from(Span::styled(
            format!("{}{}", " ".repeat(GUTTER_WIDTH as usize), rule),
            Style::default().fg(Color::DarkGray),
        )));

        let body_height = inner.height.saturating_sub(HEADER_HEIGHT);
        self.body = (body_height > 0).then(|| {
            Rect::new(inner.x, inner.y + HEADER_HEIGHT, inner.width, body_height)
        });

        if table.filtered_count() == 0 {
            self.body = None;
            lines.extend(empty_state_lines(table));
        } else {
            self.scroll_rows(body_height as usize);
            let end = (self.row_offset + body_height as usize).min(page.len());
            for local in self.row_offset..end {
                let (abs, _) = page[local];
                let selected = table.selection().contains(abs);
                let focused = local == self.cursor_row;
                lines.push(body_line(
                    columns,
                    &cells[local],
                    &widths,
                    shown.clone(),
                    selected,
                    focused,
                ));
            }
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn header_line(
        &self,
        table: &TableView,
        widths: &[usize],
        shown: std::ops::Range<usize>,
    ) -> Line<'static> {
        let columns = table.columns();
        let drag = table.drag();
        let mut spans = vec![Span::raw(" ".repeat(GUTTER_WIDTH as usize))];

        for (n, i) in shown.enumerate() {
            if n > 0 {
                spans.push(Span::styled(SEPARATOR, Style::default().fg(Color::DarkGray)));
            }
            let column = &columns[i];
            let mut label = column.label.clone();
            if table.filter(&column.key).is_some_and(|f| f.is_active()) {
                label.push('*');
            }
            if let Some(sort) = table.sort().filter(|s| s.key == column.key) {
                label = format!("{} {}", label, sort.direction.arrow());
            }

            let mut style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
            if i == self.cursor_col {
                style = style.bg(Color::DarkGray);
            }
            if drag.source() == Some(column.key.as_str()) {
                style = Style::default()
                    .fg(Color::Black)
                    .bg(Color::Magenta)
                    .add_modifier(Modifier::BOLD);
            } else if drag.over() == Some(column.key.as_str()) {
                style = style.fg(Color::Yellow).add_modifier(Modifier::UNDERLINED);
            }

            spans.push(Span::styled(align_cell(&label, widths[i], column.align), style));
        }
        Line::from(spans)
    }

    /// Draw the page buttons and row counts. Nothing is drawn when there
    /// are no pages.
    pub fn draw_pagination(&mut self, frame: &mut Frame, area: Rect, table: &TableView) {
        self.page_buttons.clear();
        self.pagination_y = None;

        let total_pages = table.total_pages();
        if total_pages == 0 {
            return;
        }
        self.pagination_y = Some(area.y);

        let current = table.current_page();
        let mut spans: Vec<Span> = Vec::new();
        let mut x = area.x;
        let mut push_button = |spans: &mut Vec<Span<'static>>, text: String, page: usize, style: Style| {
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
            self.page_buttons.push(HitBox { target: page, x, width });
            x = x.saturating_add(width).saturating_add(1);
            spans.push(Span::styled(text, style));
            spans.push(Span::raw(" "));
        };

        let arrow = Style::default().fg(Color::Cyan);
        push_button(&mut spans, "«".to_string(), 1, arrow);
        push_button(&mut spans, "‹".to_string(), current.saturating_sub(1).max(1), arrow);
        for page in table.page_numbers() {
            let style = if page == current {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            push_button(&mut spans, format!(" {} ", page), page, style);
        }
        push_button(&mut spans, "›".to_string(), (current + 1).min(total_pages), arrow);
        push_button(&mut spans, "»".to_string(), total_pages, arrow);

        let range = table.page_range();
        let mut summary = format!(
            " Page {} of {} · rows {}-{} of {}",
            current,
            total_pages,
            range.start + 1,
            range.end,
            table.filtered_count()
        );
        if table.filtered_count() != table.total_count() {
            summary.push_str(&format!(" (filtered from {})", table.total_count()));
        }
        spans.push(Span::styled(summary, Style::default().fg(Color::DarkGray)));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

fn body_line(
    columns: &[ColumnDescriptor],
    cells: &[String],
    widths: &[usize],
    shown: std::ops::Range<usize>,
    selected: bool,
    focused: bool,
) -> Line<'static> {
    let mut base = if selected {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::White)
    };
    if focused {
        base = base.bg(Color::Blue).add_modifier(Modifier::BOLD);
    }

    let marker = if selected { "● " } else { "  " };
    let mut spans = vec![Span::styled(marker, base.fg(Color::Green))];
    for (n, i) in shown.enumerate() {
        if n > 0 {
            spans.push(Span::styled(SEPARATOR, base.fg(Color::DarkGray)));
        }
        spans.push(Span::styled(
            align_cell(&cells[i], widths[i], columns[i].align),
            base,
        ));
    }
    Line::from(spans)
}

fn empty_state_lines(table: &TableView) -> Vec<Line<'static>> {
    if table.total_count() == 0 {
        return vec![
            Line::from(""),
            Line::from(Span::styled("  No data", Style::default().fg(Color::Yellow))),
        ];
    }
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  No rows match the current search and filters",
            Style::default().fg(Color::Yellow),
        )),
    ];
    if table.has_active_filters() {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::raw("  Press "),
            Span::styled(
                " x ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::raw("to clear filters and search"),
        ]));
    }
    lines
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for DataTableComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.search_mode {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Enter => Some(Action::ExitSearchMode),
                KeyCode::Backspace => Some(Action::SearchBackspace),
                KeyCode::Char(c) => Some(Action::SearchInput(c)),
                _ => None,
            });
        }

        let focused = self.focused_key().map(str::to_string);
        let dragging = self.snapshot.dragging;

        let action = match key.code {
            // Cursor
            KeyCode::Char('j') | KeyCode::Down => Some(Action::NextRow),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::PrevRow),
            KeyCode::Char('l') | KeyCode::Right => Some(Action::NextColumn),
            KeyCode::Char('h') | KeyCode::Left => Some(Action::PrevColumn),

            // Pages
            KeyCode::Char('n') | KeyCode::Char(']') | KeyCode::PageDown => Some(Action::NextPage),
            KeyCode::Char('p') | KeyCode::Char('[') | KeyCode::PageUp => Some(Action::PrevPage),
            KeyCode::Char('g') | KeyCode::Home => Some(Action::FirstPage),
            KeyCode::Char('G') | KeyCode::End => Some(Action::LastPage),
            KeyCode::Char(':') => Some(Action::OpenGoToPage),

            // Datasets
            KeyCode::Tab => Some(Action::NextTab),
            KeyCode::BackTab => Some(Action::PrevTab),
            KeyCode::Char('r') => Some(Action::ReloadDataset),

            // Sort & filter
            KeyCode::Char('s') => focused.map(Action::SortColumn),
            KeyCode::Char('S') => Some(Action::ClearSort),
            KeyCode::Char('f') => focused.map(Action::OpenFilter),
            KeyCode::Char('x') => Some(Action::ClearAllFilters),
            KeyCode::Char('/') => Some(Action::EnterSearchMode),

            // Selection
            KeyCode::Char(' ') => self.focused_row().map(Action::ToggleRowSelection),
            KeyCode::Char('a') => Some(Action::TogglePageSelection),

            // Column move
            KeyCode::Char('m') if dragging => Some(Action::DropColumn(focused)),
            KeyCode::Char('m') => focused.map(Action::StartDrag),
            KeyCode::Enter if dragging => Some(Action::DropColumn(focused)),
            KeyCode::Esc if dragging => Some(Action::CancelDrag),

            KeyCode::Enter => self.focused_row().map(Action::ClickRow),
            KeyCode::Esc if self.snapshot.has_selection => Some(Action::ClearSelection),

            // Dialogs
            KeyCode::Char('e') => Some(Action::OpenExport),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::ForceQuit)
            }
            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),

            _ => None,
        };
        Ok(action)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        let header = self.header_at(mouse.column, mouse.row);

        let action = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.dragged = false;
                self.pressed_header = header.clone();
                if header.is_some() {
                    None
                } else if let Some(local) = self.row_at(mouse.row) {
                    self.cursor_row = local;
                    let abs = self.snapshot.page_start + local;
                    if mouse.column < self.gutter_x.saturating_add(GUTTER_WIDTH) {
                        Some(Action::ToggleRowSelection(abs))
                    } else {
                        Some(Action::ClickRow(abs))
                    }
                } else {
                    self.page_button_at(mouse.column, mouse.row)
                        .map(Action::GoToPage)
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => match self.pressed_header.clone() {
                Some(source) if !self.dragged => {
                    self.dragged = true;
                    Some(Action::StartDrag(source))
                }
                Some(_) => header.map(Action::DragOver),
                None => None,
            },
            MouseEventKind::Up(MouseButton::Left) => {
                let pressed = self.pressed_header.take();
                if std::mem::take(&mut self.dragged) {
                    Some(Action::DropColumn(header))
                } else {
                    match (pressed, header) {
                        (Some(pressed), Some(released)) if pressed == released => {
                            Some(Action::SortColumn(released))
                        }
                        _ => None,
                    }
                }
            }
            MouseEventKind::ScrollDown => Some(Action::NextRow),
            MouseEventKind::ScrollUp => Some(Action::PrevRow),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Drawing needs the table; see draw_table and draw_pagination
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FilterType, Row};
    use ratatui::{backend::TestBackend, Terminal};

    fn table(count: usize) -> TableView {
        let columns = vec![
            ColumnDescriptor::new("id", "ID").sortable().align(Align::Right),
            ColumnDescriptor::new("name", "Name").sortable().filter(FilterType::Text),
        ];
        let rows = (0..count)
            .map(|i| Row::new().with("id", i as f64).with("name", format!("person {}", i)))
            .collect();
        TableView::new(columns, rows, 10)
    }

    fn render(component: &mut DataTableComponent, table: &TableView) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 16)).unwrap();
        terminal
            .draw(|frame| {
                component.draw_table(frame, Rect::new(0, 0, 60, 14), "people", table);
                component.draw_pagination(frame, Rect::new(0, 15, 60, 1), table);
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_truncate_respects_display_width() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 6), "hello…");
        assert_eq!(truncate("日本語テキスト", 5), "日本…");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn test_align_cell_pads_to_width() {
        assert_eq!(align_cell("ab", 5, Align::Left), "ab   ");
        assert_eq!(align_cell("ab", 5, Align::Right), "   ab");
        assert_eq!(align_cell("ab", 5, Align::Center), " ab  ");
    }

    #[test]
    fn test_column_widths_prefer_explicit_width() {
        let columns = vec![
            ColumnDescriptor::new("a", "A").width(12),
            ColumnDescriptor::new("b", "Bee"),
        ];
        let cells = vec![vec!["x".to_string(), "longer value".to_string()]];
        assert_eq!(column_widths(&columns, &cells), vec![12, 12]);
    }

    #[test]
    fn test_oversized_fixed_width_is_clamped() {
        let columns = vec![
            ColumnDescriptor::new("id", "ID").width(u16::MAX),
            ColumnDescriptor::new("name", "Name").width(u16::MAX - 1),
        ];
        let rows = vec![Row::new().with("id", 1.0).with("name", "Ann")];
        let table = TableView::new(columns.clone(), rows, 10);
        assert_eq!(column_widths(&columns, &[]), vec![MAX_FIXED_WIDTH, MAX_FIXED_WIDTH]);

        let mut component = DataTableComponent::new();
        let screen = render(&mut component, &table);
        assert!(screen.contains("ID"));
        assert_eq!(component.header_at(58, 1), Some("id".to_string()));

        let edge = HitBox {
            target: 0,
            x: u16::MAX - 1,
            width: 10,
        };
        assert!(edge.contains(u16::MAX));
        assert!(!edge.contains(3));
    }

    #[test]
    fn test_renders_headers_rows_and_pagination() {
        let table = table(25);
        let mut component = DataTableComponent::new();
        let screen = render(&mut component, &table);

        assert!(screen.contains("people (25 of 25)"));
        assert!(screen.contains("Name"));
        assert!(screen.contains("person 9"));
        assert!(!screen.contains("person 10"));
        assert!(screen.contains("Page 1 of 3"));
    }

    #[test]
    fn test_empty_view_shows_clear_hint_and_no_pages() {
        let mut table = table(5);
        table.set_search("nobody");
        let mut component = DataTableComponent::new();
        let screen = render(&mut component, &table);

        assert!(screen.contains("No rows match"));
        assert!(screen.contains("to clear filters and search"));
        assert!(!screen.contains("Page "));
    }

    #[test]
    fn test_keys_resolve_against_cursor() {
        let table = table(5);
        let mut component = DataTableComponent::new();
        component.sync(&table);
        component.cursor_col = 1;
        component.cursor_row = 2;

        let sort = component
            .handle_key_event(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE))
            .unwrap();
        assert_eq!(sort, Some(Action::SortColumn("name".to_string())));

        let toggle = component
            .handle_key_event(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE))
            .unwrap();
        assert_eq!(toggle, Some(Action::ToggleRowSelection(2)));
    }

    #[test]
    fn test_mouse_drag_between_headers() {
        let table = table(3);
        let mut component = DataTableComponent::new();
        render(&mut component, &table);

        let id = component.headers[0].x;
        let name = component.headers[1].x;
        let y = component.header_y.unwrap();

        assert_eq!(
            component
                .handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), id, y))
                .unwrap(),
            None
        );
        assert_eq!(
            component
                .handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), name, y))
                .unwrap(),
            Some(Action::StartDrag("id".to_string()))
        );
        assert_eq!(
            component
                .handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), name, y))
                .unwrap(),
            Some(Action::DragOver("name".to_string()))
        );
        assert_eq!(
            component
                .handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), name, y))
                .unwrap(),
            Some(Action::DropColumn(Some("name".to_string())))
        );
    }

    #[test]
    fn test_header_click_sorts_and_row_click_reports_index() {
        let mut table = table(25);
        table.go_to_page(2);
        let mut component = DataTableComponent::new();
        render(&mut component, &table);

        let x = component.headers[1].x;
        let y = component.header_y.unwrap();
        component
            .handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), x, y))
            .unwrap();
        assert_eq!(
            component
                .handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), x, y))
                .unwrap(),
            Some(Action::SortColumn("name".to_string()))
        );

        let body = component.body.unwrap();
        let click = component
            .handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), x, body.y + 1))
            .unwrap();
        assert_eq!(click, Some(Action::ClickRow(11)));
    }

    #[test]
    fn test_next_row_continues_onto_next_page() {
        let mut table = table(15);
        let mut component = DataTableComponent::new();
        component.cursor_row = 9;
        component.next_row(&mut table);
        assert_eq!(table.current_page(), 2);
        assert_eq!(component.cursor_row, 0);

        component.previous_row(&mut table);
        assert_eq!(table.current_page(), 1);
        assert_eq!(component.cursor_row, 9);
    }
}
