//! Home screen - dataset tabs around the data table
//!
//! Draws the tab strip, the query line (search term and active filters),
//! the table with its pagination bar, the status line and the key hints.

use crate::components::data_table::DataTableComponent;
use crate::components::calculate_main_layout;
use crate::model::TableView;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

/// Context needed for rendering the home screen
pub struct HomeRenderContext<'a> {
    pub titles: &'a [String],
    pub active_tab: usize,
    pub table: &'a TableView,
    pub error: Option<&'a str>,
    pub status_message: Option<&'a str>,
}

/// Draw the home screen
pub fn draw_home_screen(
    frame: &mut Frame,
    area: Rect,
    grid: &mut DataTableComponent,
    ctx: &HomeRenderContext,
) {
    let layout = calculate_main_layout(area);

    render_tabs(frame, layout.tabs, ctx);
    render_query_line(frame, layout.query, grid, ctx.table);

    let title = ctx
        .titles
        .get(ctx.active_tab)
        .map(String::as_str)
        .unwrap_or("data");
    grid.draw_table(frame, layout.table, title, ctx.table);
    grid.draw_pagination(frame, layout.pagination, ctx.table);

    render_status_bar(frame, layout.status, ctx);
    render_help_bar(frame, layout.help, grid, ctx.table);
}

fn render_tabs(frame: &mut Frame, area: Rect, ctx: &HomeRenderContext) {
    let titles: Vec<&str> = ctx.titles.iter().map(String::as_str).collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::BOTTOM))
        .select(ctx.active_tab)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

/// `Filters: Age > 30 · Name contains "an"` for the active entries, labelled
/// by column
pub fn filter_summary(table: &TableView) -> Option<String> {
    let parts: Vec<String> = table
        .filters()
        .iter()
        .filter(|(_, entry)| entry.is_active())
        .map(|(key, entry)| {
            let label = table.column(key).map(|c| c.label.as_str()).unwrap_or(key);
            format!("{} {}", label, entry.describe())
        })
        .collect();

    (!parts.is_empty()).then(|| format!("Filters: {}", parts.join(" · ")))
}

fn render_query_line(frame: &mut Frame, area: Rect, grid: &DataTableComponent, table: &TableView) {
    let mut spans = vec![];

    if grid.search_mode {
        spans.push(Span::styled(
            " Search: ",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!("{}▏", table.search()),
            Style::default().fg(Color::White),
        ));
    } else if !table.search().is_empty() {
        spans.push(Span::styled(" Search: ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(
            table.search().to_string(),
            Style::default().fg(Color::Cyan),
        ));
    }

    if let Some(summary) = filter_summary(table) {
        if !spans.is_empty() {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(
            format!(" {}", summary),
            Style::default().fg(Color::Magenta),
        ));
    }

    if let Some(sort) = table.sort() {
        let label = table
            .column(&sort.key)
            .map(|c| c.label.as_str())
            .unwrap_or(&sort.key);
        spans.push(Span::styled(
            format!("  Sorted by {} {}", label, sort.direction),
            Style::default().fg(Color::DarkGray),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, ctx: &HomeRenderContext) {
    let mut spans = vec![];

    if let Some(title) = ctx.titles.get(ctx.active_tab) {
        spans.push(Span::styled(
            format!(" {} ", title),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));
    }

    let selected = ctx.table.selection().len();
    if selected > 0 {
        spans.push(Span::styled(
            format!(" {} selected ", selected),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));
    }

    if let Some(source) = ctx.table.drag().source() {
        let label = ctx
            .table
            .column(source)
            .map(|c| c.label.as_str())
            .unwrap_or(source);
        spans.push(Span::styled(
            format!(" moving {} ", label),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));
    }

    if let Some(error) = ctx.error {
        spans.clear();
        spans.push(Span::styled(
            format!(" Error: {} ", error),
            Style::default().fg(Color::Red),
        ));
    }

    if let Some(status) = ctx.status_message {
        spans.push(Span::styled(
            format!(" {} ", status),
            Style::default().fg(Color::Yellow),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn hint(key: &str, color: Color) -> Span<'static> {
    Span::styled(
        format!(" {} ", key),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}

fn render_help_bar(frame: &mut Frame, area: Rect, grid: &DataTableComponent, table: &TableView) {
    let help_spans = if grid.search_mode {
        vec![
            hint("Esc", Color::Yellow),
            Span::raw("Done  "),
            hint("Backspace", Color::Yellow),
            Span::raw("Delete  "),
            Span::styled(
                format!("{} of {} rows match", table.filtered_count(), table.total_count()),
                Style::default().fg(Color::Cyan),
            ),
        ]
    } else if table.drag().is_active() {
        vec![
            hint("h/l", Color::Magenta),
            Span::raw("Choose target "),
            hint("m", Color::Green),
            Span::raw("Drop "),
            hint("Esc", Color::Yellow),
            Span::raw("Cancel"),
        ]
    } else if !table.selection().is_empty() {
        vec![
            hint("Space", Color::Green),
            Span::raw("Toggle "),
            hint("a", Color::Green),
            Span::raw("Page "),
            hint("e", Color::Cyan),
            Span::raw("Export Selected "),
            hint("Esc", Color::Yellow),
            Span::raw("Clear"),
        ]
    } else {
        let mut spans = vec![
            hint("q", Color::Yellow),
            Span::raw("Quit "),
            hint("s", Color::Cyan),
            Span::raw("Sort "),
            hint("f", Color::Cyan),
            Span::raw("Filter "),
        ];
        if table.search_enabled() {
            spans.push(hint("/", Color::Cyan));
            spans.push(Span::raw("Search "));
        }
        spans.extend([
            hint("m", Color::Magenta),
            Span::raw("Move "),
            hint("Space", Color::Green),
            Span::raw("Select "),
            hint("e", Color::Green),
            Span::raw("Export "),
            hint("?", Color::White),
            Span::raw("Help"),
        ]);
        spans
    };

    frame.render_widget(Paragraph::new(Line::from(help_spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ColumnDescriptor, FilterEntry, FilterType, NumberOperator, Row};
    use ratatui::{backend::TestBackend, Terminal};

    fn table() -> TableView {
        let columns = vec![
            ColumnDescriptor::new("name", "Name").filter(FilterType::Text),
            ColumnDescriptor::new("age", "Age").filter(FilterType::Number),
        ];
        let rows = vec![
            Row::new().with("name", "Ann").with("age", 31.0),
            Row::new().with("name", "Bob").with("age", 25.0),
        ];
        TableView::new(columns, rows, 10)
    }

    #[test]
    fn test_filter_summary_uses_labels() {
        let mut table = table();
        assert_eq!(filter_summary(&table), None);

        table.set_filter(
            "age",
            FilterEntry::Number {
                value: "30".to_string(),
                operator: NumberOperator::GreaterThan,
            },
        );
        assert_eq!(filter_summary(&table).as_deref(), Some("Filters: Age > 30"));
    }

    #[test]
    fn test_home_screen_renders_tabs_and_table() {
        let table = table();
        let titles = vec!["people".to_string(), "orders".to_string()];
        let ctx = HomeRenderContext {
            titles: &titles,
            active_tab: 0,
            table: &table,
            error: None,
            status_message: Some("Exported 2 rows"),
        };
        let mut grid = DataTableComponent::new();

        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal
            .draw(|frame| draw_home_screen(frame, frame.area(), &mut grid, &ctx))
            .unwrap();
        let screen: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect();

        assert!(screen.contains("orders"));
        assert!(screen.contains("Ann"));
        assert!(screen.contains("Exported 2 rows"));
        assert!(screen.contains("Page 1 of 1"));
    }
}
