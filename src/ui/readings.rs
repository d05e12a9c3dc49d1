//! Readings pane: line chart, cursor tooltip and readings table.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table, TableState,
    },
    Frame,
};

use crate::app::{App, Focus};
use crate::render::{ChartModel, TableModel};

/// Render the chart above the table.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let title = app.view.chart_title.as_deref().unwrap_or("Readings");
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(app.theme.pane_border(app.focus == Focus::Readings));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.view.readings_loading {
        let line = Line::from(vec![
            Span::styled(
                format!(" {} ", super::spinner_frame()),
                Style::default().fg(app.theme.loading),
            ),
            Span::raw("Loading readings..."),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
        return;
    }

    let Some(model) = app.view.chart_model() else {
        let hint = if app.active_station.is_some() {
            " No data to display"
        } else {
            " Select a station and press Enter"
        };
        frame.render_widget(
            Paragraph::new(hint).style(Style::default().add_modifier(Modifier::DIM)),
            inner,
        );
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Percentage(55), // Chart
        Constraint::Length(1),      // Tooltip
        Constraint::Min(3),         // Table
    ])
    .split(inner);

    render_chart(frame, app, model, chunks[0]);
    render_tooltip(frame, app, model, chunks[1]);

    if app.view.table_visible {
        if let Some(ref table) = app.view.table {
            render_table(frame, app, table, chunks[2]);
        }
    }
}

fn render_chart(frame: &mut Frame, app: &App, model: &ChartModel, area: Rect) {
    let data = model.data();
    let cursor: Vec<(f64, f64)> = data.get(app.chart_cursor).copied().into_iter().collect();

    let datasets = vec![
        Dataset::default()
            .name(model.dataset_label.clone())
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(app.theme.series))
            .data(&data),
        Dataset::default()
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(app.theme.cursor).add_modifier(Modifier::BOLD))
            .data(&cursor),
    ];

    let x_axis = Axis::default()
        .title(ChartModel::X_TITLE)
        .style(Style::default().fg(app.theme.border))
        .bounds(model.x_axis.bounds)
        .labels(model.x_axis.labels.clone());

    let y_axis = Axis::default()
        .title(model.dataset_label.clone())
        .style(Style::default().fg(app.theme.border))
        .bounds(model.y_bounds)
        .labels(model.y_labels());

    let chart = Chart::new(datasets).x_axis(x_axis).y_axis(y_axis);
    frame.render_widget(chart, area);
}

fn render_tooltip(frame: &mut Frame, app: &App, model: &ChartModel, area: Rect) {
    let Some(tooltip) = model.tooltip(app.chart_cursor) else {
        return;
    };

    let line = Line::from(vec![
        Span::styled(format!(" {} ", tooltip.title), Style::default().fg(app.theme.cursor)),
        Span::raw("│ "),
        Span::styled(tooltip.label, Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("  [{}/{}]", app.chart_cursor + 1, model.points.len()),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_table(frame: &mut Frame, app: &App, table: &TableModel, area: Rect) {
    let header = Row::new(table.header.iter().map(|h| Cell::from(h.clone())))
        .height(1)
        .style(app.theme.header);

    let rows: Vec<Row> =
        table.rows.iter().map(|r| Row::new(r.iter().map(|c| Cell::from(c.clone())))).collect();

    // Date column gets the larger share
    let mut widths = vec![Constraint::Fill(2)];
    widths.extend(std::iter::repeat(Constraint::Fill(1)).take(table.header.len().saturating_sub(1)));

    let widget = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::TOP).border_style(Style::default().fg(app.theme.border)))
        .row_highlight_style(app.theme.selected);

    let mut state = TableState::default();
    if app.focus == Focus::Readings && !table.is_empty() {
        state.select(Some(app.table_offset.min(table.len() - 1)));
    } else {
        *state.offset_mut() = app.table_offset;
    }

    frame.render_stateful_widget(widget, area, &mut state);
}
