//! Station selector pane.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, Focus};

/// Render the station list, filtered by the current search text.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let stations = app.filtered_stations();

    let filter_info = if app.filter_active {
        format!(" /{}_", app.filter_text)
    } else if !app.filter_text.is_empty() {
        format!(" /{}/ [c:clear]", app.filter_text)
    } else {
        String::new()
    };

    let title = format!(
        " Stations ({}/{}){} ",
        stations.len(),
        app.view.stations.len(),
        filter_info
    );

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(app.theme.pane_border(app.focus == Focus::Stations));

    if app.view.stations_loading {
        let line = Line::from(vec![
            Span::styled(
                format!(" {} ", super::spinner_frame()),
                Style::default().fg(app.theme.loading),
            ),
            Span::raw("Loading stations..."),
        ]);
        frame.render_widget(Paragraph::new(line).block(block), area);
        return;
    }

    if stations.is_empty() {
        let message = if app.view.stations.is_empty() {
            " No stations loaded (r:reload)"
        } else {
            " No stations match the filter"
        };
        let paragraph =
            Paragraph::new(message).style(Style::default().add_modifier(Modifier::DIM)).block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let rows: Vec<Row> = stations
        .iter()
        .map(|option| {
            let active = app.active_station.as_deref() == Some(option.value.as_str());
            let marker = if active { "●" } else { " " };
            Row::new(vec![
                Cell::from(marker).style(Style::default().fg(app.theme.highlight)),
                Cell::from(option.text.clone()),
            ])
        })
        .collect();

    let widths = [Constraint::Length(1), Constraint::Fill(1)];

    let table = Table::new(rows, widths)
        .block(block)
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(app.selected_station_index.min(stations.len() - 1)));

    frame.render_stateful_widget(table, area, &mut state);
}
