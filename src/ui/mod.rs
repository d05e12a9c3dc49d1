//! Terminal rendering.
//!
//! - [`common`]: header, status bar, help overlay, blocking notice modal
//! - [`stations`]: the station selector pane
//! - [`readings`]: chart and readings table
//! - [`theme`]: colors, with light/dark detection

pub mod common;
pub mod readings;
pub mod stations;
pub mod theme;

pub use theme::Theme;

use ratatui::{
    layout::{Constraint, Layout, Rect},
    Frame,
};

use crate::app::App;

/// Spinner frames for loading indicators.
const SPINNER: [char; 4] = ['◐', '◓', '◑', '◒'];

/// Spinner character for the current instant.
pub(crate) fn spinner_frame() -> char {
    let millis = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    SPINNER[(millis / 150 % SPINNER.len() as u128) as usize]
}

/// Draw the whole dashboard into `area`.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::vertical([
        Constraint::Length(1), // Header bar
        Constraint::Min(8),    // Content
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    common::render_header(frame, app, rows[0]);

    let columns = Layout::horizontal([Constraint::Percentage(32), Constraint::Percentage(68)])
        .split(rows[1]);
    stations::render(frame, app, columns[0]);
    readings::render(frame, app, columns[1]);

    common::render_status_bar(frame, app, rows[2]);

    if app.has_blocking_notice() {
        common::render_notice(frame, app, area);
    }

    if app.show_help {
        common::render_help(frame, app, area);
    }
}
