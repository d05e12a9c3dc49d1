//! Common UI components shared across panes.
//!
//! This module contains the header bar, status bar, help overlay and the
//! blocking notice modal.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Focus};

/// Render the header bar: title, backend and what is being shown.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(" FLOODWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::raw(app.source_description().to_string()),
        Span::raw(" │ "),
        Span::styled(
            format!("{}", app.view.stations.len()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" stations"),
        Span::raw(" │ "),
        Span::raw(app.display_summary()),
    ];

    if let Some(ref station) = app.active_station {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(station.clone(), Style::default().fg(app.theme.highlight)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the status bar at the bottom.
///
/// A toast notice takes precedence, then any temporary status message,
/// then the context-sensitive controls.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(notice) = app.view.notice.as_ref().filter(|n| !n.is_blocking()) {
        let paragraph = Paragraph::new(format!(" ✖ {} ", notice.message))
            .style(app.theme.error_style());
        frame.render_widget(paragraph, area);
        return;
    }

    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = if app.filter_active {
        "Type to search | Enter:apply Esc:cancel"
    } else {
        match app.focus {
            Focus::Stations => "↑↓:move Enter:select /:search Tab:readings r:reload ?:help q:quit",
            Focus::Readings => "←→:cursor ↑↓:scroll Tab:stations ?:help q:quit",
        }
    };

    let paragraph =
        Paragraph::new(format!(" {}", controls)).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render a blocking notice as a centered modal.
pub fn render_notice(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref notice) = app.view.notice else {
        return;
    };

    let text = vec![
        Line::from(notice.message.as_str()),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to continue",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Error ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(app.theme.error_style());

    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    let width = 56u16.min(area.width.saturating_sub(4));
    let height = 7u16.min(area.height.saturating_sub(2));
    let modal = centered(area, width, height);

    frame.render_widget(Clear, modal);
    frame.render_widget(paragraph, modal);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the dashboard.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(" Stations", bold)]),
        Line::from("  ↑/↓ j/k     Move highlight"),
        Line::from("  PgUp/PgDn   Jump 10 stations"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from("  Enter       Show readings"),
        Line::from("  /           Filter stations"),
        Line::from("  c           Clear filter"),
        Line::from(""),
        Line::from(vec![Span::styled(" Readings", bold)]),
        Line::from("  ←/→ h/l     Move chart cursor"),
        Line::from("  ↑/↓ j/k     Scroll table"),
        Line::from(""),
        Line::from(vec![Span::styled(" General", bold)]),
        Line::from("  Tab         Switch pane"),
        Line::from("  r           Reload stations"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 23u16.min(area.height.saturating_sub(2));
    let help_area = centered(area, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
