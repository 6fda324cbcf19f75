// crates/chat-client/src/ui.rs

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::components::{
    input_box::draw_input_box, message_list::draw_message_list, status_bar::draw_status_bar,
};

pub fn draw(f: &mut Frame, app: &App) {
    // Main layout
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(5),    // Message log
            Constraint::Length(3), // Input line
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    draw_header(f, chunks[0], app);
    draw_message_list(f, chunks[1], app);
    draw_input_box(f, chunks[2], app);
    draw_status_bar(f, chunks[3], app);
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    // Left: who we are and where we're pointed.
    let left_text = vec![
        Span::styled(
            &app.username,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" @ "),
        Span::raw(&app.server_addr),
    ];
    let left = Paragraph::new(Line::from(left_text)).block(Block::default().borders(Borders::ALL));
    f.render_widget(left, header_chunks[0]);

    // Right: probe verdict and session state.
    let (service, service_color) = if app.available {
        ("service up", Color::Green)
    } else {
        ("service down", Color::Red)
    };
    let (session, session_color) = if app.connected {
        ("connected", Color::Green)
    } else {
        ("not connected", Color::Gray)
    };
    let right_text = vec![
        Span::styled(service, Style::default().fg(service_color)),
        Span::raw(" | "),
        Span::styled(session, Style::default().fg(session_color)),
    ];
    let right = Paragraph::new(Line::from(right_text)).block(Block::default().borders(Borders::ALL));
    f.render_widget(right, header_chunks[1]);
}
