// crates/chat-client/src/components/input_box.rs

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, InputMode};

pub fn draw_input_box(f: &mut Frame, area: Rect, app: &App) {
    let text = match app.input_mode {
        InputMode::Editing => Line::from(vec![
            Span::raw(app.input_buffer.as_str()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]),
        InputMode::Normal => {
            let hint = if app.available {
                "press [C] or [Enter] to connect"
            } else {
                "waiting for the chat service..."
            };
            Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray)))
        }
    };

    let input = Paragraph::new(text).block(Block::default().title(" Input ").borders(Borders::ALL));
    f.render_widget(input, area);
}
