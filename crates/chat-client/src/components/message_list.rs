// crates/chat-client/src/components/message_list.rs

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::App;

pub fn draw_message_list(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().title(" Messages ").borders(Borders::ALL);

    if app.messages.is_empty() {
        let empty = Paragraph::new("No messages yet.")
            .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    // Keep only the newest lines that fit inside the borders.
    let visible = area.height.saturating_sub(2) as usize;

    let items: Vec<ListItem> = app
        .messages
        .iter()
        .rev()
        .take(visible)
        .rev()
        .map(|msg| {
            let style = if msg.mine {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    msg.timestamp.format("%H:%M:%S").to_string(),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(" "),
                Span::styled(msg.text.clone(), style),
            ]))
        })
        .collect();

    let list = List::new(items).block(block);
    f.render_widget(list, area);
}
