//! Delete confirmation dialog
//!
//! Deletion has no undo at the store, so it always asks first.

use crate::components::centered_popup;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub fn draw_delete_confirm(frame: &mut Frame, area: Rect, label: &str, count: usize) {
    let message = if count > 1 {
        format!("Delete {count} records?")
    } else {
        format!("Delete \"{label}\"?")
    };
    let width = (message.len() as u16 + 6).max(34).min(area.width);
    let popup_area = centered_popup(area, width, 5);
    frame.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from(message),
        Line::default(),
        Line::from(vec![
            Span::styled(
                "y",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" delete    "),
            Span::styled(
                "n",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" keep"),
        ]),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(" Delete ")
            .title_style(Style::default().fg(Color::Red)),
    );
    frame.render_widget(paragraph, popup_area);
}
