//! Quit confirmation dialog

use crate::components::centered_popup;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub fn draw_quit_dialog(frame: &mut Frame, area: Rect) {
    let popup_area = centered_popup(area, 34, 5);
    frame.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from("Quit Campus Console?"),
        Line::default(),
        Line::from(vec![
            Span::styled(
                "y",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" quit    "),
            Span::styled(
                "n",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" stay"),
        ]),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Quit ")
            .title_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(paragraph, popup_area);
}
