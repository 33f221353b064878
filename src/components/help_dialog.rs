//! Help overlay listing every key binding

use crate::components::centered_popup;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const BINDINGS: &[(&str, &str)] = &[
    ("j / k, ↓ / ↑", "Move between rows"),
    ("g / G", "First / last row"),
    ("h / l, ← / →, Tab", "Switch entity tab"),
    ("a", "Add a record"),
    ("e", "Edit the highlighted record"),
    ("d", "Delete the highlighted or marked records"),
    ("Enter / m", "Row-action menu"),
    ("Space", "Mark / unmark the row"),
    ("Ctrl+a", "Mark every visible row"),
    ("/", "Filter rows"),
    ("1-4", "Sort by column"),
    ("r", "Refresh from the store"),
    ("Esc", "Clear marks / close dialogs"),
    ("q", "Quit"),
];

pub fn draw_help(frame: &mut Frame, area: Rect, scroll_offset: usize) {
    let height = (BINDINGS.len() as u16 + 4).min(area.height);
    let popup_area = centered_popup(area, 58, height);
    frame.render_widget(Clear, popup_area);

    let visible = height.saturating_sub(3) as usize;
    let offset = scroll_offset.min(BINDINGS.len().saturating_sub(visible));

    let mut lines: Vec<Line> = BINDINGS
        .iter()
        .skip(offset)
        .take(visible)
        .map(|(keys, what)| {
            Line::from(vec![
                Span::styled(
                    format!(" {keys:<20}"),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw((*what).to_string()),
            ])
        })
        .collect();
    lines.push(Line::from(Span::styled(
        " j/k scroll, Esc close",
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Key bindings ")
            .title_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(paragraph, popup_area);
}
