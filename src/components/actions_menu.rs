//! Row-action menu
//!
//! Small popup opened on the highlighted record, offering the per-record
//! operations.

use crate::components::centered_popup;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Edit,
    Delete,
}

const CHOICES: [(MenuChoice, &str); 2] =
    [(MenuChoice::Edit, "Edit"), (MenuChoice::Delete, "Delete")];

#[derive(Debug, Default)]
pub struct ActionsMenu {
    cursor: usize,
}

impl ActionsMenu {
    pub fn new() -> Self {
        Self { cursor: 0 }
    }

    pub fn up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn down(&mut self) {
        self.cursor = (self.cursor + 1).min(CHOICES.len() - 1);
    }

    pub fn selected(&self) -> MenuChoice {
        CHOICES[self.cursor].0
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, record_label: &str) {
        let popup_area = centered_popup(area, 30, CHOICES.len() as u16 + 2);
        frame.render_widget(Clear, popup_area);

        let lines: Vec<Line> = CHOICES
            .iter()
            .enumerate()
            .map(|(index, (_, label))| {
                let style = if index == self.cursor {
                    Style::default()
                        .bg(Color::Blue)
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                Line::from(Span::styled(format!(" {label} "), style))
            })
            .collect();

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(format!(" {record_label} "))
                .title_style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(paragraph, popup_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_clamps_at_both_ends() {
        let mut menu = ActionsMenu::new();
        assert_eq!(menu.selected(), MenuChoice::Edit);

        menu.up();
        assert_eq!(menu.selected(), MenuChoice::Edit);

        menu.down();
        menu.down();
        assert_eq!(menu.selected(), MenuChoice::Delete);
    }
}
