//! Toast rendering
//!
//! Drawn last so it sits on top of whatever else is on screen. Expiry is
//! handled by the app on tick; this module only paints.

use crate::model::{ActiveToast, ToastVariant};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

pub fn draw_toast(frame: &mut Frame, area: Rect, active: &ActiveToast) {
    let description = active.toast.description.as_str();
    let width = (description.width() as u16 + 4).min(area.width.saturating_sub(2));
    let height = 3;

    // Bottom-centered, one row above the help bar
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + area.height.saturating_sub(height + 1);
    let toast_area = Rect::new(x, y, width, height);

    let border = match active.toast.variant {
        ToastVariant::Default => Style::default().fg(Color::Green),
        ToastVariant::Destructive => Style::default().fg(Color::Red),
    };

    frame.render_widget(Clear, toast_area);
    let paragraph = Paragraph::new(description.to_string())
        .style(Style::default().fg(Color::White))
        .block(Block::default().borders(Borders::ALL).border_style(border));
    frame.render_widget(paragraph, toast_area);
}
