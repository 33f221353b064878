//! Calendar popup for the date picker field kind
//!
//! Selectable range runs from 1900-01-01 through today; days outside it are
//! dimmed and the cursor never lands on them.

use crate::components::centered_popup;
use chrono::{Datelike, Duration, Local, Months, NaiveDate};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

fn min_date() -> NaiveDate {
    // Matches the range the web date picker allowed
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

fn max_date() -> NaiveDate {
    Local::now().date_naive()
}

/// State of an open calendar popup
#[derive(Debug, Clone)]
pub struct CalendarState {
    cursor: NaiveDate,
}

impl CalendarState {
    pub fn new(initial: Option<NaiveDate>) -> Self {
        let cursor = Self::clamp(initial.unwrap_or_else(max_date));
        Self { cursor }
    }

    fn clamp(date: NaiveDate) -> NaiveDate {
        date.clamp(min_date(), max_date())
    }

    pub fn cursor(&self) -> NaiveDate {
        self.cursor
    }

    pub fn move_days(&mut self, delta: i64) {
        if let Some(moved) = self.cursor.checked_add_signed(Duration::days(delta)) {
            self.cursor = Self::clamp(moved);
        }
    }

    pub fn move_months(&mut self, delta: i32) {
        let months = Months::new(delta.unsigned_abs());
        let moved = if delta >= 0 {
            self.cursor.checked_add_months(months)
        } else {
            self.cursor.checked_sub_months(months)
        };
        if let Some(moved) = moved {
            self.cursor = Self::clamp(moved);
        }
    }

    /// Days of the visible month laid out in Monday-first weeks
    fn month_grid(&self) -> Vec<[Option<NaiveDate>; 7]> {
        let first = self
            .cursor
            .with_day(1)
            .unwrap_or(self.cursor);
        let next_month = first
            .checked_add_months(Months::new(1))
            .unwrap_or(first);
        let offset = first.weekday().num_days_from_monday() as usize;

        let mut weeks = Vec::new();
        let mut week = [None; 7];
        let mut slot = offset;
        let mut day = first;
        while day < next_month {
            week[slot] = Some(day);
            slot += 1;
            if slot == 7 {
                weeks.push(week);
                week = [None; 7];
                slot = 0;
            }
            let Some(next) = day.succ_opt() else {
                break;
            };
            day = next;
        }
        if slot > 0 {
            weeks.push(week);
        }
        weeks
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let weeks = self.month_grid();
        let height = 5 + weeks.len() as u16;
        let popup_area = centered_popup(area, 26, height);

        frame.render_widget(Clear, popup_area);

        let mut content = vec![
            Line::from(Span::styled(
                format!("{:^22}", self.cursor.format("%B %Y")),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                " Mo Tu We Th Fr Sa Su",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        let (min, max) = (min_date(), max_date());
        for week in &weeks {
            let mut spans = Vec::new();
            for day in week {
                match day {
                    Some(date) => {
                        let style = if *date == self.cursor {
                            Style::default()
                                .bg(Color::Blue)
                                .fg(Color::White)
                                .add_modifier(Modifier::BOLD)
                        } else if *date < min || *date > max {
                            Style::default().fg(Color::DarkGray)
                        } else {
                            Style::default().fg(Color::White)
                        };
                        spans.push(Span::raw(" "));
                        spans.push(Span::styled(format!("{:>2}", date.day()), style));
                    }
                    None => spans.push(Span::raw("   ")),
                }
            }
            content.push(Line::from(spans));
        }

        content.push(Line::from(vec![
            Span::styled(" PgUp/PgDn ", Style::default().fg(Color::Cyan)),
            Span::raw("Month "),
            Span::styled(" Enter ", Style::default().fg(Color::Green)),
            Span::raw("Pick"),
        ]));

        let paragraph = Paragraph::new(content).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Date ")
                .title_style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(paragraph, popup_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_clamps_at_lower_bound() {
        let mut state = CalendarState::new(NaiveDate::from_ymd_opt(1900, 1, 2));
        state.move_days(-10);
        assert_eq!(state.cursor(), NaiveDate::from_ymd_opt(1900, 1, 1).unwrap());
    }

    #[test]
    fn test_cursor_clamps_at_today() {
        let mut state = CalendarState::new(None);
        state.move_days(30);
        assert_eq!(state.cursor(), Local::now().date_naive());
    }

    #[test]
    fn test_month_navigation_keeps_day_when_possible() {
        let mut state = CalendarState::new(NaiveDate::from_ymd_opt(2012, 3, 15));
        state.move_months(-1);
        assert_eq!(state.cursor(), NaiveDate::from_ymd_opt(2012, 2, 15).unwrap());
        state.move_months(1);
        assert_eq!(state.cursor(), NaiveDate::from_ymd_opt(2012, 3, 15).unwrap());
    }

    #[test]
    fn test_month_grid_covers_every_day() {
        let state = CalendarState::new(NaiveDate::from_ymd_opt(2012, 2, 1));
        let days: usize = state
            .month_grid()
            .iter()
            .flatten()
            .filter(|d| d.is_some())
            .count();
        // 2012 is a leap year
        assert_eq!(days, 29);
    }
}
