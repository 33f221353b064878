//! First-run setup wizard
//!
//! Collects the store URL and API key, validates each step, and saves the
//! config. Runs before the login screen ever appears.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::config::Config;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SetupStep {
    Welcome,
    ServiceUrl,
    ApiKey,
    Confirm,
}

pub struct SetupWizard {
    step: SetupStep,
    service_url: String,
    api_key: String,
    error: Option<String>,
}

impl SetupWizard {
    pub fn new() -> Self {
        Self {
            step: SetupStep::Welcome,
            service_url: String::new(),
            api_key: String::new(),
            error: None,
        }
    }

    pub fn config(&self) -> Config {
        Config {
            service_url: self.service_url.trim_end_matches('/').to_string(),
            api_key: self.api_key.clone(),
        }
    }

    fn advance(&mut self) -> Option<Action> {
        self.error = None;
        match self.step {
            SetupStep::Welcome => self.step = SetupStep::ServiceUrl,
            SetupStep::ServiceUrl => {
                let url = self.service_url.trim();
                if url.starts_with("http://") || url.starts_with("https://") {
                    self.step = SetupStep::ApiKey;
                } else {
                    self.error = Some("Enter a full URL, e.g. https://project.supabase.co".into());
                }
            }
            SetupStep::ApiKey => {
                if self.api_key.trim().is_empty() {
                    self.error = Some("The API key cannot be empty".into());
                } else {
                    self.step = SetupStep::Confirm;
                }
            }
            SetupStep::Confirm => return Some(Action::SetupConfirm),
        }
        None
    }

    fn back(&mut self) -> Option<Action> {
        self.error = None;
        match self.step {
            SetupStep::Welcome => return Some(Action::ForceQuit),
            SetupStep::ServiceUrl => self.step = SetupStep::Welcome,
            SetupStep::ApiKey => self.step = SetupStep::ServiceUrl,
            SetupStep::Confirm => self.step = SetupStep::ApiKey,
        }
        None
    }

    fn active_input(&mut self) -> Option<&mut String> {
        match self.step {
            SetupStep::ServiceUrl => Some(&mut self.service_url),
            SetupStep::ApiKey => Some(&mut self.api_key),
            SetupStep::Welcome | SetupStep::Confirm => None,
        }
    }

    fn step_lines(&self) -> Vec<Line<'static>> {
        let input_style = Style::default().fg(Color::White);
        match self.step {
            SetupStep::Welcome => vec![
                Line::from("Welcome to Campus Console."),
                Line::default(),
                Line::from("This wizard connects the console to your"),
                Line::from("hosted school records project."),
                Line::default(),
                Line::from(Span::styled(
                    "Enter to begin, Esc to quit",
                    Style::default().fg(Color::DarkGray),
                )),
            ],
            SetupStep::ServiceUrl => vec![
                Line::from("Step 1 of 2: project URL"),
                Line::default(),
                Line::from(vec![
                    Span::raw("> "),
                    Span::styled(self.service_url.clone(), input_style),
                    Span::styled("█", input_style),
                ]),
            ],
            SetupStep::ApiKey => vec![
                Line::from("Step 2 of 2: anonymous API key"),
                Line::default(),
                Line::from(vec![
                    Span::raw("> "),
                    Span::styled("\u{2022}".repeat(self.api_key.chars().count()), input_style),
                    Span::styled("█", input_style),
                ]),
            ],
            SetupStep::Confirm => vec![
                Line::from("Review"),
                Line::default(),
                Line::from(format!("URL: {}", self.service_url)),
                Line::from(format!(
                    "Key: {}...",
                    self.api_key.chars().take(8).collect::<String>()
                )),
                Line::default(),
                Line::from(Span::styled(
                    "Enter to save, Esc to go back",
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                )),
            ],
        }
    }
}

impl Default for SetupWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for SetupWizard {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Enter => self.advance(),
            KeyCode::Esc => self.back(),
            KeyCode::Char(c) => {
                if let Some(input) = self.active_input() {
                    input.push(c);
                }
                None
            }
            KeyCode::Backspace => {
                if let Some(input) = self.active_input() {
                    input.pop();
                }
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let mut lines = self.step_lines();
        if let Some(error) = &self.error {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        }

        let height = lines.len() as u16 + 2;
        let popup_area = centered_popup(area, 56, height);
        frame.render_widget(Clear, popup_area);
        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Setup ")
                .title_style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(paragraph, popup_area);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(wizard: &mut SetupWizard, text: &str) {
        for c in text.chars() {
            wizard.handle_key_event(key(KeyCode::Char(c))).unwrap();
        }
    }

    #[test]
    fn test_happy_path_produces_config() {
        let mut wizard = SetupWizard::new();
        wizard.handle_key_event(key(KeyCode::Enter)).unwrap();
        type_str(&mut wizard, "https://project.supabase.co/");
        wizard.handle_key_event(key(KeyCode::Enter)).unwrap();
        type_str(&mut wizard, "anon-key");
        wizard.handle_key_event(key(KeyCode::Enter)).unwrap();

        let action = wizard.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(action, Some(Action::SetupConfirm));

        let config = wizard.config();
        assert_eq!(config.service_url, "https://project.supabase.co");
        assert_eq!(config.api_key, "anon-key");
    }

    #[test]
    fn test_bad_url_blocks_the_step() {
        let mut wizard = SetupWizard::new();
        wizard.handle_key_event(key(KeyCode::Enter)).unwrap();
        type_str(&mut wizard, "project.supabase.co");

        wizard.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(wizard.step, SetupStep::ServiceUrl);
        assert!(wizard.error.is_some());
    }

    #[test]
    fn test_escape_on_welcome_quits() {
        let mut wizard = SetupWizard::new();
        let action = wizard.handle_key_event(key(KeyCode::Esc)).unwrap();
        assert_eq!(action, Some(Action::ForceQuit));
    }

    #[test]
    fn test_empty_api_key_blocks_the_step() {
        let mut wizard = SetupWizard::new();
        wizard.handle_key_event(key(KeyCode::Enter)).unwrap();
        type_str(&mut wizard, "https://project.supabase.co");
        wizard.handle_key_event(key(KeyCode::Enter)).unwrap();

        wizard.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(wizard.step, SetupStep::ApiKey);
        assert!(wizard.error.is_some());
    }
}
