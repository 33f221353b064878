//! Sign-in screen
//!
//! Built on the same form engine as the entity dialogs; only the schema and
//! the submit wiring differ. A failed sign-in sets a notice above the fields
//! and leaves the values in place.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::components::form::{FormEvent, FormView};
use crate::model::{FieldDescriptor, FieldKind, FieldList, InputControl, Rule, Schema};
use crate::services::auth::Session;
use crate::services::store::RestStore;
use crate::services::submit::{self, SubmitHandle, SubmitPoll};
use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Clear},
    Frame,
};
use std::sync::Arc;

pub struct LoginScreen {
    view: FormView,
    in_flight: Option<SubmitHandle<Result<Session, crate::services::store::StoreError>>>,
}

impl LoginScreen {
    pub fn new() -> Result<Self> {
        let fields = FieldList::new(vec![
            FieldDescriptor::new(
                "email",
                "Email",
                FieldKind::Input {
                    control: InputControl::Email,
                },
            )
            .placeholder("you@school.example"),
            FieldDescriptor::new(
                "password",
                "Password",
                FieldKind::Input {
                    control: InputControl::Password,
                },
            ),
        ])?;
        let schema = Schema::new()
            .rule("email", Rule::email("Enter a valid email address."))
            .rule(
                "password",
                Rule::min_len(6, "Password must be at least 6 characters."),
            );
        Ok(Self {
            view: FormView::new(fields, schema).submit_label("Sign in"),
            in_flight: None,
        })
    }

    pub fn begin_sign_in(&mut self, store: Arc<RestStore>, email: String, password: String) {
        if self.in_flight.is_some() {
            return;
        }
        self.view.set_submitting(true);
        self.view.set_notice(None);
        self.in_flight = Some(submit::spawn(move || store.sign_in(&email, &password)));
    }

    /// Check the in-flight sign-in; a failure becomes a retryable notice
    pub fn poll(&mut self) -> Option<Session> {
        let handle = self.in_flight.as_ref()?;
        let result = match handle.poll() {
            SubmitPoll::Pending => return None,
            SubmitPoll::Ready(result) => result,
            SubmitPoll::Lost => {
                self.in_flight = None;
                self.view.set_submitting(false);
                self.view.set_notice(Some(
                    "Sign-in failed, check your credentials and try again.".to_string(),
                ));
                return None;
            }
        };
        self.in_flight = None;
        self.view.set_submitting(false);
        match result {
            Ok(session) => Some(session),
            Err(_) => {
                self.view.set_notice(Some(
                    "Sign-in failed, check your credentials and try again.".to_string(),
                ));
                None
            }
        }
    }

    /// Split the validated value map into email and password
    pub fn take_credentials(values: &crate::model::ValidatedValues) -> (String, String) {
        let email = values
            .get("email")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        let password = values
            .get("password")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        (email, password)
    }
}

impl Component for LoginScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match self.view.handle_key(key) {
            Some(FormEvent::Submit(values)) => Some(Action::SubmitLogin(values)),
            Some(FormEvent::Cancel) => Some(Action::OpenQuitDialog),
            None => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let height = self.view.content_height() + 2;
        let popup_area = centered_popup(area, 48, height);

        frame.render_widget(Clear, popup_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Campus Console — Sign in ")
            .title_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);
        self.view.draw(frame, inner);
        Ok(())
    }
}
