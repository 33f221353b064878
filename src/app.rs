//! Main application coordinator
//!
//! Owns the shared state and every component, routes key events to whichever
//! surface is on top, and processes the resulting actions. Store refreshes
//! and deletes run synchronously; create and update submissions run on a
//! background thread and are polled on tick.

use crate::action::Action;
use crate::component::Component;
use crate::components::{
    delete_dialog::draw_delete_confirm, help_dialog::draw_help, quit_dialog::draw_quit_dialog,
    toast::draw_toast, ActionsMenu, EntityDialog, FormEvent, LoginScreen, MenuChoice,
    RecordsTable, SetupWizard,
};
use crate::config::Config;
use crate::model::{
    initial_values, ActiveToast, AppMode, DomainState, EntityKind, Modal, ModalStack, Toast,
    ValidatedValues,
};
use crate::services::store::{select_into, EntityStore, RestStore, StoreError};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use std::sync::Arc;

pub struct App {
    mode: AppMode,
    domain: DomainState,
    modals: ModalStack,
    should_quit: bool,
    toast: Option<ActiveToast>,
    store: Option<Arc<RestStore>>,
    table: RecordsTable,
    login: LoginScreen,
    setup: SetupWizard,
    actions_menu: ActionsMenu,
    entity_dialog: Option<EntityDialog>,
}

impl App {
    pub fn new() -> Result<Self> {
        let (mode, store) = match Config::load() {
            Some(config) => (
                AppMode::Login,
                Some(Arc::new(RestStore::new(&config.service_url, &config.api_key))),
            ),
            None => (AppMode::Setup, None),
        };
        Ok(Self {
            mode,
            domain: DomainState::new(),
            modals: ModalStack::new(),
            should_quit: false,
            toast: None,
            store,
            table: RecordsTable::new(),
            login: LoginScreen::new()?,
            setup: SetupWizard::new(),
            actions_menu: ActionsMenu::new(),
            entity_dialog: None,
        })
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn show_toast(&mut self, toast: Toast) {
        self.toast = Some(ActiveToast::new(toast));
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(Some(Action::ForceQuit));
        }

        if let Some(modal) = self.modals.top() {
            return self.handle_modal_key(modal.clone(), key);
        }

        match self.mode {
            AppMode::Setup => self.setup.handle_key_event(key),
            AppMode::Login => self.login.handle_key_event(key),
            AppMode::Running => self.table.handle_key_event(key),
        }
    }

    fn handle_modal_key(&mut self, modal: Modal, key: KeyEvent) -> Result<Option<Action>> {
        let action = match modal {
            Modal::QuitConfirm => match key.code {
                KeyCode::Char('y') | KeyCode::Enter => Some(Action::ForceQuit),
                KeyCode::Char('n') | KeyCode::Esc => Some(Action::CloseModal),
                _ => None,
            },
            Modal::EntityForm => {
                let Some(dialog) = self.entity_dialog.as_mut() else {
                    return Ok(Some(Action::CloseModal));
                };
                match dialog.handle_key(key) {
                    Some(FormEvent::Submit(values)) => Some(Action::SubmitEntityForm(values)),
                    Some(FormEvent::Cancel) => Some(Action::CloseModal),
                    None => None,
                }
            }
            Modal::RowActions => match key.code {
                KeyCode::Char('j') | KeyCode::Down => Some(Action::ModalDown),
                KeyCode::Char('k') | KeyCode::Up => Some(Action::ModalUp),
                KeyCode::Enter => Some(Action::ConfirmModal),
                KeyCode::Esc | KeyCode::Char('q') => Some(Action::CloseModal),
                _ => None,
            },
            Modal::DeleteConfirm { .. } => match key.code {
                KeyCode::Char('y') | KeyCode::Enter => Some(Action::ConfirmModal),
                KeyCode::Char('n') | KeyCode::Esc => Some(Action::CloseModal),
                _ => None,
            },
            Modal::Help { .. } => match key.code {
                KeyCode::Char('j') | KeyCode::Down => Some(Action::ModalDown),
                KeyCode::Char('k') | KeyCode::Up => Some(Action::ModalUp),
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
                    Some(Action::CloseModal)
                }
                _ => None,
            },
        };
        Ok(action)
    }

    pub fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let follow_up = match action {
            Action::ForceQuit => {
                self.should_quit = true;
                None
            }
            Action::Tick => self.on_tick(),
            Action::Resize(_, _) => None,

            Action::OpenQuitDialog => {
                self.modals.push(Modal::QuitConfirm);
                None
            }
            Action::OpenCreateDialog => {
                match EntityDialog::create(self.table.active_kind(), &self.domain) {
                    Ok(dialog) => {
                        self.entity_dialog = Some(dialog);
                        self.modals.push(Modal::EntityForm);
                    }
                    Err(e) => self.show_toast(Toast {
                        description: e.to_string(),
                        variant: crate::model::ToastVariant::Destructive,
                    }),
                }
                None
            }
            Action::OpenRowActions => {
                if self.table.current_row_id().is_some() {
                    self.actions_menu = ActionsMenu::new();
                    self.modals.push(Modal::RowActions);
                }
                None
            }
            Action::OpenEditDialog => {
                self.open_edit_dialog();
                None
            }
            Action::OpenDeleteConfirm => {
                if let Some(id) = self.table.current_row_id() {
                    let label = self.table.current_row_label().unwrap_or_default();
                    self.modals.push(Modal::DeleteConfirm { id, label });
                }
                None
            }
            Action::OpenHelp => {
                self.modals.push(Modal::Help { scroll_offset: 0 });
                None
            }
            Action::CloseModal => {
                if let Some(Modal::EntityForm) = self.modals.pop() {
                    self.entity_dialog = None;
                }
                None
            }
            Action::ConfirmModal => self.confirm_modal(),
            Action::ModalUp | Action::ModalDown => {
                let down = action == Action::ModalDown;
                match self.modals.top_mut() {
                    Some(Modal::RowActions) => {
                        if down {
                            self.actions_menu.down();
                        } else {
                            self.actions_menu.up();
                        }
                    }
                    Some(Modal::Help { scroll_offset }) => {
                        if down {
                            *scroll_offset += 1;
                        } else {
                            *scroll_offset = scroll_offset.saturating_sub(1);
                        }
                    }
                    _ => {}
                }
                None
            }

            Action::SubmitEntityForm(values) => {
                if let (Some(dialog), Some(store)) = (&mut self.entity_dialog, &self.store) {
                    let store: Arc<dyn EntityStore> = store.clone();
                    dialog.begin_submit(store, values);
                }
                None
            }
            Action::SubmitLogin(values) => {
                if let Some(store) = &self.store {
                    let (email, password) = LoginScreen::take_credentials(&values);
                    self.login.begin_sign_in(store.clone(), email, password);
                }
                None
            }
            Action::RefreshRecords => {
                self.refresh();
                None
            }
            Action::SetupConfirm => {
                let config = self.setup.config();
                config.save()?;
                self.store = Some(Arc::new(RestStore::new(
                    &config.service_url,
                    &config.api_key,
                )));
                self.mode = AppMode::Login;
                None
            }

            // Everything else belongs to the table
            other => self.table.update(other)?,
        };

        self.table.rebuild(&self.domain);
        Ok(follow_up)
    }

    fn on_tick(&mut self) -> Option<Action> {
        if self.toast.as_ref().is_some_and(ActiveToast::expired) {
            self.toast = None;
        }

        if self.mode == AppMode::Login {
            if let Some(session) = self.login.poll() {
                if let Some(store) = &self.store {
                    store.set_session(session);
                }
                self.mode = AppMode::Running;
                return Some(Action::RefreshRecords);
            }
        }

        if let Some(dialog) = self.entity_dialog.as_mut() {
            if let Some(outcome) = dialog.poll() {
                return match outcome {
                    crate::services::submit::SubmitOutcome::Success { message } => {
                        self.show_toast(Toast::success(message));
                        self.modals.pop();
                        self.entity_dialog = None;
                        Some(Action::RefreshRecords)
                    }
                    crate::services::submit::SubmitOutcome::Failure { message } => {
                        self.show_toast(Toast {
                            description: message,
                            variant: crate::model::ToastVariant::Destructive,
                        });
                        None
                    }
                };
            }
        }
        None
    }

    fn confirm_modal(&mut self) -> Option<Action> {
        match self.modals.top().cloned() {
            Some(Modal::QuitConfirm) => {
                self.should_quit = true;
                None
            }
            Some(Modal::RowActions) => {
                self.modals.pop();
                match self.actions_menu.selected() {
                    MenuChoice::Edit => Some(Action::OpenEditDialog),
                    MenuChoice::Delete => Some(Action::OpenDeleteConfirm),
                }
            }
            Some(Modal::DeleteConfirm { id, .. }) => {
                self.modals.pop();
                self.delete_confirmed(id)
            }
            Some(Modal::Help { .. }) => {
                self.modals.pop();
                None
            }
            Some(Modal::EntityForm) | None => None,
        }
    }

    fn delete_confirmed(&mut self, confirmed: String) -> Option<Action> {
        let store = self.store.clone()?;
        let kind = self.table.active_kind();
        let targets = self.table.confirmed_targets(confirmed);
        let count = targets.len();

        for id in &targets {
            if store.delete(kind.table(), id).is_err() {
                self.show_toast(Toast::failure());
                return Some(Action::RefreshRecords);
            }
        }

        let message = if count == 1 {
            format!("{} deleted successfully", kind.singular())
        } else {
            format!("{count} records deleted")
        };
        self.show_toast(Toast::success(message));
        let _ = self.table.update(Action::ClearSelection);
        Some(Action::RefreshRecords)
    }

    fn open_edit_dialog(&mut self) {
        let Some(id) = self.table.current_row_id() else {
            return;
        };
        let kind = self.table.active_kind();
        let Some(initial) = self.initial_for(kind, &id) else {
            return;
        };
        match EntityDialog::edit(kind, &self.domain, initial) {
            Ok(dialog) => {
                self.entity_dialog = Some(dialog);
                self.modals.push(Modal::EntityForm);
            }
            Err(e) => self.show_toast(Toast {
                description: e.to_string(),
                variant: crate::model::ToastVariant::Destructive,
            }),
        }
    }

    /// Serialize the record behind `id` to seed the edit form
    fn initial_for(&self, kind: EntityKind, id: &str) -> Option<ValidatedValues> {
        match kind {
            EntityKind::Subjects => self
                .domain
                .subjects
                .iter()
                .find(|s| s.id == id)
                .map(initial_values),
            EntityKind::Courses => self
                .domain
                .courses
                .iter()
                .find(|c| c.id == id)
                .map(initial_values),
            EntityKind::Students => self
                .domain
                .students
                .iter()
                .find(|s| s.id == id)
                .map(initial_values),
        }
    }

    /// Reload every table from the store
    ///
    /// Runs on the UI thread; refreshes are quick and a spinner for them is
    /// not worth the extra plumbing.
    fn refresh(&mut self) {
        let Some(store) = self.store.clone() else {
            return;
        };
        let result = (|| -> Result<(), StoreError> {
            self.domain.subjects = select_into(&*store, EntityKind::Subjects.table())?;
            self.domain.courses = select_into(&*store, EntityKind::Courses.table())?;
            self.domain.students = select_into(&*store, EntityKind::Students.table())?;
            Ok(())
        })();
        if result.is_err() {
            self.show_toast(Toast::failure());
        }
    }

    pub fn draw(&mut self, frame: &mut Frame) -> Result<()> {
        let area = frame.area();

        match self.mode {
            AppMode::Setup => self.setup.draw(frame, area)?,
            AppMode::Login => self.login.draw(frame, area)?,
            AppMode::Running => self.table.draw(frame, area)?,
        }

        match self.modals.top().cloned() {
            Some(Modal::QuitConfirm) => draw_quit_dialog(frame, area),
            Some(Modal::EntityForm) => {
                if let Some(dialog) = &self.entity_dialog {
                    dialog.draw(frame, area);
                }
            }
            Some(Modal::RowActions) => {
                let label = self.table.current_row_label().unwrap_or_default();
                self.actions_menu.draw(frame, area, &label);
            }
            Some(Modal::DeleteConfirm { label, .. }) => {
                let count = self.table.delete_targets().len();
                draw_delete_confirm(frame, area, &label, count);
            }
            Some(Modal::Help { scroll_offset }) => draw_help(frame, area, scroll_offset),
            None => {}
        }

        if let Some(active) = &self.toast {
            draw_toast(frame, area, active);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Subject, ToastVariant, GENERIC_FAILURE};
    use serde_json::json;
    use std::time::Duration;

    struct StubStore {
        fail: bool,
    }

    impl EntityStore for StubStore {
        fn insert(
            &self,
            _table: &str,
            _record: &serde_json::Map<String, serde_json::Value>,
        ) -> Result<(), StoreError> {
            if self.fail {
                Err(StoreError::Unexpected { status: 400 })
            } else {
                Ok(())
            }
        }

        fn update(
            &self,
            _table: &str,
            _id: &str,
            _values: &serde_json::Map<String, serde_json::Value>,
        ) -> Result<(), StoreError> {
            self.insert(_table, _values)
        }

        fn delete(&self, _table: &str, _id: &str) -> Result<(), StoreError> {
            Ok(())
        }

        fn select(&self, _table: &str) -> Result<Vec<serde_json::Value>, StoreError> {
            Ok(Vec::new())
        }
    }

    fn subject_values() -> ValidatedValues {
        let mut values = ValidatedValues::new();
        values.insert("name".to_string(), json!("Mathematics"));
        values.insert(
            "description".to_string(),
            json!("Numbers and how to wrangle them"),
        );
        values
    }

    /// Tick until the in-flight submission resolves
    fn drive_ticks(app: &mut App) -> Option<Action> {
        for _ in 0..100 {
            let follow_up = app.update(Action::Tick).unwrap();
            if follow_up.is_some() || app.toast.is_some() {
                return follow_up;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        panic!("submission never resolved");
    }

    fn running_app() -> App {
        App {
            mode: AppMode::Running,
            domain: DomainState::new(),
            modals: ModalStack::new(),
            should_quit: false,
            toast: None,
            store: None,
            table: RecordsTable::new(),
            login: LoginScreen::new().unwrap(),
            setup: SetupWizard::new(),
            actions_menu: ActionsMenu::new(),
            entity_dialog: None,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_quit_flow_needs_confirmation() {
        let mut app = running_app();

        let action = app.handle_key_event(key(KeyCode::Char('q'))).unwrap();
        assert_eq!(action, Some(Action::OpenQuitDialog));
        app.update(Action::OpenQuitDialog).unwrap();
        assert!(!app.should_quit());

        let action = app.handle_key_event(key(KeyCode::Char('y'))).unwrap();
        app.update(action.unwrap()).unwrap();
        assert!(app.should_quit());
    }

    #[test]
    fn test_quit_dialog_can_be_declined() {
        let mut app = running_app();
        app.update(Action::OpenQuitDialog).unwrap();

        let action = app.handle_key_event(key(KeyCode::Char('n'))).unwrap();
        app.update(action.unwrap()).unwrap();

        assert!(!app.should_quit());
        assert!(app.modals.is_empty());
    }

    #[test]
    fn test_create_dialog_opens_and_closes() {
        let mut app = running_app();

        app.update(Action::OpenCreateDialog).unwrap();
        assert!(app.entity_dialog.is_some());
        assert_eq!(app.modals.top(), Some(&Modal::EntityForm));

        let action = app.handle_key_event(key(KeyCode::Esc)).unwrap();
        app.update(action.unwrap()).unwrap();
        assert!(app.entity_dialog.is_none());
        assert!(app.modals.is_empty());
    }

    #[test]
    fn test_course_dialog_without_subjects_becomes_a_toast() {
        let mut app = running_app();
        app.update(Action::NextTab).unwrap();
        assert_eq!(app.table.active_kind(), EntityKind::Courses);

        app.update(Action::OpenCreateDialog).unwrap();

        assert!(app.entity_dialog.is_none());
        assert!(app.toast.is_some());
    }

    #[test]
    fn test_row_actions_menu_routes_to_edit() {
        let mut app = running_app();
        app.domain.subjects.push(Subject {
            id: "s1".to_string(),
            name: "Maths".to_string(),
            description: "Numbers and how to wrangle them".to_string(),
        });
        app.table.rebuild(&app.domain);

        app.update(Action::OpenRowActions).unwrap();
        assert_eq!(app.modals.top(), Some(&Modal::RowActions));

        let follow_up = app.update(Action::ConfirmModal).unwrap();
        assert_eq!(follow_up, Some(Action::OpenEditDialog));

        app.update(Action::OpenEditDialog).unwrap();
        assert_eq!(app.modals.top(), Some(&Modal::EntityForm));
        assert!(app.entity_dialog.as_ref().unwrap().is_editing());
    }

    #[test]
    fn test_successful_submission_closes_dialog_and_refreshes() {
        let mut app = running_app();
        app.update(Action::OpenCreateDialog).unwrap();
        let store: Arc<dyn EntityStore> = Arc::new(StubStore { fail: false });
        app.entity_dialog
            .as_mut()
            .unwrap()
            .begin_submit(store, subject_values());

        let follow_up = drive_ticks(&mut app);

        assert_eq!(follow_up, Some(Action::RefreshRecords));
        let active = app.toast.as_ref().unwrap();
        assert_eq!(active.toast.variant, ToastVariant::Default);
        assert_eq!(active.toast.description, "Subject created successfully");
        assert!(app.entity_dialog.is_none());
        assert!(app.modals.is_empty());
    }

    #[test]
    fn test_failed_submission_keeps_dialog_open_without_refresh() {
        let mut app = running_app();
        app.update(Action::OpenCreateDialog).unwrap();
        let store: Arc<dyn EntityStore> = Arc::new(StubStore { fail: true });
        app.entity_dialog
            .as_mut()
            .unwrap()
            .begin_submit(store, subject_values());

        let follow_up = drive_ticks(&mut app);

        assert_eq!(follow_up, None);
        let active = app.toast.as_ref().unwrap();
        assert_eq!(active.toast.variant, ToastVariant::Destructive);
        assert_eq!(active.toast.description, GENERIC_FAILURE);
        assert_eq!(app.modals.top(), Some(&Modal::EntityForm));
        let dialog = app.entity_dialog.as_ref().unwrap();
        assert!(!dialog.is_submitting());
    }

    #[test]
    fn test_help_overlay_scrolls() {
        let mut app = running_app();
        app.update(Action::OpenHelp).unwrap();
        app.update(Action::ModalDown).unwrap();
        app.update(Action::ModalDown).unwrap();
        app.update(Action::ModalUp).unwrap();
        assert_eq!(app.modals.top(), Some(&Modal::Help { scroll_offset: 1 }));
    }
}
