//! Entity create/edit dialog
//!
//! Owns a `FormView` built from the per-entity field list and schema. A
//! dialog is constructed fresh every time it opens, so no state leaks from a
//! previous run. While a submission is in flight the form is locked; failure
//! unlocks it with the values intact so the user can retry.

use crate::components::centered_popup;
use crate::components::form::{FormEvent, FormView};
use crate::model::{
    Choice, DomainState, EntityKind, FieldDescriptor, FieldKind, FieldList, Rule, Schema,
    ValidatedValues, GENERIC_FAILURE,
};
use crate::services::store::EntityStore;
use crate::services::submit::{self, SubmitHandle, SubmitOutcome, SubmitPoll};
use anyhow::{bail, Result};
use crossterm::event::KeyEvent;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Clear},
    Frame,
};
use std::sync::Arc;

pub struct EntityDialog {
    kind: EntityKind,
    record_id: Option<String>,
    view: FormView,
    in_flight: Option<SubmitHandle<SubmitOutcome>>,
}

impl EntityDialog {
    /// Dialog for a new record
    pub fn create(kind: EntityKind, domain: &DomainState) -> Result<Self> {
        let (fields, schema) = dialog_config(kind, domain)?;
        Ok(Self {
            kind,
            record_id: None,
            view: FormView::new(fields, schema),
            in_flight: None,
        })
    }

    /// Dialog seeded from an existing record
    pub fn edit(kind: EntityKind, domain: &DomainState, initial: ValidatedValues) -> Result<Self> {
        let (fields, schema) = dialog_config(kind, domain)?;
        let record_id = initial
            .get("id")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        if record_id.is_none() {
            bail!("record has no id");
        }
        let mut view = FormView::new(fields, schema);
        view.seed(&initial);
        Ok(Self {
            kind,
            record_id,
            view,
            in_flight: None,
        })
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn is_editing(&self) -> bool {
        self.record_id.is_some()
    }

    pub fn is_submitting(&self) -> bool {
        self.view.is_submitting()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<FormEvent> {
        self.view.handle_key(key)
    }

    /// Start the store call on a background thread
    ///
    /// A second call while one is in flight is ignored.
    pub fn begin_submit(&mut self, store: Arc<dyn EntityStore>, values: ValidatedValues) {
        if self.in_flight.is_some() {
            return;
        }

        // The store assigns identifiers; never send one back
        let mut payload = values;
        payload.remove("id");

        let table = self.kind.table();
        let singular = self.kind.singular();
        let record_id = self.record_id.clone();

        self.view.set_submitting(true);
        self.in_flight = Some(submit::spawn(move || {
            let result = match &record_id {
                Some(id) => store.update(table, id, &payload),
                None => store.insert(table, &payload),
            };
            match result {
                Ok(()) => SubmitOutcome::Success {
                    message: match record_id {
                        Some(_) => format!("{singular} updated successfully"),
                        None => format!("{singular} created successfully"),
                    },
                },
                Err(_) => SubmitOutcome::Failure {
                    message: GENERIC_FAILURE.to_string(),
                },
            }
        }));
    }

    /// Check the in-flight call; on failure the form unlocks for a retry
    pub fn poll(&mut self) -> Option<SubmitOutcome> {
        let handle = self.in_flight.as_ref()?;
        let outcome = match handle.poll() {
            SubmitPoll::Pending => return None,
            SubmitPoll::Ready(outcome) => outcome,
            SubmitPoll::Lost => SubmitOutcome::Failure {
                message: GENERIC_FAILURE.to_string(),
            },
        };
        self.in_flight = None;
        if matches!(outcome, SubmitOutcome::Failure { .. }) {
            self.view.set_submitting(false);
        }
        Some(outcome)
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let title = match (self.is_editing(), self.kind) {
            (false, kind) => format!(" New {} ", kind.singular()),
            (true, kind) => format!(" Edit {} ", kind.singular()),
        };
        let height = self.view.content_height() + 2;
        let popup_area = centered_popup(area, 52, height);

        frame.render_widget(Clear, popup_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(title)
            .title_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);
        self.view.draw(frame, inner);
    }
}

/// Field list and schema for one entity family
fn dialog_config(kind: EntityKind, domain: &DomainState) -> Result<(FieldList, Schema)> {
    match kind {
        EntityKind::Subjects => subject_config(),
        EntityKind::Courses => course_config(domain),
        EntityKind::Students => student_config(domain),
    }
}

fn subject_config() -> Result<(FieldList, Schema)> {
    let fields = FieldList::new(vec![
        FieldDescriptor::new("name", "Subject name", FieldKind::text())
            .placeholder("e.g. Mathematics"),
        FieldDescriptor::new("description", "Description", FieldKind::text())
            .placeholder("What the subject covers")
            .description("Shown to staff when assigning courses."),
    ])?;
    let schema = Schema::new()
        .rule(
            "name",
            Rule::min_len(2, "Subject name must be at least 2 characters."),
        )
        .rule(
            "description",
            Rule::min_len(10, "Description must be at least 10 characters."),
        );
    Ok((fields, schema))
}

fn course_config(domain: &DomainState) -> Result<(FieldList, Schema)> {
    let subjects = domain.subject_choices();
    if subjects.is_empty() {
        bail!("Create a subject before adding a course");
    }
    let fields = FieldList::new(vec![
        FieldDescriptor::new("name", "Course name", FieldKind::text())
            .placeholder("e.g. Algebra Foundations"),
        FieldDescriptor::new("description", "Description", FieldKind::text())
            .placeholder("What the course covers"),
        FieldDescriptor::new(
            "subject_id",
            "Subject",
            FieldKind::SearchableSelect { options: subjects },
        )
        .placeholder("Choose a subject"),
        FieldDescriptor::new(
            "level",
            "Level",
            FieldKind::Select {
                options: vec![
                    Choice::new("ks3", "Key Stage 3"),
                    Choice::new("gcse", "GCSE"),
                    Choice::new("a-level", "A-Level"),
                ],
            },
        )
        .description("Left/Right to change."),
    ])?;
    let schema = Schema::new()
        .rule(
            "name",
            Rule::min_len(2, "Course name must be at least 2 characters."),
        )
        .rule(
            "description",
            Rule::min_len(10, "Description must be at least 10 characters."),
        )
        .rule("subject_id", Rule::required("Choose a subject."))
        .rule("level", Rule::required("Choose a level."));
    Ok((fields, schema))
}

fn student_config(domain: &DomainState) -> Result<(FieldList, Schema)> {
    let year_groups = (7..=13)
        .map(|y| Choice::new(format!("year-{y}"), format!("Year {y}")))
        .collect();
    let mut fields = vec![
        FieldDescriptor::new("first_name", "First name", FieldKind::text()),
        FieldDescriptor::new("last_name", "Last name", FieldKind::text()),
        FieldDescriptor::new("date_of_birth", "Date of birth", FieldKind::DatePicker)
            .placeholder("Pick a date")
            .description("Enter opens the calendar, Backspace clears."),
        FieldDescriptor::new(
            "year_group",
            "Year group",
            FieldKind::Select {
                options: year_groups,
            },
        ),
    ];
    // Without subjects the enrolment picker has nothing to offer
    let subjects = domain.subject_choices();
    if !subjects.is_empty() {
        fields.push(
            FieldDescriptor::new(
                "subject_ids",
                "Subjects",
                FieldKind::MultiSelect { options: subjects },
            )
            .placeholder("Enrol in subjects"),
        );
    }
    let fields = FieldList::new(fields)?;
    let schema = Schema::new()
        .rule("first_name", Rule::required("First name is required."))
        .rule("last_name", Rule::required("Last name is required."))
        .rule("year_group", Rule::required("Choose a year group."));
    Ok((fields, schema))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Subject;
    use crate::services::store::StoreError;
    use crossterm::event::{KeyCode, KeyModifiers};
    use serde_json::{json, Map, Value};
    use std::sync::Mutex;
    use std::thread;
    use std::time::Duration;

    #[derive(Default)]
    struct MockStore {
        fail: bool,
        calls: Mutex<Vec<(String, String, Value)>>,
    }

    impl MockStore {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn record(&self, op: &str, table: &str, body: Value) -> Result<(), StoreError> {
            self.calls
                .lock()
                .unwrap()
                .push((op.to_string(), table.to_string(), body));
            if self.fail {
                Err(StoreError::Unexpected { status: 400 })
            } else {
                Ok(())
            }
        }
    }

    impl EntityStore for MockStore {
        fn insert(&self, table: &str, record: &Map<String, Value>) -> Result<(), StoreError> {
            self.record("insert", table, Value::Object(record.clone()))
        }

        fn update(
            &self,
            table: &str,
            id: &str,
            values: &Map<String, Value>,
        ) -> Result<(), StoreError> {
            self.record("update", &format!("{table}/{id}"), Value::Object(values.clone()))
        }

        fn delete(&self, table: &str, id: &str) -> Result<(), StoreError> {
            self.record("delete", &format!("{table}/{id}"), Value::Null)
        }

        fn select(&self, _table: &str) -> Result<Vec<Value>, StoreError> {
            Ok(Vec::new())
        }
    }

    fn wait_outcome(dialog: &mut EntityDialog) -> SubmitOutcome {
        for _ in 0..100 {
            if let Some(outcome) = dialog.poll() {
                return outcome;
            }
            thread::sleep(Duration::from_millis(10));
        }
        panic!("submission never completed");
    }

    fn subject_values() -> ValidatedValues {
        let mut values = Map::new();
        values.insert("name".to_string(), json!("Mathematics"));
        values.insert(
            "description".to_string(),
            json!("Numbers and how to wrangle them"),
        );
        values
    }

    fn domain_with_subject() -> DomainState {
        let mut domain = DomainState::new();
        domain.subjects.push(Subject {
            id: "s1".to_string(),
            name: "Mathematics".to_string(),
            description: "Numbers".to_string(),
        });
        domain
    }

    #[test]
    fn test_create_inserts_and_reports_success() {
        let store = Arc::new(MockStore::default());
        let mut dialog = EntityDialog::create(EntityKind::Subjects, &DomainState::new()).unwrap();

        dialog.begin_submit(store.clone(), subject_values());
        let outcome = wait_outcome(&mut dialog);

        assert_eq!(
            outcome,
            SubmitOutcome::Success {
                message: "Subject created successfully".to_string()
            }
        );
        let calls = store.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "insert");
        assert_eq!(calls[0].1, "subjects");
        assert_eq!(calls[0].2["name"], "Mathematics");
    }

    #[test]
    fn test_edit_updates_by_id_and_strips_the_id() {
        let store = Arc::new(MockStore::default());
        let mut initial = subject_values();
        initial.insert("id".to_string(), json!("s1"));
        let mut dialog =
            EntityDialog::edit(EntityKind::Subjects, &DomainState::new(), initial.clone())
                .unwrap();
        assert!(dialog.is_editing());

        dialog.begin_submit(store.clone(), initial);
        let outcome = wait_outcome(&mut dialog);

        assert_eq!(
            outcome,
            SubmitOutcome::Success {
                message: "Subject updated successfully".to_string()
            }
        );
        let calls = store.calls.lock().unwrap();
        assert_eq!(calls[0].0, "update");
        assert_eq!(calls[0].1, "subjects/s1");
        assert!(calls[0].2.get("id").is_none());
    }

    #[test]
    fn test_failure_unlocks_the_form() {
        let store = Arc::new(MockStore::failing());
        let mut dialog = EntityDialog::create(EntityKind::Subjects, &DomainState::new()).unwrap();

        dialog.begin_submit(store, subject_values());
        assert!(dialog.is_submitting());
        let outcome = wait_outcome(&mut dialog);

        assert_eq!(
            outcome,
            SubmitOutcome::Failure {
                message: GENERIC_FAILURE.to_string()
            }
        );
        assert!(!dialog.is_submitting());
        // Values survive for the retry
        let key = crossterm::event::KeyEvent::new(KeyCode::Char('!'), KeyModifiers::NONE);
        dialog.handle_key(key);
        assert!(dialog.view.value("name").is_some());
    }

    #[test]
    fn test_second_submit_while_in_flight_is_ignored() {
        let store = Arc::new(MockStore::default());
        let mut dialog = EntityDialog::create(EntityKind::Subjects, &DomainState::new()).unwrap();

        dialog.begin_submit(store.clone(), subject_values());
        dialog.begin_submit(store.clone(), subject_values());
        wait_outcome(&mut dialog);

        assert_eq!(store.calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_course_dialog_requires_a_subject() {
        let result = EntityDialog::create(EntityKind::Courses, &DomainState::new());
        assert!(result.is_err());

        let result = EntityDialog::create(EntityKind::Courses, &domain_with_subject());
        assert!(result.is_ok());
    }
}
