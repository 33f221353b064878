//! Form state - values, errors, and touched flags keyed by field name
//!
//! The state is derived from a `FieldList`, so every descriptor name is
//! guaranteed to have a matching entry. Dialogs own the state; the form
//! engine renders and mutates it through the accessors here.

use crate::model::field::{FieldKind, FieldList};
use chrono::NaiveDate;
use serde_json::{Map, Value};

/// Value mapping produced by a passing validation run, one key per descriptor
pub type ValidatedValues = Map<String, Value>;

/// Current value of one form field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Date(Option<NaiveDate>),
    Choice(Option<String>),
    Multi(Vec<String>),
}

impl FieldValue {
    /// Starting value for a field kind (create mode)
    pub fn default_for(kind: &FieldKind) -> FieldValue {
        match kind {
            FieldKind::Input { .. } => FieldValue::Text(String::new()),
            FieldKind::DatePicker => FieldValue::Date(None),
            FieldKind::Select { .. } | FieldKind::SearchableSelect { .. } => {
                FieldValue::Choice(None)
            }
            FieldKind::MultiSelect { .. } => FieldValue::Multi(Vec::new()),
        }
    }

    /// Rebuild a value from its JSON representation (edit mode seeding)
    ///
    /// Anything that does not fit the field kind falls back to the default.
    pub fn from_json(kind: &FieldKind, value: &Value) -> FieldValue {
        match kind {
            FieldKind::Input { .. } => match value.as_str() {
                Some(s) => FieldValue::Text(s.to_string()),
                None => FieldValue::default_for(kind),
            },
            FieldKind::DatePicker => {
                let date = value
                    .as_str()
                    .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());
                FieldValue::Date(date)
            }
            FieldKind::Select { .. } | FieldKind::SearchableSelect { .. } => {
                FieldValue::Choice(value.as_str().map(|s| s.to_string()))
            }
            FieldKind::MultiSelect { .. } => {
                let values = value
                    .as_array()
                    .map(|items| {
                        items
                            .iter()
                            .filter_map(|v| v.as_str().map(|s| s.to_string()))
                            .collect()
                    })
                    .unwrap_or_default();
                FieldValue::Multi(values)
            }
        }
    }

    /// JSON representation used in submissions
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Date(Some(date)) => Value::String(date.format("%Y-%m-%d").to_string()),
            FieldValue::Date(None) | FieldValue::Choice(None) => Value::Null,
            FieldValue::Choice(Some(v)) => Value::String(v.clone()),
            FieldValue::Multi(values) => {
                Value::Array(values.iter().cloned().map(Value::String).collect())
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Date(d) => d.is_none(),
            FieldValue::Choice(c) => c.is_none(),
            FieldValue::Multi(values) => values.is_empty(),
        }
    }
}

/// One entry in the form state
#[derive(Debug, Clone)]
pub struct FieldEntry {
    pub value: FieldValue,
    pub error: Option<String>,
    pub touched: bool,
}

/// Mutable form state owned by a dialog and rendered by the form engine
#[derive(Debug, Clone)]
pub struct FormState {
    entries: Vec<(String, FieldEntry)>,
}

impl FormState {
    /// Create a state with the default value for every descriptor
    pub fn from_fields(fields: &FieldList) -> Self {
        let entries = fields
            .iter()
            .map(|field| {
                (
                    field.name.clone(),
                    FieldEntry {
                        value: FieldValue::default_for(&field.kind),
                        error: None,
                        touched: false,
                    },
                )
            })
            .collect();
        Self { entries }
    }

    /// Reset every entry, overlaying `initial` values where present
    ///
    /// Runs on the closed -> open transition; any unsaved edits are gone.
    pub fn reset_to(&mut self, fields: &FieldList, initial: &Map<String, Value>) {
        for field in fields.iter() {
            let value = match initial.get(&field.name) {
                Some(json) => FieldValue::from_json(&field.kind, json),
                None => FieldValue::default_for(&field.kind),
            };
            if let Some(entry) = self.entry_mut(&field.name) {
                entry.value = value;
                entry.error = None;
                entry.touched = false;
            }
        }
    }

    fn entry(&self, name: &str) -> Option<&FieldEntry> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, e)| e)
    }

    fn entry_mut(&mut self, name: &str) -> Option<&mut FieldEntry> {
        self.entries
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, e)| e)
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.entry(name).map(|e| &e.value)
    }

    pub fn value_mut(&mut self, name: &str) -> Option<&mut FieldValue> {
        let entry = self.entry_mut(name)?;
        entry.touched = true;
        Some(&mut entry.value)
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.entry(name).and_then(|e| e.error.as_deref())
    }

    pub fn set_error(&mut self, name: &str, message: &str) {
        if let Some(entry) = self.entry_mut(name) {
            entry.error = Some(message.to_string());
        }
    }

    pub fn clear_errors(&mut self) {
        for (_, entry) in &mut self.entries {
            entry.error = None;
        }
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|(_, e)| e.error.is_some())
    }

    /// Collect every field into a JSON value map, one key per descriptor
    pub fn to_values(&self, fields: &FieldList) -> ValidatedValues {
        let mut values = Map::new();
        for field in fields.iter() {
            let json = self
                .value(&field.name)
                .map(FieldValue::to_json)
                .unwrap_or(Value::Null);
            values.insert(field.name.clone(), json);
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::field::{Choice, FieldDescriptor};
    use serde_json::json;

    fn sample_fields() -> FieldList {
        FieldList::new(vec![
            FieldDescriptor::new("name", "Name", FieldKind::text()),
            FieldDescriptor::new("date_of_birth", "Date of birth", FieldKind::DatePicker),
            FieldDescriptor::new(
                "subject_ids",
                "Subjects",
                FieldKind::MultiSelect {
                    options: vec![Choice::new("s1", "Maths"), Choice::new("s2", "History")],
                },
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_defaults_match_field_kinds() {
        let fields = sample_fields();
        let form = FormState::from_fields(&fields);

        assert_eq!(form.value("name"), Some(&FieldValue::Text(String::new())));
        assert_eq!(form.value("date_of_birth"), Some(&FieldValue::Date(None)));
        assert_eq!(form.value("subject_ids"), Some(&FieldValue::Multi(vec![])));
    }

    #[test]
    fn test_reset_overlays_initial_values() {
        let fields = sample_fields();
        let mut form = FormState::from_fields(&fields);

        // Simulate unsaved edits
        *form.value_mut("name").unwrap() = FieldValue::Text("scratch".to_string());
        form.set_error("name", "too short");

        let mut initial = Map::new();
        initial.insert("name".to_string(), json!("Mathematics"));
        initial.insert("date_of_birth".to_string(), json!("2012-09-01"));
        initial.insert("subject_ids".to_string(), json!(["s1", "s2"]));

        form.reset_to(&fields, &initial);

        assert_eq!(
            form.value("name"),
            Some(&FieldValue::Text("Mathematics".to_string()))
        );
        assert_eq!(
            form.value("date_of_birth"),
            Some(&FieldValue::Date(NaiveDate::from_ymd_opt(2012, 9, 1)))
        );
        assert_eq!(
            form.value("subject_ids"),
            Some(&FieldValue::Multi(vec!["s1".to_string(), "s2".to_string()]))
        );
        assert!(form.error("name").is_none());
    }

    #[test]
    fn test_reset_without_initial_restores_defaults() {
        let fields = sample_fields();
        let mut form = FormState::from_fields(&fields);
        *form.value_mut("name").unwrap() = FieldValue::Text("scratch".to_string());

        form.reset_to(&fields, &Map::new());
        assert_eq!(form.value("name"), Some(&FieldValue::Text(String::new())));
    }

    #[test]
    fn test_to_values_contains_every_field() {
        let fields = sample_fields();
        let form = FormState::from_fields(&fields);
        let values = form.to_values(&fields);

        assert_eq!(values.len(), 3);
        assert!(values.contains_key("name"));
        assert!(values.contains_key("date_of_birth"));
        assert!(values.contains_key("subject_ids"));
    }

    #[test]
    fn test_date_round_trips_through_json() {
        let kind = FieldKind::DatePicker;
        let value = FieldValue::Date(NaiveDate::from_ymd_opt(2009, 1, 31));
        let rebuilt = FieldValue::from_json(&kind, &value.to_json());
        assert_eq!(rebuilt, value);
    }
}
