//! Declarative validation schema
//!
//! The form engine defers all field-level validation to the schema and only
//! orchestrates rendering and submission around it. Failures are stamped onto
//! the form state as inline messages; they are local and recoverable.

use crate::model::field::FieldList;
use crate::model::form::{FieldValue, FormState, ValidatedValues};
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// One field-level constraint
#[derive(Debug, Clone)]
pub enum Rule {
    /// Value must not be empty
    Required { message: String },
    /// Text value must be at least `min` characters
    MinLen { min: usize, message: String },
    /// Text value must look like an email address
    Email { message: String },
}

impl Rule {
    pub fn required(message: &str) -> Rule {
        Rule::Required {
            message: message.to_string(),
        }
    }

    pub fn min_len(min: usize, message: &str) -> Rule {
        Rule::MinLen {
            min,
            message: message.to_string(),
        }
    }

    pub fn email(message: &str) -> Rule {
        Rule::Email {
            message: message.to_string(),
        }
    }

    /// Check one value, returning the failure message if it does not pass
    fn check(&self, value: &FieldValue) -> Option<&str> {
        match self {
            Rule::Required { message } => value.is_empty().then_some(message.as_str()),
            Rule::MinLen { min, message } => match value {
                FieldValue::Text(s) => (s.chars().count() < *min).then_some(message.as_str()),
                _ => None,
            },
            Rule::Email { message } => match value {
                FieldValue::Text(s) => (!EMAIL_REGEX.is_match(s)).then_some(message.as_str()),
                _ => None,
            },
        }
    }
}

/// Validation rules keyed by field name
#[derive(Debug, Clone, Default)]
pub struct Schema {
    rules: Vec<(String, Vec<Rule>)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, field: &str, rule: Rule) -> Self {
        if let Some((_, rules)) = self.rules.iter_mut().find(|(name, _)| name == field) {
            rules.push(rule);
        } else {
            self.rules.push((field.to_string(), vec![rule]));
        }
        self
    }

    /// Validate the whole form in one pass
    ///
    /// On success clears inline errors and returns the validated value map;
    /// on failure stamps the first failing message per field and returns
    /// `None` so the caller never invokes its submit handler.
    pub fn validate(&self, fields: &FieldList, form: &mut FormState) -> Option<ValidatedValues> {
        form.clear_errors();

        for (name, rules) in &self.rules {
            let Some(value) = form.value(name).cloned() else {
                continue;
            };
            for rule in rules {
                if let Some(message) = rule.check(&value) {
                    form.set_error(name, message);
                    break;
                }
            }
        }

        if form.has_errors() {
            None
        } else {
            Some(form.to_values(fields))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::field::{FieldDescriptor, FieldKind, InputControl};

    fn subject_fields() -> FieldList {
        FieldList::new(vec![
            FieldDescriptor::new("name", "Subject name", FieldKind::text()),
            FieldDescriptor::new("description", "Description", FieldKind::text()),
        ])
        .unwrap()
    }

    fn subject_schema() -> Schema {
        Schema::new()
            .rule(
                "name",
                Rule::min_len(2, "Subject name must be at least 2 characters."),
            )
            .rule(
                "description",
                Rule::min_len(10, "Description must be at least 10 characters."),
            )
    }

    #[test]
    fn test_failing_field_gets_inline_message() {
        let fields = subject_fields();
        let mut form = FormState::from_fields(&fields);
        *form.value_mut("name").unwrap() = FieldValue::Text("A".to_string());

        let result = subject_schema().validate(&fields, &mut form);

        assert!(result.is_none());
        assert_eq!(
            form.error("name"),
            Some("Subject name must be at least 2 characters.")
        );
        assert_eq!(
            form.error("description"),
            Some("Description must be at least 10 characters.")
        );
    }

    #[test]
    fn test_passing_form_yields_every_field() {
        let fields = subject_fields();
        let mut form = FormState::from_fields(&fields);
        *form.value_mut("name").unwrap() = FieldValue::Text("Mathematics".to_string());
        *form.value_mut("description").unwrap() =
            FieldValue::Text("Numbers and how to wrangle them".to_string());

        let values = subject_schema().validate(&fields, &mut form).unwrap();

        assert_eq!(values.len(), 2);
        assert_eq!(values["name"], "Mathematics");
        assert!(!form.has_errors());
    }

    #[test]
    fn test_revalidation_clears_stale_errors() {
        let fields = subject_fields();
        let mut form = FormState::from_fields(&fields);
        let schema = subject_schema();

        assert!(schema.validate(&fields, &mut form).is_none());
        *form.value_mut("name").unwrap() = FieldValue::Text("Mathematics".to_string());
        *form.value_mut("description").unwrap() =
            FieldValue::Text("A long enough description".to_string());

        assert!(schema.validate(&fields, &mut form).is_some());
        assert!(form.error("name").is_none());
    }

    #[test]
    fn test_email_rule() {
        let fields = FieldList::new(vec![FieldDescriptor::new(
            "email",
            "Email",
            FieldKind::Input {
                control: InputControl::Email,
            },
        )])
        .unwrap();
        let schema = Schema::new().rule("email", Rule::email("Enter a valid email address."));

        let mut form = FormState::from_fields(&fields);
        *form.value_mut("email").unwrap() = FieldValue::Text("not-an-email".to_string());
        assert!(schema.validate(&fields, &mut form).is_none());

        *form.value_mut("email").unwrap() = FieldValue::Text("staff@school.example".to_string());
        assert!(schema.validate(&fields, &mut form).is_some());
    }

    #[test]
    fn test_required_rule_on_select() {
        let fields = FieldList::new(vec![FieldDescriptor::new(
            "subject_id",
            "Subject",
            FieldKind::SearchableSelect {
                options: vec![crate::model::field::Choice::new("s1", "Maths")],
            },
        )])
        .unwrap();
        let schema = Schema::new().rule("subject_id", Rule::required("Choose a subject."));

        let mut form = FormState::from_fields(&fields);
        assert!(schema.validate(&fields, &mut form).is_none());
        assert_eq!(form.error("subject_id"), Some("Choose a subject."));

        *form.value_mut("subject_id").unwrap() = FieldValue::Choice(Some("s1".to_string()));
        assert!(schema.validate(&fields, &mut form).is_some());
    }
}
