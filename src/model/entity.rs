//! Entity records mirrored from the hosted store
//!
//! The store owns these rows; the console holds transient copies for display
//! and editing. Identifiers are assigned by the store on insert.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Subject {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Course {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub subject_id: String,
    #[serde(default)]
    pub level: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Student {
    #[serde(default)]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub year_group: String,
    #[serde(default)]
    pub subject_ids: Vec<String>,
}

/// Entity families managed by the console, one per tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Subjects,
    Courses,
    Students,
}

impl EntityKind {
    pub fn all() -> [EntityKind; 3] {
        [
            EntityKind::Subjects,
            EntityKind::Courses,
            EntityKind::Students,
        ]
    }

    pub fn title(&self) -> &'static str {
        match self {
            EntityKind::Subjects => "Subjects",
            EntityKind::Courses => "Courses",
            EntityKind::Students => "Students",
        }
    }

    pub fn singular(&self) -> &'static str {
        match self {
            EntityKind::Subjects => "Subject",
            EntityKind::Courses => "Course",
            EntityKind::Students => "Student",
        }
    }

    /// Table name at the store
    pub fn table(&self) -> &'static str {
        match self {
            EntityKind::Subjects => "subjects",
            EntityKind::Courses => "courses",
            EntityKind::Students => "students",
        }
    }
}

/// Serialize a record into the value map used to seed an edit form
pub fn initial_values<T: Serialize>(record: &T) -> Map<String, Value> {
    match serde_json::to_value(record) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_values_from_subject() {
        let subject = Subject {
            id: "s1".to_string(),
            name: "Mathematics".to_string(),
            description: "Numbers and how to wrangle them".to_string(),
        };
        let values = initial_values(&subject);
        assert_eq!(values["name"], "Mathematics");
        assert_eq!(values["id"], "s1");
    }

    #[test]
    fn test_student_date_serializes_as_iso() {
        let student = Student {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2012, 9, 1),
            ..Student::default()
        };
        let values = initial_values(&student);
        assert_eq!(values["date_of_birth"], "2012-09-01");
    }

    #[test]
    fn test_entity_kind_tables() {
        for kind in EntityKind::all() {
            assert!(!kind.table().is_empty());
            assert!(kind.title().starts_with(kind.singular()));
        }
    }
}
