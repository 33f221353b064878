//! Domain state - records loaded from the store, separate from UI concerns

use crate::model::entity::{Course, EntityKind, Student, Subject};
use crate::model::field::Choice;

/// Domain state containing all loaded records
#[derive(Debug, Default)]
pub struct DomainState {
    pub subjects: Vec<Subject>,
    pub courses: Vec<Course>,
    pub students: Vec<Student>,
}

impl DomainState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count_for(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Subjects => self.subjects.len(),
            EntityKind::Courses => self.courses.len(),
            EntityKind::Students => self.students.len(),
        }
    }

    /// Subject options for select fields, in load order
    pub fn subject_choices(&self) -> Vec<Choice> {
        self.subjects
            .iter()
            .map(|s| Choice::new(s.id.clone(), s.name.clone()))
            .collect()
    }
}
