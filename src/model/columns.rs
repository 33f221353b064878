//! Declarative column definitions per entity
//!
//! A column names its header, how to read a cell out of a record, and whether
//! its header toggles sorting. The table component consumes these read-only.

use crate::model::entity::{Course, Student, Subject};

/// Sort direction for a sortable column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(&self) -> SortDirection {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// One column of an entity table
pub struct ColumnDef<T> {
    pub header: &'static str,
    pub accessor: fn(&T) -> String,
    pub sortable: bool,
}

impl<T> ColumnDef<T> {
    pub fn sortable(header: &'static str, accessor: fn(&T) -> String) -> Self {
        Self {
            header,
            accessor,
            sortable: true,
        }
    }

    pub fn plain(header: &'static str, accessor: fn(&T) -> String) -> Self {
        Self {
            header,
            accessor,
            sortable: false,
        }
    }
}

pub fn subject_columns() -> Vec<ColumnDef<Subject>> {
    vec![
        ColumnDef::sortable("Name", |s: &Subject| s.name.clone()),
        ColumnDef::plain("Description", |s: &Subject| s.description.clone()),
    ]
}

pub fn course_columns() -> Vec<ColumnDef<Course>> {
    vec![
        ColumnDef::sortable("Name", |c: &Course| c.name.clone()),
        ColumnDef::plain("Description", |c: &Course| c.description.clone()),
        ColumnDef::sortable("Level", |c: &Course| c.level.clone()),
    ]
}

pub fn student_columns() -> Vec<ColumnDef<Student>> {
    vec![
        ColumnDef::sortable("Last name", |s: &Student| s.last_name.clone()),
        ColumnDef::sortable("First name", |s: &Student| s.first_name.clone()),
        ColumnDef::sortable("Date of birth", |s: &Student| {
            s.date_of_birth
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        }),
        ColumnDef::plain("Year group", |s: &Student| s.year_group.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessor_reads_cell() {
        let subject = Subject {
            id: "s1".to_string(),
            name: "History".to_string(),
            description: "The past, in order".to_string(),
        };
        let columns = subject_columns();
        assert_eq!((columns[0].accessor)(&subject), "History");
        assert!(columns[0].sortable);
        assert!(!columns[1].sortable);
    }

    #[test]
    fn test_sort_direction_toggle() {
        assert_eq!(
            SortDirection::Ascending.toggled(),
            SortDirection::Descending
        );
        assert_eq!(
            SortDirection::Descending.toggled(),
            SortDirection::Ascending
        );
    }
}
