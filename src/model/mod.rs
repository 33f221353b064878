//! Model layer - centralized state management
//!
//! This module contains all state-related types:
//! - `DomainState` - records loaded from the store
//! - `FieldList` / `FormState` / `Schema` - the declarative form contract
//! - `ColumnDef` - declarative table columns
//! - `ModalStack` - modal overlay management

pub mod columns;
pub mod domain;
pub mod entity;
pub mod field;
pub mod form;
pub mod modal;
pub mod schema;
pub mod toast;
pub mod ui;

// Re-export commonly used types
pub use columns::{ColumnDef, SortDirection};
pub use domain::DomainState;
pub use entity::{initial_values, Course, EntityKind, Student, Subject};
pub use field::{Choice, FieldDescriptor, FieldKind, FieldList, InputControl};
pub use form::{FieldValue, FormState, ValidatedValues};
pub use modal::{Modal, ModalStack};
pub use schema::{Rule, Schema};
pub use toast::{ActiveToast, Toast, ToastVariant, GENERIC_FAILURE};
pub use ui::AppMode;
