//! Field descriptors - declarative form configuration
//!
//! A form is described as an ordered list of field descriptors. The list is
//! validated when it is built, so a misconfigured form is an error at dialog
//! construction time, not a blank control at render time.

use anyhow::{bail, Result};
use std::collections::HashSet;

/// One selectable option for the select field kinds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Control variant for plain input fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputControl {
    #[default]
    Text,
    Email,
    Password,
}

/// Which control renders a field
///
/// Options live inside the select variants, so a select field without an
/// option list cannot be constructed in the first place.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Single-line text entry
    Input { control: InputControl },
    /// Calendar date picker
    DatePicker,
    /// Fixed option list, cycled in place
    Select { options: Vec<Choice> },
    /// Option list with typeahead filtering, single choice
    SearchableSelect { options: Vec<Choice> },
    /// Option list with typeahead filtering, multiple choices
    MultiSelect { options: Vec<Choice> },
}

impl FieldKind {
    pub fn text() -> Self {
        FieldKind::Input {
            control: InputControl::Text,
        }
    }

    /// Options carried by the select kinds, if any
    pub fn options(&self) -> Option<&[Choice]> {
        match self {
            FieldKind::Select { options }
            | FieldKind::SearchableSelect { options }
            | FieldKind::MultiSelect { options } => Some(options),
            FieldKind::Input { .. } | FieldKind::DatePicker => None,
        }
    }
}

/// Configuration for a single form field
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Key into the owning form state
    pub name: String,
    pub label: String,
    pub placeholder: String,
    pub description: String,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    pub fn new(name: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            placeholder: String::new(),
            description: String::new(),
            kind,
        }
    }

    pub fn placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }
}

/// Ordered, validated list of field descriptors
///
/// Rendering order equals list order. Construction fails on duplicate field
/// names and on select kinds with an empty option list; those are the
/// configuration errors the type system cannot rule out on its own.
#[derive(Debug, Clone)]
pub struct FieldList {
    fields: Vec<FieldDescriptor>,
}

impl FieldList {
    pub fn new(fields: Vec<FieldDescriptor>) -> Result<Self> {
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                bail!("duplicate field name '{}' in field list", field.name);
            }
            if let Some(options) = field.kind.options() {
                if options.is_empty() {
                    bail!("select field '{}' has an empty option list", field.name);
                }
            }
        }
        Ok(Self { fields })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FieldDescriptor> {
        self.fields.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldDescriptor> {
        self.fields.iter()
    }
}
