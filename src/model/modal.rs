//! Modal stack for managing overlays
//!
//! A single enum-based stack instead of a boolean flag per dialog. Modals are
//! rendered bottom to top; only the top modal receives input events.

/// Represents a modal overlay displayed on top of the main UI
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    /// Quit confirmation dialog
    QuitConfirm,
    /// Entity create/edit dialog (state lives in the dialog component)
    EntityForm,
    /// Row-action menu for the highlighted record
    RowActions,
    /// Delete confirmation for one record
    DeleteConfirm { id: String, label: String },
    /// Help overlay listing key bindings
    Help { scroll_offset: usize },
}

/// A stack of modal overlays
#[derive(Debug, Default)]
pub struct ModalStack {
    stack: Vec<Modal>,
}

impl ModalStack {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub fn push(&mut self, modal: Modal) {
        self.stack.push(modal);
    }

    pub fn pop(&mut self) -> Option<Modal> {
        self.stack.pop()
    }

    /// Top modal without removing it
    pub fn top(&self) -> Option<&Modal> {
        self.stack.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut Modal> {
        self.stack.last_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modal_stack_push_pop() {
        let mut stack = ModalStack::new();
        assert!(stack.top().is_none());

        stack.push(Modal::RowActions);
        stack.push(Modal::EntityForm);

        assert_eq!(stack.pop(), Some(Modal::EntityForm));
        assert_eq!(stack.pop(), Some(Modal::RowActions));
        assert!(stack.top().is_none());
    }

    #[test]
    fn test_modal_stack_top() {
        let mut stack = ModalStack::new();
        stack.push(Modal::QuitConfirm);
        assert_eq!(stack.top(), Some(&Modal::QuitConfirm));

        stack.push(Modal::Help { scroll_offset: 0 });
        assert_eq!(stack.top(), Some(&Modal::Help { scroll_offset: 0 }));
    }

    #[test]
    fn test_modal_stack_top_mut() {
        let mut stack = ModalStack::new();
        stack.push(Modal::Help { scroll_offset: 0 });

        if let Some(Modal::Help { scroll_offset }) = stack.top_mut() {
            *scroll_offset = 3;
        }

        assert_eq!(stack.top(), Some(&Modal::Help { scroll_offset: 3 }));
    }
}
