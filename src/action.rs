//! Action enum - All possible application actions
//!
//! Actions are discrete operations that the application can perform.
//! Components emit Actions in response to events, and the App processes
//! them to update state.

use crate::model::form::ValidatedValues;
use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick for time-based updates (submission polling, toast expiry)
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Force quit without confirmation
    ForceQuit,

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────
    /// Move to next row in the active table
    NextRow,
    /// Move to previous row
    PrevRow,
    /// Jump to first row
    FirstRow,
    /// Jump to last row
    LastRow,
    /// Switch to next entity tab
    NextTab,
    /// Switch to previous entity tab
    PrevTab,

    // ─────────────────────────────────────────────────────────────────────────
    // Table
    // ─────────────────────────────────────────────────────────────────────────
    /// Toggle sorting on a column (asc on first press, then flips)
    SortColumn(usize),
    /// Toggle selection of the highlighted row
    ToggleRowSelection,
    /// Select every visible row
    SelectAllRows,
    /// Clear row selection
    ClearSelection,

    // ─────────────────────────────────────────────────────────────────────────
    // Filter
    // ─────────────────────────────────────────────────────────────────────────
    /// Enter filter entry mode
    EnterFilterMode,
    /// Leave filter entry mode
    ExitFilterMode,
    /// Add character to filter query
    FilterInput(char),
    /// Remove last character from filter query
    FilterBackspace,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    /// Open quit confirmation dialog
    OpenQuitDialog,
    /// Open the entity dialog in create mode for the active tab
    OpenCreateDialog,
    /// Open the row-action menu for the highlighted record
    OpenRowActions,
    /// Open the entity dialog in edit mode seeded with the highlighted record
    OpenEditDialog,
    /// Open delete confirmation for the highlighted record
    OpenDeleteConfirm,
    /// Open help overlay
    OpenHelp,
    /// Close the current modal
    CloseModal,
    /// Confirm the current modal action
    ConfirmModal,
    /// Navigate up in modal
    ModalUp,
    /// Navigate down in modal
    ModalDown,

    // ─────────────────────────────────────────────────────────────────────────
    // Data
    // ─────────────────────────────────────────────────────────────────────────
    /// Entity form passed validation; start the store call
    SubmitEntityForm(ValidatedValues),
    /// Login form passed validation; start the sign-in call
    SubmitLogin(ValidatedValues),
    /// Reload every table from the store
    RefreshRecords,

    // ─────────────────────────────────────────────────────────────────────────
    // Setup Wizard
    // ─────────────────────────────────────────────────────────────────────────
    /// Confirm setup configuration
    SetupConfirm,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::NextRow => write!(f, "NextRow"),
            Action::PrevRow => write!(f, "PrevRow"),
            Action::FirstRow => write!(f, "FirstRow"),
            Action::LastRow => write!(f, "LastRow"),
            Action::NextTab => write!(f, "NextTab"),
            Action::PrevTab => write!(f, "PrevTab"),
            Action::SortColumn(i) => write!(f, "SortColumn({})", i),
            Action::ToggleRowSelection => write!(f, "ToggleRowSelection"),
            Action::SelectAllRows => write!(f, "SelectAllRows"),
            Action::ClearSelection => write!(f, "ClearSelection"),
            Action::EnterFilterMode => write!(f, "EnterFilterMode"),
            Action::ExitFilterMode => write!(f, "ExitFilterMode"),
            Action::FilterInput(c) => write!(f, "FilterInput('{}')", c),
            Action::FilterBackspace => write!(f, "FilterBackspace"),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::OpenCreateDialog => write!(f, "OpenCreateDialog"),
            Action::OpenRowActions => write!(f, "OpenRowActions"),
            Action::OpenEditDialog => write!(f, "OpenEditDialog"),
            Action::OpenDeleteConfirm => write!(f, "OpenDeleteConfirm"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::CloseModal => write!(f, "CloseModal"),
            Action::ConfirmModal => write!(f, "ConfirmModal"),
            Action::ModalUp => write!(f, "ModalUp"),
            Action::ModalDown => write!(f, "ModalDown"),
            Action::SubmitEntityForm(_) => write!(f, "SubmitEntityForm"),
            Action::SubmitLogin(_) => write!(f, "SubmitLogin"),
            Action::RefreshRecords => write!(f, "RefreshRecords"),
            Action::SetupConfirm => write!(f, "SetupConfirm"),
        }
    }
}
