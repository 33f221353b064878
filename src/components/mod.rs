//! UI components
//!
//! Each screen region and overlay is its own component; the app coordinates
//! them and owns the shared state.

pub mod actions_menu;
pub mod calendar;
pub mod delete_dialog;
pub mod entity_dialog;
pub mod form;
pub mod help_dialog;
pub mod layout;
pub mod login;
pub mod quit_dialog;
pub mod records_table;
pub mod setup;
pub mod toast;

pub use actions_menu::{ActionsMenu, MenuChoice};
pub use entity_dialog::EntityDialog;
pub use form::{FormEvent, FormView};
pub use layout::centered_popup;
pub use login::LoginScreen;
pub use records_table::RecordsTable;
pub use setup::SetupWizard;
