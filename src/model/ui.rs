//! UI state - presentation types separate from domain data

/// Main application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// First-run configuration wizard
    Setup,
    /// Sign-in screen
    Login,
    /// Main console
    Running,
}
