//! Toast notifications
//!
//! Short-lived feedback shown after a submission resolves. Success uses the
//! default variant; failures use the destructive variant with a deliberately
//! generic message.

use std::time::{Duration, Instant};

/// How long a toast stays on screen
pub const TOAST_TTL: Duration = Duration::from_secs(4);

/// The one message users see when a store call fails, regardless of cause
pub const GENERIC_FAILURE: &str = "Something went wrong, please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastVariant {
    #[default]
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub description: String,
    pub variant: ToastVariant,
}

impl Toast {
    pub fn success(description: impl Into<String>) -> Toast {
        Toast {
            description: description.into(),
            variant: ToastVariant::Default,
        }
    }

    pub fn failure() -> Toast {
        Toast {
            description: GENERIC_FAILURE.to_string(),
            variant: ToastVariant::Destructive,
        }
    }
}

/// A toast plus the instant it appeared
#[derive(Debug)]
pub struct ActiveToast {
    pub toast: Toast,
    pub shown_at: Instant,
}

impl ActiveToast {
    pub fn new(toast: Toast) -> Self {
        Self {
            toast,
            shown_at: Instant::now(),
        }
    }

    pub fn expired(&self) -> bool {
        self.shown_at.elapsed() >= TOAST_TTL
    }
}
