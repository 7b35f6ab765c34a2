//! Toast seam used by mutation side effects.

use strum_macros::Display;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn show_toast(&self, toast: Toast);
}

/// Routes toasts into the log when nothing is listening for them.
#[derive(Debug, Clone, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn show_toast(&self, toast: Toast) {
        match toast.kind {
            ToastKind::Error => warn!(kind = %toast.kind, "{}", toast.message),
            ToastKind::Success => info!(kind = %toast.kind, "{}", toast.message),
        }
    }
}
