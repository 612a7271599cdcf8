use std::fmt;

use tracing::error;

use hxbit_core::ValidationError;
use hxbit_service::AuthError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Info,
    Error,
}

/// Short user-facing notice.
#[derive(Clone, Debug, PartialEq, Eq)]
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

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Info,
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

impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.kind {
            ToastKind::Success => "ok",
            ToastKind::Info => "info",
            ToastKind::Error => "error",
        };
        write!(f, "[{tag}] {}", self.message)
    }
}

/// Turn a command failure into a notice.
///
/// Validation and auth problems carry their own wording. Anything else is
/// logged and replaced by `generic`.
pub fn failure_toast(command: &str, err: &anyhow::Error, generic: &str) -> Toast {
    if let Some(validation) = err.downcast_ref::<ValidationError>() {
        return Toast::error(validation.to_string());
    }

    if let Some(auth) = err.downcast_ref::<AuthError>() {
        return Toast::error(auth.to_string());
    }

    error!(command, error = ?err, "command error");
    Toast::error(generic)
}
