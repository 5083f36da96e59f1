//! Status reporting seams: toasts and the session-state indicator.
//!
//! Both are fire-and-forget collaborators. A toast never affects control
//! flow; an indicator failure is reported through the toast sink but never
//! rolls back the state transition that triggered it.

use crate::audio::SessionState;

/// Severity of a toast message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Warning,
    Error,
    /// Transient progress, e.g. "retrying with new stream". Distinct from
    /// terminal failures so the UI can render it as a spinner.
    Progress,
}

/// Fire-and-forget notification sink (toast / desktop notification analogue).
pub trait ToastSink: Send + Sync {
    fn toast(&self, level: ToastLevel, title: &str, description: &str);

    fn info(&self, title: &str, description: &str) {
        self.toast(ToastLevel::Info, title, description);
    }
    fn success(&self, title: &str, description: &str) {
        self.toast(ToastLevel::Success, title, description);
    }
    fn warning(&self, title: &str, description: &str) {
        self.toast(ToastLevel::Warning, title, description);
    }
    fn error(&self, title: &str, description: &str) {
        self.toast(ToastLevel::Error, title, description);
    }
    fn progress(&self, title: &str, description: &str) {
        self.toast(ToastLevel::Progress, title, description);
    }
}

/// Toast sink that drops everything. Useful in tests and headless contexts.
pub struct NullToastSink;

impl ToastSink for NullToastSink {
    fn toast(&self, _level: ToastLevel, _title: &str, _description: &str) {}
}

/// Externally observed session-state indicator (tray icon analogue).
pub trait IndicatorSink: Send + Sync {
    fn set_state(&self, state: SessionState) -> anyhow::Result<()>;
}

/// Indicator that accepts every state change silently.
pub struct NullIndicatorSink;

impl IndicatorSink for NullIndicatorSink {
    fn set_state(&self, _state: SessionState) -> anyhow::Result<()> {
        Ok(())
    }
}
