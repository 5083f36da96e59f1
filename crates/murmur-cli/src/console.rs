//! Console renderings of the core's status seams.

use murmur_core::{IndicatorSink, SessionState, ToastLevel, ToastSink};

/// Prints toasts to stderr with a severity prefix.
pub struct ConsoleToasts;

impl ToastSink for ConsoleToasts {
    fn toast(&self, level: ToastLevel, title: &str, description: &str) {
        let prefix = match level {
            ToastLevel::Info => "info",
            ToastLevel::Success => "ok",
            ToastLevel::Warning => "warn",
            ToastLevel::Error => "error",
            ToastLevel::Progress => "...",
        };
        if description.is_empty() {
            eprintln!("[{prefix}] {title}");
        } else {
            eprintln!("[{prefix}] {title}: {description}");
        }
    }
}

/// Renders the session state as a one-line status marker.
pub struct ConsoleIndicator;

impl IndicatorSink for ConsoleIndicator {
    fn set_state(&self, state: SessionState) -> anyhow::Result<()> {
        match state {
            SessionState::Recording => eprintln!("● recording"),
            SessionState::Idle => eprintln!("○ idle"),
        }
        Ok(())
    }
}
