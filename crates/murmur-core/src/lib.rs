pub mod audio;
#[cfg(feature = "clipboard")]
pub mod clipboard;
pub mod config;
pub mod context;
pub mod error;
pub mod http;
pub mod output;
pub mod provider;
pub mod settings;
pub mod status;
pub mod store;
pub mod transcription;
#[cfg(feature = "typing")]
pub mod typing;
pub mod verbose;

pub use audio::{
    CancelOutcome, CapturePort, CaptureStream, CpalCapture, DeviceInfo, SESSION_SAMPLE_RATE,
    SessionController, SessionOptions, SessionState, StopMode,
};
#[cfg(feature = "clipboard")]
pub use clipboard::copy_to_clipboard;
pub use config::TranscriptionProvider;
pub use context::{AppContext, Ports, ToggleError, ToggleOutcome};
pub use error::{RecorderError, StoreError};
pub use output::{SystemTextOutput, TextOutput};
pub use provider::{DEFAULT_TIMEOUT_SECS, TranscriptionBackend, TranscriptionRequest};
pub use settings::Settings;
pub use status::{IndicatorSink, NullIndicatorSink, NullToastSink, ToastLevel, ToastSink};
pub use store::{JsonRecordingsDb, Recording, RecordingId, RecordingStore, RecordingsDb, TranscriptionStatus};
pub use transcription::{Dispatcher, TranscribeError, TranscribeOutcome};
pub use verbose::set_verbose;
