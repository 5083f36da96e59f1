use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier of a recording, assigned at creation and immutable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordingId(String);

impl RecordingId {
    /// Generate a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transcription state of a recording.
///
/// Only `Transcribing` transitions directly to `Done`, or back to
/// `Unprocessed` when the backend fails. `Done` and `Unprocessed` are stable
/// until a new transcription attempt starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TranscriptionStatus {
    #[default]
    Unprocessed,
    Transcribing,
    Done,
}

impl TranscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranscriptionStatus::Unprocessed => "UNPROCESSED",
            TranscriptionStatus::Transcribing => "TRANSCRIBING",
            TranscriptionStatus::Done => "DONE",
        }
    }
}

impl fmt::Display for TranscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A completed recording: audio payload plus transcription state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recording {
    pub id: RecordingId,
    pub title: String,
    pub subtitle: String,
    pub timestamp: DateTime<Utc>,
    /// WAV container bytes. Immutable once set. Persisted as a sidecar file,
    /// not inlined into the JSON index.
    #[serde(skip)]
    pub blob: Vec<u8>,
    pub transcribed_text: String,
    pub transcription_status: TranscriptionStatus,
}

impl Recording {
    /// Create a new unprocessed recording from a finalized audio payload.
    pub fn new(blob: Vec<u8>) -> Self {
        Self {
            id: RecordingId::generate(),
            title: String::new(),
            subtitle: String::new(),
            timestamp: Utc::now(),
            blob,
            transcribed_text: String::new(),
            transcription_status: TranscriptionStatus::Unprocessed,
        }
    }
}
