use serde::{Deserialize, Serialize};
use std::fmt;

/// Available transcription providers.
///
/// This is a closed set: backend selection is tagged-variant dispatch through
/// [`crate::provider::resolve`], never a string-keyed map.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptionProvider {
    #[default]
    OpenAI,
    Groq,
    #[serde(rename = "faster-whisper-server")]
    FasterWhisperServer,
}

impl TranscriptionProvider {
    /// Get the string identifier for this provider
    pub fn as_str(&self) -> &'static str {
        match self {
            TranscriptionProvider::OpenAI => "openai",
            TranscriptionProvider::Groq => "groq",
            TranscriptionProvider::FasterWhisperServer => "faster-whisper-server",
        }
    }

    /// Get the environment variable name for this provider's API key (or URL for self-hosted)
    pub fn api_key_env_var(&self) -> &'static str {
        match self {
            TranscriptionProvider::OpenAI => "OPENAI_API_KEY",
            TranscriptionProvider::Groq => "GROQ_API_KEY",
            TranscriptionProvider::FasterWhisperServer => "FASTER_WHISPER_SERVER_URL",
        }
    }

    /// List all available providers
    pub fn all() -> &'static [TranscriptionProvider] {
        &[
            TranscriptionProvider::OpenAI,
            TranscriptionProvider::Groq,
            TranscriptionProvider::FasterWhisperServer,
        ]
    }

    /// Human-readable display name for this provider
    pub fn display_name(&self) -> &'static str {
        match self {
            TranscriptionProvider::OpenAI => "OpenAI",
            TranscriptionProvider::Groq => "Groq",
            TranscriptionProvider::FasterWhisperServer => "faster-whisper-server",
        }
    }

    /// Whether this provider requires an API key (vs a server URL)
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, TranscriptionProvider::FasterWhisperServer)
    }
}

impl fmt::Display for TranscriptionProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TranscriptionProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" | "whisper" => Ok(TranscriptionProvider::OpenAI),
            "groq" => Ok(TranscriptionProvider::Groq),
            "faster-whisper-server" | "fasterwhisperserver" => {
                Ok(TranscriptionProvider::FasterWhisperServer)
            }
            _ => Err(format!(
                "Unknown provider: {}. Available: openai, groq, faster-whisper-server",
                s
            )),
        }
    }
}
