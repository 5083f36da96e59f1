//! Persistent application settings.
//!
//! Stored as JSON under the platform config directory
//! (`~/.config/murmur/settings.json` on Linux). Missing or unreadable files
//! fall back to defaults so a fresh install works without setup.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::config::TranscriptionProvider;

pub const DEFAULT_FASTER_WHISPER_SERVER_URL: &str = "http://localhost:8000";
pub const DEFAULT_FASTER_WHISPER_SERVER_MODEL: &str = "Systran/faster-distil-whisper-large-v3";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Selected transcription provider
    #[serde(default)]
    pub provider: TranscriptionProvider,

    /// API keys by provider identifier ("openai", "groq")
    #[serde(default)]
    pub api_keys: HashMap<String, String>,

    /// Optional language hint passed to the transcription backend
    #[serde(default)]
    pub language: Option<String>,

    /// Selected recording device (None = system default)
    #[serde(default)]
    pub recording_device: Option<String>,

    /// Recording bitrate in kbit/s (advisory; raw PCM capture ignores it)
    #[serde(default = "default_bitrate_kbps")]
    pub bitrate_kbps: u32,

    /// Keep the capture stream open between recordings to cut start latency
    #[serde(default)]
    pub faster_rerecord: bool,

    /// Copy the transcript to the clipboard when transcription completes
    #[serde(default = "default_true")]
    pub copy_to_clipboard: bool,

    /// Type the transcript at the cursor when transcription completes
    #[serde(default)]
    pub paste_on_success: bool,

    /// Base URL of a self-hosted faster-whisper-server instance
    #[serde(default = "default_faster_whisper_server_url")]
    pub faster_whisper_server_url: String,

    /// Model name requested from faster-whisper-server
    #[serde(default = "default_faster_whisper_server_model")]
    pub faster_whisper_server_model: String,
}

fn default_bitrate_kbps() -> u32 {
    64
}

fn default_true() -> bool {
    true
}

fn default_faster_whisper_server_url() -> String {
    DEFAULT_FASTER_WHISPER_SERVER_URL.to_string()
}

fn default_faster_whisper_server_model() -> String {
    DEFAULT_FASTER_WHISPER_SERVER_MODEL.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider: TranscriptionProvider::default(),
            api_keys: HashMap::new(),
            language: None,
            recording_device: None,
            bitrate_kbps: default_bitrate_kbps(),
            faster_rerecord: false,
            copy_to_clipboard: true,
            paste_on_success: false,
            faster_whisper_server_url: default_faster_whisper_server_url(),
            faster_whisper_server_model: default_faster_whisper_server_model(),
        }
    }
}

impl Settings {
    /// Load settings from disk, falling back to defaults on any failure.
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                crate::verbose!("Failed to parse {}: {e}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save settings to disk as pretty-printed JSON.
    pub fn save(&self) -> Result<()> {
        let path = Self::path().context("Could not determine config directory")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Path of the settings file, if a config directory exists on this platform.
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("murmur").join("settings.json"))
    }

    /// API key (or server URL) for the given provider, falling back to the
    /// provider's environment variable.
    pub fn api_key_for(&self, provider: &TranscriptionProvider) -> Option<String> {
        if let Some(key) = self.api_keys.get(provider.as_str()) {
            return Some(key.clone());
        }
        std::env::var(provider.api_key_env_var()).ok()
    }

    /// Recording bitrate in bits per second, as the session controller expects it.
    pub fn bits_per_second(&self) -> u32 {
        self.bitrate_kbps * 1000
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.provider, TranscriptionProvider::OpenAI);
        assert_eq!(settings.bitrate_kbps, 64);
        assert!(settings.copy_to_clipboard);
        assert!(!settings.paste_on_success);
        assert!(!settings.faster_rerecord);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"provider":"groq"}"#).unwrap();
        assert_eq!(settings.provider, TranscriptionProvider::Groq);
        assert_eq!(settings.bitrate_kbps, 64);
        assert_eq!(
            settings.faster_whisper_server_url,
            DEFAULT_FASTER_WHISPER_SERVER_URL
        );
    }
}
