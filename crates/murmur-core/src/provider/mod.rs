//! Transcription backends.
//!
//! Backend errors are opaque payloads to the rest of the pipeline: the
//! dispatcher passes them through unchanged and never interprets their kind.

mod base;
mod faster_whisper_server;
mod groq;
mod openai;

pub use faster_whisper_server::FasterWhisperServerBackend;
pub use groq::GroqBackend;
pub use openai::OpenAiBackend;

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::config::TranscriptionProvider;

/// Request timeout for transcription uploads.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Upload size limit enforced for hosted APIs (OpenAI rejects larger files).
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// One transcription call's payload and options.
#[derive(Debug, Clone)]
pub struct TranscriptionRequest {
    /// Audio container bytes (WAV)
    pub audio: Vec<u8>,
    pub filename: String,
    pub mime_type: String,
    /// Optional language hint
    pub language: Option<String>,
}

/// Credentials and endpoint configuration, resolved from settings at call time.
#[derive(Debug, Clone, Default)]
pub struct BackendConfig {
    /// API key for hosted providers
    pub api_key: String,
    /// Base URL for self-hosted providers
    pub server_url: String,
    /// Model override for self-hosted providers
    pub model: String,
}

/// A transcription service invoked with an audio payload.
#[async_trait]
pub trait TranscriptionBackend: Send + Sync {
    fn provider(&self) -> TranscriptionProvider;

    async fn transcribe(
        &self,
        client: &reqwest::Client,
        config: &BackendConfig,
        request: &TranscriptionRequest,
    ) -> Result<String>;
}

/// Resolve a provider tag to its backend implementation.
///
/// This is the single lookup point for backend dispatch; it runs on every
/// call and is never cached, so a settings change takes effect immediately.
pub fn resolve(provider: &TranscriptionProvider) -> Arc<dyn TranscriptionBackend> {
    match provider {
        TranscriptionProvider::OpenAI => Arc::new(OpenAiBackend),
        TranscriptionProvider::Groq => Arc::new(GroqBackend),
        TranscriptionProvider::FasterWhisperServer => Arc::new(FasterWhisperServerBackend),
    }
}
