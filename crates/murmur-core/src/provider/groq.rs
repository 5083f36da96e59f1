//! Groq Whisper API backend.

use anyhow::Result;
use async_trait::async_trait;

use super::base::openai_compatible_transcribe;
use super::{BackendConfig, TranscriptionBackend, TranscriptionRequest};
use crate::config::TranscriptionProvider;

const API_URL: &str = "https://api.groq.com/openai/v1/audio/transcriptions";
const MODEL: &str = "whisper-large-v3";

pub struct GroqBackend;

#[async_trait]
impl TranscriptionBackend for GroqBackend {
    fn provider(&self) -> TranscriptionProvider {
        TranscriptionProvider::Groq
    }

    async fn transcribe(
        &self,
        client: &reqwest::Client,
        config: &BackendConfig,
        request: &TranscriptionRequest,
    ) -> Result<String> {
        openai_compatible_transcribe(client, API_URL, MODEL, &config.api_key, request).await
    }
}
