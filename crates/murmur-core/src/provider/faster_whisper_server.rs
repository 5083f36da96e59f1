//! Self-hosted faster-whisper-server backend.
//!
//! Speaks the OpenAI transcription API shape against a configurable base URL;
//! authentication is optional and usually absent for local deployments.

use anyhow::Result;
use async_trait::async_trait;

use super::base::openai_compatible_transcribe;
use super::{BackendConfig, TranscriptionBackend, TranscriptionRequest};
use crate::config::TranscriptionProvider;

pub struct FasterWhisperServerBackend;

#[async_trait]
impl TranscriptionBackend for FasterWhisperServerBackend {
    fn provider(&self) -> TranscriptionProvider {
        TranscriptionProvider::FasterWhisperServer
    }

    async fn transcribe(
        &self,
        client: &reqwest::Client,
        config: &BackendConfig,
        request: &TranscriptionRequest,
    ) -> Result<String> {
        let api_url = format!(
            "{}/v1/audio/transcriptions",
            config.server_url.trim_end_matches('/')
        );
        openai_compatible_transcribe(client, &api_url, &config.model, &config.api_key, request)
            .await
    }
}
