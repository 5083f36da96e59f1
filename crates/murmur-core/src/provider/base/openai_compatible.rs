//! Shared implementation for OpenAI-compatible transcription APIs.
//!
//! OpenAI Whisper, Groq and faster-whisper-server all accept the same shape:
//! multipart form upload with `model` and `file` fields, Bearer auth, JSON
//! response with a `text` field.

use anyhow::{Context, Result};
use serde::Deserialize;

use super::super::{MAX_UPLOAD_BYTES, TranscriptionRequest};

#[derive(Deserialize)]
struct OpenAiCompatibleResponse {
    text: String,
}

/// Transcribe audio through an OpenAI-compatible endpoint.
///
/// `api_key` may be empty for servers that do not authenticate; the
/// Authorization header is omitted in that case.
pub(crate) async fn openai_compatible_transcribe(
    client: &reqwest::Client,
    api_url: &str,
    model: &str,
    api_key: &str,
    request: &TranscriptionRequest,
) -> Result<String> {
    if request.audio.len() > MAX_UPLOAD_BYTES {
        anyhow::bail!(
            "Audio payload is {} bytes, exceeding the {} byte upload limit",
            request.audio.len(),
            MAX_UPLOAD_BYTES
        );
    }

    let mut form = reqwest::multipart::Form::new()
        .text("model", model.to_string())
        .part(
            "file",
            reqwest::multipart::Part::bytes(request.audio.clone())
                .file_name(request.filename.clone())
                .mime_str(&request.mime_type)?,
        );

    if let Some(language) = request.language.clone() {
        form = form.text("language", language);
    }

    let mut builder = client.post(api_url).multipart(form);
    if !api_key.is_empty() {
        builder = builder.header("Authorization", format!("Bearer {api_key}"));
    }

    let response = builder.send().await.context("Failed to send request")?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        anyhow::bail!("API error ({status}): {error_text}");
    }

    let text = response
        .text()
        .await
        .context("Failed to get response text")?;
    let resp: OpenAiCompatibleResponse =
        serde_json::from_str(&text).context("Failed to parse API response")?;

    Ok(resp.text)
}
