//! Shared HTTP client for transcription backends.

use anyhow::{Result, anyhow};
use once_cell::sync::Lazy;
use std::time::Duration;

use crate::provider::DEFAULT_TIMEOUT_SECS;

static HTTP_CLIENT: Lazy<Result<reqwest::Client, reqwest::Error>> = Lazy::new(|| {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()
});

/// Lazily built client, reused for connection pooling across requests.
pub fn get_http_client() -> Result<&'static reqwest::Client> {
    match &*HTTP_CLIENT {
        Ok(client) => Ok(client),
        Err(e) => Err(anyhow!("Failed to build HTTP client: {e}")),
    }
}
