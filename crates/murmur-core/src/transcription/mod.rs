//! Transcription dispatcher: takes a stored recording through the
//! mark-transcribing -> backend call -> persist-result -> post-process flow.
//!
//! No lock is held across the pipeline's await points; a transient mismatch
//! between memory and persisted state self-heals on the next successful
//! update. Concurrent requests for the same recording are single-flight:
//! the second caller gets `AlreadyInFlight` and nothing changes.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::config::TranscriptionProvider;
use crate::http::get_http_client;
use crate::output::TextOutput;
use crate::provider::{self, BackendConfig, TranscriptionBackend, TranscriptionRequest};
use crate::settings::Settings;
use crate::status::ToastSink;
use crate::store::{RecordingId, RecordingStore, TranscriptionStatus};

/// How a transcribe call concluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscribeOutcome {
    /// The backend produced this transcript.
    Transcribed(String),
    /// Another transcription for the same recording is still running.
    AlreadyInFlight,
}

#[derive(Debug, Error)]
pub enum TranscribeError {
    #[error("recording {0} not found")]
    NotFound(RecordingId),

    /// The backend rejected or failed the request. The payload is opaque and
    /// surfaced unchanged.
    ///
    /// Store failures never surface here: status updates around the backend
    /// call are absorbed as warnings and the collection self-heals on the
    /// next successful update.
    #[error("transcription backend failed")]
    Backend(#[source] anyhow::Error),
}

/// Function resolving a provider tag to a backend. Injectable so tests can
/// substitute scripted backends; production uses [`provider::resolve`].
pub type BackendResolver =
    Arc<dyn Fn(&TranscriptionProvider) -> Arc<dyn TranscriptionBackend> + Send + Sync>;

pub struct Dispatcher {
    store: Arc<RecordingStore>,
    settings: Arc<Mutex<Settings>>,
    output: Arc<dyn TextOutput>,
    resolver: BackendResolver,
    in_flight: Mutex<HashSet<RecordingId>>,
}

impl Dispatcher {
    pub fn new(
        store: Arc<RecordingStore>,
        settings: Arc<Mutex<Settings>>,
        output: Arc<dyn TextOutput>,
    ) -> Self {
        Self::with_resolver(store, settings, output, Arc::new(provider::resolve))
    }

    pub fn with_resolver(
        store: Arc<RecordingStore>,
        settings: Arc<Mutex<Settings>>,
        output: Arc<dyn TextOutput>,
        resolver: BackendResolver,
    ) -> Self {
        Self {
            store,
            settings,
            output,
            resolver,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Run the full transcription pipeline for one recording.
    pub async fn transcribe(
        &self,
        id: &RecordingId,
        toasts: &dyn ToastSink,
    ) -> Result<TranscribeOutcome, TranscribeError> {
        {
            let mut in_flight = self.in_flight.lock().unwrap();
            if !in_flight.insert(id.clone()) {
                toasts.info(
                    "Transcription already in progress",
                    "This recording is being transcribed.",
                );
                return Ok(TranscribeOutcome::AlreadyInFlight);
            }
        }

        let result = self.transcribe_inner(id, toasts).await;
        self.in_flight.lock().unwrap().remove(id);
        result.map(TranscribeOutcome::Transcribed)
    }

    async fn transcribe_inner(
        &self,
        id: &RecordingId,
        toasts: &dyn ToastSink,
    ) -> Result<String, TranscribeError> {
        let Some(recording) = self.store.get(id) else {
            toasts.error(
                &format!("Recording {id} not found"),
                "It may have been deleted. Please try again.",
            );
            return Err(TranscribeError::NotFound(id.clone()));
        };

        toasts.progress("Transcribing...", "Your recording is being transcribed.");

        let mut transcribing = recording.clone();
        transcribing.transcription_status = TranscriptionStatus::Transcribing;
        if let Err(e) = self.store.update(transcribing).await {
            // Not fatal: the backend call proceeds and the status converges
            // on the next successful update.
            toasts.warning(
                "Could not mark the recording as transcribing",
                "Still trying to transcribe...",
            );
            crate::verbose!("Status update to TRANSCRIBING failed: {e}");
        }

        // Resolved on every call so a settings change takes effect immediately.
        let (provider_tag, backend_config, language) = self.backend_config();
        let backend = (self.resolver)(&provider_tag);

        let request = TranscriptionRequest {
            audio: recording.blob.clone(),
            filename: format!("{id}.wav"),
            mime_type: "audio/wav".to_string(),
            language,
        };

        let client = get_http_client().map_err(TranscribeError::Backend)?;
        match backend.transcribe(client, &backend_config, &request).await {
            Err(backend_err) => {
                let mut reverted = recording.clone();
                reverted.transcription_status = TranscriptionStatus::Unprocessed;
                if let Err(e) = self.store.update(reverted).await {
                    crate::verbose!("Status revert to UNPROCESSED failed: {e}");
                }
                toasts.error(
                    &format!("Error transcribing recording {id}"),
                    "Please try again.",
                );
                Err(TranscribeError::Backend(backend_err))
            }
            Ok(text) => {
                let mut done = recording.clone();
                done.transcription_status = TranscriptionStatus::Done;
                done.transcribed_text = text.clone();
                if let Err(e) = self.store.update(done).await {
                    // The transcript is still returned to the caller; only
                    // persistence lagged behind.
                    toasts.warning("Transcribed, but saving the result failed", &text);
                    crate::verbose!("Status update to DONE failed: {e}");
                } else {
                    toasts.success("Transcription complete!", "Check it out in your recordings");
                }

                self.post_process(&text, toasts).await;
                Ok(text)
            }
        }
    }

    /// Copy the transcript of an already-transcribed recording to the
    /// clipboard. No-op on empty text.
    pub async fn copy_recording_text(
        &self,
        id: &RecordingId,
        toasts: &dyn ToastSink,
    ) -> Result<(), TranscribeError> {
        let Some(recording) = self.store.get(id) else {
            return Err(TranscribeError::NotFound(id.clone()));
        };
        if recording.transcribed_text.is_empty() {
            return Ok(());
        }
        match self.output.copy(&recording.transcribed_text).await {
            Ok(()) => toasts.success("Copied transcript to clipboard", &recording.transcribed_text),
            Err(e) => toasts.error("Error copying transcript to clipboard", &e.to_string()),
        }
        Ok(())
    }

    // Clipboard and cursor paste run only on success with non-empty text,
    // each gated by its own flag, each reported on its own; a clipboard
    // failure never blocks the paste step.
    async fn post_process(&self, text: &str, toasts: &dyn ToastSink) {
        if text.is_empty() {
            return;
        }

        let (copy_enabled, paste_enabled) = {
            let settings = self.settings.lock().unwrap();
            (settings.copy_to_clipboard, settings.paste_on_success)
        };

        if copy_enabled {
            match self.output.copy(text).await {
                Ok(()) => toasts.success("Transcription completed and copied to clipboard!", text),
                Err(e) => {
                    toasts.error("Error copying transcription to clipboard", &e.to_string())
                }
            }
        }

        if paste_enabled {
            match self.output.type_at_cursor(text).await {
                Ok(()) => toasts.success("Transcription completed and pasted to cursor!", text),
                Err(e) => toasts.error("Error pasting transcription to cursor", &e.to_string()),
            }
        }
    }

    fn backend_config(&self) -> (TranscriptionProvider, BackendConfig, Option<String>) {
        let settings = self.settings.lock().unwrap();
        let provider_tag = settings.provider.clone();
        let config = BackendConfig {
            api_key: settings.api_key_for(&provider_tag).unwrap_or_default(),
            server_url: settings.faster_whisper_server_url.clone(),
            model: settings.faster_whisper_server_model.clone(),
        };
        (provider_tag, config, settings.language.clone())
    }
}
