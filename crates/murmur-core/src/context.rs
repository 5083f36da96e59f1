//! Application context: owns every long-lived component and exposes the
//! operations front-ends call. All shared state lives here, injected into
//! the pieces that need it; nothing in the crate reaches for globals.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context as _, Result};
use thiserror::Error;

use crate::audio::{
    CancelOutcome, CapturePort, DeviceInfo, SessionController, SessionOptions, SessionState,
    StopMode,
};
use crate::error::{RecorderError, StoreError};
use crate::output::TextOutput;
use crate::settings::Settings;
use crate::status::{IndicatorSink, ToastSink};
use crate::store::{Recording, RecordingId, RecordingStore, RecordingsDb};
use crate::transcription::{Dispatcher, TranscribeError, TranscribeOutcome};

/// Platform services injected at construction.
pub struct Ports {
    pub capture: Arc<dyn CapturePort>,
    pub db: Arc<dyn RecordingsDb>,
    pub output: Arc<dyn TextOutput>,
    pub toasts: Arc<dyn ToastSink>,
    pub indicator: Arc<dyn IndicatorSink>,
}

/// Why a toggle call failed: the recording session itself, or persisting the
/// finished recording. Callers that retry want to tell these apart.
#[derive(Debug, Error)]
pub enum ToggleError {
    #[error(transparent)]
    Recorder(#[from] RecorderError),

    /// The recording was finalized but could not be saved.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What a toggle call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Started,
    /// Recording stopped and stored under this id; transcription has been
    /// kicked off (its own success or failure is reported via toasts).
    Stopped(RecordingId),
}

pub struct AppContext {
    settings: Arc<Mutex<Settings>>,
    store: Arc<RecordingStore>,
    dispatcher: Dispatcher,
    session: tokio::sync::Mutex<SessionController>,
    capture: Arc<dyn CapturePort>,
    toasts: Arc<dyn ToastSink>,
    indicator: Arc<dyn IndicatorSink>,
}

impl AppContext {
    pub async fn new(settings: Settings, ports: Ports) -> Result<Self> {
        let settings = Arc::new(Mutex::new(settings));
        let store = Arc::new(RecordingStore::new(ports.db));
        store.sync().await.context("Failed to load recordings")?;

        let dispatcher = Dispatcher::new(store.clone(), settings.clone(), ports.output);
        let session = tokio::sync::Mutex::new(SessionController::new(ports.capture.clone()));

        Ok(Self {
            settings,
            store,
            dispatcher,
            session,
            capture: ports.capture,
            toasts: ports.toasts,
            indicator: ports.indicator,
        })
    }

    pub fn settings(&self) -> Settings {
        self.settings.lock().unwrap().clone()
    }

    pub fn update_settings(&self, settings: Settings) {
        *self.settings.lock().unwrap() = settings;
    }

    pub async fn session_state(&self) -> SessionState {
        self.session.lock().await.state()
    }

    /// Start a recording when idle, stop and pipeline it when recording.
    pub async fn toggle_recording(&self) -> Result<ToggleOutcome, ToggleError> {
        let mut session = self.session.lock().await;
        match session.state() {
            SessionState::Idle => {
                let opts = self.session_options();
                session
                    .start(&opts, self.toasts.as_ref(), self.indicator.as_ref())
                    .await?;
                Ok(ToggleOutcome::Started)
            }
            SessionState::Recording => {
                let mode = if self.settings.lock().unwrap().faster_rerecord {
                    StopMode::KeepStream
                } else {
                    StopMode::CloseStream
                };
                let recording = session
                    .stop(mode, self.toasts.as_ref(), self.indicator.as_ref())
                    .await?;
                drop(session);

                let id = recording.id.clone();
                if let Err(e) = self.store.add(recording).await {
                    self.toasts
                        .error("Failed to save recording", &e.to_string());
                    return Err(ToggleError::Store(e));
                }
                self.toasts
                    .success("Recording added!", "Your recording has been added");

                // Failures are already reported through toasts; the toggle
                // itself succeeded once the recording is stored.
                if let Err(e) = self.dispatcher.transcribe(&id, self.toasts.as_ref()).await {
                    crate::verbose!("Transcription after stop failed: {e}");
                }
                Ok(ToggleOutcome::Stopped(id))
            }
        }
    }

    /// Abort the active recording without persisting anything.
    pub async fn cancel_recording(&self) -> Result<CancelOutcome, RecorderError> {
        let mut session = self.session.lock().await;
        session
            .cancel(self.toasts.as_ref(), self.indicator.as_ref())
            .await
    }

    pub async fn transcribe(
        &self,
        id: &RecordingId,
    ) -> Result<TranscribeOutcome, TranscribeError> {
        self.dispatcher.transcribe(id, self.toasts.as_ref()).await
    }

    pub async fn copy_recording_text(&self, id: &RecordingId) -> Result<(), TranscribeError> {
        self.dispatcher
            .copy_recording_text(id, self.toasts.as_ref())
            .await
    }

    pub fn recordings(&self) -> Vec<Recording> {
        self.store.recordings()
    }

    pub fn get_recording(&self, id: &RecordingId) -> Option<Recording> {
        self.store.get(id)
    }

    pub async fn delete_recordings(&self, ids: &[RecordingId]) -> Result<()> {
        self.store.delete_by_ids(ids).await?;
        self.toasts
            .success("Recordings deleted", "Your recordings have been deleted");
        Ok(())
    }

    /// Write a recording's WAV blob to `path`.
    pub async fn export_recording(&self, id: &RecordingId, path: &Path) -> Result<()> {
        let recording = self
            .store
            .get(id)
            .with_context(|| format!("Recording {id} not found"))?;
        tokio::fs::write(path, &recording.blob)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub async fn enumerate_devices(&self) -> Result<Vec<DeviceInfo>, RecorderError> {
        self.capture.enumerate_devices().await
    }

    /// Release the capture stream. Call before exit.
    pub async fn shutdown(&self) {
        self.session.lock().await.close().await;
    }

    fn session_options(&self) -> SessionOptions {
        let settings = self.settings.lock().unwrap();
        SessionOptions {
            device_id: settings.recording_device.clone(),
            bits_per_second: settings.bits_per_second(),
        }
    }
}
