//! Recording session controller: the IDLE/RECORDING state machine.
//!
//! Callers are expected to serialize start/stop/cancel invocations (the app
//! context holds the controller behind an async mutex); the controller itself
//! only exposes the legal transitions.

use std::sync::Arc;

use super::capture::CapturePort;
use super::stream::{StartFallback, StreamManager};
use super::wav;
use crate::error::RecorderError;
use crate::status::{IndicatorSink, ToastSink};
use crate::store::Recording;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Recording,
}

/// What happens to the capture stream when a recording stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopMode {
    /// Keep the stream open for the next recording ("faster rerecord").
    KeepStream,
    /// Release the stream.
    CloseStream,
}

/// Result of a cancel request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    Cancelled,
    /// Nothing to cancel. A recoverable notice, not an error.
    NoActiveSession,
}

/// Per-session configuration.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Recording device (None = system default)
    pub device_id: Option<String>,
    /// Advisory bitrate; raw PCM capture ignores it
    pub bits_per_second: u32,
}

pub struct SessionController {
    streams: StreamManager,
    state: SessionState,
}

impl SessionController {
    pub fn new(port: Arc<dyn CapturePort>) -> Self {
        Self {
            streams: StreamManager::new(port),
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_stream_open(&self) -> bool {
        self.streams.is_stream_open()
    }

    /// IDLE -> RECORDING.
    ///
    /// Tries to arm the recorder on the existing stream first; on any of the
    /// three fallback conditions it reports progress, opens a fresh stream
    /// and retries once. On failure the state stays `Idle`.
    pub async fn start(
        &mut self,
        opts: &SessionOptions,
        toasts: &dyn ToastSink,
        indicator: &dyn IndicatorSink,
    ) -> Result<(), RecorderError> {
        toasts.progress(
            "Setting up",
            "Initializing your recording session and checking microphone access...",
        );

        if let Some(fallback) = self.try_arm_existing(opts).await {
            report_fallback(toasts, fallback);

            self.streams.close_stream().await;
            self.streams.open_stream(opts.device_id.as_deref()).await?;
            match self.streams.stream_mut() {
                Some(stream) => stream.arm_recorder(opts.bits_per_second).await?,
                None => return Err(RecorderError::NoOpenStream),
            }
            toasts.progress("Recording session created", "Recording in progress...");
        }

        self.state = SessionState::Recording;
        self.update_indicator(toasts, indicator);
        Ok(())
    }

    /// RECORDING -> IDLE, producing a finalized recording.
    ///
    /// Audio captured before a partial stop error is preserved when the
    /// stream can still deliver it; otherwise the call fails with
    /// `RecordingStopFailed`, no entity is produced and the state is left
    /// as-is so the caller can retry or cancel.
    pub async fn stop(
        &mut self,
        mode: StopMode,
        toasts: &dyn ToastSink,
        indicator: &dyn IndicatorSink,
    ) -> Result<Recording, RecorderError> {
        let (samples, sample_rate) = match self.streams.stream_mut() {
            Some(stream) => {
                let sample_rate = stream.sample_rate();
                (stream.take_recording().await?, sample_rate)
            }
            None => return Err(RecorderError::NoOpenStream),
        };

        if mode == StopMode::CloseStream {
            self.streams.close_stream().await;
        }

        self.state = SessionState::Idle;
        self.update_indicator(toasts, indicator);

        let blob = wav::encode_wav_f32(&samples, sample_rate);
        Ok(Recording::new(blob))
    }

    /// RECORDING -> IDLE, discarding captured audio. Never persists.
    pub async fn cancel(
        &mut self,
        toasts: &dyn ToastSink,
        indicator: &dyn IndicatorSink,
    ) -> Result<CancelOutcome, RecorderError> {
        if self.streams.stream_mut().is_none() {
            toasts.success(
                "No recording session found to cancel",
                "You can start a new recording session",
            );
            return Ok(CancelOutcome::NoActiveSession);
        }

        if let Some(stream) = self.streams.stream_mut() {
            stream.discard_recording().await;
        }
        self.streams.close_stream().await;

        self.state = SessionState::Idle;
        self.update_indicator(toasts, indicator);
        Ok(CancelOutcome::Cancelled)
    }

    /// Release the stream, e.g. at application shutdown.
    pub async fn close(&mut self) {
        self.streams.close_stream().await;
        self.state = SessionState::Idle;
    }

    async fn try_arm_existing(&mut self, opts: &SessionOptions) -> Option<StartFallback> {
        if let Some(obstacle) = self.streams.reuse_obstacle() {
            return Some(obstacle);
        }
        let stream = self.streams.stream_mut()?;
        match stream.arm_recorder(opts.bits_per_second).await {
            Ok(()) => None,
            Err(e) => {
                crate::verbose!("Recorder init on reused stream failed: {e}");
                Some(StartFallback::RecorderInitFailed)
            }
        }
    }

    // A failing indicator must not roll back the transition; it is reported
    // through the toast sink instead.
    fn update_indicator(&self, toasts: &dyn ToastSink, indicator: &dyn IndicatorSink) {
        if let Err(e) = indicator.set_state(self.state) {
            toasts.warning("Could not update the recording indicator", &e.to_string());
        }
    }
}

fn report_fallback(toasts: &dyn ToastSink, fallback: StartFallback) {
    match fallback {
        StartFallback::NoOpenStream => toasts.progress(
            "Existing recording session not found",
            "Creating a new recording session...",
        ),
        StartFallback::StreamInactive => toasts.progress(
            "Existing recording session is inactive",
            "Refreshing recording session...",
        ),
        StartFallback::RecorderInitFailed => toasts.progress(
            "Error initializing recorder with the open session",
            "Retrying with a fresh recording session...",
        ),
    }
}
