//! Stream manager: owns the possibly-reusable capture stream.

use std::sync::Arc;

use super::capture::{CapturePort, CaptureStream};
use crate::error::RecorderError;

/// Reason a reused stream could not be armed directly.
///
/// The three conditions are disjoint and reported distinctly for progress
/// messaging, but they converge on the same corrective action: open a fresh
/// stream and retry once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartFallback {
    /// No stream is currently open.
    NoOpenStream,
    /// A stream is open but no longer delivering audio.
    StreamInactive,
    /// Recorder initialization against the open stream failed.
    RecorderInitFailed,
}

/// Owner of the capture stream. The session controller references the stream
/// through this manager and never holds it directly.
pub struct StreamManager {
    port: Arc<dyn CapturePort>,
    stream: Option<Box<dyn CaptureStream>>,
}

impl StreamManager {
    pub fn new(port: Arc<dyn CapturePort>) -> Self {
        Self { port, stream: None }
    }

    /// Open a fresh stream bound to `device_id`, replacing any existing one.
    pub async fn open_stream(&mut self, device_id: Option<&str>) -> Result<(), RecorderError> {
        self.close_stream().await;
        let stream = self.port.open(device_id).await?;
        self.stream = Some(stream);
        Ok(())
    }

    /// Liveness check without side effects.
    pub fn is_stream_open(&self) -> bool {
        self.stream.as_ref().is_some_and(|s| s.is_active())
    }

    /// Release the stream and its underlying resources. Idempotent.
    pub async fn close_stream(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.close().await;
        }
    }

    pub fn stream_mut(&mut self) -> Option<&mut Box<dyn CaptureStream>> {
        self.stream.as_mut()
    }

    /// Classify why the currently held stream cannot be reused, if it can't.
    pub fn reuse_obstacle(&self) -> Option<StartFallback> {
        match &self.stream {
            None => Some(StartFallback::NoOpenStream),
            Some(stream) if !stream.is_active() => Some(StartFallback::StreamInactive),
            Some(_) => None,
        }
    }
}
