//! Platform capture seam: the traits the session layer records through.
//!
//! Production code uses [`super::cpal_backend::CpalCapture`]; tests drive the
//! session controller with scripted fakes.

use async_trait::async_trait;

use crate::error::RecorderError;

/// An available audio input device.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub id: String,
    pub label: String,
    pub is_default: bool,
}

/// Factory for capture streams. One per platform audio backend.
#[async_trait]
pub trait CapturePort: Send + Sync {
    /// List available audio input devices.
    async fn enumerate_devices(&self) -> Result<Vec<DeviceInfo>, RecorderError>;

    /// Open a capture stream bound to `device_id`. An absent or unknown id
    /// falls back to the system default device.
    async fn open(&self, device_id: Option<&str>)
    -> Result<Box<dyn CaptureStream>, RecorderError>;
}

/// An open handle to a hardware audio input source.
///
/// A stream may outlive a single recording ("faster rerecord"); the session
/// controller checks [`is_active`](CaptureStream::is_active) before reuse.
#[async_trait]
pub trait CaptureStream: Send + Sync {
    /// Liveness check without side effects.
    fn is_active(&self) -> bool;

    /// Sample rate the stream delivers audio at.
    fn sample_rate(&self) -> u32;

    /// Initialize the recorder against this stream and begin buffering
    /// samples. `bits_per_second` is advisory; raw PCM capture ignores it.
    async fn arm_recorder(&mut self, bits_per_second: u32) -> Result<(), RecorderError>;

    /// Stop buffering and flush captured samples. Audio captured before a
    /// partial stop error is preserved when obtainable; otherwise this fails
    /// with `RecordingStopFailed`.
    async fn take_recording(&mut self) -> Result<Vec<f32>, RecorderError>;

    /// Stop buffering and drop captured samples.
    async fn discard_recording(&mut self);

    /// Release all underlying resources. Idempotent: closing an
    /// already-closed stream is a no-op.
    async fn close(&mut self);
}
