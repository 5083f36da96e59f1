//! Error taxonomy for the recording session and store layers.
//!
//! Device and stream errors are handled locally by the session controller's
//! fallback ladder before they surface to callers. Persistence failures
//! propagate with the optimistic state rolled back. Nothing here is
//! process-fatal; every variant maps to a user-visible, retryable message.

use thiserror::Error;

use crate::store::RecordingId;

/// Errors produced by the capture stream and session layers.
#[derive(Debug, Error)]
pub enum RecorderError {
    /// The requested audio input device (or any fallback) could not be acquired.
    #[error("audio input device unavailable: {reason}")]
    DeviceUnavailable { reason: String },

    /// Access to the audio input was denied by the platform.
    #[error("permission to access the audio input was denied")]
    PermissionDenied,

    /// The previously opened capture stream is no longer delivering audio.
    #[error("the open capture stream is no longer active")]
    StreamInactive,

    /// The recorder could not be initialized against the capture stream.
    #[error("failed to initialize recorder on the capture stream: {reason}")]
    RecorderInitFailed { reason: String },

    /// Stopping the recorder failed and no captured audio could be recovered.
    #[error("failed to finalize the recording: {reason}")]
    RecordingStopFailed { reason: String },

    /// An operation that requires an open stream found none.
    #[error("no open capture stream")]
    NoOpenStream,
}

/// Errors produced by the recording store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No recording with the given id exists in the store.
    #[error("recording {0} not found")]
    NotFound(RecordingId),

    /// The persistence layer rejected the mutation; in-memory state has been
    /// left (or restored) exactly as it was before the call.
    #[error("persistence operation failed")]
    Persistence(#[source] anyhow::Error),
}
