//! Session lifecycle: start fallbacks, stop modes, cancel, indicator behavior.

mod support;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use murmur_core::audio::{
    CancelOutcome, SessionController, SessionOptions, SessionState, StopMode,
};
use murmur_core::error::RecorderError;
use murmur_core::status::ToastLevel;

use support::{CollectedToasts, FakeCapture, FakeIndicator};

fn opts() -> SessionOptions {
    SessionOptions {
        device_id: None,
        bits_per_second: 64_000,
    }
}

fn controller() -> (SessionController, Arc<support::CaptureScript>) {
    let capture = FakeCapture::new();
    let script = capture.script.clone();
    (SessionController::new(Arc::new(capture)), script)
}

#[tokio::test]
async fn start_opens_a_stream_when_none_exists() {
    let (mut session, script) = controller();
    let toasts = CollectedToasts::new();
    let indicator = FakeIndicator::default();

    session.start(&opts(), &toasts, &indicator).await.unwrap();

    assert_eq!(session.state(), SessionState::Recording);
    assert!(session.is_stream_open());
    assert_eq!(script.opens(), 1);
    assert!(toasts.contains(ToastLevel::Progress, "Existing recording session not found"));
}

#[tokio::test]
async fn start_reuses_an_active_stream() {
    let (mut session, script) = controller();
    let toasts = CollectedToasts::new();
    let indicator = FakeIndicator::default();

    session.start(&opts(), &toasts, &indicator).await.unwrap();
    session
        .stop(StopMode::KeepStream, &toasts, &indicator)
        .await
        .unwrap();
    session.start(&opts(), &toasts, &indicator).await.unwrap();

    // Second start armed the existing stream instead of opening a new one.
    assert_eq!(script.opens(), 1);
    assert_eq!(session.state(), SessionState::Recording);
}

#[tokio::test]
async fn start_replaces_an_inactive_stream() {
    let (mut session, script) = controller();
    let toasts = CollectedToasts::new();
    let indicator = FakeIndicator::default();

    session.start(&opts(), &toasts, &indicator).await.unwrap();
    session
        .stop(StopMode::KeepStream, &toasts, &indicator)
        .await
        .unwrap();

    script.inactive.store(true, Ordering::SeqCst);
    session.start(&opts(), &toasts, &indicator).await.unwrap();

    assert_eq!(script.opens(), 2);
    assert_eq!(script.closes(), 1);
    assert_eq!(session.state(), SessionState::Recording);
    assert!(toasts.contains(ToastLevel::Progress, "Existing recording session is inactive"));
}

#[tokio::test]
async fn start_retries_with_a_fresh_stream_when_arming_fails() {
    let (mut session, script) = controller();
    let toasts = CollectedToasts::new();
    let indicator = FakeIndicator::default();

    session.start(&opts(), &toasts, &indicator).await.unwrap();
    session
        .stop(StopMode::KeepStream, &toasts, &indicator)
        .await
        .unwrap();

    script.fail_next_arm.store(true, Ordering::SeqCst);
    session.start(&opts(), &toasts, &indicator).await.unwrap();

    assert_eq!(script.opens(), 2);
    assert_eq!(session.state(), SessionState::Recording);
    assert!(toasts.contains(
        ToastLevel::Progress,
        "Error initializing recorder with the open session"
    ));
}

#[tokio::test]
async fn start_failure_leaves_the_session_idle() {
    let (mut session, script) = controller();
    let toasts = CollectedToasts::new();
    let indicator = FakeIndicator::default();

    script.fail_open.store(true, Ordering::SeqCst);
    let err = session.start(&opts(), &toasts, &indicator).await.unwrap_err();

    assert!(matches!(err, RecorderError::DeviceUnavailable { .. }));
    assert_eq!(session.state(), SessionState::Idle);
    assert!(!session.is_stream_open());
}

#[tokio::test]
async fn stop_produces_a_wav_recording() {
    let (mut session, script) = controller();
    let toasts = CollectedToasts::new();
    let indicator = FakeIndicator::default();
    script.set_samples(vec![0.5, -0.5]);

    session.start(&opts(), &toasts, &indicator).await.unwrap();
    let recording = session
        .stop(StopMode::CloseStream, &toasts, &indicator)
        .await
        .unwrap();

    // 44-byte header plus two 32-bit float samples.
    assert_eq!(recording.blob.len(), 52);
    assert_eq!(&recording.blob[0..4], b"RIFF");
    assert_eq!(&recording.blob[8..12], b"WAVE");
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(script.closes(), 1);
    assert!(!session.is_stream_open());
}

#[tokio::test]
async fn stop_with_keep_stream_leaves_the_stream_open() {
    let (mut session, script) = controller();
    let toasts = CollectedToasts::new();
    let indicator = FakeIndicator::default();

    session.start(&opts(), &toasts, &indicator).await.unwrap();
    session
        .stop(StopMode::KeepStream, &toasts, &indicator)
        .await
        .unwrap();

    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.is_stream_open());
    assert_eq!(script.closes(), 0);
}

#[tokio::test]
async fn close_is_idempotent() {
    let (mut session, script) = controller();
    let toasts = CollectedToasts::new();
    let indicator = FakeIndicator::default();

    session.start(&opts(), &toasts, &indicator).await.unwrap();
    session.close().await;
    session.close().await;

    assert_eq!(script.closes(), 1);
    assert!(!session.is_stream_open());
}

#[tokio::test]
async fn cancel_without_a_session_is_a_notice_not_an_error() {
    let (mut session, _script) = controller();
    let toasts = CollectedToasts::new();
    let indicator = FakeIndicator::default();

    let outcome = session.cancel(&toasts, &indicator).await.unwrap();

    assert_eq!(outcome, CancelOutcome::NoActiveSession);
    assert!(toasts.contains(ToastLevel::Success, "No recording session found to cancel"));
}

#[tokio::test]
async fn cancel_discards_audio_and_closes_the_stream() {
    let (mut session, script) = controller();
    let toasts = CollectedToasts::new();
    let indicator = FakeIndicator::default();
    script.set_samples(vec![0.1; 512]);

    session.start(&opts(), &toasts, &indicator).await.unwrap();
    let outcome = session.cancel(&toasts, &indicator).await.unwrap();

    assert_eq!(outcome, CancelOutcome::Cancelled);
    assert_eq!(script.discards(), 1);
    assert_eq!(script.closes(), 1);
    assert_eq!(session.state(), SessionState::Idle);
}

#[tokio::test]
async fn failing_indicator_does_not_roll_back_the_transition() {
    let (mut session, _script) = controller();
    let toasts = CollectedToasts::new();
    let indicator = FakeIndicator::default();
    indicator.fail.store(true, Ordering::SeqCst);

    session.start(&opts(), &toasts, &indicator).await.unwrap();

    assert_eq!(session.state(), SessionState::Recording);
    assert!(toasts.contains(ToastLevel::Warning, "Could not update the recording indicator"));
}
