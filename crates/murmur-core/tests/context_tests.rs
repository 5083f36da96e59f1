//! App context: toggle flow error surfacing.

mod support;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use murmur_core::audio::SessionState;
use murmur_core::context::{AppContext, Ports, ToggleError, ToggleOutcome};
use murmur_core::settings::Settings;
use murmur_core::status::ToastLevel;

use support::{CollectedToasts, FakeCapture, FakeDb, FakeIndicator, FakeOutput};

struct Fixture {
    ctx: AppContext,
    db: Arc<FakeDb>,
    toasts: Arc<CollectedToasts>,
}

async fn fixture() -> Fixture {
    let db = Arc::new(FakeDb::default());
    let toasts = Arc::new(CollectedToasts::new());
    let ctx = AppContext::new(
        Settings::default(),
        Ports {
            capture: Arc::new(FakeCapture::new()),
            db: db.clone(),
            output: Arc::new(FakeOutput::default()),
            toasts: toasts.clone(),
            indicator: Arc::new(FakeIndicator::default()),
        },
    )
    .await
    .unwrap();
    Fixture { ctx, db, toasts }
}

#[tokio::test]
async fn toggle_starts_a_session_when_idle() {
    let f = fixture().await;

    let outcome = f.ctx.toggle_recording().await.unwrap();

    assert_eq!(outcome, ToggleOutcome::Started);
    assert_eq!(f.ctx.session_state().await, SessionState::Recording);
}

#[tokio::test]
async fn failed_save_after_stop_is_a_store_error() {
    let f = fixture().await;
    f.ctx.toggle_recording().await.unwrap();
    f.db.fail_next_add.store(true, Ordering::SeqCst);

    let err = f.ctx.toggle_recording().await.unwrap_err();

    // A persistence failure is reported as such, not as a recorder failure.
    assert!(matches!(err, ToggleError::Store(_)));
    assert!(f.ctx.recordings().is_empty());
    assert!(f.db.rows.lock().unwrap().is_empty());
    assert!(f.toasts.contains(ToastLevel::Error, "Failed to save recording"));
    assert_eq!(f.ctx.session_state().await, SessionState::Idle);
}

#[tokio::test]
async fn failed_start_is_a_recorder_error() {
    let db = Arc::new(FakeDb::default());
    let capture = FakeCapture::new();
    capture.script.fail_open.store(true, Ordering::SeqCst);
    let ctx = AppContext::new(
        Settings::default(),
        Ports {
            capture: Arc::new(capture),
            db,
            output: Arc::new(FakeOutput::default()),
            toasts: Arc::new(CollectedToasts::new()),
            indicator: Arc::new(FakeIndicator::default()),
        },
    )
    .await
    .unwrap();

    let err = ctx.toggle_recording().await.unwrap_err();
    assert!(matches!(err, ToggleError::Recorder(_)));
    assert_eq!(ctx.session_state().await, SessionState::Idle);
}
