//! Scripted fakes for driving the session controller, store and dispatcher
//! without hardware, disk or network.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use async_trait::async_trait;

use murmur_core::audio::{CapturePort, CaptureStream, DeviceInfo};
use murmur_core::config::TranscriptionProvider;
use murmur_core::error::RecorderError;
use murmur_core::output::TextOutput;
use murmur_core::provider::{BackendConfig, TranscriptionBackend, TranscriptionRequest};
use murmur_core::status::{IndicatorSink, ToastLevel, ToastSink};
use murmur_core::store::{Recording, RecordingId, RecordingsDb};

/// Shared script and probe for a [`FakeCapture`] and the streams it opens.
#[derive(Default)]
pub struct CaptureScript {
    /// When set, `open` fails with `DeviceUnavailable`.
    pub fail_open: AtomicBool,
    /// When set, the next `arm_recorder` call fails once.
    pub fail_next_arm: AtomicBool,
    /// When set, streams report themselves inactive.
    pub inactive: AtomicBool,
    /// Samples `take_recording` hands back.
    pub samples: Mutex<Vec<f32>>,
    pub opens: AtomicUsize,
    pub arms: AtomicUsize,
    pub closes: AtomicUsize,
    pub discards: AtomicUsize,
}

impl CaptureScript {
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
    pub fn discards(&self) -> usize {
        self.discards.load(Ordering::SeqCst)
    }
    pub fn set_samples(&self, samples: Vec<f32>) {
        *self.samples.lock().unwrap() = samples;
    }
}

pub struct FakeCapture {
    pub script: Arc<CaptureScript>,
}

impl FakeCapture {
    pub fn new() -> Self {
        Self {
            script: Arc::new(CaptureScript::default()),
        }
    }
}

#[async_trait]
impl CapturePort for FakeCapture {
    async fn enumerate_devices(&self) -> Result<Vec<DeviceInfo>, RecorderError> {
        Ok(vec![
            DeviceInfo {
                id: "mic-0".into(),
                label: "Built-in Microphone".into(),
                is_default: true,
            },
            DeviceInfo {
                id: "mic-1".into(),
                label: "USB Microphone".into(),
                is_default: false,
            },
        ])
    }

    async fn open(
        &self,
        _device_id: Option<&str>,
    ) -> Result<Box<dyn CaptureStream>, RecorderError> {
        self.script.opens.fetch_add(1, Ordering::SeqCst);
        if self.script.fail_open.load(Ordering::SeqCst) {
            return Err(RecorderError::DeviceUnavailable {
                reason: "scripted open failure".into(),
            });
        }
        Ok(Box::new(FakeStream {
            script: self.script.clone(),
            open: true,
        }))
    }
}

struct FakeStream {
    script: Arc<CaptureScript>,
    open: bool,
}

#[async_trait]
impl CaptureStream for FakeStream {
    fn is_active(&self) -> bool {
        self.open && !self.script.inactive.load(Ordering::SeqCst)
    }

    fn sample_rate(&self) -> u32 {
        32_000
    }

    async fn arm_recorder(&mut self, _bits_per_second: u32) -> Result<(), RecorderError> {
        self.script.arms.fetch_add(1, Ordering::SeqCst);
        if self.script.fail_next_arm.swap(false, Ordering::SeqCst) {
            return Err(RecorderError::RecorderInitFailed {
                reason: "scripted arm failure".into(),
            });
        }
        Ok(())
    }

    async fn take_recording(&mut self) -> Result<Vec<f32>, RecorderError> {
        Ok(self.script.samples.lock().unwrap().clone())
    }

    async fn discard_recording(&mut self) {
        self.script.discards.fetch_add(1, Ordering::SeqCst);
    }

    async fn close(&mut self) {
        if self.open {
            self.open = false;
            self.script.closes.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// In-memory database with per-operation scripted failures.
#[derive(Default)]
pub struct FakeDb {
    pub rows: Mutex<Vec<Recording>>,
    pub fail_next_add: AtomicBool,
    pub fail_next_update: AtomicBool,
    pub fail_next_delete: AtomicBool,
}

impl FakeDb {
    pub fn seeded(rows: Vec<Recording>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Self::default()
        }
    }

    pub fn row(&self, id: &RecordingId) -> Option<Recording> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| &r.id == id)
            .cloned()
    }
}

#[async_trait]
impl RecordingsDb for FakeDb {
    async fn get_all(&self) -> Result<Vec<Recording>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn get(&self, id: &RecordingId) -> Result<Option<Recording>> {
        Ok(self.row(id))
    }

    async fn add(&self, recording: &Recording) -> Result<()> {
        if self.fail_next_add.swap(false, Ordering::SeqCst) {
            return Err(anyhow!("scripted add failure"));
        }
        self.rows.lock().unwrap().push(recording.clone());
        Ok(())
    }

    async fn update(&self, recording: &Recording) -> Result<()> {
        if self.fail_next_update.swap(false, Ordering::SeqCst) {
            return Err(anyhow!("scripted update failure"));
        }
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|r| r.id == recording.id)
            .ok_or_else(|| anyhow!("no such row"))?;
        *slot = recording.clone();
        Ok(())
    }

    async fn delete_by_id(&self, id: &RecordingId) -> Result<()> {
        if self.fail_next_delete.swap(false, Ordering::SeqCst) {
            return Err(anyhow!("scripted delete failure"));
        }
        self.rows.lock().unwrap().retain(|r| &r.id != id);
        Ok(())
    }

    async fn delete_by_ids(&self, ids: &[RecordingId]) -> Result<()> {
        if self.fail_next_delete.swap(false, Ordering::SeqCst) {
            return Err(anyhow!("scripted delete failure"));
        }
        self.rows.lock().unwrap().retain(|r| !ids.contains(&r.id));
        Ok(())
    }
}

/// Toast sink that records everything it is told.
#[derive(Default)]
pub struct CollectedToasts {
    pub toasts: Mutex<Vec<(ToastLevel, String, String)>>,
}

impl CollectedToasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn titles(&self) -> Vec<String> {
        self.toasts
            .lock()
            .unwrap()
            .iter()
            .map(|(_, title, _)| title.clone())
            .collect()
    }

    pub fn contains(&self, level: ToastLevel, title_fragment: &str) -> bool {
        self.toasts
            .lock()
            .unwrap()
            .iter()
            .any(|(l, title, _)| *l == level && title.contains(title_fragment))
    }
}

impl ToastSink for CollectedToasts {
    fn toast(&self, level: ToastLevel, title: &str, description: &str) {
        self.toasts
            .lock()
            .unwrap()
            .push((level, title.to_string(), description.to_string()));
    }
}

/// Indicator that records state changes and can be scripted to fail.
#[derive(Default)]
pub struct FakeIndicator {
    pub states: Mutex<Vec<murmur_core::audio::SessionState>>,
    pub fail: AtomicBool,
}

impl IndicatorSink for FakeIndicator {
    fn set_state(&self, state: murmur_core::audio::SessionState) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow!("scripted indicator failure"));
        }
        self.states.lock().unwrap().push(state);
        Ok(())
    }
}

/// Text output that records copies and keystrokes.
#[derive(Default)]
pub struct FakeOutput {
    pub copied: Mutex<Vec<String>>,
    pub typed: Mutex<Vec<String>>,
    pub fail_copy: AtomicBool,
}

#[async_trait]
impl TextOutput for FakeOutput {
    async fn copy(&self, text: &str) -> Result<()> {
        if self.fail_copy.load(Ordering::SeqCst) {
            return Err(anyhow!("scripted clipboard failure"));
        }
        self.copied.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn type_at_cursor(&self, text: &str) -> Result<()> {
        self.typed.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Backend returning a scripted transcript, optionally blocking on a notify
/// so tests can hold a transcription in flight.
pub struct FakeBackend {
    pub result: Mutex<Result<String, String>>,
    pub hold: Option<Arc<tokio::sync::Notify>>,
    pub calls: AtomicUsize,
}

impl FakeBackend {
    pub fn ok(text: &str) -> Self {
        Self {
            result: Mutex::new(Ok(text.to_string())),
            hold: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Mutex::new(Err(message.to_string())),
            hold: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn held(text: &str, hold: Arc<tokio::sync::Notify>) -> Self {
        Self {
            result: Mutex::new(Ok(text.to_string())),
            hold: Some(hold),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl TranscriptionBackend for FakeBackend {
    fn provider(&self) -> TranscriptionProvider {
        TranscriptionProvider::OpenAI
    }

    async fn transcribe(
        &self,
        _client: &reqwest::Client,
        _config: &BackendConfig,
        _request: &TranscriptionRequest,
    ) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(hold) = &self.hold {
            hold.notified().await;
        }
        match &*self.result.lock().unwrap() {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(anyhow!("{message}")),
        }
    }
}
