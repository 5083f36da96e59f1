//! cpal-backed capture implementation.
//!
//! `cpal::Stream` is not `Send`, so each open stream gets a dedicated capture
//! thread that owns it. The async handle talks to the thread through shared
//! atomics and a sample buffer; closing the handle drops the shutdown channel,
//! which unblocks and terminates the thread.

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use super::capture::{CapturePort, CaptureStream, DeviceInfo};
use super::devices;
use crate::error::RecorderError;

pub struct CpalCapture;

#[derive(Default)]
struct SharedState {
    /// Stream liveness; cleared when the device disappears or the thread exits.
    active: AtomicBool,
    /// Whether the input callback should buffer samples.
    recording: AtomicBool,
    samples: Mutex<Vec<f32>>,
    /// Counter for rate-limited reporting of non-fatal stream errors
    /// (common with ALSA, especially USB audio).
    stream_errors: AtomicU64,
}

pub struct CpalStream {
    shared: Arc<SharedState>,
    sample_rate: u32,
    shutdown: Option<crossbeam_channel::Sender<()>>,
    thread: Option<std::thread::JoinHandle<()>>,
}

#[async_trait]
impl CapturePort for CpalCapture {
    async fn enumerate_devices(&self) -> Result<Vec<DeviceInfo>, RecorderError> {
        tokio::task::spawn_blocking(devices::list_audio_devices)
            .await
            .map_err(|e| RecorderError::DeviceUnavailable {
                reason: e.to_string(),
            })?
    }

    async fn open(
        &self,
        device_id: Option<&str>,
    ) -> Result<Box<dyn CaptureStream>, RecorderError> {
        let shared = Arc::new(SharedState::default());
        let (result_tx, result_rx) = crossbeam_channel::bounded(1);
        let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded::<()>(0);

        let device_id = device_id.map(|s| s.to_string());
        let thread_shared = Arc::clone(&shared);
        let thread = std::thread::Builder::new()
            .name("murmur-capture".to_string())
            .spawn(move || run_capture_thread(device_id, thread_shared, result_tx, shutdown_rx))
            .map_err(|e| RecorderError::RecorderInitFailed {
                reason: e.to_string(),
            })?;

        // The thread reports exactly once after building (or failing to build)
        // the stream; recv blocks only for that long.
        let outcome = tokio::task::spawn_blocking(move || result_rx.recv())
            .await
            .map_err(|e| RecorderError::RecorderInitFailed {
                reason: e.to_string(),
            })?;

        match outcome {
            Ok(Ok(sample_rate)) => Ok(Box::new(CpalStream {
                shared,
                sample_rate,
                shutdown: Some(shutdown_tx),
                thread: Some(thread),
            })),
            Ok(Err(e)) => {
                let _ = thread.join();
                Err(e)
            }
            Err(_) => {
                let _ = thread.join();
                Err(RecorderError::DeviceUnavailable {
                    reason: "capture thread exited before reporting a stream".to_string(),
                })
            }
        }
    }
}

#[async_trait]
impl CaptureStream for CpalStream {
    fn is_active(&self) -> bool {
        self.shared.active.load(Ordering::SeqCst)
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    async fn arm_recorder(&mut self, _bits_per_second: u32) -> Result<(), RecorderError> {
        if !self.is_active() {
            return Err(RecorderError::StreamInactive);
        }
        self.shared.samples.lock().unwrap().clear();
        self.shared.stream_errors.store(0, Ordering::Relaxed);
        self.shared.recording.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn take_recording(&mut self) -> Result<Vec<f32>, RecorderError> {
        self.shared.recording.store(false, Ordering::SeqCst);
        let samples = std::mem::take(&mut *self.shared.samples.lock().unwrap());

        // A stream that died mid-recording still yields whatever was buffered
        // before the failure; only a fully empty capture is a stop failure.
        if samples.is_empty() && !self.is_active() {
            return Err(RecorderError::RecordingStopFailed {
                reason: "capture stream went inactive before any audio was captured".to_string(),
            });
        }
        Ok(samples)
    }

    async fn discard_recording(&mut self) {
        self.shared.recording.store(false, Ordering::SeqCst);
        self.shared.samples.lock().unwrap().clear();
    }

    async fn close(&mut self) {
        // Dropping the sender unblocks the capture thread's recv.
        self.shutdown.take();
        if let Some(thread) = self.thread.take() {
            let _ = tokio::task::spawn_blocking(move || thread.join()).await;
        }
        self.shared.active.store(false, Ordering::SeqCst);
    }
}

impl Drop for CpalStream {
    fn drop(&mut self) {
        // Unblock the capture thread even if close() was never awaited.
        self.shutdown.take();
    }
}

fn run_capture_thread(
    device_id: Option<String>,
    shared: Arc<SharedState>,
    result_tx: crossbeam_channel::Sender<Result<u32, RecorderError>>,
    shutdown_rx: crossbeam_channel::Receiver<()>,
) {
    let stream = match build_capture_stream(device_id.as_deref(), &shared) {
        Ok((stream, sample_rate)) => {
            shared.active.store(true, Ordering::SeqCst);
            if result_tx.send(Ok(sample_rate)).is_err() {
                return;
            }
            stream
        }
        Err(e) => {
            let _ = result_tx.send(Err(e));
            return;
        }
    };

    // Park until the handle drops its shutdown sender.
    let _ = shutdown_rx.recv();
    drop(stream);
    shared.active.store(false, Ordering::SeqCst);
}

fn build_capture_stream(
    device_id: Option<&str>,
    shared: &Arc<SharedState>,
) -> Result<(cpal::Stream, u32), RecorderError> {
    let host = cpal::default_host();
    let device = select_device(&host, device_id)?;

    let supported = device.default_input_config().map_err(map_config_error)?;
    let sample_format = supported.sample_format();
    let config = supported.config();
    let channels = config.channels;
    let sample_rate = config.sample_rate;

    let stream = match sample_format {
        cpal::SampleFormat::F32 => {
            build_input::<f32>(&device, &config, channels, Arc::clone(shared))
        }
        cpal::SampleFormat::I16 => {
            build_input::<i16>(&device, &config, channels, Arc::clone(shared))
        }
        cpal::SampleFormat::U16 => {
            build_input::<u16>(&device, &config, channels, Arc::clone(shared))
        }
        other => Err(RecorderError::RecorderInitFailed {
            reason: format!("unsupported sample format {other}"),
        }),
    }?;

    stream
        .play()
        .map_err(|e| RecorderError::RecorderInitFailed {
            reason: e.to_string(),
        })?;

    Ok((stream, sample_rate))
}

fn build_input<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: u16,
    shared: Arc<SharedState>,
) -> Result<cpal::Stream, RecorderError>
where
    T: cpal::Sample + cpal::SizedSample,
    f32: cpal::FromSample<T>,
{
    let err_shared = Arc::clone(&shared);
    let err_fn = move |err: cpal::StreamError| match err {
        cpal::StreamError::DeviceNotAvailable => {
            err_shared.active.store(false, Ordering::SeqCst);
        }
        other => {
            let count = err_shared.stream_errors.fetch_add(1, Ordering::Relaxed);
            if count == 0 {
                crate::verbose!(
                    "Audio stream error (non-fatal, further occurrences suppressed): {other}"
                );
            }
        }
    };

    let stream = device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                if !shared.recording.load(Ordering::Relaxed) {
                    return;
                }
                let f32_samples: Vec<f32> =
                    data.iter().map(|&s| cpal::Sample::from_sample(s)).collect();

                let mut samples = shared.samples.lock().unwrap();
                if channels <= 1 {
                    samples.extend_from_slice(&f32_samples);
                } else {
                    // Downmix interleaved frames to mono by averaging channels.
                    for frame in f32_samples.chunks_exact(channels as usize) {
                        samples.push(frame.iter().sum::<f32>() / channels as f32);
                    }
                }
            },
            err_fn,
            None,
        )
        .map_err(map_build_error)?;

    Ok(stream)
}

fn select_device(host: &cpal::Host, device_id: Option<&str>) -> Result<cpal::Device, RecorderError> {
    if let Some(wanted) = device_id {
        let inputs = host
            .input_devices()
            .map_err(|e| RecorderError::DeviceUnavailable {
                reason: e.to_string(),
            })?;
        for device in inputs {
            if device
                .description()
                .map(|d| d.to_string() == wanted)
                .unwrap_or(false)
            {
                return Ok(device);
            }
        }
        crate::verbose!("Requested device '{wanted}' not found, falling back to system default");
    }

    host.default_input_device()
        .ok_or_else(|| RecorderError::DeviceUnavailable {
            reason: "no default input device".to_string(),
        })
}

fn map_config_error(e: cpal::DefaultStreamConfigError) -> RecorderError {
    match e {
        cpal::DefaultStreamConfigError::DeviceNotAvailable => RecorderError::DeviceUnavailable {
            reason: "device disconnected".to_string(),
        },
        other => RecorderError::RecorderInitFailed {
            reason: other.to_string(),
        },
    }
}

fn map_build_error(e: cpal::BuildStreamError) -> RecorderError {
    match e {
        cpal::BuildStreamError::DeviceNotAvailable => RecorderError::DeviceUnavailable {
            reason: "device disconnected".to_string(),
        },
        other => RecorderError::RecorderInitFailed {
            reason: other.to_string(),
        },
    }
}
