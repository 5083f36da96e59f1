pub mod capture;
pub mod cpal_backend;
pub mod devices;
pub mod session;
pub mod stream;
pub mod wav;

pub use capture::{CapturePort, CaptureStream, DeviceInfo};
pub use cpal_backend::CpalCapture;
pub use session::{CancelOutcome, SessionController, SessionOptions, SessionState, StopMode};
pub use stream::{StartFallback, StreamManager};
pub use wav::{SESSION_SAMPLE_RATE, encode_wav_f32};
