//! Minimal WAV container for interchange with transcription backends.
//!
//! Single channel, 32-bit IEEE-float PCM, little-endian, standard 44-byte
//! header. This byte layout is the one bit-exact external contract of the
//! recording pipeline, so it is written by hand rather than through an
//! encoder crate.

/// Preferred capture sample rate. Streams that cannot deliver it record at
/// their native rate, which is then written into the container header.
pub const SESSION_SAMPLE_RATE: u32 = 32_000;

const NUM_CHANNELS: u16 = 1;
const BITS_PER_SAMPLE: u16 = 32;
const BYTES_PER_SAMPLE: u32 = 4;
const HEADER_SIZE: u32 = 44;
const FORMAT_IEEE_FLOAT: u16 = 3;

/// Encode f32 samples into a mono float WAV container.
pub fn encode_wav_f32(samples: &[f32], sample_rate: u32) -> Vec<u8> {
    let data_size = samples.len() as u32 * BYTES_PER_SAMPLE;
    let total_size = HEADER_SIZE + data_size;

    let mut buf = Vec::with_capacity(total_size as usize);

    // RIFF chunk descriptor
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&(total_size - 8).to_le_bytes());
    buf.extend_from_slice(b"WAVE");

    // "fmt " sub-chunk
    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes());
    buf.extend_from_slice(&FORMAT_IEEE_FLOAT.to_le_bytes());
    buf.extend_from_slice(&NUM_CHANNELS.to_le_bytes());
    buf.extend_from_slice(&sample_rate.to_le_bytes());
    buf.extend_from_slice(&(sample_rate * NUM_CHANNELS as u32 * BYTES_PER_SAMPLE).to_le_bytes());
    buf.extend_from_slice(&((NUM_CHANNELS as u32 * BYTES_PER_SAMPLE) as u16).to_le_bytes());
    buf.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    // "data" sub-chunk
    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());
    for sample in samples {
        buf.extend_from_slice(&sample.to_le_bytes());
    }

    buf
}
