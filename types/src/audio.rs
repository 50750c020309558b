//! Audio format constants shared by every component.
//!
//! The whole system speaks exactly one format: mono, signed 16-bit
//! little-endian PCM at 24 kHz. There is no per-stream format negotiation;
//! callers that hold audio in any other shape convert before handing it in.

/// Sample rate of every PCM16 buffer in the system, in Hz.
pub const PCM16_SAMPLE_RATE: u32 = 24_000;

/// Bytes per PCM16 sample (mono).
pub const PCM16_BYTES_PER_SAMPLE: usize = 2;

/// Positive full-scale value of a PCM16 sample.
pub const PCM16_CEILING: i32 = i16::MAX as i32;

/// Playback duration of a PCM16 byte buffer in milliseconds.
///
/// An odd trailing byte contributes nothing (it is not a whole sample).
pub fn duration_ms(byte_len: usize) -> u64 {
    let samples = (byte_len / PCM16_BYTES_PER_SAMPLE) as u64;
    samples * 1000 / PCM16_SAMPLE_RATE as u64
}
