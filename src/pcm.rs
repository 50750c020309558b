//! PCM16 byte/sample conversions and transport encoding.
//!
//! The transport collaborator ships audio frames as base64 strings over its
//! wire protocol; everything in-process works on raw little-endian bytes or
//! i16 samples. These helpers are the only place those representations meet.

use base64::Engine;

/// Interprets little-endian PCM16 bytes as samples. A stray trailing byte is
/// ignored; callers that need to treat it as malformed input check the
/// length themselves first.
pub fn samples_from_bytes(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|chunk| i16::from_le_bytes([chunk[0], chunk[1]]))
        .collect()
}

pub fn bytes_from_samples(samples: &[i16]) -> Vec<u8> {
    samples
        .iter()
        .flat_map(|&sample| sample.to_le_bytes())
        .collect()
}

/// Encodes a PCM16 byte buffer for the transport layer.
pub fn encode(pcm: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(pcm)
}

/// Decodes a transport fragment back into PCM16 bytes.
pub fn decode(fragment: &str) -> Result<Vec<u8>, base64::DecodeError> {
    base64::engine::general_purpose::STANDARD.decode(fragment)
}
