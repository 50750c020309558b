//! Structured event reporting for the coordination core.
//!
//! Neither the mixer nor the turn coordinator owns a logger. They emit
//! structured events to an injected sink, which keeps them side-effect-free
//! and lets tests assert on exactly what was reported. The default sink
//! forwards everything to `tracing`.

use cohost_realtime_types::{Speaker, SpeakerRole};

/// Everything the coordination core reports about its own operation.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordinationEvent {
    /// An odd-length PCM16 buffer arrived; its trailing byte was dropped.
    MalformedBuffer { role: SpeakerRole, byte_len: usize },
    /// A stream could not be processed and was excluded from the mix.
    StreamSkipped { role: SpeakerRole, reason: String },
    /// The summed mix exceeded full scale and was peak-normalized.
    PeakNormalized { peak: i32 },
    /// A role's gain was changed through the volume setter.
    VolumeChanged { role: SpeakerRole, gain: f32 },
    /// The conversational floor moved to a different speaker.
    SpeakerSwitched { speaker: Speaker, turn_count: u32 },
    /// The session crossed into phase two.
    PhaseAdvanced { turn_count: u32 },
}

#[cfg_attr(test, mockall::automock)]
pub trait EventSink: Send + Sync {
    fn emit(&self, event: CoordinationEvent);
}

/// Default sink: forwards events to `tracing` at sensible levels.
#[derive(Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: CoordinationEvent) {
        match event {
            CoordinationEvent::MalformedBuffer { role, byte_len } => {
                tracing::warn!(%role, byte_len, "odd-length PCM16 buffer, trailing byte dropped");
            }
            CoordinationEvent::StreamSkipped { role, ref reason } => {
                tracing::error!(%role, %reason, "stream excluded from mix");
            }
            CoordinationEvent::PeakNormalized { peak } => {
                tracing::debug!(peak, "mix exceeded full scale, peak-normalized");
            }
            CoordinationEvent::VolumeChanged { role, gain } => {
                tracing::debug!(%role, gain, "volume updated");
            }
            CoordinationEvent::SpeakerSwitched { speaker, turn_count } => {
                tracing::debug!(%speaker, turn_count, "active speaker switched");
            }
            CoordinationEvent::PhaseAdvanced { turn_count } => {
                tracing::info!(turn_count, "conversation entered phase two");
            }
        }
    }
}
