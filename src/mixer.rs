//! Volume-aware PCM16 stream mixing.
//!
//! Combines simultaneous audio streams from the session's speakers into one
//! output buffer. Each stream is scaled by its role's gain, summed in a wide
//! integer type, and peak-normalized when the sum would clip, so relative
//! balance between speakers survives even a loud moment.

use crate::config::MixerConfig;
use crate::error::RoleError;
use crate::sink::{CoordinationEvent, EventSink, TracingSink};
use cohost_realtime_types::audio::PCM16_CEILING;
use cohost_realtime_types::SpeakerRole;
use std::collections::HashMap;

/// Mixes named PCM16 streams for one session.
///
/// The volume table is owned by the instance and mutable only through
/// [`set_volume`](StreamMixer::set_volume). `mix` itself never fails: bad
/// streams are reported to the event sink and excluded, and an empty input
/// yields an empty (valid, "nothing to play") output.
///
/// One instance per session; sharing an instance across threads needs
/// external synchronization around `set_volume`.
pub struct StreamMixer {
    volumes: HashMap<SpeakerRole, f32>,
    sink: Box<dyn EventSink>,
}

impl Default for StreamMixer {
    fn default() -> Self {
        StreamMixer::new(MixerConfig::default())
    }
}

impl StreamMixer {
    pub fn new(config: MixerConfig) -> Self {
        StreamMixer::with_sink(config, Box::new(TracingSink))
    }

    pub fn with_sink(config: MixerConfig, sink: Box<dyn EventSink>) -> Self {
        StreamMixer {
            volumes: config.volumes,
            sink,
        }
    }

    /// Current gain for a role.
    pub fn get_volume(&self, role: SpeakerRole) -> Result<f32, RoleError> {
        self.volumes
            .get(&role)
            .copied()
            .ok_or(RoleError::UnknownRole(role))
    }

    /// Updates a role's gain, clamping the request into `[0.0, 1.0]`.
    ///
    /// Out-of-range requests are clamped silently; an unknown role is an
    /// error, never a new table entry.
    pub fn set_volume(&mut self, role: SpeakerRole, requested_gain: f32) -> Result<(), RoleError> {
        let gain = requested_gain.clamp(0.0, 1.0);
        match self.volumes.get_mut(&role) {
            Some(entry) => {
                *entry = gain;
                self.sink
                    .emit(CoordinationEvent::VolumeChanged { role, gain });
                Ok(())
            }
            None => Err(RoleError::UnknownRole(role)),
        }
    }

    /// Snapshot copy of the volume table. Mutating the copy has no effect on
    /// the mixer.
    pub fn volumes(&self) -> HashMap<SpeakerRole, f32> {
        self.volumes.clone()
    }

    /// Combines the given streams into one PCM16 buffer.
    ///
    /// Empty and unusable streams are skipped; survivors are gain-scaled,
    /// zero-padded to the longest stream, summed in i32, and peak-normalized
    /// back under full scale if the sum exceeds it. Returns an empty buffer
    /// when nothing survives.
    pub fn mix(&self, streams: &HashMap<SpeakerRole, Vec<u8>>) -> Vec<u8> {
        if streams.is_empty() {
            return Vec::new();
        }

        let mut scaled: Vec<Vec<i32>> = Vec::with_capacity(streams.len());
        for (&role, bytes) in streams {
            match self.prepare_stream(role, bytes) {
                Ok(Some(samples)) => scaled.push(samples),
                Ok(None) => {}
                Err(err) => {
                    // One bad stream must not abort the whole mix.
                    self.sink.emit(CoordinationEvent::StreamSkipped {
                        role,
                        reason: err.to_string(),
                    });
                }
            }
        }
        if scaled.is_empty() {
            return Vec::new();
        }

        // Shorter contributions pad out with silence rather than truncating
        // the longest stream.
        let out_len = scaled.iter().map(Vec::len).max().unwrap_or(0);
        let mut sum = vec![0i32; out_len];
        for samples in &scaled {
            for (acc, &sample) in sum.iter_mut().zip(samples) {
                *acc += sample;
            }
        }

        let max_abs = sum.iter().map(|s| s.abs()).max().unwrap_or(0);
        if max_abs > PCM16_CEILING {
            self.sink
                .emit(CoordinationEvent::PeakNormalized { peak: max_abs });
            // Integer rescale so the loudest sample lands exactly at the
            // ceiling; i64 keeps the product in range.
            for sample in &mut sum {
                *sample = (*sample as i64 * PCM16_CEILING as i64 / max_abs as i64) as i32;
            }
        }

        sum.iter()
            .flat_map(|&sample| (sample as i16).to_le_bytes())
            .collect()
    }

    /// Mixes a foreground stream with background audio; equivalent to `mix`
    /// over exactly those two entries.
    ///
    /// `primary_role` should be one of the foreground roles. Passing
    /// [`SpeakerRole::Ambient`] collapses both entries onto the ambient key,
    /// so only the `ambient` buffer is mixed.
    pub fn mix_with_ambient(
        &self,
        primary: &[u8],
        primary_role: SpeakerRole,
        ambient: &[u8],
    ) -> Vec<u8> {
        let streams = HashMap::from([
            (primary_role, primary.to_vec()),
            (SpeakerRole::Ambient, ambient.to_vec()),
        ]);
        self.mix(&streams)
    }

    /// Decodes and gain-scales one stream. `Ok(None)` means the stream had
    /// nothing usable in it and is skipped without being an error.
    fn prepare_stream(
        &self,
        role: SpeakerRole,
        bytes: &[u8],
    ) -> Result<Option<Vec<i32>>, RoleError> {
        if bytes.is_empty() {
            return Ok(None);
        }
        let gain = self.get_volume(role)?;

        let bytes = if bytes.len() % 2 != 0 {
            self.sink.emit(CoordinationEvent::MalformedBuffer {
                role,
                byte_len: bytes.len(),
            });
            &bytes[..bytes.len() - 1]
        } else {
            bytes
        };
        if bytes.is_empty() {
            return Ok(None);
        }

        let samples = bytes
            .chunks_exact(2)
            .map(|chunk| {
                let sample = i16::from_le_bytes([chunk[0], chunk[1]]);
                (sample as f32 * gain) as i32
            })
            .collect();
        Ok(Some(samples))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcm;
    use crate::sink::MockEventSink;

    fn buffer(samples: &[i16]) -> Vec<u8> {
        pcm::bytes_from_samples(samples)
    }

    fn mixed_samples(mixer: &StreamMixer, streams: &HashMap<SpeakerRole, Vec<u8>>) -> Vec<i16> {
        pcm::samples_from_bytes(&mixer.mix(streams))
    }

    #[test]
    fn default_volumes_match_contract() {
        let mixer = StreamMixer::default();
        assert_eq!(mixer.get_volume(SpeakerRole::PrimaryHost), Ok(1.0));
        assert_eq!(mixer.get_volume(SpeakerRole::PrimaryPartner), Ok(1.0));
        assert_eq!(mixer.get_volume(SpeakerRole::Ambient), Ok(0.3));
    }

    #[test]
    fn set_volume_clamps_into_unit_range() {
        let mut mixer = StreamMixer::default();
        mixer.set_volume(SpeakerRole::Ambient, 1.7).unwrap();
        assert_eq!(mixer.get_volume(SpeakerRole::Ambient), Ok(1.0));
        mixer.set_volume(SpeakerRole::Ambient, -0.4).unwrap();
        assert_eq!(mixer.get_volume(SpeakerRole::Ambient), Ok(0.0));
    }

    #[test]
    fn unknown_role_is_a_configuration_error() {
        // A table missing a role models a mixer constructed with partial
        // config; the closed-set APIs must refuse rather than default.
        let config = MixerConfig {
            volumes: HashMap::from([(SpeakerRole::PrimaryHost, 1.0)]),
        };
        let mut mixer = StreamMixer::new(config);
        assert_eq!(
            mixer.get_volume(SpeakerRole::Ambient),
            Err(RoleError::UnknownRole(SpeakerRole::Ambient))
        );
        assert_eq!(
            mixer.set_volume(SpeakerRole::Ambient, 0.5),
            Err(RoleError::UnknownRole(SpeakerRole::Ambient))
        );
    }

    #[test]
    fn volume_snapshot_is_a_copy() {
        let mixer = StreamMixer::default();
        let mut snapshot = mixer.volumes();
        snapshot.insert(SpeakerRole::Ambient, 0.9);
        assert_eq!(mixer.get_volume(SpeakerRole::Ambient), Ok(0.3));
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let mixer = StreamMixer::default();
        assert!(mixer.mix(&HashMap::new()).is_empty());

        let all_empty = HashMap::from([
            (SpeakerRole::PrimaryHost, Vec::new()),
            (SpeakerRole::Ambient, Vec::new()),
        ]);
        assert!(mixer.mix(&all_empty).is_empty());
    }

    #[test]
    fn single_stream_at_unit_gain_passes_through() {
        let mixer = StreamMixer::default();
        let input = [100i16, -200, 300, 0, 32767, -32767];
        let streams = HashMap::from([(SpeakerRole::PrimaryHost, buffer(&input))]);
        assert_eq!(mixed_samples(&mixer, &streams), input);
    }

    #[test]
    fn single_stream_scales_by_gain() {
        let mut mixer = StreamMixer::default();
        mixer.set_volume(SpeakerRole::PrimaryHost, 0.5).unwrap();
        let streams = HashMap::from([(
            SpeakerRole::PrimaryHost,
            buffer(&[1000, -1000, 20000, -20000]),
        )]);
        let out = mixed_samples(&mixer, &streams);
        for (got, want) in out.iter().zip([500i16, -500, 10000, -10000]) {
            assert!((got - want).abs() <= 1, "got {got}, want ~{want}");
        }
    }

    #[test]
    fn shorter_streams_pad_with_silence() {
        let mixer = StreamMixer::default();
        let streams = HashMap::from([
            (SpeakerRole::PrimaryHost, buffer(&[1000, 1000, 1000, 1000])),
            (SpeakerRole::PrimaryPartner, buffer(&[500, 500])),
        ]);
        let out = mixed_samples(&mixer, &streams);
        assert_eq!(out, vec![1500, 1500, 1000, 1000]);
    }

    #[test]
    fn odd_length_buffer_drops_trailing_byte() {
        let mixer = StreamMixer::default();
        let mut bytes = buffer(&[700, 800]);
        bytes.push(0x7f); // stray trailing byte
        let streams = HashMap::from([(SpeakerRole::PrimaryHost, bytes)]);
        assert_eq!(mixed_samples(&mixer, &streams), vec![700, 800]);
    }

    #[test]
    fn odd_length_buffer_is_reported_to_the_sink() {
        let mut sink = MockEventSink::new();
        sink.expect_emit()
            .withf(|event| {
                matches!(
                    event,
                    CoordinationEvent::MalformedBuffer {
                        role: SpeakerRole::PrimaryHost,
                        byte_len: 3,
                    }
                )
            })
            .times(1)
            .return_const(());
        let mixer = StreamMixer::with_sink(MixerConfig::default(), Box::new(sink));

        let streams = HashMap::from([(SpeakerRole::PrimaryHost, vec![0x10, 0x00, 0x7f])]);
        assert_eq!(mixed_samples(&mixer, &streams), vec![0x10]);
    }

    #[test]
    fn single_stray_byte_leaves_nothing_to_mix() {
        let mixer = StreamMixer::default();
        let streams = HashMap::from([(SpeakerRole::Ambient, vec![0x42])]);
        assert!(mixer.mix(&streams).is_empty());
    }

    #[test]
    fn stream_with_unknown_role_is_excluded_not_fatal() {
        let config = MixerConfig {
            volumes: HashMap::from([(SpeakerRole::PrimaryHost, 1.0)]),
        };
        let mixer = StreamMixer::new(config);
        let streams = HashMap::from([
            (SpeakerRole::PrimaryHost, buffer(&[123, 456])),
            (SpeakerRole::Ambient, buffer(&[30000, 30000])),
        ]);
        // The ambient stream has no gain entry; the host stream still mixes.
        assert_eq!(mixed_samples(&mixer, &streams), vec![123, 456]);
    }

    #[test]
    fn output_peak_never_exceeds_full_scale() {
        let mixer = StreamMixer::default();
        let loud = buffer(&[32767i16; 240]);
        let streams = HashMap::from([
            (SpeakerRole::PrimaryHost, loud.clone()),
            (SpeakerRole::PrimaryPartner, loud.clone()),
            (SpeakerRole::Ambient, loud),
        ]);
        let out = mixed_samples(&mixer, &streams);
        assert!(out.iter().all(|s| s.unsigned_abs() <= 32767));
        assert_eq!(out.iter().map(|s| s.unsigned_abs()).max(), Some(32767));
    }

    #[test]
    fn three_full_scale_streams_normalize_to_exactly_the_ceiling() {
        // 2400 bytes of +32000 per role at default gains: the sum is 73600
        // per sample, and normalization must land the peak at exactly 32767.
        let mixer = StreamMixer::default();
        let stream = buffer(&[32000i16; 1200]);
        let streams = HashMap::from([
            (SpeakerRole::PrimaryHost, stream.clone()),
            (SpeakerRole::PrimaryPartner, stream.clone()),
            (SpeakerRole::Ambient, stream),
        ]);
        let out = mixed_samples(&mixer, &streams);
        assert_eq!(out.len(), 1200);
        assert!(out.iter().all(|&s| s == 32767));
    }

    #[test]
    fn normalization_preserves_relative_balance() {
        let mixer = StreamMixer::default();
        let streams = HashMap::from([
            (SpeakerRole::PrimaryHost, buffer(&[32000, 16000])),
            (SpeakerRole::PrimaryPartner, buffer(&[32000, 16000])),
        ]);
        let out = mixed_samples(&mixer, &streams);
        // Both samples scale by the same factor, so 2:1 stays 2:1.
        assert_eq!(out[0], 32767);
        assert!((out[0] as i32 - 2 * out[1] as i32).abs() <= 1);
    }

    #[test]
    fn mix_with_ambient_attenuates_background() {
        let mixer = StreamMixer::default();
        let out = mixer.mix_with_ambient(
            &buffer(&[10000, 10000]),
            SpeakerRole::PrimaryHost,
            &buffer(&[10000, 10000]),
        );
        // 10000 + 10000 * 0.3 = 13000, no normalization needed.
        assert_eq!(pcm::samples_from_bytes(&out), vec![13000, 13000]);
    }

    #[test]
    fn ambient_as_primary_collapses_onto_the_ambient_entry() {
        // Caller mistake, but the collapse is documented: the two map
        // entries share a key, so only the ambient buffer survives.
        let mixer = StreamMixer::default();
        let out = mixer.mix_with_ambient(
            &buffer(&[20000, 20000]),
            SpeakerRole::Ambient,
            &buffer(&[10000, 10000]),
        );
        assert_eq!(pcm::samples_from_bytes(&out), vec![3000, 3000]);
    }

    #[test]
    fn mix_with_ambient_matches_equivalent_mix_call() {
        let mixer = StreamMixer::default();
        let primary = buffer(&[5000, -5000, 7500]);
        let ambient = buffer(&[2000, 2000]);
        let via_helper =
            mixer.mix_with_ambient(&primary, SpeakerRole::PrimaryPartner, &ambient);
        let via_mix = mixer.mix(&HashMap::from([
            (SpeakerRole::PrimaryPartner, primary),
            (SpeakerRole::Ambient, ambient),
        ]));
        assert_eq!(via_helper, via_mix);
    }
}
