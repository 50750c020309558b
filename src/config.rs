//! Mixer configuration.
//!
//! The default volume table is an explicit value handed to each mixer at
//! construction rather than a process-wide constant, so two sessions can run
//! different balances without seeing each other's changes.

use cohost_realtime_types::SpeakerRole;
use std::collections::HashMap;
use std::env;

/// Default gain for the host's foreground voice.
pub const DEFAULT_HOST_GAIN: f32 = 1.0;
/// Default gain for the partner's foreground voice.
pub const DEFAULT_PARTNER_GAIN: f32 = 1.0;
/// Default gain for background audio. Attenuated so room sound never
/// competes with foreground dialogue.
pub const DEFAULT_AMBIENT_GAIN: f32 = 0.3;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid gain in {var}: {value:?} is not a number")]
    InvalidGain { var: String, value: String },
}

/// Initial volume table for one mixer instance.
#[derive(Debug, Clone, PartialEq)]
pub struct MixerConfig {
    pub volumes: HashMap<SpeakerRole, f32>,
}

impl Default for MixerConfig {
    fn default() -> Self {
        MixerConfig {
            volumes: HashMap::from([
                (SpeakerRole::PrimaryHost, DEFAULT_HOST_GAIN),
                (SpeakerRole::PrimaryPartner, DEFAULT_PARTNER_GAIN),
                (SpeakerRole::Ambient, DEFAULT_AMBIENT_GAIN),
            ]),
        }
    }
}

impl MixerConfig {
    /// Loads the default table with optional per-role overrides from the
    /// environment.
    ///
    /// *   `COHOST_HOST_GAIN`: (Optional) gain override for `primary_host`.
    /// *   `COHOST_PARTNER_GAIN`: (Optional) gain override for `primary_partner`.
    /// *   `COHOST_AMBIENT_GAIN`: (Optional) gain override for `ambient`.
    ///
    /// Overrides are clamped into `[0.0, 1.0]`; values that do not parse as
    /// numbers are a configuration error rather than a silent fallback.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env for local development; ignored if not present.
        dotenvy::dotenv().ok();

        let mut config = MixerConfig::default();
        let vars = [
            (SpeakerRole::PrimaryHost, "COHOST_HOST_GAIN"),
            (SpeakerRole::PrimaryPartner, "COHOST_PARTNER_GAIN"),
            (SpeakerRole::Ambient, "COHOST_AMBIENT_GAIN"),
        ];
        for (role, var) in vars {
            if let Ok(value) = env::var(var) {
                let gain = value.parse::<f32>().map_err(|_| ConfigError::InvalidGain {
                    var: var.to_string(),
                    value: value.clone(),
                })?;
                config.volumes.insert(role, gain.clamp(0.0, 1.0));
            }
        }
        Ok(config)
    }

    /// Builder-style override of one role's starting gain, clamped.
    pub fn with_volume(mut self, role: SpeakerRole, gain: f32) -> Self {
        self.volumes.insert(role, gain.clamp(0.0, 1.0));
        self
    }
}
