use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A logical audio source with its own independent gain.
///
/// This is a closed set: the mixer's volume table knows exactly these three
/// roles and nothing else. Unknown role strings are rejected at the
/// serialization boundary rather than mapped to a catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpeakerRole {
    /// Foreground voice of the show's host agent.
    PrimaryHost,
    /// Foreground voice of the partner agent.
    PrimaryPartner,
    /// Background/room audio, deliberately attenuated by default.
    Ambient,
}

impl SpeakerRole {
    pub const ALL: [SpeakerRole; 3] = [
        SpeakerRole::PrimaryHost,
        SpeakerRole::PrimaryPartner,
        SpeakerRole::Ambient,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpeakerRole::PrimaryHost => "primary_host",
            SpeakerRole::PrimaryPartner => "primary_partner",
            SpeakerRole::Ambient => "ambient",
        }
    }
}

impl fmt::Display for SpeakerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SpeakerRole {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl FromStr for SpeakerRole {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "primary_host" => Ok(SpeakerRole::PrimaryHost),
            "primary_partner" => Ok(SpeakerRole::PrimaryPartner),
            "ambient" => Ok(SpeakerRole::Ambient),
            other => Err(serde::de::Error::custom(format!(
                "unknown speaker role: {other:?}"
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for SpeakerRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        SpeakerRole::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// One of the two voices that can hold the conversational floor.
///
/// `Ambient` audio plays underneath whoever is speaking but never holds a
/// turn, so turn-taking state uses this narrower type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Host,
    Partner,
}

impl Speaker {
    pub fn role(&self) -> SpeakerRole {
        match self {
            Speaker::Host => SpeakerRole::PrimaryHost,
            Speaker::Partner => SpeakerRole::PrimaryPartner,
        }
    }
}

impl TryFrom<SpeakerRole> for Speaker {
    type Error = SpeakerRole;

    /// Fails with the offending role when it cannot hold a turn.
    fn try_from(role: SpeakerRole) -> Result<Self, Self::Error> {
        match role {
            SpeakerRole::PrimaryHost => Ok(Speaker::Host),
            SpeakerRole::PrimaryPartner => Ok(Speaker::Partner),
            SpeakerRole::Ambient => Err(role),
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speaker::Host => f.write_str("host"),
            Speaker::Partner => f.write_str("partner"),
        }
    }
}
