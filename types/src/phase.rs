use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Turn count at which the partner moves from warm-up to full difficulty.
pub const PHASE_TWO_TURN_THRESHOLD: u32 = 5;

/// Coarse difficulty stage of the partner agent, derived purely from how
/// many turns the conversation has completed.
///
/// Serialized as the numbers 1 and 2 so downstream orchestration can compare
/// phases without knowing this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    One,
    Two,
}

impl Phase {
    /// Pure derivation of phase from a completed-turn count.
    ///
    /// Phase two is entered at `PHASE_TWO_TURN_THRESHOLD` completed turns and
    /// never left except by an explicit session reset.
    pub fn for_turn_count(turn_count: u32) -> Phase {
        if turn_count >= PHASE_TWO_TURN_THRESHOLD {
            Phase::Two
        } else {
            Phase::One
        }
    }

    pub fn as_number(&self) -> u8 {
        match self {
            Phase::One => 1,
            Phase::Two => 2,
        }
    }
}

impl Serialize for Phase {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.as_number())
    }
}

impl<'de> Deserialize<'de> for Phase {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match u8::deserialize(deserializer)? {
            1 => Ok(Phase::One),
            2 => Ok(Phase::Two),
            other => Err(serde::de::Error::custom(format!(
                "phase must be 1 or 2, got {other}"
            ))),
        }
    }
}
