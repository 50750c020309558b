use crate::phase::Phase;
use crate::roles::Speaker;
use serde::{Deserialize, Serialize};

/// Snapshot of one session's turn-taking state.
///
/// Owned exclusively by the session's coordinator; callers only ever see
/// copies of it, never a handle they could mutate behind the coordinator's
/// back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    pub current_speaker: Speaker,
    pub turn_count: u32,
    pub phase: Phase,
    /// Turn count recorded at the moment the floor last moved to the partner.
    pub last_switch_turn: u32,
}

impl Default for TurnState {
    fn default() -> Self {
        TurnState {
            current_speaker: Speaker::Host,
            turn_count: 0,
            phase: Phase::One,
            last_switch_turn: 0,
        }
    }
}

/// Result of a speaker-switch request, shipped to the orchestration layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnStatus {
    pub current_speaker: Speaker,
    pub turn_count: u32,
    pub phase: Phase,
    /// Whether the speaker actually changed; repeating a switch reports false.
    pub switched: bool,
}

/// Result of completing one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnCompletion {
    pub turn_count: u32,
    pub phase: Phase,
    /// True exactly on the turn where the phase first flips from one to two.
    pub phase_changed: bool,
    pub current_speaker: Speaker,
}
