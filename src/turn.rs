//! Turn-taking state machine.
//!
//! One coordinator per active session is the single source of truth for who
//! speaks next and which difficulty phase the conversation is in. It never
//! performs I/O; the orchestration layer asks it questions and relays the
//! status records it returns.

use crate::error::RoleError;
use crate::sink::{CoordinationEvent, EventSink, TracingSink};
use cohost_realtime_types::{Phase, Speaker, SpeakerRole, TurnCompletion, TurnState, TurnStatus};

/// Tracks the active speaker, completed-turn count, and derived phase for
/// exactly one session.
///
/// Every session starts with the host holding the floor at turn zero, phase
/// one. Phase is recomputed from the turn count after each completion and is
/// monotone until an explicit reset (see [`Phase::for_turn_count`]).
pub struct TurnCoordinator {
    state: TurnState,
    sink: Box<dyn EventSink>,
}

impl Default for TurnCoordinator {
    fn default() -> Self {
        TurnCoordinator::new()
    }
}

impl TurnCoordinator {
    pub fn new() -> Self {
        TurnCoordinator::with_sink(Box::new(TracingSink))
    }

    pub fn with_sink(sink: Box<dyn EventSink>) -> Self {
        TurnCoordinator {
            state: TurnState::default(),
            sink,
        }
    }

    /// Gives the floor to the host. Idempotent: repeating the call reports
    /// `switched: false` and changes nothing.
    pub fn start_host_turn(&mut self) -> TurnStatus {
        self.start_turn(Speaker::Host)
    }

    /// Gives the floor to the partner, recording the turn count at the
    /// moment of the switch.
    pub fn start_partner_turn(&mut self) -> TurnStatus {
        self.start_turn(Speaker::Partner)
    }

    fn start_turn(&mut self, speaker: Speaker) -> TurnStatus {
        let switched = self.state.current_speaker != speaker;
        if switched {
            self.state.current_speaker = speaker;
            if speaker == Speaker::Partner {
                self.state.last_switch_turn = self.state.turn_count;
            }
            self.sink.emit(CoordinationEvent::SpeakerSwitched {
                speaker,
                turn_count: self.state.turn_count,
            });
        }
        TurnStatus {
            current_speaker: self.state.current_speaker,
            turn_count: self.state.turn_count,
            phase: self.state.phase,
            switched,
        }
    }

    /// Dispatches to the matching turn-start; `ambient` is the one role that
    /// can never hold the floor and is reported as an error.
    pub fn switch_to(&mut self, role: SpeakerRole) -> Result<TurnStatus, RoleError> {
        let speaker = Speaker::try_from(role).map_err(RoleError::InvalidTurnRole)?;
        Ok(self.start_turn(speaker))
    }

    /// Marks the in-flight turn finished and recomputes the phase.
    ///
    /// `phase_changed` is true exactly once per session: on the completion
    /// that takes the turn count to the phase-two threshold.
    pub fn on_turn_complete(&mut self) -> TurnCompletion {
        self.state.turn_count += 1;
        let new_phase = Phase::for_turn_count(self.state.turn_count);
        let phase_changed = new_phase != self.state.phase;
        self.state.phase = new_phase;
        if phase_changed {
            self.sink.emit(CoordinationEvent::PhaseAdvanced {
                turn_count: self.state.turn_count,
            });
        }
        TurnCompletion {
            turn_count: self.state.turn_count,
            phase: self.state.phase,
            phase_changed,
            current_speaker: self.state.current_speaker,
        }
    }

    /// Pure predicate the orchestration layer consults before handing the
    /// floor to the partner: only the host hands over, and only once the
    /// listener has picked a game.
    ///
    /// Deliberately no cooldown on how recently the floor moved; rapid
    /// toggling is the caller's policy to prevent.
    pub fn should_switch_to_partner(&self, game_selected: bool) -> bool {
        self.state.current_speaker == Speaker::Host && game_selected
    }

    /// Read-only snapshot of the session's turn state.
    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Back to the initial state: host speaking, turn zero, phase one.
    pub fn reset(&mut self) {
        self.reset_to(0);
    }

    /// Reinitializes at a given completed-turn count, phase derived from it.
    pub fn reset_to(&mut self, turn_count: u32) {
        self.state = TurnState {
            current_speaker: Speaker::Host,
            turn_count,
            phase: Phase::for_turn_count(turn_count),
            last_switch_turn: 0,
        };
    }
}
