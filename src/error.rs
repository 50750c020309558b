use cohost_realtime_types::SpeakerRole;

/// Role validation failures surfaced by the volume and turn APIs.
///
/// These are caller mistakes, reported synchronously and never silently
/// defaulted. Degraded-input conditions (odd buffers, one bad stream in a
/// mix) are recovered instead and reported through the event sink.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoleError {
    #[error("no volume entry for speaker role {0}")]
    UnknownRole(SpeakerRole),
    #[error("speaker role {0} cannot hold a conversational turn")]
    InvalidTurnRole(SpeakerRole),
}
