pub mod audio;
pub mod phase;
pub mod roles;
pub mod status;

pub use audio::{PCM16_SAMPLE_RATE, PCM16_BYTES_PER_SAMPLE};
pub use phase::Phase;
pub use roles::{Speaker, SpeakerRole};
pub use status::{TurnCompletion, TurnState, TurnStatus};
