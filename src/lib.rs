pub mod config;
pub mod error;
pub mod mixer;
pub mod pcm;
pub mod sink;
pub mod turn;

pub use cohost_realtime_types as types;

pub use config::MixerConfig;
pub use error::RoleError;
pub use mixer::StreamMixer;
pub use sink::{CoordinationEvent, EventSink, TracingSink};
pub use turn::TurnCoordinator;
