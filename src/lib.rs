//! Subtitle timing core for an audio player: reads SRT captions into a cue
//! track and resolves which caption belongs on screen at a playback position.

pub mod error;
pub mod parser;
pub mod player;
pub mod playlist;
pub mod resolver;
pub mod serialiser;
pub mod session;
pub mod srt;

pub use crate::error::SubplayError;
pub use crate::parser::{parse, parse_timestamp, Parser};
pub use crate::playlist::{PlaybackState, Playlist, Track};
pub use crate::resolver::{resolve, CueTrack, Resolved};
pub use crate::session::{CueView, SubtitleSession};
pub use crate::srt::Cue;
