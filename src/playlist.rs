use std::path::{Path, PathBuf};

use log::debug;

pub const DEFAULT_VOLUME: f32 = 1.0;

const AUDIO_EXTENSIONS: &[(&str, &str)] = &[
    ("mp3", "audio/mpeg"),
    ("wav", "audio/wav"),
    ("flac", "audio/flac"),
    ("ogg", "audio/ogg"),
    ("oga", "audio/ogg"),
    ("opus", "audio/opus"),
    ("m4a", "audio/mp4"),
    ("aac", "audio/aac"),
];

/// One entry in the playlist.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub name: String,
    pub path: PathBuf,
    pub mime: String,
}

impl Track {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, mime: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            mime: mime.into(),
        }
    }

    /// Builds a track whose media type is guessed from the file extension.
    /// Unknown extensions get `application/octet-stream`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| {
                AUDIO_EXTENSIONS
                    .iter()
                    .find(|(known, _)| known.eq_ignore_ascii_case(ext))
            })
            .map_or("application/octet-stream", |(_, mime)| *mime);
        Self::new(name, path, mime)
    }

    pub fn is_audio(&self) -> bool {
        self.mime.starts_with("audio/")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Playing,
    Paused,
}

/// Track list plus transport state for the player front-end.
/// Nothing here touches audio; the host applies the state to its media element.
#[derive(Debug)]
pub struct Playlist {
    tracks: Vec<Track>,
    current: Option<usize>,
    state: PlaybackState,
    volume: f32,
}

impl Default for Playlist {
    fn default() -> Self {
        Self::new()
    }
}

impl Playlist {
    pub fn new() -> Self {
        Self {
            tracks: Vec::new(),
            current: None,
            state: PlaybackState::Paused,
            volume: DEFAULT_VOLUME,
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&Track> {
        self.current.and_then(|i| self.tracks.get(i))
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Appends the audio entries of `tracks`, dropping anything else.
    /// The first track is selected when nothing was selected yet.
    /// Returns how many tracks were added.
    pub fn add<I: IntoIterator<Item = Track>>(&mut self, tracks: I) -> usize {
        let before = self.tracks.len();
        for track in tracks {
            if track.is_audio() {
                self.tracks.push(track);
            } else {
                debug!("Ignoring non-audio entry '{}' ({})", track.name, track.mime);
            }
        }
        let added = self.tracks.len() - before;
        if self.current.is_none() && added > 0 {
            self.select(0);
        }
        added
    }

    /// Makes `index` the current track. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.tracks.len() {
            return false;
        }
        self.current = Some(index);
        debug!("Selected track {}: '{}'", index, self.tracks[index].name);
        true
    }

    pub fn prev(&mut self) -> Option<usize> {
        match self.current {
            Some(i) if i > 0 => {
                self.select(i - 1);
                self.state = PlaybackState::Playing;
                self.current
            }
            _ => None,
        }
    }

    pub fn next(&mut self) -> Option<usize> {
        match self.current {
            Some(i) if i + 1 < self.tracks.len() => {
                self.select(i + 1);
                self.state = PlaybackState::Playing;
                self.current
            }
            _ => None,
        }
    }

    /// The current track finished. Moves on to the next one, or pauses after the last.
    pub fn track_ended(&mut self) -> Option<usize> {
        let next = self.next();
        if next.is_none() {
            self.state = PlaybackState::Paused;
        }
        next
    }

    /// Starts or pauses playback. Starting with no current track picks the first one;
    /// with an empty playlist there is nothing to start.
    pub fn toggle_play(&mut self) -> PlaybackState {
        self.state = match self.state {
            PlaybackState::Playing => PlaybackState::Paused,
            PlaybackState::Paused => {
                if self.current.is_none() {
                    self.select(0);
                }
                if self.current.is_some() {
                    PlaybackState::Playing
                } else {
                    PlaybackState::Paused
                }
            }
        };
        self.state
    }

    pub fn stop(&mut self) {
        self.state = PlaybackState::Paused;
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) -> f32 {
        if volume.is_finite() {
            self.volume = volume.clamp(0.0, 1.0);
        }
        self.volume
    }
}

/// Playback position as a percentage of `duration`. Zero while the duration is unknown.
pub fn progress_percent(position: f64, duration: f64) -> f64 {
    if duration.is_finite() && duration > 0.0 {
        (position / duration * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Position to seek to for a progress-bar value in percent, if the duration is known.
pub fn seek_position(percent: f64, duration: f64) -> Option<f64> {
    if !(duration.is_finite() && duration > 0.0) || percent.is_nan() {
        return None;
    }
    Some(percent.clamp(0.0, 100.0) / 100.0 * duration)
}
