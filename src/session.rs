use crate::error::SubplayError;
use crate::parser::Parser;
use crate::resolver::{CueTrack, Resolved};

use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info};

pub const MIN_FONT_SIZE: u32 = 24;
pub const MAX_FONT_SIZE: u32 = 96;
pub const DEFAULT_FONT_SIZE: u32 = 48;
pub const FONT_STEP: u32 = 4;

/// The caption currently on screen, detached from the track it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct CueView {
    pub text: String,
    /// False when the caption is carried forward past its end.
    pub live: bool,
}

impl From<Resolved<'_>> for Option<CueView> {
    fn from(resolved: Resolved<'_>) -> Self {
        resolved.text().map(|text| CueView {
            text: text.to_string(),
            live: resolved.is_live(),
        })
    }
}

/// Subtitle state held on behalf of the player front-end.
#[derive(Debug)]
pub struct SubtitleSession {
    track: CueTrack,
    shown: Option<CueView>,
    fullscreen: bool,
    font_size: u32,
}

impl Default for SubtitleSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SubtitleSession {
    pub fn new() -> Self {
        Self {
            track: CueTrack::default(),
            shown: None,
            fullscreen: false,
            font_size: DEFAULT_FONT_SIZE,
        }
    }

    pub fn track(&self) -> &CueTrack {
        &self.track
    }

    pub fn has_subtitles(&self) -> bool {
        !self.track.is_empty()
    }

    pub fn shown(&self) -> Option<&CueView> {
        self.shown.as_ref()
    }

    /// Loads a subtitle file, replacing whatever was loaded before.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let path = path.as_ref();
        let is_srt = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| ext.eq_ignore_ascii_case("srt"));
        if !is_srt {
            return Err(SubplayError::NotSubtitleFile(path.display().to_string()).into());
        }

        let text = std::fs::read_to_string(path)
            .context(format!("Failed to open subtitle file: '{}'", path.display()))?;
        Ok(self.load_text(&text))
    }

    /// Parses `text` and installs it as the active track. Returns the number of cues.
    pub fn load_text(&mut self, text: &str) -> usize {
        let mut parser = Parser::new();
        let cues = parser.parse(text);
        if parser.skipped() > 0 {
            info!("Ignored {} malformed subtitle blocks", parser.skipped());
        }
        self.track = CueTrack::new(cues);
        self.shown = None;
        info!("Loaded {} subtitles", self.track.len());
        self.track.len()
    }

    pub fn clear(&mut self) {
        self.track.clear();
        self.shown = None;
        self.fullscreen = false;
        debug!("Subtitles cleared");
    }

    /// Re-resolves the displayed caption for `position` seconds.
    /// Returns true when what should be shown has changed.
    pub fn tick(&mut self, position: f64) -> bool {
        let view: Option<CueView> = self.track.resolve(position).into();
        if view == self.shown {
            return false;
        }
        self.shown = view;
        true
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn toggle_fullscreen(&mut self) -> Result<bool, SubplayError> {
        if !self.fullscreen && !self.has_subtitles() {
            return Err(SubplayError::NoSubtitles);
        }
        self.fullscreen = !self.fullscreen;
        Ok(self.fullscreen)
    }

    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    pub fn set_font_size(&mut self, size: u32) -> u32 {
        self.font_size = size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        self.font_size
    }

    pub fn grow_font(&mut self) -> u32 {
        self.set_font_size(self.font_size.saturating_add(FONT_STEP))
    }

    pub fn shrink_font(&mut self) -> u32 {
        self.set_font_size(self.font_size.saturating_sub(FONT_STEP))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRT: &str = "1\n00:00:00,000 --> 00:00:02,000\nA\n\n2\n00:00:03,000 --> 00:00:05,000\nB\n";

    #[test]
    fn tick_reports_changes_only() {
        let mut session = SubtitleSession::new();
        session.load_text(SRT);

        assert!(session.tick(1.0));
        assert_eq!(session.shown().map(|v| v.live), Some(true));
        assert!(!session.tick(1.5));

        assert!(session.tick(2.5));
        assert_eq!(
            session.shown(),
            Some(&CueView {
                text: "A".to_string(),
                live: false
            })
        );

        assert!(session.tick(4.0));
        assert_eq!(session.shown().map(|v| v.text.as_str()), Some("B"));
    }

    #[test]
    fn loading_resets_display() {
        let mut session = SubtitleSession::new();
        session.load_text(SRT);
        session.tick(1.0);
        assert!(session.shown().is_some());

        assert_eq!(session.load_text("1\n00:00:10,000 --> 00:00:11,000\nC"), 1);
        assert!(session.shown().is_none());
    }

    #[test]
    fn clear_empties_and_leaves_fullscreen() {
        let mut session = SubtitleSession::new();
        session.load_text(SRT);
        session.tick(1.0);
        assert_eq!(session.toggle_fullscreen().ok(), Some(true));

        session.clear();
        assert!(!session.has_subtitles());
        assert!(session.shown().is_none());
        assert!(!session.is_fullscreen());
        assert!(!session.tick(1.0));
    }

    #[test]
    fn fullscreen_needs_subtitles() {
        let mut session = SubtitleSession::new();
        assert!(matches!(
            session.toggle_fullscreen(),
            Err(SubplayError::NoSubtitles)
        ));
        session.load_text(SRT);
        assert_eq!(session.toggle_fullscreen().ok(), Some(true));
        assert_eq!(session.toggle_fullscreen().ok(), Some(false));
    }

    #[test]
    fn font_size_is_bounded() {
        let mut session = SubtitleSession::new();
        assert_eq!(session.font_size(), DEFAULT_FONT_SIZE);
        assert_eq!(session.set_font_size(0), MIN_FONT_SIZE);
        assert_eq!(session.shrink_font(), MIN_FONT_SIZE);
        assert_eq!(session.set_font_size(1000), MAX_FONT_SIZE);
        assert_eq!(session.grow_font(), MAX_FONT_SIZE);
        assert_eq!(session.set_font_size(50), 50);
        assert_eq!(session.grow_font(), 54);
    }

    #[test]
    fn rejects_non_srt_files() {
        let mut session = SubtitleSession::new();
        let err = session.load_file("notes.txt").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SubplayError>(),
            Some(SubplayError::NotSubtitleFile(_))
        ));
        assert!(session.load_file("no_extension").is_err());
    }

    #[test]
    fn loads_srt_from_disk() {
        let path = std::env::temp_dir().join(format!("subplay-session-{}.SRT", std::process::id()));
        std::fs::write(&path, SRT).unwrap();

        let mut session = SubtitleSession::new();
        let loaded = session.load_file(&path);
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.unwrap(), 2);
        assert!(session.has_subtitles());
    }
}
