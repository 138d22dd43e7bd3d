use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum SubplayError {
    NotSubtitleFile(String),
    NoSubtitles,
    InvalidTime(String),
}

impl Error for SubplayError {}

impl fmt::Display for SubplayError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SubplayError::NotSubtitleFile(name) => {
                write!(fmt, "Please select a .srt subtitle file (got '{}')", name)
            }
            SubplayError::NoSubtitles => write!(fmt, "Please load a subtitle file first"),
            SubplayError::InvalidTime(value) => write!(
                fmt,
                "'{}' is not a valid time; use seconds or HH:MM:SS,mmm",
                value
            ),
        }
    }
}
