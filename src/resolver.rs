use crate::srt::Cue;

/// What should be on screen at a given playback position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    /// The position falls inside this cue's window.
    Live(&'a Cue),
    /// No cue is active; this is the most recently ended one, carried forward.
    Stale(&'a Cue),
    NoCue,
}

impl<'a> Resolved<'a> {
    pub fn cue(&self) -> Option<&'a Cue> {
        match *self {
            Resolved::Live(cue) | Resolved::Stale(cue) => Some(cue),
            Resolved::NoCue => None,
        }
    }

    pub fn text(&self) -> Option<&'a str> {
        self.cue().map(Cue::text)
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Resolved::Live(_))
    }
}

/// An ordered set of cues loaded from one subtitle file.
///
/// Cues are kept sorted by start time (stable, so equal starts keep their
/// file order). The track is only ever replaced wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CueTrack {
    cues: Vec<Cue>,
}

impl CueTrack {
    pub fn new(mut cues: Vec<Cue>) -> Self {
        cues.sort_by(|a, b| a.start.total_cmp(&b.start));
        Self { cues }
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cue> {
        self.cues.iter()
    }

    pub fn first(&self) -> Option<&Cue> {
        self.cues.first()
    }

    pub fn last(&self) -> Option<&Cue> {
        self.cues.last()
    }

    pub fn clear(&mut self) {
        self.cues.clear();
    }

    /// Earliest start and latest end over all cues.
    pub fn span(&self) -> Option<(f64, f64)> {
        let first = self.cues.first()?;
        let end = self.cues.iter().map(|c| c.end).fold(first.end, f64::max);
        Some((first.start, end))
    }

    /// Resolves the cue to display at `time` seconds.
    ///
    /// An active cue wins, taking the first one in track order when windows
    /// overlap. Otherwise the cue with the latest end before `time` is
    /// carried forward. Before any cue has ended there is nothing to show.
    pub fn resolve(&self, time: f64) -> Resolved<'_> {
        // Everything past this point starts after `time`.
        let started = &self.cues[..self.cues.partition_point(|c| c.start <= time)];

        if let Some(cue) = started.iter().find(|c| c.contains(time)) {
            return Resolved::Live(cue);
        }

        self.cues
            .iter()
            .filter(|c| c.end < time)
            .fold(None, |best: Option<&Cue>, cue| match best {
                Some(b) if b.end > cue.end => Some(b),
                _ => Some(cue),
            })
            .map_or(Resolved::NoCue, Resolved::Stale)
    }
}

impl From<Vec<Cue>> for CueTrack {
    fn from(cues: Vec<Cue>) -> Self {
        Self::new(cues)
    }
}

impl<'a> IntoIterator for &'a CueTrack {
    type Item = &'a Cue;
    type IntoIter = std::slice::Iter<'a, Cue>;

    fn into_iter(self) -> Self::IntoIter {
        self.cues.iter()
    }
}

/// Free-function form of [`CueTrack::resolve`].
pub fn resolve(track: &CueTrack, time: f64) -> Resolved<'_> {
    track.resolve(time)
}
