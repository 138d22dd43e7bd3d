/// A single caption entry. Times are in seconds from the start of the track.
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    pub(crate) start: f64,
    pub(crate) end: f64,
    pub(crate) text: String,
}

impl Cue {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }

    /// Both bounds are inclusive. A cue whose end precedes its start never contains anything.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_inclusive() {
        let cue = Cue::new(1.0, 2.0, "x");
        assert!(cue.contains(1.0));
        assert!(cue.contains(2.0));
        assert!(!cue.contains(0.999));
        assert!(!cue.contains(2.001));
    }

    #[test]
    fn inverted_cue_contains_nothing() {
        let cue = Cue::new(5.0, 4.0, "x");
        assert!(!cue.contains(4.5));
        assert!(!cue.contains(5.0));
        assert!(!cue.contains(4.0));
    }

    #[test]
    fn lines_split_on_newline() {
        let cue = Cue::new(0.0, 1.0, "Hello\nworld");
        assert_eq!(cue.lines().collect::<Vec<_>>(), vec!["Hello", "world"]);
    }
}
