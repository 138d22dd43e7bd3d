use crate::serialiser::format_ts;
use crate::session::{CueView, SubtitleSession};

use std::cell::Cell;
use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use log::{debug, trace};

/// A read-only source of the current playback position, in seconds.
pub trait PlaybackClock {
    fn position(&self) -> f64;
}

/// Follows real time from a starting offset.
pub struct WallClock {
    origin: Instant,
    offset: f64,
    speed: f64,
}

impl WallClock {
    pub fn new(offset: f64, speed: f64) -> Self {
        Self {
            origin: Instant::now(),
            offset,
            speed,
        }
    }
}

impl PlaybackClock for WallClock {
    fn position(&self) -> f64 {
        self.offset + self.origin.elapsed().as_secs_f64() * self.speed
    }
}

/// Advances by a fixed step every time it is read.
pub struct SteppedClock {
    next: Cell<f64>,
    step: f64,
}

impl SteppedClock {
    pub fn new(offset: f64, step: f64) -> Self {
        Self {
            next: Cell::new(offset),
            step,
        }
    }
}

impl PlaybackClock for SteppedClock {
    fn position(&self) -> f64 {
        let position = self.next.get();
        self.next.set(position + self.step);
        position
    }
}

/// Whether a clock at `position` moves forward when `step` is added.
/// Steps that vanish in rounding would leave the clock stuck.
pub fn advances(position: f64, step: f64) -> bool {
    position + step > position
}

pub struct PlayOpts {
    /// Position updates per second.
    pub tick_rate: f64,
    /// Stop once the clock passes this position.
    pub until: f64,
    /// Sleep between ticks. Off when the clock is not tied to real time.
    pub wait: bool,
}

/// Drives `session` from `clock`, writing a line each time the displayed caption changes.
/// Returns the number of changes written.
pub fn run<C, W>(session: &mut SubtitleSession, clock: &C, opts: &PlayOpts, out: &mut W) -> Result<usize>
where
    C: PlaybackClock,
    W: Write,
{
    let interval = Duration::from_secs_f64(1.0 / opts.tick_rate.max(1.0));
    let mut changes = 0;
    loop {
        let position = clock.position();
        if position > opts.until {
            debug!("Playback reached {:.3}s, stopping", position);
            break;
        }
        trace!("tick at {:.3}s", position);
        if session.tick(position) {
            write_change(out, position, session.shown())?;
            changes += 1;
        }
        if opts.wait {
            thread::sleep(interval);
        }
    }
    out.flush()?;
    Ok(changes)
}

fn write_change<W: Write>(out: &mut W, position: f64, view: Option<&CueView>) -> Result<()> {
    let ts = format_ts(position);
    match view {
        Some(view) => {
            let text = view.text.replace('\n', " / ");
            if view.live {
                writeln!(out, "[{}] {}", ts, text)?;
            } else {
                writeln!(out, "[{}] ({})", ts, text)?;
            }
        }
        None => writeln!(out, "[{}] -", ts)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRT: &str = "1\n00:00:01,000 --> 00:00:02,000\nHello\nworld\n\n2\n00:00:03,000 --> 00:00:04,000\nB\n";

    #[test]
    fn stepped_clock_advances_per_read() {
        let clock = SteppedClock::new(1.0, 0.5);
        assert_eq!(clock.position(), 1.0);
        assert_eq!(clock.position(), 1.5);
        assert_eq!(clock.position(), 2.0);
    }

    #[test]
    fn tiny_steps_do_not_advance_large_positions() {
        assert!(advances(5.0, 0.25));
        assert!(!advances(5.0, 1e-300));
        assert!(!advances(1e20, 0.25));
        assert!(!advances(5.0, 0.0));
        assert!(!advances(f64::NAN, 1.0));

        let clock = SteppedClock::new(5.0, 1e-300);
        assert_eq!(clock.position(), clock.position());
    }

    #[test]
    fn wall_clock_starts_at_offset() {
        let clock = WallClock::new(10.0, 1.0);
        let position = clock.position();
        assert!(position >= 10.0 && position < 11.0);
    }

    #[test]
    fn prints_changes_with_stale_marker() {
        let mut session = SubtitleSession::new();
        session.load_text(SRT);
        let clock = SteppedClock::new(0.0, 0.5);
        let opts = PlayOpts {
            tick_rate: 2.0,
            until: 5.0,
            wait: false,
        };
        let mut out = Vec::new();

        let changes = run(&mut session, &clock, &opts, &mut out).unwrap();

        let expected = "[00:00:01,000] Hello / world\n\
                        [00:00:02,500] (Hello / world)\n\
                        [00:00:03,000] B\n\
                        [00:00:04,500] (B)\n";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
        assert_eq!(changes, 4);
    }

    #[test]
    fn nothing_is_printed_without_subtitles() {
        let mut session = SubtitleSession::new();
        let clock = SteppedClock::new(0.0, 1.0);
        let opts = PlayOpts {
            tick_rate: 1.0,
            until: 3.0,
            wait: false,
        };
        let mut out = Vec::new();

        assert_eq!(run(&mut session, &clock, &opts, &mut out).unwrap(), 0);
        assert!(out.is_empty());
    }
}
