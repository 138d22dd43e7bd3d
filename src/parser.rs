use crate::srt::Cue;

use std::sync::OnceLock;

use log::debug;
use nom::bytes::complete::{tag, take_while, take_while_m_n};
use nom::combinator::map_res;
use nom::IResult;
use regex::Regex;

const BOM: char = '\u{FEFF}';

/// Lenient SRT reader. Blocks that cannot be understood are dropped and
/// parsing carries on with the next one; `parse` never fails.
#[derive(Debug, Default)]
pub struct Parser {
    skipped: usize,
}

impl Parser {
    pub fn new() -> Self {
        Self { skipped: 0 }
    }

    /// Number of blocks dropped by the most recent call to `parse`.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn parse(&mut self, input: &str) -> Vec<Cue> {
        self.skipped = 0;
        let input = input.trim_start_matches(BOM).trim();
        if input.is_empty() {
            return Vec::new();
        }

        let mut cues = Vec::new();
        for (index, block) in block_separator().split(input).enumerate() {
            match cue(block) {
                Some(cue) => cues.push(cue),
                None => {
                    debug!("Skipping malformed subtitle block #{}: {:?}", index + 1, block);
                    self.skipped += 1;
                }
            }
        }
        debug!("Parsed {} cues, skipped {} blocks", cues.len(), self.skipped);
        cues
    }
}

/// Convenience wrapper around a throwaway `Parser`.
pub fn parse(input: &str) -> Vec<Cue> {
    Parser::new().parse(input)
}

/// Parses a lone `HH:MM:SS,mmm` timestamp into seconds.
pub fn parse_timestamp(input: &str) -> Option<f64> {
    match timestamp(input.trim()) {
        Ok(("", secs)) => Some(secs),
        _ => None,
    }
}

fn block_separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r"\n\s*\n").expect("block separator pattern is valid"))
}

fn cue(block: &str) -> Option<Cue> {
    let lines: Vec<&str> = block
        .trim()
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .collect();
    if lines.len() < 3 {
        return None;
    }

    // The first line holds the sequence number, which carries no meaning for playback.
    let (start, end) = find_time_range(lines[1])?;
    Some(Cue {
        start,
        end,
        text: lines[2..].join("\n"),
    })
}

/// The time range may sit anywhere on its line; the first match wins.
fn find_time_range(line: &str) -> Option<(f64, f64)> {
    line.char_indices()
        .filter(|(_, c)| c.is_ascii_digit())
        .find_map(|(i, _)| time_range(&line[i..]).ok().map(|(_, range)| range))
}

fn time_range(input: &str) -> IResult<&str, (f64, f64)> {
    let (input, start) = timestamp(input)?;
    let (input, _) = blank(input)?;
    let (input, _) = tag("-->")(input)?;
    let (input, _) = blank(input)?;
    let (input, end) = timestamp(input)?;

    Ok((input, (start, end)))
}

// Any whitespace is tolerated around the arrow, including no-break and vertical spaces.
fn blank(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| c.is_whitespace() || c == BOM)(input)
}

fn timestamp(input: &str) -> IResult<&str, f64> {
    let (input, hours) = digits(input, 2)?;
    let (input, _) = tag(":")(input)?;
    let (input, minutes) = digits(input, 2)?;
    let (input, _) = tag(":")(input)?;
    let (input, seconds) = digits(input, 2)?;
    let (input, _) = tag(",")(input)?;
    let (input, millis) = digits(input, 3)?;

    let whole = hours * 3600 + minutes * 60 + seconds;
    Ok((input, whole as f64 + millis as f64 / 1000.0))
}

fn digits(input: &str, count: usize) -> IResult<&str, u64> {
    map_res(
        take_while_m_n(count, count, |c: char| c.is_ascii_digit()),
        |s: &str| s.parse::<u64>(),
    )(input)
}
