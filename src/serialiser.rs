use crate::resolver::CueTrack;
use crate::srt::Cue;

use std::io::{BufWriter, Write};

use anyhow::{Context, Result};

/// Writes the track as SRT, numbering cues from 1 in track order.
pub fn serialise<W: Write>(track: &CueTrack, dst: W) -> Result<()> {
    let mut writer = BufWriter::new(dst);
    write_cues(&mut writer, track).context("Failed to write subtitles.")?;
    writer.flush().context("Failed to write subtitles.")?;
    Ok(())
}

fn write_cues<W: Write>(buf: &mut W, track: &CueTrack) -> Result<()> {
    for (i, cue) in track.iter().enumerate() {
        write_cue(buf, i + 1, cue)?;
    }
    Ok(())
}

fn write_cue<W: Write>(buf: &mut W, seqnum: usize, cue: &Cue) -> Result<()> {
    writeln!(buf, "{}", seqnum)?;
    writeln!(buf, "{} --> {}", format_ts(cue.start), format_ts(cue.end))?;
    for line in cue.lines() {
        writeln!(buf, "{}", line)?;
    }
    writeln!(buf)?;
    Ok(())
}

/// Formats seconds as `HH:MM:SS,mmm`, rounding to the nearest millisecond.
pub fn format_ts(seconds: f64) -> String {
    let total_millis = (seconds.max(0.0) * 1000.0).round() as u64;
    let total_secs = total_millis / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;
    let millis = total_millis % 1000;
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    macro_rules! test_format_ts {
        ($($name:ident: $value:expr,)*) => {
        $(
            #[test]
            fn $name() {
                let (input, expected) = $value;

                assert_eq!(format_ts(input), expected);
            }
        )*
        }
    }

    test_format_ts! {
        test_format_ts_0: (0.0, "00:00:00,000"),
        test_format_ts_1: (0.001, "00:00:00,001"),
        test_format_ts_2: (0.999, "00:00:00,999"),
        test_format_ts_3: (1.0, "00:00:01,000"),
        test_format_ts_4: (24.4, "00:00:24,400"),
        test_format_ts_5: (59.999, "00:00:59,999"),
        test_format_ts_6: (60.0, "00:01:00,000"),
        test_format_ts_7: (3600.0, "01:00:00,000"),
        test_format_ts_8: (7326.159, "02:02:06,159"),
        test_format_ts_9: (360_000.001, "100:00:00,001"),
        test_format_ts_10: (-3.0, "00:00:00,000"),
    }

    #[test]
    fn writes_renumbered_sorted_track() {
        let track = CueTrack::new(vec![
            Cue::new(3.0, 5.0, "B"),
            Cue::new(0.0, 2.5, "Hello\nworld"),
        ]);
        let mut buf = Cursor::new(vec![]);
        serialise(&track, &mut buf).unwrap();

        let expected = "1\n00:00:00,000 --> 00:00:02,500\nHello\nworld\n\n\
                        2\n00:00:03,000 --> 00:00:05,000\nB\n\n";
        assert_eq!(String::from_utf8(buf.into_inner()).unwrap(), expected);
    }

    #[test]
    fn output_parses_back_to_the_same_track() {
        let track = CueTrack::new(vec![
            Cue::new(0.0, 2.5, "Hello\nworld"),
            Cue::new(3.0, 5.0, "B"),
        ]);
        let mut buf = Cursor::new(vec![]);
        serialise(&track, &mut buf).unwrap();

        let text = String::from_utf8(buf.into_inner()).unwrap();
        assert_eq!(CueTrack::new(crate::parser::parse(&text)), track);
    }
}
