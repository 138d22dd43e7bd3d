use subplay::player::{self, PlayOpts, SteppedClock, WallClock};
use subplay::{parser, serialiser, Resolved, SubplayError, SubtitleSession};

use std::io::{self, Read, Write};

use anyhow::{anyhow, Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use env_logger::{Builder, Env};
use log::warn;

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match run(cli) {
        Ok(()) => (),
        Err(err) => {
            eprintln!("An error occurred: {}", err);
            for cause in err.chain().skip(1) {
                eprintln!("    {}", cause);
            }
            std::process::exit(1);
        }
    }
}

fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    Builder::from_env(Env::default().default_filter_or(default_level))
        .format(|buf, record| writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args()))
        .target(env_logger::Target::Stderr)
        .init();
}

#[derive(ClapParser)]
#[command(about = "Show SRT subtitles in sync with audio playback")]
struct Cli {
    #[arg(short, long, global = true, help = "Log parsing and playback details.")]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every cue in the subtitle file.
    Cues {
        #[arg(
            short,
            long,
            value_name = "FILE",
            help = "The .srt file to read from. If not supplied, the subtitles will be read from standard input.",
            default_value = "-"
        )]
        input: String,
    },
    /// Show which caption is on screen at a playback position.
    At {
        #[arg(
            short,
            long,
            value_name = "FILE",
            help = "The .srt file to read from. If not supplied, the subtitles will be read from standard input.",
            default_value = "-"
        )]
        input: String,
        #[arg(value_name = "TIME", help = "Position in seconds or as HH:MM:SS,mmm.")]
        time: String,
    },
    /// Rewrite the subtitles as clean, renumbered SRT.
    Normalize {
        #[arg(
            short,
            long,
            value_name = "FILE",
            help = "The .srt file to read from. If not supplied, the subtitles will be read from standard input.",
            default_value = "-"
        )]
        input: String,
        #[arg(
            short,
            long,
            value_name = "FILE",
            help = "The file to write to. If not supplied, the subtitles will be written to standard output.",
            default_value = "-"
        )]
        output: String,
    },
    /// Follow a playback clock and print captions as they change.
    Play {
        #[arg(
            short,
            long,
            value_name = "FILE",
            help = "The .srt file to read from. If not supplied, the subtitles will be read from standard input.",
            default_value = "-"
        )]
        input: String,
        #[arg(long, value_name = "TIME", help = "Start playback at this position.", default_value = "0")]
        from: String,
        #[arg(long, value_name = "TIME", help = "Stop at this position. Defaults to the end of the last cue.")]
        until: Option<String>,
        #[arg(long, value_name = "HZ", help = "Position updates per second.", default_value_t = 4.0)]
        rate: f64,
        #[arg(long, help = "Playback speed multiplier.", default_value_t = 1.0)]
        speed: f64,
        #[arg(long, help = "Do not wait in real time; step through the timeline immediately.")]
        instant: bool,
    },
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Cues { input } => {
            let session = load(&input)?;
            let stdout = io::stdout();
            let mut out = stdout.lock();
            for (i, cue) in session.track().iter().enumerate() {
                writeln!(
                    out,
                    "{:>4}  {} --> {}  {}",
                    i + 1,
                    serialiser::format_ts(cue.start()),
                    serialiser::format_ts(cue.end()),
                    cue.text().replace('\n', " / ")
                )?;
            }
        }
        Command::At { input, time } => {
            let session = load(&input)?;
            let time = parse_time(&time)?;
            match session.track().resolve(time) {
                Resolved::Live(cue) => println!("{}", cue.text()),
                Resolved::Stale(cue) => println!("({})", cue.text()),
                Resolved::NoCue => println!("-"),
            }
        }
        Command::Normalize { input, output } => {
            let session = load(&input)?;
            if !session.has_subtitles() {
                return Err(anyhow!("You appear to have supplied an empty file."));
            }
            if output == "-" {
                serialiser::serialise(session.track(), io::stdout())?;
            } else {
                let dst = std::fs::File::create(&output)
                    .context(format!("Failed to create output file: '{}'", output))?;
                serialiser::serialise(session.track(), dst)?;
            }
        }
        Command::Play {
            input,
            from,
            until,
            rate,
            speed,
            instant,
        } => {
            let mut session = load(&input)?;
            let (_, last_end) = session.track().span().ok_or(SubplayError::NoSubtitles)?;
            let from = parse_time(&from)?;
            let until = match until {
                Some(until) => parse_time(&until)?,
                None => last_end + 1.0,
            };
            let step = playback_step(from, until, speed, rate)?;
            let opts = PlayOpts {
                tick_rate: rate,
                until,
                wait: !instant,
            };

            let stdout = io::stdout();
            let mut out = stdout.lock();
            if instant {
                let clock = SteppedClock::new(from, step);
                player::run(&mut session, &clock, &opts, &mut out)?;
            } else {
                let clock = WallClock::new(from, speed);
                player::run(&mut session, &clock, &opts, &mut out)?;
            }
        }
    }

    Ok(())
}

fn load(input: &str) -> Result<SubtitleSession> {
    let mut session = SubtitleSession::new();
    let count = if input == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        session.load_text(&buffer)
    } else {
        session
            .load_file(input)
            .context(format!("Failed to load subtitles: '{}'", input))?
    };
    if count == 0 {
        warn!("No subtitles found in '{}'", input);
    }
    Ok(session)
}

/// Position advance per tick. Refuses settings under which the clock would
/// get stuck somewhere between `from` and `until`.
fn playback_step(from: f64, until: f64, speed: f64, rate: f64) -> Result<f64> {
    if !(speed.is_finite() && speed > 0.0) || !(rate.is_finite() && rate > 0.0) {
        return Err(anyhow!("Playback speed and update rate must be positive."));
    }
    let step = speed / rate;
    if !player::advances(from, step) || !player::advances(until, step) {
        return Err(anyhow!(
            "Playback would stall before {}s at speed {} and {} updates per second.",
            until,
            speed,
            rate
        ));
    }
    Ok(step)
}

/// Accepts plain seconds (`12.5`) or an SRT timestamp (`00:00:12,500`).
fn parse_time(value: &str) -> Result<f64, SubplayError> {
    match value.trim().parse::<f64>() {
        Ok(secs) if secs.is_finite() => Ok(secs),
        _ => parser::parse_timestamp(value).ok_or_else(|| SubplayError::InvalidTime(value.to_string())),
    }
}
