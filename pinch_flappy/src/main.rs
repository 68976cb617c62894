//! pinch_flappy — game entry point.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use simple_logger::SimpleLogger;

use pinch_cadence::RangeMapping;
use pinch_flappy::app::{run, AppConfig};
use pinch_flappy::game::GameConfig;
use pinch_flappy::hand::HandSourceKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SourceArg {
    /// Keyboard-simulated hand (Up/Down/0)
    Sim,
    /// JSON landmark lines on stdin
    Stdin,
    /// JSON landmark lines from a detector command (see --command)
    Command,
    /// LeapMotion hardware
    #[cfg(feature = "leap")]
    Leap,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PolarityArg {
    /// Wider pinch flaps faster
    OpenFast,
    /// Wider pinch flaps slower
    OpenSlow,
}

#[derive(Parser, Debug)]
#[command(name = "pinch_flappy", about = "Flappy bird, flapping at the rhythm of your pinch")]
struct Cli {
    #[arg(long, value_enum, default_value_t = SourceArg::Sim)]
    source: SourceArg,

    /// Detector command for --source command
    #[arg(long)]
    command: Option<String>,

    #[arg(long, value_enum, default_value_t = PolarityArg::OpenFast)]
    polarity: PolarityArg,

    /// Pinch distance at or below which the hand counts as closed
    #[arg(long, default_value_t = 0.08)]
    input_low: f64,

    /// Pinch distance at or above which the cadence saturates
    #[arg(long, default_value_t = 0.25)]
    input_high: f64,

    /// Seconds between flaps at the slow end
    #[arg(long, default_value_t = 2.0)]
    slow_interval: f64,

    /// Seconds between flaps at the fast end
    #[arg(long, default_value_t = 0.1)]
    fast_interval: f64,

    /// Fixed seed for the pipe layout
    #[arg(long)]
    seed: Option<u64>,

    /// Start with the hand inset hidden (toggle with H)
    #[arg(long)]
    hide_hand: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .env()
        .init()
        .context("failed to initialise logger")?;

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║           Pinch Flappy — flap at the rhythm of a pinch       ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    println!("  Space = flap   R / click RETRY = restart   H = hand overlay   Q = quit");
    if cli.source == SourceArg::Sim {
        println!("  Simulated hand: Up = open   Down = close   0 = hide");
    }
    println!();

    let (low, high) = match cli.polarity {
        PolarityArg::OpenFast => (cli.slow_interval, cli.fast_interval),
        PolarityArg::OpenSlow => (cli.fast_interval, cli.slow_interval),
    };
    let mapping = RangeMapping::new(cli.input_low, cli.input_high, low, high)
        .context("invalid pinch/interval range")?;

    let source = match cli.source {
        SourceArg::Sim   => HandSourceKind::Sim,
        SourceArg::Stdin => HandSourceKind::Stdin,
        SourceArg::Command => HandSourceKind::Command(
            cli.command.clone()
                .context("--source command needs --command \"<detector> [args]\"")?,
        ),
        #[cfg(feature = "leap")]
        SourceArg::Leap  => HandSourceKind::Leap,
    };

    let cfg = AppConfig {
        game: GameConfig { mapping, seed: cli.seed, ..GameConfig::default() },
        source,
        show_hand: !cli.hide_hand,
    };

    run(cfg).context("game window failed")?;
    Ok(())
}
