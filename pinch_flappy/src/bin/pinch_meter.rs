//! pinch_meter — live thumb–index distance with landmarks and value bar.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use simple_logger::SimpleLogger;

use pinch_cadence::{ControlVoltage, RangeMapping};
use pinch_flappy::app::{run_meter, MeterConfig};
use pinch_flappy::hand::HandSourceKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SourceArg {
    Sim,
    Stdin,
    Command,
    #[cfg(feature = "leap")]
    Leap,
}

#[derive(Parser, Debug)]
#[command(name = "pinch_meter", about = "Show the pinch distance and its mapped control value")]
struct Cli {
    #[arg(long, value_enum, default_value_t = SourceArg::Sim)]
    source: SourceArg,

    #[arg(long)]
    command: Option<String>,

    #[arg(long, default_value_t = 0.05)]
    input_low: f64,

    #[arg(long, default_value_t = 0.3)]
    input_high: f64,

    #[arg(long, default_value_t = 0.0)]
    output_low: f64,

    #[arg(long, default_value_t = 3.0)]
    output_high: f64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .env()
        .init()
        .context("failed to initialise logger")?;

    let mapping = RangeMapping::new(cli.input_low, cli.input_high, cli.output_low, cli.output_high)
        .context("invalid distance/output range")?;

    let source = match cli.source {
        SourceArg::Sim     => HandSourceKind::Sim,
        SourceArg::Stdin   => HandSourceKind::Stdin,
        SourceArg::Command => HandSourceKind::Command(
            cli.command.clone().context("--source command needs --command")?,
        ),
        #[cfg(feature = "leap")]
        SourceArg::Leap    => HandSourceKind::Leap,
    };

    run_meter(MeterConfig { source, voltage: ControlVoltage::new(mapping) })
        .context("meter window failed")?;
    Ok(())
}
