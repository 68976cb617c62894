//! pinch_osc — send the pinch distance as an OSC control voltage.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;

use pinch_cadence::{spawn_landmark_source, ControlVoltage, RangeMapping, SineSource, StreamSource};
use pinch_osc::sink::{open_midi_or_null, open_osc_or_null};
use pinch_osc::{run_sender, OscConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SourceKind {
    /// JSON landmark lines on stdin
    Stdin,
    /// Synthetic sine sweep (no camera needed)
    Sine,
    /// JSON landmark lines from a detector command (see --command)
    Command,
    /// LeapMotion hardware
    #[cfg(feature = "leap")]
    Leap,
}

#[derive(Parser, Debug)]
#[command(name = "pinch_osc", about = "Send the thumb–index pinch distance as an OSC control voltage")]
struct Cli {
    /// Host the OSC receiver listens on
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// UDP port of the OSC receiver
    #[arg(long, default_value_t = 7001)]
    port: u16,

    /// Address namespace configured on the receiver
    #[arg(long, default_value = "/ENFACE")]
    namespace: String,

    /// Output channel (address becomes <namespace>/ch/<channel>)
    #[arg(long, default_value_t = 1)]
    channel: u32,

    /// Pinch distance at or below which the output is output_low
    #[arg(long, default_value_t = 0.05)]
    input_low: f64,

    /// Pinch distance at or above which the output is output_high
    #[arg(long, default_value_t = 0.3)]
    input_high: f64,

    #[arg(long, default_value_t = 0.0)]
    output_low: f64,

    #[arg(long, default_value_t = 3.0)]
    output_high: f64,

    /// Send MIDI CC instead of OSC, optionally to the first port matching FILTER
    #[arg(long, value_name = "FILTER", num_args = 0..=1, default_missing_value = "")]
    midi: Option<String>,

    /// MIDI controller number for --midi
    #[arg(long, default_value_t = 1)]
    midi_cc: u8,

    /// Where landmark frames come from
    #[arg(long, value_enum, default_value_t = SourceKind::Stdin)]
    source: SourceKind,

    /// Detector command for --source command
    #[arg(long)]
    command: Option<String>,

    /// Frame rate of the sine source
    #[arg(long, default_value_t = 100.0)]
    rate: f32,

    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u64>,
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
    let voltage = ControlVoltage::new(mapping);

    let cfg = OscConfig {
        host:      cli.host.clone(),
        port:      cli.port,
        namespace: cli.namespace.clone(),
        channel:   cli.channel,
    };

    let mut sink = match &cli.midi {
        Some(filter) => {
            let channel = (cli.channel.saturating_sub(1)).min(15) as u8;
            open_midi_or_null(filter, channel, cli.midi_cc, voltage)
        }
        None => open_osc_or_null(&cfg),
    };

    let rx = match cli.source {
        SourceKind::Stdin => spawn_landmark_source(StreamSource::stdin()),
        SourceKind::Sine => spawn_landmark_source(SineSource {
            low:     (mapping.input_low() * 0.5) as f32,
            high:    (mapping.input_high() * 1.1) as f32,
            rate_hz: cli.rate,
            ..SineSource::default()
        }),
        SourceKind::Command => {
            let cmd = cli.command.as_deref()
                .context("--source command needs --command \"<detector> [args]\"")?;
            spawn_landmark_source(StreamSource::command(cmd)?)
        }
        #[cfg(feature = "leap")]
        SourceKind::Leap => spawn_landmark_source(pinch_cadence::LeapSource::default()),
    };

    info!("pinch → {}  (range {:?})", sink.describe(), mapping);
    let stats = run_sender(&rx, &voltage, sink.as_mut(), cli.frames);
    info!("last value sent: {:.3}", stats.last_value);
    Ok(())
}
