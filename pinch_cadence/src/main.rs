//! Interactive explorer for pinch-distance mappings and jump cadence.

use log::LevelFilter;
use pinch_cadence::{
    compute_interval, map_to_scalar, Clock, JumpCadence, ManualClock, Polarity, RangeMapping,
};
use simple_logger::SimpleLogger;
use std::io::{self, Write};

fn main() {
    if let Err(e) = SimpleLogger::new().with_level(LevelFilter::Info).env().init() {
        eprintln!("logger init failed: {}", e);
    }

    println!();
    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║              Pinch Cadence Mapping Explorer              ║");
    println!("╚══════════════════════════════════════════════════════════╝");
    println!();

    let mut mapping = pick_preset();
    println!("\n  ✓  {}\n", describe(&mapping));

    loop {
        print_ops_menu();
        let choice = read_line("Command: ").trim().to_ascii_lowercase();

        match choice.as_str() {
            "1" => {
                let d = read_f64("  Pinch distance: ", 0.15);
                println!("  interval = {:.4} s", compute_interval(d, &mapping));
            }
            "2" => {
                let d = read_f64("  Pinch distance: ", 0.15);
                println!("  value    = {:.4}", map_to_scalar(d, &mapping));
            }
            "3" => sweep(&mapping),
            "4" => simulate(&mapping),
            "5" => {
                mapping = mapping.inverted();
                println!("  Inverted!  {}", describe(&mapping));
            }
            "6" => {
                mapping = pick_custom().unwrap_or(mapping);
                println!("  {}", describe(&mapping));
            }
            "7" => {
                mapping = pick_preset();
                println!("  {}", describe(&mapping));
            }
            "q" | "quit" | "exit" => {
                println!("  Bye!\n");
                break;
            }
            _ => println!("  ⚠  Unknown command."),
        }
    }
}

fn print_ops_menu() {
    println!("  ┌─────────────────────────────────────────────┐");
    println!("  │  1. Interval for a distance                 │");
    println!("  │  2. Scalar value for a distance             │");
    println!("  │  3. Sweep table (0.00 – 0.40)               │");
    println!("  │  4. Simulate cadence for a held pinch       │");
    println!("  │  5. Invert polarity                         │");
    println!("  │  6. Custom mapping                          │");
    println!("  │  7. Choose preset                           │");
    println!("  │  q. Quit                                    │");
    println!("  └─────────────────────────────────────────────┘");
}

fn describe(m: &RangeMapping) -> String {
    let dir = match m.polarity() {
        Polarity::Rising  => "rising",
        Polarity::Falling => "falling",
    };
    format!(
        "[{:.3}, {:.3}] → [{:.3}, {:.3}]  ({})",
        m.input_low(), m.input_high(), m.output_low(), m.output_high(), dir
    )
}

fn sweep(m: &RangeMapping) {
    println!("  {:>8}  {:>10}  {:>10}", "distance", "interval", "scalar");
    for i in 0..=20 {
        let d = i as f64 * 0.02;
        println!(
            "  {:>8.3}  {:>10.4}  {:>10.4}",
            d, compute_interval(d, m), map_to_scalar(d, m)
        );
    }
}

/// Hold a constant pinch for a few seconds at 30 fps and list the triggers.
fn simulate(m: &RangeMapping) {
    let d    = read_f64("  Held pinch distance: ", 0.2);
    let secs = read_f64("  Seconds to simulate (default 5): ", 5.0).clamp(0.0, 120.0);

    let clock = ManualClock::at(0.0);
    let mut cadence = JumpCadence::new(*m, clock.now());
    let frames = (secs * 30.0) as usize;
    let mut times = Vec::new();

    for _ in 0..frames {
        clock.advance(1.0 / 30.0);
        if cadence.poll(d, clock.now()) {
            times.push(clock.now());
        }
    }

    println!("  interval {:.3} s → {} triggers in {:.1} s", cadence.interval(), times.len(), secs);
    let shown: Vec<String> = times.iter().take(16).map(|t| format!("{:.2}", t)).collect();
    if !shown.is_empty() {
        println!("  at: {}{}", shown.join(", "), if times.len() > 16 { ", …" } else { "" });
    }
}

// ── pickers ──────────────────────────────────────────────────────────────────

fn pick_preset() -> RangeMapping {
    println!("  Presets:");
    println!("    1. Jump, open = fast   (0.08–0.25 → 2.0 s–0.1 s)");
    println!("    2. Jump, open = slow   (0.08–0.25 → 0.1 s–2.0 s)");
    println!("    3. Control voltage     (0.05–0.30 → 0 V–3 V)");
    match read_line("  Choice (default 1): ").trim() {
        "2" => RangeMapping::jump_open_slow(),
        "3" => RangeMapping::control_voltage(),
        _   => RangeMapping::jump_open_fast(),
    }
}

fn pick_custom() -> Option<RangeMapping> {
    let il = read_f64("  input_low   (default 0.05): ", 0.05);
    let ih = read_f64("  input_high  (default 0.30): ", 0.30);
    let ol = read_f64("  output_low  (default 0.0):  ", 0.0);
    let oh = read_f64("  output_high (default 1.0):  ", 1.0);
    match RangeMapping::new(il, ih, ol, oh) {
        Ok(m)  => Some(m),
        Err(e) => {
            println!("  ⚠  {}", e);
            None
        }
    }
}

fn read_f64(prompt: &str, default: f64) -> f64 {
    read_line(prompt).trim().parse().unwrap_or(default)
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}
