//! # pinch_osc
//!
//! Streams the thumb–index pinch distance to a modular synth as a control
//! voltage.  One value is sent per landmark frame:
//!
//! ```text
//! landmark source ──HandFrame──▶ pinch distance ──ControlVoltage──▶ sink
//!                                                     (0.05–0.3 → 0–3 V)
//! ```
//!
//! The default sink sends `/ENFACE/ch/1 ,f <volts>` to `127.0.0.1:7001`,
//! which is where a CV-over-OSC module listens.  A frame with no hand maps
//! to 0 V.

pub mod sink;

use std::sync::mpsc::Receiver;

use log::{debug, info, warn};
use pinch_cadence::{ControlVoltage, HandFrame};

pub use sink::{ControlSink, MidiCcSink, NullSink, OscSink, SinkError};

// ════════════════════════════════════════════════════════════════════════════
// OscConfig
// ════════════════════════════════════════════════════════════════════════════

/// Where OSC messages go.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OscConfig {
    pub host:      String,
    pub port:      u16,
    /// Address prefix configured on the receiving module.
    pub namespace: String,
    pub channel:   u32,
}

impl Default for OscConfig {
    fn default() -> Self {
        OscConfig {
            host:      "127.0.0.1".to_string(),
            port:      7001,
            namespace: "/ENFACE".to_string(),
            channel:   1,
        }
    }
}

impl OscConfig {
    /// Full OSC address, e.g. `/ENFACE/ch/1`.
    pub fn address(&self) -> String {
        format!("{}/ch/{}", self.namespace.trim_end_matches('/'), self.channel)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Sender loop
// ════════════════════════════════════════════════════════════════════════════

/// Counters reported when the sender loop ends.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SenderStats {
    pub frames:     u64,
    pub sent:       u64,
    pub failed:     u64,
    pub last_value: f32,
}

/// Map and send one value per received frame until the source ends or
/// `limit` frames have been handled.
///
/// Send failures are counted and logged (once when the sink starts failing,
/// once when it recovers); the next frame simply tries again.
pub fn run_sender(
    rx:      &Receiver<HandFrame>,
    voltage: &ControlVoltage,
    sink:    &mut dyn ControlSink,
    limit:   Option<u64>,
) -> SenderStats {
    let mut stats = SenderStats::default();
    let mut failing = false;

    for frame in rx.iter() {
        let distance = frame.pinch_distance();
        let value = voltage.value(distance);
        stats.frames += 1;
        stats.last_value = value;

        match sink.send(value) {
            Ok(()) => {
                stats.sent += 1;
                if failing {
                    info!("{} recovered", sink.describe());
                    failing = false;
                }
                debug!("distance {:.3} → {:.3}", distance, value);
            }
            Err(e) => {
                stats.failed += 1;
                if !failing {
                    warn!("{}: {} — will keep retrying", sink.describe(), e);
                    failing = true;
                }
            }
        }

        if limit.map_or(false, |l| stats.frames >= l) { break; }
    }

    info!(
        "sender stopped: {} frames, {} sent, {} failed",
        stats.frames, stats.sent, stats.failed
    );
    stats
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use pinch_cadence::synthetic_hand;
    use std::sync::mpsc;

    /// Records every value; fails on demand.
    struct Recording {
        values:  Vec<f32>,
        fail_at: Option<usize>,
    }

    impl ControlSink for Recording {
        fn send(&mut self, value: f32) -> Result<(), SinkError> {
            if self.fail_at == Some(self.values.len()) {
                self.fail_at = None;
                return Err(SinkError::Io(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused, "refused",
                )));
            }
            self.values.push(value);
            Ok(())
        }
        fn describe(&self) -> String { "recording".to_string() }
    }

    fn frame(d: f32) -> HandFrame {
        HandFrame::single(synthetic_hand((0.5, 0.5), d))
    }

    #[test]
    fn default_address() {
        assert_eq!(OscConfig::default().address(), "/ENFACE/ch/1");
        let cfg = OscConfig { namespace: "/rack/".to_string(), channel: 3, ..OscConfig::default() };
        assert_eq!(cfg.address(), "/rack/ch/3");
    }

    #[test]
    fn sends_one_value_per_frame() {
        let (tx, rx) = mpsc::channel();
        tx.send(frame(0.0)).unwrap();
        tx.send(HandFrame::empty()).unwrap();
        tx.send(frame(0.175)).unwrap();
        tx.send(frame(0.5)).unwrap();
        drop(tx);

        let mut sink = Recording { values: vec![], fail_at: None };
        let stats = run_sender(&rx, &ControlVoltage::default(), &mut sink, None);

        assert_eq!(stats.frames, 4);
        assert_eq!(stats.sent, 4);
        assert_eq!(sink.values[0], 0.0);
        assert_eq!(sink.values[1], 0.0);
        assert!((sink.values[2] - 1.5).abs() < 1e-4);
        assert_eq!(sink.values[3], 3.0);
        assert_eq!(stats.last_value, 3.0);
    }

    #[test]
    fn failure_does_not_stop_the_loop() {
        let (tx, rx) = mpsc::channel();
        for _ in 0..3 { tx.send(frame(0.3)).unwrap(); }
        drop(tx);

        let mut sink = Recording { values: vec![], fail_at: Some(0) };
        let stats = run_sender(&rx, &ControlVoltage::default(), &mut sink, None);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.sent, 2);
    }

    #[test]
    fn limit_stops_early() {
        let (tx, rx) = mpsc::channel();
        for _ in 0..10 { tx.send(frame(0.1)).unwrap(); }

        let mut sink = NullSink;
        let stats = run_sender(&rx, &ControlVoltage::default(), &mut sink, Some(4));
        assert_eq!(stats.frames, 4);
    }
}
