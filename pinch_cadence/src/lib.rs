//! # pinch_cadence
//!
//! Turns the pinch distance between a hand's thumb tip and index fingertip
//! into control signals:
//!
//! * a **cadence** — "should the action fire now?" on an interval that
//!   follows the distance ([`compute_interval`] + [`should_trigger`]), or
//! * a **scalar** — a continuous value in a fixed output range
//!   ([`map_to_scalar`]).
//!
//! Both use the same clamped linear interpolation described by a
//! [`RangeMapping`].  The mapping may be inverted (`output_low >
//! output_high`), which is how "closer = faster" and "closer = slower" are
//! both expressed without special cases.
//!
//! ## Quick start
//!
//! ```rust
//! use pinch_cadence::{RangeMapping, CadenceState, compute_interval, should_trigger};
//!
//! let mapping = RangeMapping::jump_open_fast();   // 0.08..0.25 → 2.0 s..0.1 s
//! let mut state = CadenceState::new(0.0, mapping.paused_interval());
//!
//! let now = 0.5;
//! let interval = compute_interval(0.25, &mapping); // hand wide open → 0.1 s
//! if should_trigger(now, &state, interval) {
//!     state.record_trigger(now);
//! }
//! assert_eq!(state.last_trigger_time, 0.5);
//! ```
//!
//! The functions are pure: state is passed in and out explicitly, and the
//! caller owns the [`CadenceState`] for the whole session.  The
//! [`adapter`] module wraps the two common uses (game jump cadence, OSC
//! control voltage) so entry points don't repeat the bookkeeping.

pub mod adapter;
pub mod clock;
pub mod error;
pub mod landmark;
pub mod source;

pub use adapter::{ControlVoltage, JumpCadence};
pub use clock::{Clock, ManualClock, SessionClock};
pub use error::{Error, Result};
pub use landmark::{
    pinch_distance, sanitize_distance, synthetic_hand, Hand, HandFrame, Landmark,
};
pub use source::{latest_frame, spawn_landmark_source, LandmarkSource, SineSource, StreamSource};
#[cfg(feature = "leap")]
pub use source::LeapSource;

// ════════════════════════════════════════════════════════════════════════════
// Polarity
// ════════════════════════════════════════════════════════════════════════════

/// Direction in which a mapping's output moves as the input grows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Polarity {
    /// `output_high >= output_low` — wider pinch gives a larger output.
    Rising,
    /// `output_high < output_low` — wider pinch gives a smaller output
    /// (e.g. a shorter interval, i.e. a faster cadence).
    Falling,
}

// ════════════════════════════════════════════════════════════════════════════
// RangeMapping
// ════════════════════════════════════════════════════════════════════════════

/// Immutable clamped-linear mapping `[input_low, input_high] → [output_low, output_high]`.
///
/// Invariant: all bounds finite and `input_low < input_high`.  The output
/// pair may be in either order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangeMapping {
    input_low:   f64,
    input_high:  f64,
    output_low:  f64,
    output_high: f64,
}

impl RangeMapping {
    /// Build a mapping, rejecting non-finite bounds and empty/reversed
    /// input ranges.
    pub fn new(input_low: f64, input_high: f64, output_low: f64, output_high: f64) -> Result<Self> {
        let finite = [input_low, input_high, output_low, output_high]
            .iter()
            .all(|v| v.is_finite());
        if !finite || input_low >= input_high {
            return Err(Error::InvalidMapping { input_low, input_high, output_low, output_high });
        }
        Ok(RangeMapping { input_low, input_high, output_low, output_high })
    }

    /// Game cadence where opening the pinch speeds up the jumps:
    /// 0.08 → 2.0 s between jumps, 0.25 and wider → 0.1 s.
    pub const fn jump_open_fast() -> Self {
        RangeMapping { input_low: 0.08, input_high: 0.25, output_low: 2.0, output_high: 0.1 }
    }

    /// Game cadence where opening the pinch slows the jumps down.
    pub const fn jump_open_slow() -> Self {
        RangeMapping { input_low: 0.08, input_high: 0.25, output_low: 0.1, output_high: 2.0 }
    }

    /// Control voltage for the OSC sender: 0.05 → 0 V, 0.3 and wider → 3 V.
    pub const fn control_voltage() -> Self {
        RangeMapping { input_low: 0.05, input_high: 0.3, output_low: 0.0, output_high: 3.0 }
    }

    pub fn input_low(&self)   -> f64 { self.input_low }
    pub fn input_high(&self)  -> f64 { self.input_high }
    pub fn output_low(&self)  -> f64 { self.output_low }
    pub fn output_high(&self) -> f64 { self.output_high }

    pub fn output_min(&self) -> f64 { self.output_low.min(self.output_high) }
    pub fn output_max(&self) -> f64 { self.output_low.max(self.output_high) }

    pub fn polarity(&self) -> Polarity {
        if self.output_high >= self.output_low { Polarity::Rising } else { Polarity::Falling }
    }

    /// Same input range, outputs swapped.
    pub fn inverted(&self) -> Self {
        RangeMapping {
            output_low:  self.output_high,
            output_high: self.output_low,
            ..*self
        }
    }

    /// Interval reported while the hand is closed (`distance <= input_low`).
    ///
    /// This is the output at the low end of the input range, so it stays
    /// inside the configured output bounds for either polarity.
    pub fn paused_interval(&self) -> f64 { self.output_low }

    /// Clamped linear interpolation.  Exact at both ends, monotone in between.
    fn interpolate(&self, distance: f64) -> f64 {
        if distance <= self.input_low  { return self.output_low;  }
        if distance >= self.input_high { return self.output_high; }
        let t = (distance - self.input_low) / (self.input_high - self.input_low);
        let span = self.output_high - self.output_low;
        let v = if span.is_finite() {
            self.output_low + t * span
        } else {
            // Outputs near ±f64::MAX: the span itself overflows.
            self.output_low * (1.0 - t) + self.output_high * t
        };
        v.clamp(self.output_min(), self.output_max())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// CadenceState
// ════════════════════════════════════════════════════════════════════════════

/// Per-session cadence bookkeeping, owned by the loop that advances it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CadenceState {
    /// Time (seconds, caller's clock) of the last trigger that was acted on.
    pub last_trigger_time: f64,
    /// Interval computed for the most recent sample.
    pub current_interval:  f64,
}

impl CadenceState {
    pub fn new(now: f64, interval: f64) -> Self {
        CadenceState { last_trigger_time: now, current_interval: interval }
    }

    /// Record that a trigger was acted on at `now`.
    pub fn record_trigger(&mut self, now: f64) {
        self.last_trigger_time = now;
    }

    pub fn elapsed(&self, now: f64) -> f64 {
        now - self.last_trigger_time
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Operations
// ════════════════════════════════════════════════════════════════════════════

/// Seconds between triggers for the given pinch distance.
///
/// At or below `input_low` the hand counts as closed and the paused interval
/// is returned.  Above it the distance is clamped to `input_high` and
/// interpolated, so the result always lies between the two outputs.
pub fn compute_interval(distance: f64, mapping: &RangeMapping) -> f64 {
    if distance <= mapping.input_low {
        return mapping.paused_interval();
    }
    mapping.interpolate(distance)
}

/// `true` iff at least `interval` seconds have elapsed since the last trigger.
///
/// The caller must call [`CadenceState::record_trigger`] after acting on a
/// `true` result.
pub fn should_trigger(now: f64, state: &CadenceState, interval: f64) -> bool {
    state.elapsed(now) >= interval
}

/// Map a pinch distance to a value in the mapping's output range, clamping
/// the input at both ends.
pub fn map_to_scalar(distance: f64, mapping: &RangeMapping) -> f64 {
    mapping.interpolate(distance)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool { (a - b).abs() < 1e-9 }

    fn example() -> RangeMapping {
        RangeMapping::new(0.08, 0.25, 2.0, 0.1).unwrap()
    }

    // ── RangeMapping ─────────────────────────────────────────────────────
    #[test]
    fn new_rejects_reversed_input() {
        assert!(RangeMapping::new(0.3, 0.1, 0.0, 1.0).is_err());
        assert!(RangeMapping::new(0.1, 0.1, 0.0, 1.0).is_err());
    }

    #[test]
    fn new_rejects_non_finite() {
        assert!(RangeMapping::new(0.0, f64::INFINITY, 0.0, 1.0).is_err());
        assert!(RangeMapping::new(0.0, 1.0, f64::NAN, 1.0).is_err());
    }

    #[test]
    fn inverted_output_is_valid() {
        let m = RangeMapping::new(0.0, 1.0, 5.0, 1.0).unwrap();
        assert_eq!(m.polarity(), Polarity::Falling);
        assert_eq!(m.inverted().polarity(), Polarity::Rising);
        assert_eq!(m.output_min(), 1.0);
        assert_eq!(m.output_max(), 5.0);
    }

    #[test]
    fn presets_match_constructor() {
        assert_eq!(RangeMapping::jump_open_fast(), example());
        assert_eq!(RangeMapping::jump_open_slow(), example().inverted());
    }

    // ── compute_interval ─────────────────────────────────────────────────
    #[test]
    fn interval_examples() {
        let m = example();
        assert_eq!(compute_interval(0.08, &m), 2.0);
        assert_eq!(compute_interval(0.25, &m), 0.1);
        assert!(approx(compute_interval(0.165, &m), 1.05));
    }

    #[test]
    fn interval_paused_below_low() {
        let m = example();
        for d in [0.0, 0.01, 0.05, 0.0799, 0.08] {
            assert_eq!(compute_interval(d, &m), m.paused_interval(), "d = {}", d);
        }
    }

    #[test]
    fn interval_no_extrapolation() {
        let m = example();
        for d in [0.25, 0.3, 0.9, 10.0, f64::INFINITY] {
            assert_eq!(compute_interval(d, &m), 0.1, "d = {}", d);
        }
    }

    #[test]
    fn interval_within_bounds_both_polarities() {
        for m in [example(), example().inverted()] {
            let mut d = 0.0;
            while d < 0.5 {
                let i = compute_interval(d, &m);
                assert!(i >= m.output_min() && i <= m.output_max(), "d={} i={}", d, i);
                d += 0.003;
            }
        }
    }

    #[test]
    fn interval_monotone_falling() {
        let m = example();
        let mut prev = compute_interval(m.input_low(), &m);
        let mut d = m.input_low();
        while d <= m.input_high() {
            let i = compute_interval(d, &m);
            assert!(i <= prev, "interval rose at d={}", d);
            prev = i;
            d += 0.001;
        }
    }

    #[test]
    fn interval_monotone_rising() {
        let m = example().inverted();
        let mut prev = compute_interval(m.input_low(), &m);
        let mut d = m.input_low();
        while d <= m.input_high() {
            let i = compute_interval(d, &m);
            assert!(i >= prev, "interval fell at d={}", d);
            prev = i;
            d += 0.001;
        }
    }

    #[test]
    fn scalar_monotone_both_polarities() {
        for m in [RangeMapping::control_voltage(), RangeMapping::control_voltage().inverted()] {
            let rising = m.polarity() == Polarity::Rising;
            let mut prev = map_to_scalar(0.0, &m);
            let mut d = 0.0;
            while d <= 0.5 {
                let v = map_to_scalar(d, &m);
                if rising {
                    assert!(v >= prev, "value fell at d={}", d);
                } else {
                    assert!(v <= prev, "value rose at d={}", d);
                }
                prev = v;
                d += 0.001;
            }
        }
    }

    #[test]
    fn scalar_is_pure() {
        let m = RangeMapping::control_voltage();
        for d in [0.0, 0.05, 0.1234, 0.3, 9.0] {
            assert_eq!(map_to_scalar(d, &m), map_to_scalar(d, &m));
        }
    }

    #[test]
    fn scalar_extreme_outputs_do_not_overflow() {
        let m = RangeMapping::new(0.0, 1.0, -f64::MAX, f64::MAX).unwrap();
        assert_eq!(map_to_scalar(0.5, &m), 0.0);
        assert_eq!(map_to_scalar(0.75, &m), f64::MAX * 0.5);
        assert_eq!(map_to_scalar(0.0, &m), -f64::MAX);
        assert_eq!(map_to_scalar(1.0, &m), f64::MAX);
    }

    #[test]
    fn interval_is_pure() {
        let m = example();
        assert_eq!(compute_interval(0.17, &m), compute_interval(0.17, &m));
    }

    // ── should_trigger ───────────────────────────────────────────────────
    #[test]
    fn trigger_examples() {
        let state = CadenceState::new(10.0, 0.5);
        assert!(!should_trigger(10.4, &state, 0.5));
        assert!( should_trigger(10.5, &state, 0.5));
    }

    #[test]
    fn trigger_false_right_after_record() {
        let mut state = CadenceState::new(0.0, 0.5);
        assert!(should_trigger(1.0, &state, 0.5));
        state.record_trigger(1.0);
        assert!(!should_trigger(1.0, &state, 0.5));
    }

    #[test]
    fn zero_interval_always_triggers() {
        let state = CadenceState::new(3.0, 0.0);
        assert!(should_trigger(3.0, &state, 0.0));
    }

    // ── map_to_scalar ────────────────────────────────────────────────────
    #[test]
    fn scalar_control_voltage() {
        let m = RangeMapping::control_voltage();
        assert_eq!(map_to_scalar(0.0,  &m), 0.0);
        assert_eq!(map_to_scalar(0.05, &m), 0.0);
        assert_eq!(map_to_scalar(0.3,  &m), 3.0);
        assert_eq!(map_to_scalar(0.8,  &m), 3.0);
        assert!(approx(map_to_scalar(0.175, &m), 1.5));
    }

    #[test]
    fn scalar_inverted_bounds() {
        let m = RangeMapping::new(0.0, 1.0, 1.0, -1.0).unwrap();
        assert_eq!(map_to_scalar(-5.0, &m),  1.0);
        assert_eq!(map_to_scalar(5.0,  &m), -1.0);
        assert!(approx(map_to_scalar(0.5, &m), 0.0));
    }

    #[test]
    fn scalar_matches_interval_above_low() {
        let m = example();
        for d in [0.1, 0.15, 0.2, 0.24] {
            assert_eq!(map_to_scalar(d, &m), compute_interval(d, &m));
        }
    }
}
