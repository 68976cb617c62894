//! Thin per-use-case wrappers around the cadence/scalar operations.
//!
//! * [`JumpCadence`] — owns the session's [`CadenceState`] and answers
//!   "jump now?" once per frame.
//! * [`ControlVoltage`] — maps each frame's distance to the value sent over
//!   OSC / MIDI.

use crate::landmark::sanitize_distance;
use crate::{compute_interval, map_to_scalar, should_trigger, CadenceState, RangeMapping};

// ════════════════════════════════════════════════════════════════════════════
// JumpCadence
// ════════════════════════════════════════════════════════════════════════════

/// Game-side cadence: pinch distance in, jump decisions out.
#[derive(Clone, Debug)]
pub struct JumpCadence {
    mapping: RangeMapping,
    state:   CadenceState,
}

impl JumpCadence {
    pub fn new(mapping: RangeMapping, now: f64) -> Self {
        JumpCadence {
            state: CadenceState::new(now, mapping.paused_interval()),
            mapping,
        }
    }

    /// Evaluate one frame.  Returns `true` when the action should fire; the
    /// trigger time is recorded before returning.
    ///
    /// A closed hand (`distance <= input_low`, including "no hand" = 0)
    /// never fires.
    pub fn poll(&mut self, distance: f64, now: f64) -> bool {
        let distance = sanitize_distance(distance);
        let interval = compute_interval(distance, &self.mapping);
        self.state.current_interval = interval;

        if self.is_closed(distance) {
            return false;
        }
        if should_trigger(now, &self.state, interval) {
            self.state.record_trigger(now);
            return true;
        }
        false
    }

    /// Restart the cadence, e.g. on game restart.
    pub fn reset(&mut self, now: f64) {
        self.state = CadenceState::new(now, self.mapping.paused_interval());
    }

    /// Record an externally caused trigger (keyboard flap) so the cadence
    /// counts from it.
    pub fn note_trigger(&mut self, now: f64) {
        self.state.record_trigger(now);
    }

    pub fn is_closed(&self, distance: f64) -> bool {
        sanitize_distance(distance) <= self.mapping.input_low()
    }

    pub fn mapping(&self)  -> &RangeMapping { &self.mapping }
    pub fn state(&self)    -> &CadenceState { &self.state }
    pub fn interval(&self) -> f64           { self.state.current_interval }
}

// ════════════════════════════════════════════════════════════════════════════
// ControlVoltage
// ════════════════════════════════════════════════════════════════════════════

/// Continuous control value for a network/MIDI sink.
#[derive(Clone, Copy, Debug)]
pub struct ControlVoltage {
    mapping: RangeMapping,
}

impl ControlVoltage {
    pub fn new(mapping: RangeMapping) -> Self {
        ControlVoltage { mapping }
    }

    pub fn value(&self, distance: f64) -> f32 {
        map_to_scalar(sanitize_distance(distance), &self.mapping) as f32
    }

    /// Position of `value` within the output range, 0.0 at `output_low`
    /// and 1.0 at `output_high`.
    pub fn normalized(&self, value: f32) -> f32 {
        let lo = self.mapping.output_low();
        let hi = self.mapping.output_high();
        if (hi - lo).abs() < f64::EPSILON {
            return 0.0;
        }
        (((value as f64) - lo) / (hi - lo)).clamp(0.0, 1.0) as f32
    }

    pub fn mapping(&self) -> &RangeMapping { &self.mapping }
}

impl Default for ControlVoltage {
    fn default() -> Self { ControlVoltage::new(RangeMapping::control_voltage()) }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};

    #[test]
    fn never_triggers_without_hand() {
        let mut jc = JumpCadence::new(RangeMapping::jump_open_fast(), 0.0);
        let clock = ManualClock::at(0.0);
        for _ in 0..10_000 {
            clock.advance(1.0 / 30.0);
            assert!(!jc.poll(0.0, clock.now()));
        }
    }

    #[test]
    fn nan_counts_as_no_hand() {
        let mut jc = JumpCadence::new(RangeMapping::jump_open_fast(), 0.0);
        assert!(!jc.poll(f64::NAN, 100.0));
        assert_eq!(jc.interval(), RangeMapping::jump_open_fast().paused_interval());
    }

    #[test]
    fn wide_open_triggers_at_fast_interval() {
        let mut jc = JumpCadence::new(RangeMapping::jump_open_fast(), 0.0);
        let mut triggers = 0;
        // 64 fps keeps every timestamp exact; 0.1 s rounds up to 7 frames.
        for frame in 1..=210 {
            let now = frame as f64 / 64.0;
            if jc.poll(0.3, now) { triggers += 1; }
        }
        assert_eq!(triggers, 30);
    }

    #[test]
    fn trigger_records_time() {
        let mut jc = JumpCadence::new(RangeMapping::jump_open_fast(), 0.0);
        assert!(jc.poll(0.25, 1.0));
        assert_eq!(jc.state().last_trigger_time, 1.0);
        assert!(!jc.poll(0.25, 1.0));
    }

    #[test]
    fn slower_pinch_waits_longer() {
        let mut jc = JumpCadence::new(RangeMapping::jump_open_fast(), 0.0);
        assert!(!jc.poll(0.165, 1.0));
        assert!((jc.interval() - 1.05).abs() < 1e-9);
        assert!(jc.poll(0.165, 1.06));
    }

    #[test]
    fn reset_restarts_from_now() {
        let mut jc = JumpCadence::new(RangeMapping::jump_open_fast(), 0.0);
        jc.reset(50.0);
        assert_eq!(jc.state().last_trigger_time, 50.0);
        assert!(!jc.poll(0.25, 50.05));
        assert!(jc.poll(0.25, 50.1));
    }

    #[test]
    fn control_voltage_preset() {
        let cv = ControlVoltage::default();
        assert_eq!(cv.value(0.0), 0.0);
        assert_eq!(cv.value(0.05), 0.0);
        assert_eq!(cv.value(0.3), 3.0);
        assert!((cv.value(0.175) - 1.5).abs() < 1e-6);
        assert_eq!(cv.value(f64::NAN), 0.0);
    }

    #[test]
    fn control_voltage_normalized() {
        let cv = ControlVoltage::default();
        assert_eq!(cv.normalized(0.0), 0.0);
        assert_eq!(cv.normalized(3.0), 1.0);
        assert!((cv.normalized(1.5) - 0.5).abs() < 1e-6);
        assert_eq!(cv.normalized(9.0), 1.0);
    }
}
