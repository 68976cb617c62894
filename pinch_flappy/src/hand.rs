//! Hand input for the game and the meter.
//!
//! Whatever the backend, the window loop only ever sees a
//! `Receiver<HandFrame>`.  The keyboard simulator is one more
//! [`LandmarkSource`]: the visualizer forwards key presses as [`SimInput`]
//! and [`SimHandSource`] turns them into synthetic hands.

use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use log::info;
use pinch_cadence::{
    spawn_landmark_source, synthetic_hand, HandFrame, LandmarkSource, StreamSource,
};

use crate::Result;

// ════════════════════════════════════════════════════════════════════════════
// Simulated input
// ════════════════════════════════════════════════════════════════════════════

/// Raw input event from the game window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimInput {
    KeyDown(SimKey),
}

/// Simulated key codes (mapped from minifb Key).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimKey {
    Open,   // Up (held)
    Close,  // Down (held)
    Hide,   // 0
    Quit,   // Q / Escape
}

/// Keyboard-driven pinch: a hand that opens and closes a little per key
/// repeat and can be taken out of view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimHand {
    pub distance: f32,
    pub visible:  bool,
}

impl SimHand {
    pub const STEP: f32 = 0.01;
    pub const MAX:  f32 = 0.4;

    /// Apply one key press.
    pub fn apply(&mut self, key: SimKey) {
        match key {
            SimKey::Open => {
                self.visible = true;
                self.distance = (self.distance + Self::STEP).min(Self::MAX);
            }
            SimKey::Close => {
                self.visible = true;
                self.distance = (self.distance - Self::STEP).max(0.0);
            }
            SimKey::Hide => self.visible = !self.visible,
            SimKey::Quit => {}
        }
    }

    pub fn frame(&self) -> HandFrame {
        if self.visible {
            HandFrame::single(synthetic_hand((0.5, 0.5), self.distance))
        } else {
            HandFrame::empty()
        }
    }
}

impl Default for SimHand {
    fn default() -> Self {
        SimHand { distance: 0.15, visible: true }
    }
}

/// Landmark source driven by [`SimInput`] events from the visualizer.
pub struct SimHandSource {
    pub rx:      Receiver<SimInput>,
    pub hand:    SimHand,
    /// Frames per second emitted while idle.
    pub rate_hz: f32,
}

impl SimHandSource {
    pub fn new(rx: Receiver<SimInput>) -> Self {
        SimHandSource { rx, hand: SimHand::default(), rate_hz: 30.0 }
    }
}

impl LandmarkSource for SimHandSource {
    fn run(mut self: Box<Self>, tx: Sender<HandFrame>) {
        let period = Duration::from_secs_f32(1.0 / self.rate_hz.max(1.0));
        loop {
            loop {
                match self.rx.try_recv() {
                    Ok(SimInput::KeyDown(SimKey::Quit)) => return,
                    Ok(SimInput::KeyDown(key)) => self.hand.apply(key),
                    Err(TryRecvError::Empty)        => break,
                    Err(TryRecvError::Disconnected) => return,
                }
            }
            if tx.send(self.hand.frame()).is_err() { return; }
            thread::sleep(period);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Source selection
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandSourceKind {
    /// Keyboard simulation inside the window.
    Sim,
    /// JSON landmark lines on stdin.
    Stdin,
    /// JSON landmark lines from a detector command.
    Command(String),
    #[cfg(feature = "leap")]
    Leap,
}

/// Start the chosen source.  `sim_rx` feeds [`SimHandSource`] and is
/// dropped for every other kind (the window's key presses then go nowhere).
pub fn open_hand_source(kind: &HandSourceKind, sim_rx: Receiver<SimInput>) -> Result<Receiver<HandFrame>> {
    let rx = match kind {
        HandSourceKind::Sim => {
            info!("hand source: keyboard simulation (Up/Down to pinch, 0 to hide)");
            spawn_landmark_source(SimHandSource::new(sim_rx))
        }
        HandSourceKind::Stdin => {
            info!("hand source: landmark lines on stdin");
            spawn_landmark_source(StreamSource::stdin())
        }
        HandSourceKind::Command(cmd) => {
            info!("hand source: `{}`", cmd);
            spawn_landmark_source(StreamSource::command(cmd)?)
        }
        #[cfg(feature = "leap")]
        HandSourceKind::Leap => {
            info!("hand source: LeapMotion");
            spawn_landmark_source(pinch_cadence::LeapSource::default())
        }
    };
    Ok(rx)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
