//! Top-level loops.
//!
//! [`run`] drives the game: window input and the newest hand frame go into
//! [`Game::frame`] once per rendered frame, then the game and the overlays
//! are drawn.  [`run_meter`] is the same loop without a game, showing the
//! raw pinch measurement and its mapped control value.

use std::sync::mpsc;

use log::{debug, info};
use pinch_cadence::{latest_frame, Clock, ControlVoltage, HandFrame, SessionClock};

use crate::canvas::Canvas;
use crate::game::{FrameInput, Game, GameConfig, GameEvent};
use crate::hand::{open_hand_source, HandSourceKind};
use crate::overlay::{self, Viewport};
use crate::sprite::{WORLD_H, WORLD_W};
use crate::visualizer::Visualizer;
use crate::Result;

/// Longest step the simulation takes, so a stalled window doesn't teleport
/// the bird through a pipe.
pub const MAX_DT: f32 = 0.05;

const INSET:    usize = 120;
const INSET_BG: u32   = 0xFF202030;

// ════════════════════════════════════════════════════════════════════════════
// HandTracker
// ════════════════════════════════════════════════════════════════════════════

/// Newest frame seen so far.  Frames arrive at the source's rate, not the
/// window's, so a loop iteration without a new frame keeps the old one.
#[derive(Clone, Debug, Default)]
pub struct HandTracker {
    frame:    HandFrame,
    distance: f64,
}

impl HandTracker {
    pub fn update(&mut self, frame: Option<HandFrame>) {
        if let Some(f) = frame {
            self.distance = f.pinch_distance();
            self.frame = f;
        }
    }

    pub fn distance(&self) -> f64        { self.distance }
    pub fn frame(&self)    -> &HandFrame { &self.frame }
}

// ════════════════════════════════════════════════════════════════════════════
// Game loop
// ════════════════════════════════════════════════════════════════════════════

pub struct AppConfig {
    pub game:      GameConfig,
    pub source:    HandSourceKind,
    /// Draw the hand inset and the pinch HUD.
    pub show_hand: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            game:      GameConfig::default(),
            source:    HandSourceKind::Sim,
            show_hand: true,
        }
    }
}

/// Run the game until the window closes or Q/Escape is pressed.
pub fn run(cfg: AppConfig) -> Result<()> {
    let (sim_tx, sim_rx) = mpsc::channel();
    // Window first: a detector must not be left running if it fails to open.
    let mut vis = Visualizer::new("Pinch Flappy", WORLD_W, WORLD_H, sim_tx)?;
    let hand_rx = open_hand_source(&cfg.source, sim_rx)?;

    let clock = SessionClock::start();
    let mut game = Game::new(cfg.game, clock.now());
    let mut tracker = HandTracker::default();
    let mut show_hand = cfg.show_hand;
    let mut last = clock.now();

    info!("mapping {:?}", game.cadence().mapping());

    while vis.is_open() {
        let input = vis.poll_input();
        if input.quit { break; }
        if input.toggle_hand { show_hand = !show_hand; }

        tracker.update(latest_frame(&hand_rx));

        let now = clock.now();
        let dt = ((now - last) as f32).clamp(0.0, MAX_DT);
        last = now;

        let frame_input = FrameInput {
            distance: tracker.distance(),
            flap:     input.flap,
            retry:    input.retry,
            click:    input.click,
        };
        for event in game.frame(&frame_input, now, dt) {
            log_event(&event);
        }

        render_game(vis.canvas(), &game, &tracker, show_hand);
        vis.present()?;
    }

    info!("best score {}", game.best());
    Ok(())
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::Flapped { by_pinch } => debug!("flap ({})", if *by_pinch { "pinch" } else { "key" }),
        GameEvent::Scored(n)            => info!("score {}", n),
        // Phase changes are logged by the game itself.
        _ => {}
    }
}

/// One full game frame: sprites, then the hand inset and HUD.
pub fn render_game(c: &mut Canvas, game: &Game, tracker: &HandTracker, show_hand: bool) {
    game.draw(c);
    if !show_hand { return; }

    let cadence = game.cadence();
    overlay::draw_hud(c, tracker.distance(), cadence.interval(), cadence.is_closed(tracker.distance()));

    let view = Viewport {
        x: (WORLD_W - INSET - 8) as isize,
        y: 8,
        w: INSET,
        h: INSET,
    };
    c.fill_rect(view.x, view.y, INSET as isize, INSET as isize, INSET_BG);
    c.draw_border(view.x, view.y, INSET as isize, INSET as isize, overlay::LANDMARK_COLOR);
    if let Some(hand) = tracker.frame().hands.last() {
        overlay::draw_hand(c, hand, view);
        let t = view.project(hand, pinch_cadence::landmark::index::THUMB_TIP);
        let i = view.project(hand, pinch_cadence::landmark::index::INDEX_FINGER_TIP);
        c.draw_line(t, i, 2, overlay::PINCH_COLOR);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Meter loop
// ════════════════════════════════════════════════════════════════════════════

pub const METER_W: usize = 640;
pub const METER_H: usize = 480;
const METER_BG:    u32   = 0xFF101018;

pub struct MeterConfig {
    pub source:  HandSourceKind,
    /// Maps the distance to the value shown in the bar.
    pub voltage: ControlVoltage,
}

impl Default for MeterConfig {
    fn default() -> Self {
        MeterConfig { source: HandSourceKind::Sim, voltage: ControlVoltage::default() }
    }
}

/// Show the live pinch measurement until the window closes.
pub fn run_meter(cfg: MeterConfig) -> Result<()> {
    let (sim_tx, sim_rx) = mpsc::channel();
    // Window first: a detector must not be left running if it fails to open.
    let mut vis = Visualizer::new("Pinch Meter", METER_W, METER_H, sim_tx)?;
    let hand_rx = open_hand_source(&cfg.source, sim_rx)?;
    let mut tracker = HandTracker::default();

    while vis.is_open() {
        let input = vis.poll_input();
        if input.quit { break; }

        tracker.update(latest_frame(&hand_rx));
        render_meter(vis.canvas(), &tracker, &cfg.voltage);
        vis.present()?;
    }
    Ok(())
}

/// Landmarks, pinch line with its distance, and the mapped-value bar.
pub fn render_meter(c: &mut Canvas, tracker: &HandTracker, voltage: &ControlVoltage) {
    c.clear(METER_BG);
    let view = Viewport { x: 0, y: 0, w: c.width(), h: c.height() - 60 };

    match tracker.frame().hands.last() {
        Some(hand) => {
            overlay::draw_hand(c, hand, view);
            overlay::draw_pinch(c, hand, tracker.distance(), view);
        }
        None => {
            let cx = c.width() as isize / 2;
            c.draw_label_centered("NO HAND", cx, view.h as isize / 2, 4, 0xFF808080);
        }
    }

    let value = voltage.value(tracker.distance());
    let bar_y = c.height() as isize - 48;
    let bar_w = c.width() as isize - 40;
    overlay::draw_meter(c, 20, bar_y, bar_w, 16, voltage.normalized(value));
    let label = format!("VALUE {:.2} / {:.2}", value, voltage.mapping().output_max());
    c.draw_label(&label, 20, bar_y + 22, 2, overlay::LANDMARK_COLOR);
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use pinch_cadence::synthetic_hand;

    fn frame(d: f32) -> HandFrame {
        HandFrame::single(synthetic_hand((0.5, 0.5), d))
    }

    #[test]
    fn tracker_keeps_previous_frame() {
        let mut t = HandTracker::default();
        assert_eq!(t.distance(), 0.0);
        t.update(Some(frame(0.2)));
        t.update(None);
        assert!((t.distance() - 0.2).abs() < 1e-6);
        t.update(Some(HandFrame::empty()));
        assert_eq!(t.distance(), 0.0);
    }

    #[test]
    fn game_frame_renders_inset() {
        let game = Game::new(GameConfig { seed: Some(1), ..GameConfig::default() }, 0.0);
        let mut t = HandTracker::default();
        t.update(Some(frame(0.2)));
        let mut c = Canvas::new(WORLD_W, WORLD_H, 0);

        render_game(&mut c, &game, &t, true);
        let corner = ((WORLD_W - INSET - 8) as usize + 2, 10);
        assert_eq!(c.pixel(corner.0, corner.1), Some(INSET_BG));

        render_game(&mut c, &game, &t, false);
        assert_ne!(c.pixel(corner.0, corner.1), Some(INSET_BG));
    }

    #[test]
    fn meter_shows_value_bar() {
        let mut t = HandTracker::default();
        t.update(Some(frame(0.3)));
        let mut c = Canvas::new(METER_W, METER_H, 0);
        render_meter(&mut c, &t, &ControlVoltage::default());
        // 0.3 is the top of the range: the bar is full.
        let y = METER_H - 48 + 8;
        assert_ne!(c.pixel(METER_W - 30, y), Some(METER_BG));
        assert_eq!(c.pixel(0, 0), Some(METER_BG));
    }
}
