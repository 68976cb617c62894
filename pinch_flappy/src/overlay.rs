//! Hand and pinch overlays drawn on top of the game or the meter.
//!
//! Landmarks are normalized (0.0–1.0) so every function takes the pixel
//! [`Viewport`] the hand should be projected into.

use pinch_cadence::landmark::HAND_CONNECTIONS;
use pinch_cadence::Hand;

use crate::canvas::{label_width, Canvas};

pub const LANDMARK_COLOR: u32 = 0xFFFFFFFF;
pub const PINCH_COLOR:    u32 = 0xFF0000FF;
const PANEL_BG:           u32 = 0xC0202030;
const METER_FILL:         u32 = 0xFF30C060;
const METER_EMPTY:        u32 = 0xFF404050;
const CLOSED_COLOR:       u32 = 0xFFF05030;

/// Pixel rectangle the normalized hand is drawn into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub x: isize,
    pub y: isize,
    pub w: usize,
    pub h: usize,
}

impl Viewport {
    pub fn full(canvas: &Canvas) -> Self {
        Viewport { x: 0, y: 0, w: canvas.width(), h: canvas.height() }
    }

    pub fn project(&self, hand: &Hand, i: usize) -> (isize, isize) {
        let (px, py) = hand.landmarks[i].to_pixel(self.w, self.h);
        (self.x + px, self.y + py)
    }
}

/// All 21 landmarks and the bones between them.
pub fn draw_hand(c: &mut Canvas, hand: &Hand, view: Viewport) {
    for &(a, b) in HAND_CONNECTIONS.iter() {
        c.draw_line(view.project(hand, a), view.project(hand, b), 1, LANDMARK_COLOR);
    }
    for i in 0..hand.landmarks.len() {
        let (x, y) = view.project(hand, i);
        c.fill_circle(x, y, 2, LANDMARK_COLOR);
    }
}

/// Thumb-to-index line with the distance printed 10 px above its midpoint.
pub fn draw_pinch(c: &mut Canvas, hand: &Hand, distance: f64, view: Viewport) {
    let t = view.project(hand, pinch_cadence::landmark::index::THUMB_TIP);
    let i = view.project(hand, pinch_cadence::landmark::index::INDEX_FINGER_TIP);
    c.draw_line(t, i, 2, PINCH_COLOR);

    let mid = ((t.0 + i.0) / 2, (t.1 + i.1) / 2);
    let text = distance_label(distance);
    // Glyphs are 5 rows × scale 2; the text's bottom edge sits 10 px up.
    c.draw_label_centered(&text, mid.0, mid.1 - 10 - 10, 2, LANDMARK_COLOR);
}

pub fn distance_label(distance: f64) -> String {
    format!("DISTANCE: {:.2}", distance)
}

/// Horizontal bar, `fraction` (0.0–1.0) filled.
pub fn draw_meter(c: &mut Canvas, x: isize, y: isize, w: isize, h: isize, fraction: f32) {
    let f = fraction.clamp(0.0, 1.0);
    c.fill_rect(x, y, w, h, METER_EMPTY);
    c.fill_rect(x, y, (w as f32 * f) as isize, h, METER_FILL);
    c.draw_border(x, y, w, h, LANDMARK_COLOR);
}

/// Small top-left panel: distance and the current flap interval, or
/// "HAND CLOSED" when the cadence is paused.
pub fn draw_hud(c: &mut Canvas, distance: f64, interval: f64, closed: bool) {
    let lines = [
        distance_label(distance),
        if closed { "HAND CLOSED".to_string() } else { format!("FLAP EVERY {:.2}S", interval) },
    ];
    let w = lines.iter().map(|l| label_width(l, 2)).max().unwrap_or(0) + 12;
    c.fill_rect(4, 4, w, 40, PANEL_BG);
    c.draw_label(&lines[0], 10, 10, 2, LANDMARK_COLOR);
    c.draw_label(&lines[1], 10, 26, 2, if closed { CLOSED_COLOR } else { METER_FILL });
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use pinch_cadence::synthetic_hand;

    #[test]
    fn label_has_two_decimals() {
        assert_eq!(distance_label(0.1234), "DISTANCE: 0.12");
        assert_eq!(distance_label(0.0), "DISTANCE: 0.00");
    }

    #[test]
    fn pinch_line_is_blue() {
        let mut c = Canvas::new(200, 200, 0);
        let hand = synthetic_hand((0.5, 0.5), 0.3);
        let view = Viewport::full(&c);
        draw_pinch(&mut c, &hand, 0.3, view);
        // Both fingertips lie on the line.
        assert_eq!(c.pixel(70, 100), Some(PINCH_COLOR));
        assert_eq!(c.pixel(130, 100), Some(PINCH_COLOR));
    }

    #[test]
    fn distance_label_is_white() {
        let mut c = Canvas::new(200, 200, 0);
        let hand = synthetic_hand((0.5, 0.5), 0.3);
        let view = Viewport::full(&c);
        draw_pinch(&mut c, &hand, 0.3, view);
        // Label rows sit 10 px above the line at y = 100.
        let label_rows: Vec<u32> = (80..92)
            .flat_map(|y| (0..200).map(move |x| (x, y)))
            .filter_map(|(x, y)| c.pixel(x, y))
            .collect();
        assert!(label_rows.contains(&LANDMARK_COLOR));
        assert!(!label_rows.contains(&PINCH_COLOR));
    }

    #[test]
    fn hand_draws_landmarks() {
        let mut c = Canvas::new(200, 200, 0);
        let hand = synthetic_hand((0.5, 0.5), 0.1);
        let view = Viewport { x: 0, y: 0, w: 200, h: 200 };
        draw_hand(&mut c, &hand, view);
        let (wx, wy) = view.project(&hand, 0);
        assert_eq!(c.pixel(wx as usize, wy as usize), Some(LANDMARK_COLOR));
    }

    #[test]
    fn meter_fill_matches_fraction() {
        let mut c = Canvas::new(120, 20, 0);
        draw_meter(&mut c, 0, 0, 100, 10, 0.5);
        assert_eq!(c.pixel(25, 5), Some(METER_FILL));
        assert_eq!(c.pixel(75, 5), Some(METER_EMPTY));
        draw_meter(&mut c, 0, 0, 100, 10, 7.0);
        assert_eq!(c.pixel(75, 5), Some(METER_FILL));
    }

    #[test]
    fn hud_draws_panel() {
        let mut c = Canvas::new(300, 60, 0);
        draw_hud(&mut c, 0.0, 2.0, true);
        assert_eq!(c.pixel(5, 5), Some(PANEL_BG));
    }
}
