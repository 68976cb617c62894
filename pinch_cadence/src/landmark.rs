//! Hand landmark model and pinch distance.
//!
//! Landmarks follow the MediaPipe hand model: 21 points per hand, `x`/`y`
//! normalized to the image (0.0–1.0), `z` a relative depth that the pinch
//! distance ignores.

use serde::{Deserialize, Serialize};

/// Number of landmarks per hand.
pub const LANDMARK_COUNT: usize = 21;

/// Landmark indices (MediaPipe hand landmark model convention).
#[allow(dead_code)]
pub mod index {
    pub const WRIST:             usize = 0;
    pub const THUMB_CMC:         usize = 1;
    pub const THUMB_MCP:         usize = 2;
    pub const THUMB_IP:          usize = 3;
    pub const THUMB_TIP:         usize = 4;
    pub const INDEX_FINGER_MCP:  usize = 5;
    pub const INDEX_FINGER_PIP:  usize = 6;
    pub const INDEX_FINGER_DIP:  usize = 7;
    pub const INDEX_FINGER_TIP:  usize = 8;
    pub const MIDDLE_FINGER_MCP: usize = 9;
    pub const MIDDLE_FINGER_PIP: usize = 10;
    pub const MIDDLE_FINGER_DIP: usize = 11;
    pub const MIDDLE_FINGER_TIP: usize = 12;
    pub const RING_FINGER_MCP:   usize = 13;
    pub const RING_FINGER_PIP:   usize = 14;
    pub const RING_FINGER_DIP:   usize = 15;
    pub const RING_FINGER_TIP:   usize = 16;
    pub const PINKY_MCP:         usize = 17;
    pub const PINKY_PIP:         usize = 18;
    pub const PINKY_DIP:         usize = 19;
    pub const PINKY_TIP:         usize = 20;
}

/// Bones drawn between landmarks.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (0, 1), (1, 2), (2, 3), (3, 4),
    (0, 5), (5, 6), (6, 7), (7, 8),
    (5, 9), (9, 10), (10, 11), (11, 12),
    (9, 13), (13, 14), (14, 15), (15, 16),
    (13, 17), (0, 17), (17, 18), (18, 19), (19, 20),
];

// ════════════════════════════════════════════════════════════════════════════
// Landmark / Hand / HandFrame
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Landmark { x, y, z: 0.0 }
    }

    /// Pixel coordinates in a `width × height` image.
    pub fn to_pixel(&self, width: usize, height: usize) -> (isize, isize) {
        ((self.x * width as f32) as isize, (self.y * height as f32) as isize)
    }
}

/// One detected hand.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    pub landmarks: [Landmark; LANDMARK_COUNT],
    /// "Left" or "Right", when the detector reports it.
    #[serde(default)]
    pub handedness: Option<String>,
    #[serde(default)]
    pub score: Option<f32>,
}

impl Hand {
    pub fn new(landmarks: [Landmark; LANDMARK_COUNT]) -> Self {
        Hand { landmarks, handedness: None, score: None }
    }

    pub fn thumb_tip(&self) -> Landmark { self.landmarks[index::THUMB_TIP] }
    pub fn index_tip(&self) -> Landmark { self.landmarks[index::INDEX_FINGER_TIP] }
}

/// All hands detected in one video frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HandFrame {
    #[serde(default)]
    pub hands: Vec<Hand>,
}

impl HandFrame {
    pub fn empty() -> Self { HandFrame::default() }

    pub fn single(hand: Hand) -> Self { HandFrame { hands: vec![hand] } }

    pub fn is_empty(&self) -> bool { self.hands.is_empty() }

    /// Pinch distance of the last hand in the frame, or 0 when no hand was
    /// detected.
    pub fn pinch_distance(&self) -> f64 {
        self.hands.last().map(pinch_distance).unwrap_or(0.0)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Distance helpers
// ════════════════════════════════════════════════════════════════════════════

/// Planar Euclidean distance between thumb tip and index fingertip.
pub fn pinch_distance(hand: &Hand) -> f64 {
    let t = hand.thumb_tip();
    let i = hand.index_tip();
    let dx = (i.x - t.x) as f64;
    let dy = (i.y - t.y) as f64;
    dx.hypot(dy)
}

/// Normalize a raw distance sample: NaN and negative values (including
/// negative infinity) mean "no hand" and become 0.
pub fn sanitize_distance(distance: f64) -> f64 {
    if distance.is_nan() || distance < 0.0 { 0.0 } else { distance }
}

/// Build a plausible hand centred on `center` whose thumb tip and index
/// fingertip are exactly `distance` apart (horizontally).
///
/// Used by the synthetic and keyboard-driven sources.
pub fn synthetic_hand(center: (f32, f32), distance: f32) -> Hand {
    let (cx, cy) = center;
    let half = distance.max(0.0) / 2.0;
    let wrist = Landmark::new(cx, cy + 0.22);

    // (base, tip) per digit: thumb, index, middle, ring, pinky.
    let digits: [(Landmark, Landmark); 5] = [
        (Landmark::new(cx - 0.07, cy + 0.15), Landmark::new(cx - half, cy)),
        (Landmark::new(cx - 0.03, cy + 0.09), Landmark::new(cx + half, cy)),
        (Landmark::new(cx + 0.01, cy + 0.09), Landmark::new(cx + 0.03, cy + 0.05)),
        (Landmark::new(cx + 0.05, cy + 0.10), Landmark::new(cx + 0.06, cy + 0.07)),
        (Landmark::new(cx + 0.08, cy + 0.12), Landmark::new(cx + 0.09, cy + 0.10)),
    ];

    let mut landmarks = [Landmark::default(); LANDMARK_COUNT];
    landmarks[index::WRIST] = wrist;
    for (d, (base, tip)) in digits.iter().enumerate() {
        for j in 0..4 {
            let t = j as f32 / 3.0;
            landmarks[1 + d * 4 + j] = Landmark::new(
                base.x + (tip.x - base.x) * t,
                base.y + (tip.y - base.y) * t,
            );
        }
    }
    // Pin the tips so the pinch distance is exact.
    landmarks[index::THUMB_TIP]        = digits[0].1;
    landmarks[index::INDEX_FINGER_TIP] = digits[1].1;

    Hand::new(landmarks)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn hand_with_tips(thumb: (f32, f32), index: (f32, f32)) -> Hand {
        let mut lm = [Landmark::default(); LANDMARK_COUNT];
        lm[index::THUMB_TIP]        = Landmark::new(thumb.0, thumb.1);
        lm[index::INDEX_FINGER_TIP] = Landmark::new(index.0, index.1);
        Hand::new(lm)
    }

    #[test]
    fn pinch_distance_three_four_five() {
        let h = hand_with_tips((0.1, 0.1), (0.4, 0.5));
        assert!((pinch_distance(&h) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn pinch_distance_ignores_depth() {
        let mut h = hand_with_tips((0.2, 0.2), (0.2, 0.3));
        h.landmarks[index::INDEX_FINGER_TIP].z = 5.0;
        assert!((pinch_distance(&h) - 0.1).abs() < 1e-6);
    }

    #[test]
    fn empty_frame_is_zero() {
        assert_eq!(HandFrame::empty().pinch_distance(), 0.0);
    }

    #[test]
    fn last_hand_wins() {
        let frame = HandFrame {
            hands: vec![
                hand_with_tips((0.0, 0.0), (0.3, 0.0)),
                hand_with_tips((0.0, 0.0), (0.1, 0.0)),
            ],
        };
        assert!((frame.pinch_distance() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn sanitize_rejects_nan_and_negative() {
        assert_eq!(sanitize_distance(f64::NAN), 0.0);
        assert_eq!(sanitize_distance(f64::NEG_INFINITY), 0.0);
        assert_eq!(sanitize_distance(-0.2), 0.0);
        assert_eq!(sanitize_distance(0.12), 0.12);
    }

    #[test]
    fn synthetic_hand_has_requested_distance() {
        for d in [0.0_f32, 0.05, 0.17, 0.4] {
            let h = synthetic_hand((0.5, 0.5), d);
            assert!((pinch_distance(&h) - d as f64).abs() < 1e-5, "d = {}", d);
        }
    }

    #[test]
    fn frame_json_roundtrip_shape() {
        let frame = HandFrame::single(synthetic_hand((0.5, 0.5), 0.2));
        let line = serde_json::to_string(&frame).unwrap();
        let back: HandFrame = serde_json::from_str(&line).unwrap();
        assert_eq!(back.hands.len(), 1);
        assert!((back.pinch_distance() - frame.pinch_distance()).abs() < 1e-6);
    }

    #[test]
    fn to_pixel_scales() {
        assert_eq!(Landmark::new(0.5, 0.25).to_pixel(640, 480), (320, 120));
    }
}
