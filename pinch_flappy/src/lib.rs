//! # pinch_flappy
//!
//! A flappy-bird style game played with a pinch: the wider the thumb–index
//! opening, the faster the bird flaps.  A closed hand (or no hand in view)
//! never flaps, so the bird glides down.
//!
//! ## Pinch → flap mapping
//!
//! | Polarity | Closed (≤ input_low) | Open (≥ input_high) |
//! |---|---|---|
//! | `open-fast` (default) | no flaps | one flap every `fast_interval` s |
//! | `open-slow` | no flaps | one flap every `slow_interval` s |
//!
//! ## Hand sources
//!
//! * `sim` (default) — **Simulation**: hold `Up` to open the pinch, `Down` to
//!   close it, `0` to take the hand out of view or bring it back.
//! * `stdin` / `command` — JSON landmark lines from an external detector.
//! * `leap` — LeapMotion hardware (`--features leap`).
//!
//! ### Keys
//!
//! | Key | Action |
//! |---|---|
//! | `Space` | Flap |
//! | `R` / click RETRY | Restart after a crash |
//! | `H` | Toggle the hand overlay |
//! | `Q` / `Escape` | Quit |

pub mod canvas;
pub mod sprite;
pub mod game;
pub mod hand;
pub mod overlay;
pub mod visualizer;
pub mod app;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("window: {0}")]
    Window(String),

    #[error(transparent)]
    Source(#[from] pinch_cadence::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
