//! `minifb` window wrapping a [`Canvas`].
//!
//! The window owns the framebuffer and the simulated-hand sender: each frame
//! [`Visualizer::poll_input`] forwards held Up/Down keys as [`SimInput`]
//! events and reports the game keys and mouse clicks to the loop.

use std::sync::mpsc::Sender;
use std::time::Duration;

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::canvas::Canvas;
use crate::hand::{SimInput, SimKey};
use crate::{Error, Result};

/// What the loop needs from one frame of window input.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WindowInput {
    pub flap:        bool,
    pub retry:       bool,
    pub toggle_hand: bool,
    /// Left-button press position, in canvas pixels.
    pub click:       Option<(f32, f32)>,
    pub quit:        bool,
}

pub struct Visualizer {
    window:     Window,
    canvas:     Canvas,
    sim_tx:     Sender<SimInput>,
    mouse_was_down: bool,
}

impl Visualizer {
    pub fn new(title: &str, width: usize, height: usize, sim_tx: Sender<SimInput>) -> Result<Self> {
        let mut window = Window::new(
            title,
            width, height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| Error::Window(e.to_string()))?;

        window.limit_update_rate(Some(Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            canvas: Canvas::new(width, height, 0xFF000000),
            sim_tx,
            mouse_was_down: false,
        })
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    pub fn canvas(&mut self) -> &mut Canvas { &mut self.canvas }

    /// Poll keyboard and mouse.
    pub fn poll_input(&mut self) -> WindowInput {
        let mut input = WindowInput::default();
        if !self.window.is_open() {
            input.quit = true;
            return input;
        }

        // Keys that trigger on first press only
        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);
        // Keys that repeat while held
        let held     = |k: Key| self.window.is_key_pressed(k, KeyRepeat::Yes);

        input.quit        = one_shot(Key::Q) || one_shot(Key::Escape);
        input.flap        = one_shot(Key::Space);
        input.retry       = one_shot(Key::R);
        input.toggle_hand = one_shot(Key::H);

        let mut sim = Vec::new();
        if held(Key::Up)   { sim.push(SimKey::Open); }
        if held(Key::Down) { sim.push(SimKey::Close); }
        if one_shot(Key::Key0) { sim.push(SimKey::Hide); }
        if input.quit { sim.push(SimKey::Quit); }

        // The receiver is gone when a non-sim source is in use.
        for key in sim {
            let _ = self.sim_tx.send(SimInput::KeyDown(key));
        }

        let down = self.window.get_mouse_down(MouseButton::Left);
        if down && !self.mouse_was_down {
            input.click = self.window.get_mouse_pos(MouseMode::Discard);
        }
        self.mouse_was_down = down;

        input
    }

    /// Push the canvas to the window.
    pub fn present(&mut self) -> Result<()> {
        let (w, h) = (self.canvas.width(), self.canvas.height());
        self.window
            .update_with_buffer(self.canvas.pixels(), w, h)
            .map_err(|e| Error::Window(e.to_string()))
    }
}
