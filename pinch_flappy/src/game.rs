//! Game session: phases, pipes, scoring, collisions, and the pinch cadence
//! that makes the bird flap.
//!
//! `Game` owns everything that changes during a session (sprites, score,
//! RNG, the [`JumpCadence`]) and is advanced once per rendered frame by
//! [`Game::frame`].  Restarting rebuilds the sprites and resets the cadence.

use log::{debug, info};
use pinch_cadence::{JumpCadence, RangeMapping};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::canvas::Canvas;
use crate::sprite::{
    Background, Bird, Message, MessageKind, Pipe, Sprite, BIRD_X, FLOOR_Y, WORLD_W,
};

// ════════════════════════════════════════════════════════════════════════════
// GameConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct GameConfig {
    /// Pinch distance → seconds between automatic flaps.
    pub mapping:       RangeMapping,
    /// Seconds between pipe spawns.
    pub pipe_interval: f32,
    /// Vertical opening between the two columns (px).
    pub pipe_gap:      f32,
    /// Horizontal scroll speed (px/s).
    pub scroll_speed:  f32,
    /// px/s²
    pub gravity:       f32,
    /// Upward speed right after a flap (px/s).
    pub flap_velocity: f32,
    /// Fixed RNG seed for reproducible pipe layouts.
    pub seed:          Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            mapping:       RangeMapping::jump_open_fast(),
            pipe_interval: 1.6,
            pipe_gap:      160.0,
            scroll_speed:  140.0,
            gravity:       1400.0,
            flap_velocity: 420.0,
            seed:          None,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Per-frame input / events
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum Phase {
    #[default]
    Ready,
    Playing,
    GameOver,
}

/// Everything the loop collected for one frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInput {
    /// Latest pinch distance (0 = no hand).
    pub distance: f64,
    /// Manual flap (Space).
    pub flap:     bool,
    /// Manual restart (R).
    pub retry:    bool,
    /// Left click position in world pixels.
    pub click:    Option<(f32, f32)>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    Started,
    Flapped { by_pinch: bool },
    Scored(u32),
    Crashed { score: u32 },
    Restarted,
}

// ════════════════════════════════════════════════════════════════════════════
// Game
// ════════════════════════════════════════════════════════════════════════════

pub struct Game {
    cfg:         GameConfig,
    phase:       Phase,
    sprites:     Vec<Sprite>,
    cadence:     JumpCadence,
    rng:         StdRng,
    spawn_timer: f32,
    score:       u32,
    best:        u32,
    distance:    f64,
}

impl Game {
    pub fn new(cfg: GameConfig, now: f64) -> Self {
        let rng = match cfg.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None    => StdRng::from_entropy(),
        };
        let cadence = JumpCadence::new(cfg.mapping, now);
        let sprites = initial_sprites(&cfg);
        Game {
            cfg,
            phase: Phase::Ready,
            sprites,
            cadence,
            rng,
            spawn_timer: 0.0,
            score: 0,
            best: 0,
            distance: 0.0,
        }
    }

    // ── per-frame step ────────────────────────────────────────────────────

    /// Advance one frame at time `now` (seconds), `dt` seconds after the
    /// previous one.
    pub fn frame(&mut self, input: &FrameInput, now: f64, dt: f32) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.distance = input.distance;

        match self.phase {
            Phase::Ready => {
                let by_pinch = self.cadence.poll(input.distance, now);
                if by_pinch || input.flap {
                    self.start(now);
                    events.push(GameEvent::Started);
                    self.flap(now, by_pinch, &mut events);
                    self.spawn_pipes(dt);
                }
            }
            Phase::Playing => {
                let by_pinch = self.cadence.poll(input.distance, now);
                if by_pinch || input.flap {
                    self.flap(now, by_pinch, &mut events);
                }
                self.spawn_pipes(dt);
            }
            Phase::GameOver => {
                let clicked = input.click
                    .map_or(false, |(x, y)| Message::retry_rect().contains(x, y));
                if input.retry || clicked {
                    self.restart(now);
                    events.push(GameEvent::Restarted);
                    return events;
                }
            }
        }

        for s in &mut self.sprites {
            s.update(dt);
        }
        self.sprites.retain(|s| !matches!(s, Sprite::Pipe(p) if p.off_screen()));

        if self.phase == Phase::Playing {
            self.score_pipes(&mut events);
            if self.collided() {
                self.crash();
                events.push(GameEvent::Crashed { score: self.score });
            }
        }
        events
    }

    fn start(&mut self, now: f64) {
        self.phase = Phase::Playing;
        self.spawn_timer = self.cfg.pipe_interval;
        self.sprites.retain(|s| !matches!(s, Sprite::Message(_)));
        info!("game started (t = {:.2})", now);
    }

    fn flap(&mut self, now: f64, by_pinch: bool, events: &mut Vec<GameEvent>) {
        if !by_pinch {
            self.cadence.note_trigger(now);
        }
        if let Some(bird) = self.bird_mut() {
            bird.flap();
            events.push(GameEvent::Flapped { by_pinch });
        }
    }

    fn spawn_pipes(&mut self, dt: f32) {
        self.spawn_timer += dt;
        if self.spawn_timer < self.cfg.pipe_interval { return; }
        self.spawn_timer -= self.cfg.pipe_interval;

        let half   = self.cfg.pipe_gap / 2.0;
        let margin = 50.0;
        let lo = half + margin;
        let hi = (FLOOR_Y - half - margin).max(lo + 1.0);
        let gap_y = self.rng.gen_range(lo..hi);

        debug!("pipe spawned, gap centre {:.0}", gap_y);
        self.sprites.push(Sprite::Pipe(Pipe::new(
            WORLD_W as f32, gap_y, self.cfg.pipe_gap, self.cfg.scroll_speed,
        )));
    }

    fn score_pipes(&mut self, events: &mut Vec<GameEvent>) {
        let mut gained = 0;
        for s in &mut self.sprites {
            if let Sprite::Pipe(p) = s {
                if !p.scored && p.passed(BIRD_X) {
                    p.scored = true;
                    gained += 1;
                }
            }
        }
        for _ in 0..gained {
            self.score += 1;
            events.push(GameEvent::Scored(self.score));
        }
    }

    fn collided(&self) -> bool {
        let Some(bird) = self.bird() else { return false };
        if bird.on_floor() { return true; }
        let Some(hb) = self.sprites.iter().find_map(|s| s.hitbox()) else { return false };
        self.sprites.iter()
            .flat_map(|s| s.obstacles())
            .any(|r| r.intersects(&hb))
    }

    fn crash(&mut self) {
        self.phase = Phase::GameOver;
        self.best = self.best.max(self.score);
        if let Some(bird) = self.bird_mut() {
            bird.kill();
        }
        for s in &mut self.sprites {
            s.freeze();
        }
        self.sprites.push(Sprite::message(MessageKind::GameOver { score: self.score, best: self.best }));
        self.sprites.push(Sprite::message(MessageKind::Retry));
        info!("crashed: score {} (best {})", self.score, self.best);
    }

    /// Back to `Ready` with fresh sprites, zero score and a reset cadence.
    pub fn restart(&mut self, now: f64) {
        self.sprites = initial_sprites(&self.cfg);
        self.phase = Phase::Ready;
        self.score = 0;
        self.spawn_timer = 0.0;
        self.cadence.reset(now);
        info!("game restarted");
    }

    // ── rendering ─────────────────────────────────────────────────────────

    /// Draw all sprites back to front, then the score.
    pub fn draw(&self, canvas: &mut Canvas) {
        let mut order: Vec<&Sprite> = self.sprites.iter().collect();
        order.sort_by_key(|s| s.layer());
        for s in order {
            s.draw(canvas);
        }
        if self.phase == Phase::Playing {
            canvas.draw_label_centered(&self.score.to_string(), WORLD_W as isize / 2, 40, 6, 0xFFFFFFFF);
        }
    }

    // ── accessors ─────────────────────────────────────────────────────────

    pub fn phase(&self)    -> Phase         { self.phase }
    pub fn score(&self)    -> u32           { self.score }
    pub fn best(&self)     -> u32           { self.best }
    pub fn distance(&self) -> f64           { self.distance }
    pub fn cadence(&self)  -> &JumpCadence  { &self.cadence }
    pub fn sprites(&self)  -> &[Sprite]     { &self.sprites }

    pub fn bird(&self) -> Option<&Bird> {
        self.sprites.iter().find_map(|s| match s {
            Sprite::Bird(b) => Some(b),
            _ => None,
        })
    }

    fn bird_mut(&mut self) -> Option<&mut Bird> {
        self.sprites.iter_mut().find_map(|s| match s {
            Sprite::Bird(b) => Some(b),
            _ => None,
        })
    }

    pub fn pipe_count(&self) -> usize {
        self.sprites.iter().filter(|s| matches!(s, Sprite::Pipe(_))).count()
    }
}

fn initial_sprites(cfg: &GameConfig) -> Vec<Sprite> {
    vec![
        Sprite::Background(Background),
        Sprite::floor(cfg.scroll_speed),
        Sprite::Bird(Bird::new(cfg.gravity, cfg.flap_velocity)),
        Sprite::message(MessageKind::GetReady),
    ]
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
