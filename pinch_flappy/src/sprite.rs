//! Game objects.
//!
//! Every on-screen object is one [`Sprite`] variant.  The game loop treats
//! them uniformly through [`Sprite::update`] / [`Sprite::draw`] and sorts by
//! [`Layer`] for drawing; only collision and scoring look inside a variant.

use crate::canvas::{blend, Canvas};

// ════════════════════════════════════════════════════════════════════════════
// World geometry
// ════════════════════════════════════════════════════════════════════════════

pub const WORLD_W:  usize = 400;
pub const WORLD_H:  usize = 640;
/// Top edge of the ground strip.
pub const FLOOR_Y:  f32   = 540.0;
pub const BIRD_X:   f32   = 100.0;
pub const BIRD_W:   f32   = 34.0;
pub const BIRD_H:   f32   = 24.0;
pub const PIPE_W:   f32   = 64.0;

const SKY_TOP:      u32 = 0xFF4EC0CA;
const SKY_BOTTOM:   u32 = 0xFFB8E8EC;
const CITY:         u32 = 0xFF9BD8C7;
const FLOOR_TOP:    u32 = 0xFF5EE270;
const FLOOR_DARK:   u32 = 0xFF3FB450;
const FLOOR_SAND:   u32 = 0xFFDED895;
const PIPE_GREEN:   u32 = 0xFF74BF2E;
const PIPE_LIGHT:   u32 = 0xFF9CE659;
const PIPE_EDGE:    u32 = 0xFF543847;
const BIRD_BODY:    u32 = 0xFFF8D030;
const BIRD_WING:    u32 = 0xFFF0A020;
const BIRD_BEAK:    u32 = 0xFFF05030;
const WHITE:        u32 = 0xFFFFFFFF;
const BLACK:        u32 = 0xFF000000;

// ════════════════════════════════════════════════════════════════════════════
// Layer / Rect
// ════════════════════════════════════════════════════════════════════════════

/// Draw order, back to front.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Layer {
    Background,
    Obstacle,
    Floor,
    Player,
    Ui,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self { Rect { x, y, w, h } }

    pub fn intersects(&self, o: &Rect) -> bool {
        self.x < o.x + o.w && o.x < self.x + self.w &&
        self.y < o.y + o.h && o.y < self.y + self.h
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.w && py >= self.y && py < self.y + self.h
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Variants
// ════════════════════════════════════════════════════════════════════════════

/// Static sky with a low skyline.
#[derive(Clone, Debug, Default)]
pub struct Background;

/// Scrolling ground strip.
#[derive(Clone, Debug)]
pub struct Floor {
    pub offset: f32,
    /// Pixels per second; 0 when frozen.
    pub speed:  f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BirdMode {
    /// Bobbing in place before the first flap.
    Hover,
    Flying,
    /// Falling after a crash; lands on the floor.
    Dead,
}

#[derive(Clone, Debug)]
pub struct Bird {
    pub y:        f32,
    /// Vertical velocity, pixels per second (positive = down).
    pub vel:      f32,
    pub mode:     BirdMode,
    pub gravity:  f32,
    pub flap_vel: f32,
    /// Time since spawn; drives hover bob and wing flap.
    pub age:      f32,
}

/// A pair of columns with a gap, scrolling left.
#[derive(Clone, Debug)]
pub struct Pipe {
    pub x:      f32,
    /// Vertical centre of the gap.
    pub gap_y:  f32,
    pub gap:    f32,
    pub speed:  f32,
    /// Already counted towards the score.
    pub scored: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum MessageKind {
    GetReady,
    GameOver { score: u32, best: u32 },
    /// Clickable retry button.
    Retry,
}

#[derive(Clone, Debug)]
pub struct Message {
    pub kind: MessageKind,
    /// Fade/slide-in progress 0.0–1.0.
    pub shown: f32,
}

#[derive(Clone, Debug)]
pub enum Sprite {
    Background(Background),
    Floor(Floor),
    Bird(Bird),
    Pipe(Pipe),
    Message(Message),
}

// ════════════════════════════════════════════════════════════════════════════
// Constructors / behaviour
// ════════════════════════════════════════════════════════════════════════════

impl Bird {
    pub fn new(gravity: f32, flap_vel: f32) -> Self {
        Bird {
            y: (FLOOR_Y - BIRD_H) / 2.0,
            vel: 0.0,
            mode: BirdMode::Hover,
            gravity,
            flap_vel,
            age: 0.0,
        }
    }

    pub fn flap(&mut self) {
        if self.mode == BirdMode::Dead { return; }
        self.mode = BirdMode::Flying;
        self.vel = -self.flap_vel;
    }

    pub fn kill(&mut self) {
        self.mode = BirdMode::Dead;
    }

    /// Slightly smaller than the drawn body so grazes don't count.
    pub fn hitbox(&self) -> Rect {
        Rect::new(BIRD_X + 3.0, self.y + 3.0, BIRD_W - 6.0, BIRD_H - 6.0)
    }

    pub fn on_floor(&self) -> bool { self.y + BIRD_H >= FLOOR_Y }

    /// Nose-up/nose-down angle in degrees, from -25 (climbing) to 90 (diving).
    pub fn tilt(&self) -> f32 {
        match self.mode {
            BirdMode::Hover => 0.0,
            _ => (self.vel / self.flap_vel.max(1.0) * 45.0).clamp(-25.0, 90.0),
        }
    }

    fn update(&mut self, dt: f32) {
        self.age += dt;
        match self.mode {
            BirdMode::Hover => {
                self.y = (FLOOR_Y - BIRD_H) / 2.0 + (self.age * 6.0).sin() * 6.0;
            }
            BirdMode::Flying | BirdMode::Dead => {
                self.vel = (self.vel + self.gravity * dt).min(self.flap_vel * 1.6);
                self.y += self.vel * dt;
                if self.y < 0.0 {
                    self.y = 0.0;
                    self.vel = 0.0;
                }
                if self.on_floor() {
                    self.y = FLOOR_Y - BIRD_H;
                    self.vel = 0.0;
                }
            }
        }
    }

    fn draw(&self, c: &mut Canvas) {
        let x = BIRD_X as isize;
        let y = self.y as isize;
        let w = BIRD_W as isize;
        let h = BIRD_H as isize;

        c.fill_rect(x + 2, y, w - 4, h, BIRD_BODY);
        c.fill_rect(x, y + 2, w, h - 4, BIRD_BODY);
        c.draw_border(x, y, w, h, BLACK);

        // Wing: up/down every 0.1 s while alive
        let wing_up = self.mode != BirdMode::Dead && ((self.age * 10.0) as i32) % 2 == 0;
        let wy = if wing_up { y + 6 } else { y + 12 };
        c.fill_rect(x + 3, wy, 12, 7, BIRD_WING);
        c.draw_border(x + 3, wy, 12, 7, BLACK);

        // Eye
        c.fill_rect(x + w - 13, y + 3, 9, 9, WHITE);
        let pupil = if self.mode == BirdMode::Dead { BIRD_BEAK } else { BLACK };
        c.fill_rect(x + w - 8, y + 5, 3, 4, pupil);

        // Beak dips with the tilt
        let by = y + 13 + (self.tilt() / 15.0) as isize;
        c.fill_rect(x + w - 6, by, 10, 6, BIRD_BEAK);
        c.draw_border(x + w - 6, by, 10, 6, BLACK);
    }
}

impl Pipe {
    pub fn new(x: f32, gap_y: f32, gap: f32, speed: f32) -> Self {
        Pipe { x, gap_y, gap, speed, scored: false }
    }

    pub fn top_rect(&self) -> Rect {
        Rect::new(self.x, 0.0, PIPE_W, (self.gap_y - self.gap / 2.0).max(0.0))
    }

    pub fn bottom_rect(&self) -> Rect {
        let top = self.gap_y + self.gap / 2.0;
        Rect::new(self.x, top, PIPE_W, (FLOOR_Y - top).max(0.0))
    }

    pub fn off_screen(&self) -> bool { self.x + PIPE_W < 0.0 }

    /// The bird's left edge has cleared the pipe's right edge.
    pub fn passed(&self, bird_x: f32) -> bool { self.x + PIPE_W < bird_x }

    fn draw(&self, c: &mut Canvas) {
        for (r, cap_at_bottom) in [(self.top_rect(), true), (self.bottom_rect(), false)] {
            if r.h <= 0.0 { continue; }
            let (x, y, w, h) = (r.x as isize, r.y as isize, r.w as isize, r.h as isize);
            c.fill_rect(x + 2, y, w - 4, h, PIPE_GREEN);
            c.fill_rect(x + 8, y, 6, h, PIPE_LIGHT);
            c.draw_border(x + 2, y, w - 4, h, PIPE_EDGE);

            // Lip
            let ly = if cap_at_bottom { y + h - 24 } else { y };
            c.fill_rect(x - 2, ly, w + 4, 24, PIPE_GREEN);
            c.fill_rect(x + 4, ly, 6, 24, PIPE_LIGHT);
            c.draw_border(x - 2, ly, w + 4, 24, PIPE_EDGE);
        }
    }
}

impl Floor {
    fn draw(&self, c: &mut Canvas) {
        let y = FLOOR_Y as isize;
        c.fill_rect(0, y, WORLD_W as isize, WORLD_H as isize - y, FLOOR_SAND);
        c.fill_rect(0, y, WORLD_W as isize, 16, FLOOR_TOP);
        c.fill_rect(0, y, WORLD_W as isize, 2, PIPE_EDGE);

        // Diagonal stripes scroll with the offset
        let off = self.offset as isize;
        let mut sx = -off;
        while sx < WORLD_W as isize + 24 {
            for k in 0..12 {
                c.fill_rect(sx + k, y + 2 + k, 8, 1, FLOOR_DARK);
            }
            sx += 24;
        }
        c.fill_rect(0, y + 16, WORLD_W as isize, 2, FLOOR_DARK);
    }
}

impl Background {
    fn draw(&self, c: &mut Canvas) {
        let floor = FLOOR_Y as usize;
        for row in 0..floor {
            let t = row as f32 / floor as f32;
            c.fill_rect(0, row as isize, WORLD_W as isize, 1, blend(SKY_TOP, SKY_BOTTOM, t));
        }
        // Skyline blocks
        let heights = [60, 90, 70, 110, 50, 85, 100, 65, 95, 75];
        let bw = WORLD_W as isize / heights.len() as isize;
        for (i, &h) in heights.iter().enumerate() {
            c.fill_rect(i as isize * bw, FLOOR_Y as isize - h, bw - 4, h, CITY);
        }
    }
}

impl Message {
    pub fn new(kind: MessageKind) -> Self { Message { kind, shown: 0.0 } }

    /// Retry button bounds (centred at 1/1.5 of the screen height).
    pub fn retry_rect() -> Rect {
        let (w, h) = (140.0, 48.0);
        Rect::new(WORLD_W as f32 / 2.0 - w / 2.0, WORLD_H as f32 / 1.5 - h / 2.0, w, h)
    }

    fn draw(&self, c: &mut Canvas) {
        let cx = WORLD_W as isize / 2;
        let fade = |col: u32| blend(SKY_TOP, col, self.shown);
        match &self.kind {
            MessageKind::GetReady => {
                c.draw_label_centered("GET READY", cx, 150, 5, fade(0xFFF8A030));
                c.draw_label_centered("OPEN YOUR PINCH TO FLY", cx, 230, 2, fade(WHITE));
                c.draw_label_centered("OR PRESS SPACE", cx, 252, 2, fade(WHITE));
            }
            MessageKind::GameOver { score, best } => {
                let y = 120 - ((1.0 - self.shown) * 40.0) as isize;
                c.draw_label_centered("GAME OVER", cx, y, 5, fade(0xFFF86030));
                c.fill_rect(cx - 100, 200, 200, 90, 0xFFDED895);
                c.draw_border(cx - 100, 200, 200, 90, PIPE_EDGE);
                c.draw_label_centered(&format!("SCORE {}", score), cx, 220, 3, PIPE_EDGE);
                c.draw_label_centered(&format!("BEST {}", best), cx, 255, 3, PIPE_EDGE);
            }
            MessageKind::Retry => {
                let r = Message::retry_rect();
                let (x, y, w, h) = (r.x as isize, r.y as isize, r.w as isize, r.h as isize);
                c.fill_rect(x, y, w, h, fade(0xFFF8A030));
                c.draw_border(x, y, w, h, PIPE_EDGE);
                c.draw_label_centered("RETRY", cx, y + 14, 4, WHITE);
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Sprite dispatch
// ════════════════════════════════════════════════════════════════════════════

impl Sprite {
    pub fn floor(speed: f32) -> Self { Sprite::Floor(Floor { offset: 0.0, speed }) }

    pub fn message(kind: MessageKind) -> Self { Sprite::Message(Message::new(kind)) }

    pub fn layer(&self) -> Layer {
        match self {
            Sprite::Background(_) => Layer::Background,
            Sprite::Pipe(_)       => Layer::Obstacle,
            Sprite::Floor(_)      => Layer::Floor,
            Sprite::Bird(_)       => Layer::Player,
            Sprite::Message(_)    => Layer::Ui,
        }
    }

    /// Advance by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        match self {
            Sprite::Background(_) => {}
            Sprite::Floor(f) => {
                f.offset = (f.offset + f.speed * dt) % 24.0;
            }
            Sprite::Bird(b) => b.update(dt),
            Sprite::Pipe(p) => {
                p.x -= p.speed * dt;
            }
            Sprite::Message(m) => {
                m.shown = (m.shown + dt * 4.0).min(1.0);
            }
        }
    }

    pub fn draw(&self, canvas: &mut Canvas) {
        match self {
            Sprite::Background(b) => b.draw(canvas),
            Sprite::Floor(f)      => f.draw(canvas),
            Sprite::Bird(b)       => b.draw(canvas),
            Sprite::Pipe(p)       => p.draw(canvas),
            Sprite::Message(m)    => m.draw(canvas),
        }
    }

    /// Stop scrolling (after a crash).
    pub fn freeze(&mut self) {
        match self {
            Sprite::Floor(f) => f.speed = 0.0,
            Sprite::Pipe(p)  => p.speed = 0.0,
            _ => {}
        }
    }

    pub fn hitbox(&self) -> Option<Rect> {
        match self {
            Sprite::Bird(b) => Some(b.hitbox()),
            _ => None,
        }
    }

    /// Rectangles the bird must not touch.
    pub fn obstacles(&self) -> Vec<Rect> {
        match self {
            Sprite::Pipe(p) => vec![p.top_rect(), p.bottom_rect()],
            _ => Vec::new(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layers_are_ordered() {
        assert!(Layer::Background < Layer::Obstacle);
        assert!(Layer::Obstacle   < Layer::Floor);
        assert!(Layer::Floor      < Layer::Player);
        assert!(Layer::Player     < Layer::Ui);
    }

    #[test]
    fn rect_intersection() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.intersects(&Rect::new(10.0, 0.0, 5.0, 5.0)));
        assert!(a.contains(0.0, 9.9));
        assert!(!a.contains(10.0, 5.0));
    }

    #[test]
    fn flap_sets_upward_velocity() {
        let mut b = Bird::new(1500.0, 450.0);
        b.flap();
        assert_eq!(b.mode, BirdMode::Flying);
        assert_eq!(b.vel, -450.0);
        let y0 = b.y;
        b.update(0.05);
        assert!(b.y < y0);
    }

    #[test]
    fn tilt_follows_velocity() {
        let mut b = Bird::new(1500.0, 450.0);
        assert_eq!(b.tilt(), 0.0);
        b.flap();
        assert_eq!(b.tilt(), -25.0);
        b.vel = 900.0;
        assert_eq!(b.tilt(), 90.0);
    }

    #[test]
    fn dead_bird_cannot_flap() {
        let mut b = Bird::new(1500.0, 450.0);
        b.kill();
        b.flap();
        assert_eq!(b.mode, BirdMode::Dead);
    }

    #[test]
    fn bird_lands_on_floor() {
        let mut b = Bird::new(1500.0, 450.0);
        b.mode = BirdMode::Flying;
        for _ in 0..300 { b.update(1.0 / 60.0); }
        assert!(b.on_floor());
        assert_eq!(b.y, FLOOR_Y - BIRD_H);
    }

    #[test]
    fn bird_clamped_at_ceiling() {
        let mut b = Bird::new(0.0, 450.0);
        b.flap();
        for _ in 0..120 { b.update(1.0 / 60.0); }
        assert_eq!(b.y, 0.0);
    }

    #[test]
    fn pipe_gap_rects() {
        let p = Pipe::new(200.0, 250.0, 150.0, 150.0);
        assert_eq!(p.top_rect().h, 175.0);
        assert_eq!(p.bottom_rect().y, 325.0);
        assert_eq!(p.bottom_rect().h, FLOOR_Y - 325.0);
        let mut s = Sprite::Pipe(p);
        s.update(1.0);
        match &s { Sprite::Pipe(p) => assert_eq!(p.x, 50.0), _ => unreachable!() }
        s.freeze();
        s.update(1.0);
        match &s { Sprite::Pipe(p) => assert_eq!(p.x, 50.0), _ => unreachable!() }
    }

    #[test]
    fn message_fades_in() {
        let mut s = Sprite::message(MessageKind::GetReady);
        for _ in 0..10 { s.update(0.1); }
        match &s { Sprite::Message(m) => assert_eq!(m.shown, 1.0), _ => unreachable!() }
    }

    #[test]
    fn every_variant_draws_in_bounds() {
        let mut c = Canvas::new(WORLD_W, WORLD_H, 0);
        let sprites = vec![
            Sprite::Background(Background),
            Sprite::floor(150.0),
            Sprite::Bird(Bird::new(1500.0, 450.0)),
            Sprite::Pipe(Pipe::new(-30.0, 200.0, 150.0, 150.0)),
            Sprite::message(MessageKind::GameOver { score: 3, best: 7 }),
            Sprite::message(MessageKind::Retry),
        ];
        for s in &sprites { s.draw(&mut c); }
        assert!(c.pixels().iter().any(|&p| p != 0));
    }
}
