//! Software ARGB framebuffer with the handful of primitives the game and the
//! overlay need.  Everything clips against the buffer, so callers can pass
//! off-screen coordinates freely.

// ════════════════════════════════════════════════════════════════════════════
// Canvas
// ════════════════════════════════════════════════════════════════════════════

pub struct Canvas {
    width:  usize,
    height: usize,
    buf:    Vec<u32>,
}

impl Canvas {
    pub fn new(width: usize, height: usize, color: u32) -> Self {
        Canvas { width, height, buf: vec![color; width * height] }
    }

    pub fn width(&self)  -> usize { self.width }
    pub fn height(&self) -> usize { self.height }

    /// Row-major pixels, ready for `minifb::Window::update_with_buffer`.
    pub fn pixels(&self) -> &[u32] { &self.buf }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x < self.width && y < self.height { Some(self.buf[y * self.width + x]) } else { None }
    }

    pub fn clear(&mut self, color: u32) {
        self.buf.fill(color);
    }

    pub fn set_pixel(&mut self, x: isize, y: isize, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.buf[y as usize * self.width + x as usize] = color;
        }
    }

    pub fn fill_rect(&mut self, x: isize, y: isize, w: isize, h: isize, color: u32) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.width as isize);
        let y1 = (y + h).min(self.height as isize);
        for row in y0..y1 {
            let base = row as usize * self.width;
            for col in x0..x1 {
                self.buf[base + col as usize] = color;
            }
        }
    }

    pub fn draw_border(&mut self, x: isize, y: isize, w: isize, h: isize, color: u32) {
        if w <= 0 || h <= 0 { return; }
        for col in x..x + w {
            self.set_pixel(col, y,         color);
            self.set_pixel(col, y + h - 1, color);
        }
        for row in y..y + h {
            self.set_pixel(x,         row, color);
            self.set_pixel(x + w - 1, row, color);
        }
    }

    /// Bresenham line, `thickness` pixels wide (square brush).
    pub fn draw_line(
        &mut self,
        (x0, y0): (isize, isize),
        (x1, y1): (isize, isize),
        thickness: isize,
        color: u32,
    ) {
        let half = thickness.max(1) / 2;
        let dx =  (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let (mut x, mut y) = (x0, y0);
        let mut err = dx + dy;

        loop {
            self.fill_rect(x - half, y - half, thickness.max(1), thickness.max(1), color);
            if x == x1 && y == y1 { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x += sx; }
            if e2 <= dx { err += dx; y += sy; }
        }
    }

    pub fn fill_circle(&mut self, cx: isize, cy: isize, r: isize, color: u32) {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// 3×5 bitmap-font text; `scale` multiplies each font pixel.
    pub fn draw_label(&mut self, text: &str, x: isize, y: isize, scale: isize, color: u32) {
        let s = scale.max(1);
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3isize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.fill_rect(cx + col * s, y + row as isize * s, s, s, color);
                    }
                }
            }
            cx += 4 * s; // 3 wide + 1 gap
            if cx >= self.width as isize { break; }
        }
    }

    /// Label with a one-pixel drop shadow, centred on `cx`.
    pub fn draw_label_centered(&mut self, text: &str, cx: isize, y: isize, scale: isize, color: u32) {
        let x = cx - label_width(text, scale) / 2;
        self.draw_label(text, x + scale.max(1), y + scale.max(1), scale, 0xFF000000);
        self.draw_label(text, x, y, scale, color);
    }
}

/// Pixel width of `text` drawn at `scale` (without the trailing gap).
pub fn label_width(text: &str, scale: isize) -> isize {
    let n = text.chars().count() as isize;
    if n == 0 { 0 } else { (n * 4 - 1) * scale.max(1) }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '?' => [0b111, 0b001, 0b011, 0b000, 0b010],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
pub fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0-t) + cb as f32 * t) as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF000000 | (lerp(ar,br) << 16) | (lerp(ag,bg) << 8) | lerp(ab,bb)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_rect_clips() {
        let mut c = Canvas::new(10, 10, 0);
        c.fill_rect(-5, -5, 8, 8, 0xFFFFFFFF);
        assert_eq!(c.pixel(0, 0), Some(0xFFFFFFFF));
        assert_eq!(c.pixel(2, 2), Some(0xFFFFFFFF));
        assert_eq!(c.pixel(3, 3), Some(0));
        c.fill_rect(8, 8, 100, 100, 0xFF00FF00);
        assert_eq!(c.pixel(9, 9), Some(0xFF00FF00));
    }

    #[test]
    fn set_pixel_ignores_out_of_bounds() {
        let mut c = Canvas::new(4, 4, 0);
        c.set_pixel(-1, 0, 1);
        c.set_pixel(4, 0, 1);
        c.set_pixel(0, 99, 1);
        assert!(c.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn line_hits_both_ends() {
        let mut c = Canvas::new(20, 20, 0);
        c.draw_line((1, 1), (18, 12), 1, 7);
        assert_eq!(c.pixel(1, 1), Some(7));
        assert_eq!(c.pixel(18, 12), Some(7));
    }

    #[test]
    fn circle_is_filled() {
        let mut c = Canvas::new(20, 20, 0);
        c.fill_circle(10, 10, 3, 5);
        assert_eq!(c.pixel(10, 10), Some(5));
        assert_eq!(c.pixel(13, 10), Some(5));
        assert_eq!(c.pixel(14, 10), Some(0));
    }

    #[test]
    fn label_width_counts_gaps() {
        assert_eq!(label_width("", 2), 0);
        assert_eq!(label_width("A", 1), 3);
        assert_eq!(label_width("AB", 2), 14);
    }

    #[test]
    fn label_draws_something() {
        let mut c = Canvas::new(40, 10, 0);
        c.draw_label("HI", 0, 0, 1, 9);
        assert!(c.pixels().iter().any(|&p| p == 9));
    }

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend(0xFF000000, 0xFFFFFFFF, 0.0), 0xFF000000);
        assert_eq!(blend(0xFF000000, 0xFFFFFFFF, 1.0), 0xFFFFFFFF);
    }
}
