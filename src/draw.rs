// Window + software drawing utilities.
// Visual effects provided here:
// 1) A window that shows the camera blended with the whiteboard canvas.
// 2) Solid pen strokes (thick lines made of stamped discs) for the canvas.
// 3) Thin lines for the hand skeleton overlay.
// 4) A tiny 5x7 bitmap font, scalable, for the HUD.

use crate::detector::PointerInput;
use crate::error::Error;
use crate::hand::{HAND_CONNECTIONS, Landmark, LandmarkSample};
use crate::types::{FrameBuffer, Point};
use minifb::{Key, MouseButton, MouseMode, Window, WindowOptions};

pub struct Drawer {
    window: Window, // the on-screen window you see
}

impl Drawer {
    /// Create a window sized to the camera feed.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// True while ESC is held down (we exit when this is pressed).
    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Mouse position plus the finger pattern picked with the keyboard:
    /// LMB or 1 = index only, 2/3/4 = that many fingers, F or 0 = fist.
    /// No key held means no hand in view.
    pub fn pointer_input(&self) -> PointerInput {
        let pos = self
            .window
            .get_mouse_pos(MouseMode::Clamp)
            .map(|(x, y)| (x.max(0.0) as usize, y.max(0.0) as usize));

        let down = |keys: &[Key]| keys.iter().any(|&k| self.window.is_key_down(k));
        let fingers = if down(&[Key::F, Key::Key0]) {
            Some([false; 4])
        } else if down(&[Key::Key4]) {
            Some([true; 4])
        } else if down(&[Key::Key3]) {
            Some([true, true, true, false])
        } else if down(&[Key::Key2]) {
            Some([true, true, false, false])
        } else if down(&[Key::Key1]) || self.window.get_mouse_down(MouseButton::Left) {
            Some([true, false, false, false])
        } else {
            None
        };

        PointerInput { pos, fingers }
    }
}

/* ---------- Software drawing: pixels, lines, discs ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Walk the Bresenham line from `from` to `to`, calling `plot` on every pixel.
fn bresenham(from: Point, to: Point, mut plot: impl FnMut(i32, i32)) {
    let (mut x0, mut y0) = (from.x, from.y);
    let (x1, y1) = (to.x, to.y);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        plot(x0, y0);
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

/// Draw a thin 1-pixel line.
pub fn draw_line(fb: &mut FrameBuffer, from: Point, to: Point, color: u32) {
    bresenham(from, to, |x, y| put_pixel(fb, x, y, color));
}

/// Fill a solid disc of `radius` pixels centered at `c`.
pub fn fill_disc(fb: &mut FrameBuffer, c: Point, radius: i32, color: u32) {
    let r2 = radius.saturating_mul(radius);
    // Clip the bounding box once instead of testing every pixel.
    let x_lo = c.x.saturating_sub(radius).max(0);
    let x_hi = c.x.saturating_add(radius).min(fb.width as i32 - 1);
    let y_lo = c.y.saturating_sub(radius).max(0);
    let y_hi = c.y.saturating_add(radius).min(fb.height as i32 - 1);
    for y in y_lo..=y_hi {
        let dy = y - c.y;
        for x in x_lo..=x_hi {
            let dx = x - c.x;
            if dx * dx + dy * dy <= r2 {
                fb.pixels[y as usize * fb.width + x as usize] = color;
            }
        }
    }
}

/// Draw a pen stroke segment `thickness` pixels wide with round caps.
/// When `from == to` this leaves a single round dot.
pub fn draw_thick_line(fb: &mut FrameBuffer, from: Point, to: Point, color: u32, thickness: i32) {
    let radius = (thickness / 2).max(0);
    if radius == 0 {
        draw_line(fb, from, to, color);
        return;
    }
    bresenham(from, to, |x, y| fill_disc(fb, Point::new(x, y), radius, color));
}

/// Landmark to pixel, kept within one frame size of the visible area so a
/// wild detector value can't blow up the line walk.
fn landmark_px(lm: Landmark, w: f32, h: f32) -> Point {
    // NaN survives `clamp` and then becomes 0 through `as`.
    let x = (lm.x * w).clamp(-w, 2.0 * w);
    let y = (lm.y * h).clamp(-h, 2.0 * h);
    Point::new(x as i32, y as i32)
}

/// Joint dot radius; joints closer to the camera (negative z) get bigger dots.
fn joint_radius(lm: Landmark) -> i32 {
    (3.0 - lm.z * 20.0).clamp(2.0, 6.0) as i32
}

/// Draw the hand skeleton: bones as thin lines, joints as small dots.
pub fn draw_hand_skeleton(fb: &mut FrameBuffer, sample: &LandmarkSample, bone: u32, joint: u32) {
    let (w, h) = (fb.width as f32, fb.height as f32);
    for &(a, b) in HAND_CONNECTIONS.iter() {
        let from = landmark_px(sample.landmark(a), w, h);
        let to = landmark_px(sample.landmark(b), w, h);
        draw_line(fb, from, to, bone);
    }
    for &lm in sample.landmarks() {
        fill_disc(fb, landmark_px(lm, w, h), joint_radius(lm), joint);
    }
}

/* ---------- 5x7 bitmap font (uppercase ASCII subset for the HUD) ---------- */

/// Return a 5x7 glyph bitmap. Lowercase letters render as uppercase.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    // Helper macro to define a glyph quickly
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        // Digits 0..9
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        // Letters A..Z
        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        // Punctuation: space, vertical bar, colon, dot
        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),

        _ => None,
    }
}

/// Fill one `scale`×`scale` font cell.
fn put_cell(fb: &mut FrameBuffer, x: i32, y: i32, scale: i32, color: u32) {
    for sy in 0..scale {
        for sx in 0..scale {
            put_pixel(fb, x + sx, y + sy, color);
        }
    }
}

/// Draw a single 5x7 character at (x,y), each font pixel `scale` screen pixels wide.
/// A black shadow one cell down-right keeps it readable over the video.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32, scale: i32) {
    if let Some(rows) = glyph5x7(ch) {
        // Shadow pass first, then the glyph itself.
        for (off, c) in [(scale, 0x00000000), (0, color)] {
            for (ry, rowbits) in rows.iter().enumerate() {
                for rx in 0..5 {
                    if (rowbits & (1 << (4 - rx))) != 0 {
                        put_cell(fb, x + rx * scale + off, y + ry as i32 * scale + off, scale, c);
                    }
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs; each glyph advances 6 font pixels.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32, scale: i32) {
    let scale = scale.max(1);
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color, scale);
        x += 6 * scale;
    }
}

/// Width in pixels that `draw_text_5x7` will use for `text`.
pub fn text_width_5x7(text: &str, scale: i32) -> i32 {
    text.chars().count() as i32 * 6 * scale.max(1)
}
