// Window + software drawing utilities.
// Visual effects provided here:
// 1) A resizable window that shows the photo stretched to fit.
// 2) A ring under the cursor the size of the brush.
// 3) A tiny 5x7 bitmap font for the HUD line.

use crate::error::Error;
use crate::geometry::{DisplaySize, Point};
use crate::types::FrameBuffer;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, ScaleMode, Window, WindowOptions};

pub struct Drawer {
    window: Window,        // the on-screen window you see
    title: String,
    fitted: (usize, usize), // size the window was last opened or refitted at
}

impl Drawer {
    /// Open a resizable window of `width`×`height` screen pixels.
    /// Whatever buffer is presented gets stretched to the window, so the
    /// buffer can stay at the photo's native resolution.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let window = open_window(title, width, height)?;
        Ok(Self { window, title: title.to_string(), fitted: (width, height) })
    }

    /// Reopen the window at `size` when a new photo needs a different shape.
    /// Keeps the window where it was on screen. Returns whether anything changed.
    pub fn refit(&mut self, size: (usize, usize)) -> Result<bool, Error> {
        if !needs_refit(self.fitted, size) {
            return Ok(false);
        }
        let (x, y) = self.window.get_position();
        let mut window = open_window(&self.title, size.0, size.1)?;
        window.set_position(x, y);
        self.window = window;
        self.fitted = size;
        log::debug!("Window refitted to {}x{}", size.0, size.1);
        Ok(true)
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    pub fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
        self.title = title.to_string();
    }

    /// Current on-screen size of the drawing surface. Asked fresh every frame:
    /// the user can resize the window at any time.
    pub fn display_size(&self) -> DisplaySize {
        let (w, h) = self.window.get_size();
        DisplaySize::new(w as f64, h as f64)
    }

    /// Mouse position in window pixels, not clamped: dragging past the edge
    /// gives negative or oversized coordinates.
    pub fn pointer(&self) -> Option<Point> {
        self.window
            .get_unscaled_mouse_pos(MouseMode::Pass)
            .map(|(x, y)| Point::new(f64::from(x), f64::from(y)))
    }

    pub fn left_mouse_down(&self) -> bool {
        self.window.get_mouse_down(MouseButton::Left)
    }

    /// Visual: when pressed, the painted tint disappears.
    pub fn c_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::C, KeyRepeat::No)
    }

    pub fn s_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::S, KeyRepeat::No)
    }

    /// Visual: when pressed, the clipboard photo replaces the current one.
    pub fn v_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::V, KeyRepeat::No)
    }

    /// `[` shrinks, `]` grows. Held keys repeat.
    pub fn brush_step(&self) -> i32 {
        let mut step = 0;
        if self.window.is_key_pressed(Key::LeftBracket, KeyRepeat::Yes) { step -= 1; }
        if self.window.is_key_pressed(Key::RightBracket, KeyRepeat::Yes) { step += 1; }
        step
    }
}

fn open_window(title: &str, width: usize, height: usize) -> Result<Window, Error> {
    let options = WindowOptions {
        resize: true,
        scale_mode: ScaleMode::Stretch,
        ..WindowOptions::default()
    };
    let mut window = Window::new(title, width.max(1), height.max(1), options)
        .map_err(|e| Error::WindowInit(e.to_string()))?;
    window.set_target_fps(60);
    Ok(window)
}

/// A new fit only matters when it differs from the current one.
fn needs_refit(current: (usize, usize), target: (usize, usize)) -> bool {
    current != target
}

/// Window size that fits `(w, h)` inside `(max_w, max_h)` at the same aspect ratio.
/// Small photos open at native size rather than being blown up.
pub fn fit_window(w: u32, h: u32, max_w: usize, max_h: usize) -> (usize, usize) {
    let (w, h) = (f64::from(w.max(1)), f64::from(h.max(1)));
    let scale = (max_w as f64 / w).min(max_h as f64 / h).min(1.0);
    (((w * scale).round() as usize).max(1), ((h * scale).round() as usize).max(1))
}

/* ---------- Software drawing: pixels, brush ring, tiny bitmap font ---------- */

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

/// Filled square of side `size` with its top-left at (x,y).
fn fill_block(fb: &mut FrameBuffer, x: i32, y: i32, size: i32, color: u32) {
    for dy in 0..size {
        for dx in 0..size {
            put_pixel(fb, x + dx, y + dy, color);
        }
    }
}

/// Circle outline at (cx,cy) with the given radius, `thickness` pixels wide.
/// Visual: shows exactly how much the next dab will cover.
pub fn draw_brush_ring(fb: &mut FrameBuffer, cx: f64, cy: f64, radius: f64, thickness: i32, color: u32) {
    if !(radius > 0.0) {
        return;
    }
    // Enough samples that neighbours touch.
    let steps = ((std::f64::consts::TAU * radius).ceil() as usize).clamp(16, 20_000);
    for i in 0..steps {
        let t = i as f64 / steps as f64 * std::f64::consts::TAU;
        let x = (cx + radius * t.cos()).round() as i32;
        let y = (cy + radius * t.sin()).round() as i32;
        fill_block(fb, x - thickness / 2, y - thickness / 2, thickness.max(1), color);
    }
}

/* ---------- 5x7 bitmap font (uppercase, digits, a little punctuation) ---------- */

/// Return a 5x7 glyph bitmap. Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
/// Lowercase letters map onto uppercase.
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
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

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        ',' => g!(0b00000,0b00000,0b00000,0b00000,0b00110,0b00100,0b01000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '/' => g!(0b00001,0b00010,0b00010,0b00100,0b01000,0b01000,0b10000),
        '[' => g!(0b01110,0b01000,0b01000,0b01000,0b01000,0b01000,0b01110),
        ']' => g!(0b01110,0b00010,0b00010,0b00010,0b00010,0b00010,0b01110),

        _ => None,
    }
}

/// Draw a single 5x7 character at (x,y), each font pixel `scale` screen pixels wide.
/// Visual: glyph in `color` with a black drop shadow for contrast on busy photos.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32, scale: i32) {
    let Some(rows) = glyph5x7(ch) else { return };
    for (offset, c) in [(scale, 0x00_00_00_00), (0, color)] {
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    let px = x + rx * scale + offset;
                    let py = y + ry as i32 * scale + offset;
                    fill_block(fb, px, py, scale, c);
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs; 1 font pixel of spacing between glyphs.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32, scale: i32) {
    let scale = scale.max(1);
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color, scale);
        x += 6 * scale;
    }
}
