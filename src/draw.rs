// Window + software drawing utilities.
// Visual effects provided here:
// 1) A window that shows the toolbar, the canvas and the swatch panel.
// 2) Input polling turned into `Command`s.
// 3) A tiny 5x7 bitmap font for labels and the status line.

use crate::app::{App, Canvas, Command};
use crate::camera::CameraDevice;
use crate::error::Error;
use crate::types::{FrameBuffer, Rect};
use crate::ui::{self, Layout, GLYPH_ADVANCE, PADDING};
use crate::view::{fit_to, to_framebuffer};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

pub const BACKGROUND: u32 = 0x00_20_20_24;
pub const CANVAS_EMPTY: u32 = 0x00_10_10_10;
pub const BUTTON: u32 = 0x00_44_44_4c;
pub const BUTTON_ACTIVE: u32 = 0x00_2e_7d_32;
pub const TEXT: u32 = 0x00_FF_FF_FF;
pub const OUTLINE: u32 = 0x00_00_00_00;

pub struct Drawer {
    window: Window,          // the on-screen window you see
    mouse_was_down: bool,    // for click edge detection
}

impl Drawer {
    /// Create a window and cap its refresh rate (this is the preview tick).
    pub fn new(title: &str, width: usize, height: usize, fps: usize) -> Result<Self, Error> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(fps);
        Ok(Self { window, mouse_was_down: false })
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

    /// ESC held: the main loop stops.
    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Collect this frame's input as commands, in the order keys, wheel, click.
    pub fn poll(&mut self, layout: &Layout, canvas_size: (usize, usize)) -> Vec<Command> {
        let mut out: Vec<Command> = self
            .window
            .get_keys_pressed(KeyRepeat::No)
            .into_iter()
            .filter_map(ui::command_for_key)
            .collect();

        let pointer = self
            .window
            .get_mouse_pos(MouseMode::Discard)
            .map(|(mx, my)| (mx.max(0.0) as usize, my.max(0.0) as usize));

        if let (Some((_, dy)), Some((x, y))) = (self.window.get_scroll_wheel(), pointer) {
            out.extend(layout.wheel(x, y, canvas_size, dy));
        }

        // Fire once per press, not every frame the button is held.
        let down = self.window.get_mouse_down(MouseButton::Left);
        if down && !self.mouse_was_down {
            if let Some((x, y)) = pointer {
                out.extend(layout.hit(x, y, canvas_size));
            }
        }
        self.mouse_was_down = down;
        out
    }
}

/// Size of what the canvas shows; the still shrinks it, live/empty fill the viewport.
pub fn canvas_size<D: CameraDevice>(app: &App<D>, layout: &Layout) -> (usize, usize) {
    match app.canvas() {
        Canvas::Still(view) => {
            let (w, h) = view.size();
            (w as usize, h as usize)
        }
        Canvas::Live(_) | Canvas::Empty => (layout.canvas.w, layout.canvas.h),
    }
}

/// Draw the whole window for the current app state.
pub fn render<D: CameraDevice>(fb: &mut FrameBuffer, layout: &Layout, app: &App<D>) {
    fb.pixels.fill(BACKGROUND);
    let sampler = app.sampler();

    // Toolbar
    for b in &layout.buttons {
        let active = matches!(b.command, Command::SelectRegion(r) if sampler.active_region() == Some(r));
        fill_rect(fb, b.rect, if active { BUTTON_ACTIVE } else { BUTTON });
        stroke_rect(fb, b.rect, OUTLINE);
        let ty = b.rect.y + (b.rect.h - 7) / 2;
        draw_text_5x7(fb, (b.rect.x + PADDING) as i32, ty as i32, b.label, TEXT);
    }

    // Canvas
    let c = layout.canvas;
    match app.canvas() {
        Canvas::Live(frame) => {
            let fitted = fit_to(frame, (c.w as u32, c.h as u32));
            blit(fb, c.x, c.y, &to_framebuffer(&fitted));
        }
        Canvas::Still(view) => blit(fb, c.x, c.y, &to_framebuffer(&view.image)),
        Canvas::Empty => {
            fill_rect(fb, c, CANVAS_EMPTY);
            let hint = "Press START PREVIEW (P), then SNAPSHOT (SPACE)";
            let x = c.x + c.w.saturating_sub(ui::text_width(hint)) / 2;
            draw_text_5x7(fb, x as i32, (c.y + c.h / 2) as i32, hint, TEXT);
        }
    }

    // Swatch rows: nothing is drawn in the bar until the region has a sample.
    for row in &layout.swatches {
        draw_text_5x7(fb, row.label_at.0 as i32, row.label_at.1 as i32, row.region.label(), TEXT);
        if let Some(avg) = sampler.average(row.region) {
            fill_rect(fb, row.bar, avg.to_u32());
            stroke_rect(fb, row.bar, OUTLINE);
            let text = format!("{} N={}", avg, sampler.samples().len(row.region));
            draw_text_5x7(fb, row.count_at.0 as i32, row.count_at.1 as i32, &text, TEXT);
        }
    }

    // Status line
    let region = sampler.active_region().map_or("NONE", |r| r.label());
    let camera = if app.is_previewing() { "LIVE" } else if sampler.has_image() { "STILL" } else { "OFF" };
    let status = format!(
        "ZOOM {:.1}X | REGION: {} | CAMERA: {}",
        sampler.zoom().factor(),
        region,
        camera
    );
    draw_text_5x7(fb, layout.status_at.0 as i32, layout.status_at.1 as i32, &status, TEXT);
}

/* ---------- Software drawing: pixels, rects, blits, tiny bitmap font ---------- */

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

/// Solid rectangle, clipped to the framebuffer.
pub fn fill_rect(fb: &mut FrameBuffer, r: Rect, color: u32) {
    let x1 = (r.x + r.w).min(fb.width);
    let y1 = (r.y + r.h).min(fb.height);
    for y in r.y.min(y1)..y1 {
        let row = y * fb.width;
        fb.pixels[row + r.x.min(x1)..row + x1].fill(color);
    }
}

/// 1-pixel rectangle outline.
pub fn stroke_rect(fb: &mut FrameBuffer, r: Rect, color: u32) {
    if r.w == 0 || r.h == 0 {
        return;
    }
    let (x0, y0) = (r.x as i32, r.y as i32);
    let (x1, y1) = ((r.x + r.w - 1) as i32, (r.y + r.h - 1) as i32);
    for x in x0..=x1 {
        put_pixel(fb, x, y0, color);
        put_pixel(fb, x, y1, color);
    }
    for y in y0..=y1 {
        put_pixel(fb, x0, y, color);
        put_pixel(fb, x1, y, color);
    }
}

/// Copy `src` into `fb` with its top-left corner at (x,y), clipped.
pub fn blit(fb: &mut FrameBuffer, x: usize, y: usize, src: &FrameBuffer) {
    if x >= fb.width {
        return;
    }
    let w = src.width.min(fb.width - x);
    for sy in 0..src.height {
        let dy = y + sy;
        if dy >= fb.height {
            break;
        }
        let d = dy * fb.width + x;
        let s = sy * src.width;
        fb.pixels[d..d + w].copy_from_slice(&src.pixels[s..s + w]);
    }
}

/// Return a 5x7 glyph bitmap for a limited character set.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    // Helper macro to define a glyph quickly
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch {
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

        // Uppercase A..Z (lowercase is folded up by the caller)
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

        // Punctuation
        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        ',' => g!(0b00000,0b00000,0b00000,0b00000,0b00110,0b00100,0b01000),
        '=' => g!(0b00000,0b00000,0b11111,0b00000,0b11111,0b00000,0b00000),
        '+' => g!(0b00000,0b00100,0b00100,0b11111,0b00100,0b00100,0b00000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '#' => g!(0b01010,0b01010,0b11111,0b01010,0b11111,0b01010,0b01010),
        '(' => g!(0b00010,0b00100,0b01000,0b01000,0b01000,0b00100,0b00010),
        ')' => g!(0b01000,0b00100,0b00010,0b00010,0b00010,0b00100,0b01000),

        _ => None,
    }
}

/// Draw a single 5x7 character at (x,y) with a 1-pixel black shadow for contrast.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32) {
    if let Some(rows) = glyph5x7(ch.to_ascii_uppercase()) {
        // Shadow pass: offset by (1,1) in black to improve readability
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    put_pixel(fb, x + rx as i32 + 1, y + ry as i32 + 1, 0x00000000);
                }
            }
        }

        // Foreground pass: actual glyph in chosen color
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    put_pixel(fb, x + rx as i32, y + ry as i32, color);
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs; each glyph is 5x7 with 1-pixel spacing.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color);
        x += GLYPH_ADVANCE as i32;
    }
}
