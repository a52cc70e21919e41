// Window layout and input mapping.
// Visual (top to bottom): a toolbar of six buttons, the 640x480 canvas,
// four swatch rows (label, average-color bar, sample count) and a status line.

use crate::app::Command;
use crate::config::Config;
use crate::types::{Rect, Region};
use minifb::Key;

pub const TOOLBAR_HEIGHT: usize = 30;
pub const BUTTON_HEIGHT: usize = 20;
pub const ROW_HEIGHT: usize = 26;
pub const PADDING: usize = 6;
pub const GLYPH_ADVANCE: usize = 6; // 5x7 glyph + 1 pixel spacing

pub struct Button {
    pub rect: Rect,
    pub label: &'static str,
    pub command: Command,
}

pub struct SwatchRow {
    pub region: Region,
    pub label_at: (usize, usize),
    pub bar: Rect,
    pub count_at: (usize, usize),
}

pub struct Layout {
    pub width: usize,
    pub height: usize,
    pub buttons: Vec<Button>,
    pub canvas: Rect, // full viewport; the shown still may be smaller
    pub swatches: Vec<SwatchRow>,
    pub status_at: (usize, usize),
}

impl Layout {
    pub fn new(config: &Config) -> Self {
        let vw = config.viewport_width as usize;
        let vh = config.viewport_height as usize;

        // Toolbar: region buttons first, then the camera controls.
        let mut entries: Vec<(&'static str, Command)> =
            Region::ALL.iter().map(|&r| (r.label(), Command::SelectRegion(r))).collect();
        entries.push(("Start preview", Command::StartPreview));
        entries.push(("Snapshot", Command::TakeSnapshot));

        let mut buttons = Vec::with_capacity(entries.len());
        let mut x = PADDING;
        let y = (TOOLBAR_HEIGHT - BUTTON_HEIGHT) / 2;
        for (label, command) in entries {
            let w = text_width(label) + 2 * PADDING;
            buttons.push(Button { rect: Rect::new(x, y, w, BUTTON_HEIGHT), label, command });
            x += w + PADDING;
        }
        let toolbar_width = x;

        let canvas = Rect::new(0, TOOLBAR_HEIGHT, vw, vh);

        let label_w = 10 * GLYPH_ADVANCE; // room for "MOUTH" and then some
        let mut row_y = canvas.y + canvas.h + PADDING;
        let mut swatches = Vec::with_capacity(Region::ALL.len());
        for region in Region::ALL {
            let bar = Rect::new(
                PADDING + label_w,
                row_y + (ROW_HEIGHT - config.swatch_height) / 2,
                config.swatch_width,
                config.swatch_height,
            );
            let text_y = row_y + (ROW_HEIGHT - 7) / 2;
            swatches.push(SwatchRow {
                region,
                label_at: (PADDING, text_y),
                count_at: (bar.x + bar.w + 2 * PADDING, text_y),
                bar,
            });
            row_y += ROW_HEIGHT;
        }

        let status_at = (PADDING, row_y + PADDING);
        Self {
            width: vw.max(toolbar_width),
            height: status_at.1 + 7 + PADDING,
            buttons,
            canvas,
            swatches,
            status_at,
        }
    }

    /// Map a left click in window pixels to a command.
    /// `canvas_size` is what the canvas currently shows; clicks past it hit nothing.
    pub fn hit(&self, x: usize, y: usize, canvas_size: (usize, usize)) -> Option<Command> {
        if let Some(b) = self.buttons.iter().find(|b| b.rect.contains(x, y)) {
            return Some(b.command);
        }
        let shown = self.shown_canvas(canvas_size);
        if shown.contains(x, y) {
            return Some(Command::Click {
                x: (x - shown.x) as u32,
                y: (y - shown.y) as u32,
            });
        }
        None
    }

    /// Wheel input only zooms while the pointer is over the shown canvas.
    pub fn wheel(&self, x: usize, y: usize, canvas_size: (usize, usize), dy: f32) -> Option<Command> {
        if !self.shown_canvas(canvas_size).contains(x, y) {
            return None;
        }
        command_for_scroll(dy)
    }

    fn shown_canvas(&self, canvas_size: (usize, usize)) -> Rect {
        Rect::new(self.canvas.x, self.canvas.y, canvas_size.0, canvas_size.1)
    }
}

pub fn text_width(text: &str) -> usize {
    text.chars().count() * GLYPH_ADVANCE
}

/// Keyboard bindings.
pub fn command_for_key(key: Key) -> Option<Command> {
    match key {
        Key::Key1 => Some(Command::SelectRegion(Region::Hair)),
        Key::Key2 => Some(Command::SelectRegion(Region::Eyes)),
        Key::Key3 => Some(Command::SelectRegion(Region::Face)),
        Key::Key4 => Some(Command::SelectRegion(Region::Mouth)),
        Key::P => Some(Command::StartPreview),
        Key::Space => Some(Command::TakeSnapshot),
        // '+' shares the '=' key on most layouts
        Key::Equal | Key::NumPadPlus => Some(Command::ZoomIn),
        Key::Minus | Key::NumPadMinus => Some(Command::ZoomOut),
        _ => None,
    }
}

/// Wheel up zooms in, wheel down zooms out.
pub fn command_for_scroll(dy: f32) -> Option<Command> {
    if dy > 0.0 {
        Some(Command::ZoomIn)
    } else if dy < 0.0 {
        Some(Command::ZoomOut)
    } else {
        None
    }
}
