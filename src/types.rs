// Core types shared by the sampler, the layout and the drawing code.

use image::Rgb;
use std::fmt;

#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// A buffer filled with one color.
    pub fn new(width: usize, height: usize, fill: u32) -> Self {
        Self { width, height, pixels: vec![fill; width * height] }
    }
}

/// The labeled face areas a sample can be filed under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Region {
    Hair,
    Eyes,
    Face,
    Mouth,
}

impl Region {
    pub const ALL: [Region; 4] = [Region::Hair, Region::Eyes, Region::Face, Region::Mouth];

    /// Stable position in `ALL`, used to index per-region storage.
    pub fn index(self) -> usize {
        match self {
            Region::Hair => 0,
            Region::Eyes => 1,
            Region::Face => 2,
            Region::Mouth => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Region::Hair => "Hair",
            Region::Eyes => "Eyes",
            Region::Face => "Face",
            Region::Mouth => "Mouth",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label().to_lowercase())
    }
}

/// One RGB reading taken at a click.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sample {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Sample {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Pack as 0x00RRGGBB, the layout minifb expects.
    pub fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

impl From<Rgb<u8>> for Sample {
    fn from(px: Rgb<u8>) -> Self {
        Self::new(px[0], px[1], px[2])
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Axis-aligned rectangle in window pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
}

impl Rect {
    pub const fn new(x: usize, y: usize, w: usize, h: usize) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, px: usize, py: usize) -> bool {
        px >= self.x && py >= self.y && px < self.x + self.w && py < self.y + self.h
    }
}
