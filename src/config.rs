// Compiled-in settings. There are no flags or config files; RUST_LOG is read by the logger.

use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Config {
    pub camera_index: u32,   // 0 = default webcam
    pub capture_width: u32,  // requested from the device (it may pick something close)
    pub capture_height: u32,
    pub capture_fps: u32,
    pub viewport_width: u32, // canvas size clicks are measured against
    pub viewport_height: u32,
    pub swatch_width: usize, // average-color bar per region
    pub swatch_height: usize,
    pub preview_tick: Duration, // delay between preview frames
}

impl Default for Config {
    fn default() -> Self {
        Self {
            camera_index: 0,
            capture_width: 640,
            capture_height: 480,
            capture_fps: 30,
            viewport_width: 640,
            viewport_height: 480,
            swatch_width: 200,
            swatch_height: 20,
            preview_tick: Duration::from_millis(10),
        }
    }
}

impl Config {
    /// Window frame limiter target derived from the preview tick.
    pub fn target_fps(&self) -> usize {
        let ms = self.preview_tick.as_millis().max(1);
        (1000 / ms) as usize
    }
}
