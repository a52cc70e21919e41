// Zoom factor applied to the still image before it is center-cropped.

pub const ZOOM_STEP: f64 = 0.1;
pub const MIN_ZOOM: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Zoom(f64);

impl Default for Zoom {
    fn default() -> Self {
        Zoom(1.0)
    }
}

impl Zoom {
    pub fn factor(self) -> f64 {
        self.0
    }

    /// No upper bound.
    pub fn zoom_in(&mut self) {
        self.0 += ZOOM_STEP;
    }

    /// Never goes below `MIN_ZOOM`.
    pub fn zoom_out(&mut self) {
        self.0 = (self.0 - ZOOM_STEP).max(MIN_ZOOM);
    }
}
