// Sampler/viewer state: the still image, zoom, active region and collected samples.
// Visual: everything the canvas and the swatch bars show after a snapshot comes from here.

use crate::samples::SampleSet;
use crate::types::{Region, Sample};
use crate::view::DisplayView;
use crate::zoom::Zoom;
use image::RgbImage;

pub struct Sampler {
    viewport: (u32, u32),        // canvas size clicks are measured against
    source: Option<RgbImage>,    // last snapshot, RGB order
    view: Option<DisplayView>,   // zoomed crop of `source`, rebuilt on snapshot/zoom
    zoom: Zoom,
    active: Option<Region>,
    samples: SampleSet,
}

impl Sampler {
    pub fn new(viewport: (u32, u32)) -> Self {
        Self {
            viewport,
            source: None,
            view: None,
            zoom: Zoom::default(),
            active: None,
            samples: SampleSet::new(),
        }
    }

    /// Replace the still image. Zoom is left where it was.
    pub fn take_snapshot(&mut self, frame: RgbImage) {
        let (w, h) = frame.dimensions();
        log::info!("Snapshot taken: {w}x{h}");
        self.source = Some(frame);
        self.refresh_view();
    }

    pub fn select_region(&mut self, region: Region) {
        log::info!("Active region: {region}");
        self.active = Some(region);
    }

    /// Sample the pixel under a canvas click into the active region.
    ///
    /// The canvas point is scaled by `source / viewport`; the zoom and crop on
    /// screen are not taken into account. Returns `None` (and records nothing)
    /// without a snapshot, without an active region, or when the point maps
    /// outside the image.
    pub fn register_click(&mut self, canvas_x: u32, canvas_y: u32) -> Option<Sample> {
        let region = self.active?;
        let source = self.source.as_ref()?;
        let (x, y) = map_to_source(canvas_x, canvas_y, source.dimensions(), self.viewport);
        let sample = Sample::from(*source.get_pixel_checked(x, y)?);

        self.samples.push(region, sample);
        log::info!("Sample in {region}: {sample} at ({x}, {y})");
        Some(sample)
    }

    pub fn average(&self, region: Region) -> Option<Sample> {
        self.samples.average(region)
    }

    pub fn zoom_in(&mut self) {
        self.zoom.zoom_in();
        self.refresh_view();
    }

    pub fn zoom_out(&mut self) {
        self.zoom.zoom_out();
        self.refresh_view();
    }

    pub fn zoom(&self) -> Zoom {
        self.zoom
    }

    pub fn active_region(&self) -> Option<Region> {
        self.active
    }

    pub fn samples(&self) -> &SampleSet {
        &self.samples
    }

    pub fn has_image(&self) -> bool {
        self.source.is_some()
    }

    pub fn view(&self) -> Option<&DisplayView> {
        self.view.as_ref()
    }

    fn refresh_view(&mut self) {
        // nothing to show yet
        if let Some(source) = &self.source {
            self.view = Some(DisplayView::render(source, self.zoom, self.viewport));
        }
    }
}

/// Linear canvas-to-source scaling, truncated toward zero.
pub fn map_to_source(x: u32, y: u32, source: (u32, u32), viewport: (u32, u32)) -> (u32, u32) {
    let sx = x as u64 * source.0 as u64 / viewport.0 as u64;
    let sy = y as u64 * source.1 as u64 / viewport.1 as u64;
    (sx as u32, sy as u32)
}
