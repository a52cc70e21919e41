// Zoomed, center-cropped view of the still image.
// Visual: what the canvas shows after a snapshot. The canvas shrinks to the crop
// when the zoomed image is smaller than the viewport.

use crate::types::{FrameBuffer, Sample};
use crate::zoom::Zoom;
use image::RgbImage;
use image::imageops::{self, FilterType};

/// Sizes and offsets of one zoom + crop pass, all in zoomed-image pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewGeometry {
    pub zoomed_w: u32,
    pub zoomed_h: u32,
    pub crop_w: u32,
    pub crop_h: u32,
    pub offset_x: u32,
    pub offset_y: u32,
}

impl ViewGeometry {
    pub fn compute(src_w: u32, src_h: u32, zoom: Zoom, viewport: (u32, u32)) -> Self {
        // floor(), kept at least one pixel so the resize always has a target
        let zoomed_w = ((src_w as f64 * zoom.factor()).floor() as u32).max(1);
        let zoomed_h = ((src_h as f64 * zoom.factor()).floor() as u32).max(1);
        let crop_w = viewport.0.min(zoomed_w);
        let crop_h = viewport.1.min(zoomed_h);
        Self {
            zoomed_w,
            zoomed_h,
            crop_w,
            crop_h,
            offset_x: (zoomed_w - crop_w) / 2,
            offset_y: (zoomed_h - crop_h) / 2,
        }
    }
}

/// The pixels shown on the canvas for the current still + zoom.
pub struct DisplayView {
    pub geometry: ViewGeometry,
    pub image: RgbImage, // crop_w x crop_h
}

impl DisplayView {
    /// Resize with bilinear filtering, then cut the centered crop.
    pub fn render(source: &RgbImage, zoom: Zoom, viewport: (u32, u32)) -> Self {
        let (w, h) = source.dimensions();
        let g = ViewGeometry::compute(w, h, zoom, viewport);

        let image = if (g.zoomed_w, g.zoomed_h) == (w, h) {
            // zoom 1.0: skip the resample
            imageops::crop_imm(source, g.offset_x, g.offset_y, g.crop_w, g.crop_h).to_image()
        } else if g.zoomed_w > g.crop_w || g.zoomed_h > g.crop_h {
            render_window(source, &g)
        } else {
            // whole zoomed image fits the viewport
            imageops::resize(source, g.zoomed_w, g.zoomed_h, FilterType::Triangle)
        };

        Self { geometry: g, image }
    }

    /// Canvas size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.geometry.crop_w, self.geometry.crop_h)
    }
}

/// Source pixels kept around the crop so the filter sees its neighbours.
const FILTER_BORDER: u32 = 2;

/// Resample only the part of `source` the crop covers.
/// Cost follows the crop size, not the zoomed size.
fn render_window(source: &RgbImage, g: &ViewGeometry) -> RgbImage {
    let (w, h) = source.dimensions();
    let (x0, x1, ix, rw) = window_axis(w, g.zoomed_w, g.offset_x, g.crop_w);
    let (y0, y1, iy, rh) = window_axis(h, g.zoomed_h, g.offset_y, g.crop_h);

    let region = imageops::crop_imm(source, x0, y0, x1 - x0, y1 - y0).to_image();
    let resized = imageops::resize(&region, rw, rh, FilterType::Triangle);
    imageops::crop_imm(&resized, ix, iy, g.crop_w, g.crop_h).to_image()
}

/// One axis of `render_window`: the source span `[s0, s1)`, the crop start inside
/// the resampled span, and the resampled span length.
fn window_axis(src: u32, zoomed: u32, offset: u32, crop: u32) -> (u32, u32, u32, u32) {
    let k = zoomed as f64 / src as f64;
    let s0 = ((offset as f64 / k).floor() as u32).saturating_sub(FILTER_BORDER);
    let s1 = (((offset + crop) as f64 / k).ceil() as u32 + FILTER_BORDER).min(src);
    let span = (((s1 - s0) as f64 * k).ceil() as u32).max(crop);
    let inner = ((offset as f64 - s0 as f64 * k).round().max(0.0) as u32).min(span - crop);
    (s0, s1, inner, span)
}

/// Scale a frame to exactly `size` (the live preview always fills the viewport).
pub fn fit_to(frame: &RgbImage, size: (u32, u32)) -> RgbImage {
    if frame.dimensions() == size {
        return frame.clone();
    }
    imageops::resize(frame, size.0, size.1, FilterType::Triangle)
}

/// Pack an RGB image into 0x00RRGGBB pixels for the window.
pub fn to_framebuffer(img: &RgbImage) -> FrameBuffer {
    let (w, h) = img.dimensions();
    let pixels = img
        .pixels()
        .map(|p| Sample::from(*p).to_u32())
        .collect();
    FrameBuffer { width: w as usize, height: h as usize, pixels }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    const VIEWPORT: (u32, u32) = (640, 480);

    fn zoom_at_floor() -> Zoom {
        let mut z = Zoom::default();
        for _ in 0..20 {
            z.zoom_out();
        }
        z
    }

    #[test]
    fn full_size_source_is_center_cropped() {
        let g = ViewGeometry::compute(1280, 960, Zoom::default(), VIEWPORT);
        assert_eq!((g.zoomed_w, g.zoomed_h), (1280, 960));
        assert_eq!((g.crop_w, g.crop_h), (640, 480));
        assert_eq!((g.offset_x, g.offset_y), (320, 240));
    }

    #[test]
    fn smallest_zoom_needs_no_crop() {
        let g = ViewGeometry::compute(1280, 960, zoom_at_floor(), VIEWPORT);
        assert_eq!((g.zoomed_w, g.zoomed_h), (128, 96));
        assert_eq!((g.crop_w, g.crop_h), (128, 96));
        assert_eq!((g.offset_x, g.offset_y), (0, 0));
    }

    #[test]
    fn crop_never_exceeds_viewport_or_zoomed_image() {
        let mut z = zoom_at_floor();
        for _ in 0..40 {
            for &(w, h) in &[(1280, 960), (640, 480), (320, 900), (7, 3), (1, 1)] {
                let g = ViewGeometry::compute(w, h, z, VIEWPORT);
                assert!(g.crop_w <= 640 && g.crop_h <= 480);
                assert!(g.crop_w <= g.zoomed_w && g.crop_h <= g.zoomed_h);
                assert!(g.offset_x + g.crop_w <= g.zoomed_w);
                assert!(g.offset_y + g.crop_h <= g.zoomed_h);
                assert!(g.crop_w >= 1 && g.crop_h >= 1);
            }
            z.zoom_in();
        }
    }

    #[test]
    fn render_at_unit_zoom_crops_the_center_pixels() {
        let src = RgbImage::from_fn(1280, 960, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 7]));
        let view = DisplayView::render(&src, Zoom::default(), VIEWPORT);
        assert_eq!(view.size(), (640, 480));
        assert_eq!(view.image.dimensions(), (640, 480));
        // (0,0) of the crop is (320,240) of the source
        assert_eq!(*view.image.get_pixel(0, 0), *src.get_pixel(320, 240));
    }

    #[test]
    fn render_of_small_zoom_matches_reported_size() {
        let src = RgbImage::from_pixel(1280, 960, Rgb([40, 80, 120]));
        let view = DisplayView::render(&src, zoom_at_floor(), VIEWPORT);
        assert_eq!(view.size(), (128, 96));
        assert_eq!(view.image.dimensions(), (128, 96));
        // a flat image stays flat through bilinear resampling
        assert_eq!(*view.image.get_pixel(64, 48), Rgb([40, 80, 120]));
    }

    fn gradient(w: u32, h: u32) -> RgbImage {
        RgbImage::from_fn(w, h, |x, y| {
            Rgb([(x * 255 / (w - 1)) as u8, (y * 255 / (h - 1)) as u8, 90])
        })
    }

    #[test]
    fn deep_zoom_only_resamples_the_crop() {
        let src = gradient(640, 480);
        let mut z = Zoom::default();
        for _ in 0..200 {
            z.zoom_in();
        }
        assert!(z.factor() > 20.0);
        let view = DisplayView::render(&src, z, VIEWPORT);
        assert_eq!(view.size(), (640, 480));
        assert_eq!(view.image.dimensions(), (640, 480));
        // center of the view is the center of the source
        let c = view.image.get_pixel(320, 240);
        let s = src.get_pixel(320, 240);
        for ch in 0..3 {
            assert!((c[ch] as i32 - s[ch] as i32).abs() <= 2, "{c:?} vs {s:?}");
        }
    }

    #[test]
    fn windowed_render_matches_full_resize() {
        let src = gradient(400, 300);
        let mut z = Zoom::default();
        for _ in 0..10 {
            z.zoom_in();
        }
        let view = DisplayView::render(&src, z, VIEWPORT);
        let g = view.geometry;
        assert!(g.zoomed_w > g.crop_w);

        let full = imageops::resize(&src, g.zoomed_w, g.zoomed_h, FilterType::Triangle);
        for &(x, y) in &[(320, 240), (10, 10), (630, 470)] {
            let a = view.image.get_pixel(x, y);
            let b = full.get_pixel(g.offset_x + x, g.offset_y + y);
            for ch in 0..3 {
                assert!((a[ch] as i32 - b[ch] as i32).abs() <= 2, "({x},{y}): {a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn window_axis_stays_inside_source() {
        for &(src, zoomed, crop) in &[(640, 12800, 640), (400, 800, 640), (1280, 1152, 640), (7, 700, 480)] {
            let offset = (zoomed - crop) / 2;
            let (s0, s1, inner, span) = window_axis(src, zoomed, offset, crop);
            assert!(s0 < s1 && s1 <= src);
            assert!(inner + crop <= span);
        }
    }

    #[test]
    fn framebuffer_packing() {
        let img = RgbImage::from_pixel(2, 1, Rgb([0xaa, 0xbb, 0xcc]));
        let fb = to_framebuffer(&img);
        assert_eq!((fb.width, fb.height), (2, 1));
        assert_eq!(fb.pixels, vec![0x00aa_bbcc, 0x00aa_bbcc]);
    }

    #[test]
    fn fit_to_scales_to_viewport() {
        let img = RgbImage::from_pixel(320, 240, Rgb([1, 2, 3]));
        assert_eq!(fit_to(&img, VIEWPORT).dimensions(), VIEWPORT);
    }
}
