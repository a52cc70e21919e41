// Camera access behind two small traits, plus the nokhwa-backed implementation.
// Visual expectation: while previewing, each `next_frame()` gives one RGB image
// that the canvas shows; the snapshot keeps the last one.

use crate::config::Config;
use crate::error::Error;

// Bring in nokhwa types for camera control.
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};

use image::RgbImage;

/// An open stream of frames. Dropping it releases the device.
pub trait FrameSource {
    /// Next frame in RGB channel order.
    fn next_frame(&mut self) -> Result<RgbImage, Error>;
}

/// Something that can open a camera stream.
pub trait CameraDevice {
    type Stream: FrameSource;

    fn open(&mut self) -> Result<Self::Stream, Error>;
}

/// The webcam selected by `Config::camera_index`.
pub struct Webcam {
    index: u32,
    width: u32,
    height: u32,
    fps: u32,
}

impl Webcam {
    pub fn from_config(config: &Config) -> Self {
        Self {
            index: config.camera_index,
            width: config.capture_width,
            height: config.capture_height,
            fps: config.capture_fps,
        }
    }
}

impl CameraDevice for Webcam {
    type Stream = CameraCapture;

    fn open(&mut self) -> Result<CameraCapture, Error> {
        CameraCapture::new(self.index, self.width, self.height, self.fps)
    }
}

// A small wrapper around nokhwa::Camera so the app only sees RGB images.
pub struct CameraCapture {
    cam: Camera,
}

impl CameraCapture {
    /// Open the camera at `index` near the requested resolution (falls back if not exact).
    pub fn new(index: u32, width: u32, height: u32, fps: u32) -> Result<Self, Error> {
        let idx = CameraIndex::Index(index);

        let fmt = CameraFormat::new(
            Resolution::new(width, height),
            FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
            fps,
        );

        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        // Fails when no device exists at this index.
        let mut cam = Camera::new(idx, req)
            .map_err(|e| Error::CameraInit(format!("Create camera: {e}")))?;

        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

        // The stream might choose a slightly different resolution.
        let actual = cam.resolution();
        log::info!("Camera {index} streaming at {}x{}", actual.width(), actual.height());

        Ok(Self { cam })
    }
}

impl FrameSource for CameraCapture {
    fn next_frame(&mut self) -> Result<RgbImage, Error> {
        // Blocks until a new frame is ready.
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;

        // Whatever the device sends (YUYV, MJPEG, ...) comes out as RGB here.
        frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))
    }
}

impl Drop for CameraCapture {
    fn drop(&mut self) {
        if let Err(e) = self.cam.stop_stream() {
            log::warn!("Camera release failed: {e}");
        } else {
            log::info!("Camera released");
        }
    }
}
