// App state machine: camera preview (idle/previewing) on top of the sampler.
// Every user action arrives as a `Command`; the main loop calls `tick()` once per frame.

use crate::camera::{CameraDevice, FrameSource};
use crate::error::Error;
use crate::sampler::Sampler;
use crate::types::{Region, Sample};
use crate::view::DisplayView;
use image::RgbImage;

/// Everything the user can ask for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    SelectRegion(Region),
    StartPreview,
    TakeSnapshot,
    Click { x: u32, y: u32 }, // canvas coordinates
    ZoomIn,
    ZoomOut,
}

enum Preview<S> {
    Idle,
    Running {
        stream: S,                    // holds the device; dropped when leaving this state
        current: Option<RgbImage>,    // last frame read, the one a snapshot keeps
    },
}

/// What the canvas should show this frame.
pub enum Canvas<'a> {
    Empty,
    Live(&'a RgbImage),
    Still(&'a DisplayView),
}

pub struct App<D: CameraDevice> {
    device: D,
    preview: Preview<D::Stream>,
    sampler: Sampler,
}

impl<D: CameraDevice> App<D> {
    pub fn new(device: D, viewport: (u32, u32)) -> Self {
        Self { device, preview: Preview::Idle, sampler: Sampler::new(viewport) }
    }

    /// Apply one command. Only `StartPreview` can fail (camera did not open);
    /// the state is left untouched in that case.
    pub fn dispatch(&mut self, cmd: Command) -> Result<Option<Sample>, Error> {
        match cmd {
            Command::SelectRegion(region) => self.sampler.select_region(region),
            Command::StartPreview => self.start_preview()?,
            Command::TakeSnapshot => self.take_snapshot(),
            Command::Click { x, y } => return Ok(self.sampler.register_click(x, y)),
            Command::ZoomIn => self.sampler.zoom_in(),
            Command::ZoomOut => self.sampler.zoom_out(),
        }
        Ok(None)
    }

    fn start_preview(&mut self) -> Result<(), Error> {
        if self.is_previewing() {
            return Ok(());
        }
        let stream = self.device.open()?;
        self.preview = Preview::Running { stream, current: None };
        Ok(())
    }

    /// Freeze the last live frame. No-op unless a frame has arrived.
    fn take_snapshot(&mut self) {
        let frame = match &mut self.preview {
            Preview::Running { current, .. } => current.take(),
            Preview::Idle => None,
        };
        let Some(frame) = frame else { return };

        // Dropping the stream releases the camera.
        self.preview = Preview::Idle;
        self.sampler.take_snapshot(frame);
    }

    /// One preview step: read a frame if previewing. A failed read is skipped.
    /// Returns true when a new frame arrived.
    pub fn tick(&mut self) -> bool {
        let Preview::Running { stream, current } = &mut self.preview else {
            return false;
        };
        match stream.next_frame() {
            Ok(frame) => {
                *current = Some(frame);
                true
            }
            Err(e) => {
                log::debug!("Skipping frame: {e}");
                false
            }
        }
    }

    pub fn is_previewing(&self) -> bool {
        matches!(self.preview, Preview::Running { .. })
    }

    pub fn canvas(&self) -> Canvas<'_> {
        match &self.preview {
            Preview::Running { current: Some(frame), .. } => Canvas::Live(frame),
            // previewing but no frame yet: keep whatever still we have
            _ => match self.sampler.view() {
                Some(view) => Canvas::Still(view),
                None => Canvas::Empty,
            },
        }
    }

    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    const VIEWPORT: (u32, u32) = (640, 480);

    // Scripted stream: pops one result per read. Records when it is dropped.
    struct FakeStream {
        frames: VecDeque<Result<RgbImage, Error>>,
        released: Rc<RefCell<u32>>,
    }

    impl FrameSource for FakeStream {
        fn next_frame(&mut self) -> Result<RgbImage, Error> {
            self.frames
                .pop_front()
                .unwrap_or_else(|| Err(Error::CameraFrame("no more frames".into())))
        }
    }

    impl Drop for FakeStream {
        fn drop(&mut self) {
            *self.released.borrow_mut() += 1;
        }
    }

    struct FakeDevice {
        available: bool,
        script: Vec<Result<RgbImage, Error>>,
        opened: u32,
        released: Rc<RefCell<u32>>,
    }

    impl FakeDevice {
        fn new(script: Vec<Result<RgbImage, Error>>) -> Self {
            Self { available: true, script, opened: 0, released: Rc::new(RefCell::new(0)) }
        }

        fn missing() -> Self {
            Self { available: false, ..Self::new(Vec::new()) }
        }
    }

    impl CameraDevice for FakeDevice {
        type Stream = FakeStream;

        fn open(&mut self) -> Result<FakeStream, Error> {
            if !self.available {
                return Err(Error::CameraInit("no device".into()));
            }
            self.opened += 1;
            Ok(FakeStream {
                frames: std::mem::take(&mut self.script).into(),
                released: Rc::clone(&self.released),
            })
        }
    }

    fn flat(w: u32, h: u32, c: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(w, h, Rgb(c))
    }

    #[test]
    fn failed_open_leaves_app_idle() {
        let mut app = App::new(FakeDevice::missing(), VIEWPORT);
        let err = app.dispatch(Command::StartPreview).unwrap_err();
        assert!(matches!(err, Error::CameraInit(_)));
        assert!(!app.is_previewing());
        assert!(matches!(app.canvas(), Canvas::Empty));
    }

    #[test]
    fn start_preview_twice_opens_once() {
        let mut app = App::new(FakeDevice::new(vec![]), VIEWPORT);
        app.dispatch(Command::StartPreview).unwrap();
        app.dispatch(Command::StartPreview).unwrap();
        assert!(app.is_previewing());
        assert_eq!(app.device.opened, 1);
    }

    #[test]
    fn failed_reads_keep_previewing() {
        let script = vec![
            Err(Error::CameraFrame("glitch".into())),
            Ok(flat(640, 480, [1, 2, 3])),
            Err(Error::CameraFrame("glitch".into())),
        ];
        let mut app = App::new(FakeDevice::new(script), VIEWPORT);
        app.dispatch(Command::StartPreview).unwrap();

        assert!(!app.tick());
        assert!(app.is_previewing());
        assert!(app.tick());
        assert!(matches!(app.canvas(), Canvas::Live(_)));
        assert!(!app.tick());
        // the failed read did not throw away the last good frame
        assert!(matches!(app.canvas(), Canvas::Live(_)));
    }

    #[test]
    fn snapshot_without_frame_is_a_no_op() {
        let mut app = App::new(FakeDevice::new(vec![]), VIEWPORT);
        app.dispatch(Command::TakeSnapshot).unwrap();
        assert!(!app.sampler().has_image());

        app.dispatch(Command::StartPreview).unwrap();
        app.dispatch(Command::TakeSnapshot).unwrap();
        assert!(app.is_previewing());
        assert!(!app.sampler().has_image());
        assert_eq!(*app.device.released.borrow(), 0);
    }

    #[test]
    fn snapshot_freezes_last_frame_and_releases_camera() {
        let script = vec![Ok(flat(640, 480, [10, 10, 10])), Ok(flat(640, 480, [20, 30, 40]))];
        let mut app = App::new(FakeDevice::new(script), VIEWPORT);
        app.dispatch(Command::StartPreview).unwrap();
        app.tick();
        app.tick();
        app.dispatch(Command::TakeSnapshot).unwrap();

        assert!(!app.is_previewing());
        assert_eq!(*app.device.released.borrow(), 1);
        assert!(!app.tick());

        app.dispatch(Command::SelectRegion(Region::Face)).unwrap();
        let sample = app.dispatch(Command::Click { x: 100, y: 100 }).unwrap();
        assert_eq!(sample, Some(Sample::new(20, 30, 40)));
        assert!(matches!(app.canvas(), Canvas::Still(_)));
    }

    #[test]
    fn new_snapshot_replaces_the_image() {
        let mut app = App::new(FakeDevice::new(vec![Ok(flat(640, 480, [1, 1, 1]))]), VIEWPORT);
        app.dispatch(Command::StartPreview).unwrap();
        app.tick();
        app.dispatch(Command::TakeSnapshot).unwrap();

        app.device.script = vec![Ok(flat(640, 480, [9, 9, 9]))];
        app.dispatch(Command::StartPreview).unwrap();
        app.tick();
        app.dispatch(Command::TakeSnapshot).unwrap();
        assert_eq!(*app.device.released.borrow(), 2);

        app.dispatch(Command::SelectRegion(Region::Hair)).unwrap();
        let sample = app.dispatch(Command::Click { x: 0, y: 0 }).unwrap();
        assert_eq!(sample, Some(Sample::new(9, 9, 9)));
    }

    #[test]
    fn zoom_commands_reach_the_sampler() {
        let mut app = App::new(FakeDevice::new(vec![]), VIEWPORT);
        app.dispatch(Command::ZoomIn).unwrap();
        app.dispatch(Command::ZoomIn).unwrap();
        app.dispatch(Command::ZoomOut).unwrap();
        assert!((app.sampler().zoom().factor() - 1.1).abs() < 1e-9);
    }
}
