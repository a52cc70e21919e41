// What you SEE:
// • A toolbar: Hair / Eyes / Face / Mouth pick the region, Start preview opens the
//   webcam, Snapshot freezes the current frame.
// • Click the still image to sample a pixel into the active region; the bar for
//   that region fills with the average color so far.
// • + / - or the mouse wheel zoom the still. 1-4, P and SPACE are shortcuts. ESC quits.

mod app;
mod camera;
mod config;
mod draw;
mod error;
mod notify;
mod samples;
mod sampler;
mod types;
mod ui;
mod view;
mod zoom;

use app::App;
use camera::Webcam;
use config::Config;
use draw::{Drawer, BACKGROUND};
use error::Error;
use types::FrameBuffer;
use ui::Layout;

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::default();
    let layout = Layout::new(&config);

    /* --- Window + app state ---
       Visual: window opens with an empty canvas; the camera stays closed until asked. */
    let mut drawer = Drawer::new("Color Box", layout.width, layout.height, config.target_fps())?;
    let mut app = App::new(
        Webcam::from_config(&config),
        (config.viewport_width, config.viewport_height),
    );
    let mut screen = FrameBuffer::new(layout.width, layout.height, BACKGROUND);

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        /* 1) Inputs -> commands. A camera that will not open is reported and ignored. */
        let canvas = draw::canvas_size(&app, &layout);
        for cmd in drawer.poll(&layout, canvas) {
            if let Err(e) = app.dispatch(cmd) {
                log::error!("{e}");
                notify::show_error(&e);
            }
        }

        /* 2) One preview step (no-op unless the camera is live). */
        app.tick();

        /* 3) Draw and present; the window's frame limiter paces the loop. */
        draw::render(&mut screen, &layout, &app);
        drawer.present(&screen)?;
    }

    Ok(())
}
