// Blocking error dialog. Visual: a native message box the user has to dismiss.

use crate::error::Error;
use rfd::{MessageButtons, MessageDialog, MessageLevel};

pub fn show_error(err: &Error) {
    let description = match err {
        Error::CameraInit(_) => format!("Cannot open the camera.\n\n{err}"),
        _ => err.to_string(),
    };
    MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title("Error")
        .set_description(description)
        .set_buttons(MessageButtons::Ok)
        .show();
}
