// SPDX-License-Identifier: GPL-3.0-only

//! Gallery pick through the native file dialog

use crate::backends::CaptureFacility;
use crate::capture::{CaptureKind, ImageHandle, RequestToken};
use crate::host::{EventSender, HostEvent, post};
use crate::storage::has_image_extension;
use std::path::PathBuf;
use tracing::{info, warn};

pub struct FilePicker {
    extensions: Vec<String>,
    start_dir: Option<PathBuf>,
    events: EventSender,
}

impl FilePicker {
    pub fn new(extensions: Vec<String>, events: EventSender) -> Self {
        Self {
            extensions,
            start_dir: dirs::picture_dir(),
            events,
        }
    }

    /// Open the dialog in `dir` instead of the pictures folder
    pub fn with_start_dir(mut self, dir: PathBuf) -> Self {
        self.start_dir = Some(dir);
        self
    }
}

impl CaptureFacility for FilePicker {
    fn launch(&mut self, kind: CaptureKind, token: RequestToken) {
        if kind != CaptureKind::GalleryPick {
            warn!(%token, ?kind, "Picker asked to perform a non-pick request");
            post(&self.events, HostEvent::capture_failed(token));
            return;
        }

        let extensions = self.extensions.clone();
        let start_dir = self.start_dir.clone();
        let events = self.events.clone();

        // The dialog blocks until the user answers
        std::thread::spawn(move || {
            let mut dialog = rfd::FileDialog::new()
                .set_title("Select an image")
                .add_filter("Images", extensions.as_slice());
            if let Some(dir) = start_dir {
                dialog = dialog.set_directory(dir);
            }

            let event = match dialog.pick_file() {
                Some(path) => match validate_pick(path, &extensions) {
                    Some(path) => {
                        info!(%token, path = %path.display(), "Photo selected");
                        HostEvent::captured(token, ImageHandle::from_path(&path))
                    }
                    None => HostEvent::capture_failed(token),
                },
                None => {
                    info!(%token, "No photo selected");
                    HostEvent::capture_failed(token)
                }
            };
            post(&events, event);
        });
    }
}

/// Accept only existing files with an allowed image extension
fn validate_pick(path: PathBuf, extensions: &[String]) -> Option<PathBuf> {
    if !path.is_file() {
        warn!(path = %path.display(), "Selection is not a file");
        return None;
    }
    if !has_image_extension(&path, extensions) {
        warn!(path = %path.display(), "Selection is not a supported image");
        return None;
    }
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extensions() -> Vec<String> {
        vec!["jpg".to_string(), "png".to_string()]
    }

    #[test]
    fn test_validate_pick_accepts_images() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("card.png");
        std::fs::write(&path, b"png").unwrap();
        assert_eq!(validate_pick(path.clone(), &extensions()), Some(path));
    }

    #[test]
    fn test_validate_pick_rejects_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("notes.txt");
        std::fs::write(&text, b"txt").unwrap();
        assert_eq!(validate_pick(text, &extensions()), None);
        assert_eq!(validate_pick(dir.path().to_path_buf(), &extensions()), None);
    }

    #[test]
    fn test_rejects_camera_requests() {
        let (events, mut rx) = crate::host::event_channel();
        let mut picker = FilePicker::new(extensions(), events);

        picker.launch(CaptureKind::CameraCapture, RequestToken(101));

        assert_eq!(
            rx.try_recv().ok(),
            Some(HostEvent::capture_failed(RequestToken(101)))
        );
    }
}
