// SPDX-License-Identifier: MPL-2.0

//! Host capability interfaces and their desktop implementations
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │  Host event loop    │
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │  CaptureController  │  ← Permission precondition, token matching
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌──────────────────────────────────────────────────┐
//! │ PermissionAuthority · CaptureFacility · Consumer │  ← Traits
//! └──────────┬───────────────────────────────────────┘
//!            │
//!            ▼
//!   ┌──────┐ ┌───────────┐ ┌──────────────┐
//!   │ V4L2 │ │ rfd       │ │ log / open / │
//!   │      │ │ picker    │ │ channel      │
//!   └──────┘ └───────────┘ └──────────────┘
//! ```
//!
//! Facilities never call back into the controller directly. They post a
//! [`HostEvent`](crate::host::HostEvent) and the host loop dispatches it.

pub mod consumer;
pub mod notifier;
pub mod picker;
pub mod v4l2;

pub use consumer::{ChannelConsumer, LoggingConsumer, OpenConsumer};
pub use notifier::TerminalNotifier;
pub use picker::FilePicker;
pub use v4l2::{V4l2Camera, V4l2PermissionAuthority};

use crate::capture::{CaptureKind, ImageHandle, Notice, PermissionKind, PermissionState, RequestToken};

/// Grants or refuses access to guarded resources
pub trait PermissionAuthority {
    /// Current state, queried on demand
    fn check_permission(&self, kind: PermissionKind) -> PermissionState;

    /// Ask for access. The answer arrives later as a permission result
    /// carrying `token`.
    fn request_permission(&mut self, kind: PermissionKind, token: RequestToken);
}

/// Produces images by camera capture or by picking from storage
pub trait CaptureFacility {
    /// Start the action. The outcome arrives later as a capture result
    /// carrying `token`.
    fn launch(&mut self, kind: CaptureKind, token: RequestToken);
}

/// Receives every successfully produced image handle
pub trait ImageConsumer {
    fn consume(&mut self, image: ImageHandle);
}

/// User-visible notices
pub trait Notifier {
    fn notify(&mut self, notice: Notice);
}

impl<F: FnMut(ImageHandle)> ImageConsumer for F {
    fn consume(&mut self, image: ImageHandle) {
        (*self)(image)
    }
}

/// Routes camera captures and gallery picks to separate facilities
pub struct DesktopFacility {
    camera: Box<dyn CaptureFacility>,
    picker: Box<dyn CaptureFacility>,
}

impl DesktopFacility {
    /// # Arguments
    /// * `camera` - Camera facility
    /// * `picker` - Gallery picker
    pub fn new(camera: Box<dyn CaptureFacility>, picker: Box<dyn CaptureFacility>) -> Self {
        Self { camera, picker }
    }
}

impl CaptureFacility for DesktopFacility {
    fn launch(&mut self, kind: CaptureKind, token: RequestToken) {
        match kind {
            CaptureKind::CameraCapture => self.camera.launch(kind, token),
            CaptureKind::GalleryPick => self.picker.launch(kind, token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder(Rc<RefCell<Vec<(CaptureKind, RequestToken)>>>);

    impl CaptureFacility for Recorder {
        fn launch(&mut self, kind: CaptureKind, token: RequestToken) {
            self.0.borrow_mut().push((kind, token));
        }
    }

    #[test]
    fn test_routes_by_kind() {
        let cameras = Rc::new(RefCell::new(Vec::new()));
        let pickers = Rc::new(RefCell::new(Vec::new()));
        let mut facility = DesktopFacility::new(
            Box::new(Recorder(Rc::clone(&cameras))),
            Box::new(Recorder(Rc::clone(&pickers))),
        );

        facility.launch(CaptureKind::CameraCapture, RequestToken(101));
        facility.launch(CaptureKind::GalleryPick, RequestToken(102));

        assert_eq!(
            *cameras.borrow(),
            vec![(CaptureKind::CameraCapture, RequestToken(101))]
        );
        assert_eq!(
            *pickers.borrow(),
            vec![(CaptureKind::GalleryPick, RequestToken(102))]
        );
    }

    #[test]
    fn test_closure_consumer() {
        let mut seen = Vec::new();
        {
            let mut consumer = |image: ImageHandle| seen.push(image);
            consumer.consume(ImageHandle::from_uri("file:///a.jpg"));
        }
        assert_eq!(seen.len(), 1);
    }
}
