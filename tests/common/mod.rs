// SPDX-License-Identifier: MPL-2.0

//! Recording facilities shared by the integration tests

#![allow(dead_code)]

use ocr_capture::CaptureController;
use ocr_capture::backends::{CaptureFacility, ImageConsumer, Notifier, PermissionAuthority};
use ocr_capture::capture::{CaptureKind, ImageHandle, Notice, PermissionKind, PermissionState, RequestToken};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Everything the controller asked of its collaborators
#[derive(Default)]
pub struct Recorder {
    pub permission: Cell<PermissionState>,
    pub permission_requests: RefCell<Vec<RequestToken>>,
    pub launches: RefCell<Vec<(CaptureKind, RequestToken)>>,
    pub consumed: RefCell<Vec<ImageHandle>>,
    pub notices: RefCell<Vec<Notice>>,
}

impl Recorder {
    pub fn launches_of(&self, kind: CaptureKind) -> Vec<RequestToken> {
        self.launches
            .borrow()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, token)| *token)
            .collect()
    }

    pub fn last_launch(&self, kind: CaptureKind) -> Option<RequestToken> {
        self.launches_of(kind).last().copied()
    }

    pub fn last_permission_request(&self) -> Option<RequestToken> {
        self.permission_requests.borrow().last().copied()
    }
}

struct Authority(Rc<Recorder>);
struct Facility(Rc<Recorder>);
struct Consumer(Rc<Recorder>);
struct Notices(Rc<Recorder>);

impl PermissionAuthority for Authority {
    fn check_permission(&self, _kind: PermissionKind) -> PermissionState {
        self.0.permission.get()
    }

    fn request_permission(&mut self, _kind: PermissionKind, token: RequestToken) {
        self.0.permission_requests.borrow_mut().push(token);
    }
}

impl CaptureFacility for Facility {
    fn launch(&mut self, kind: CaptureKind, token: RequestToken) {
        self.0.launches.borrow_mut().push((kind, token));
    }
}

impl ImageConsumer for Consumer {
    fn consume(&mut self, image: ImageHandle) {
        self.0.consumed.borrow_mut().push(image);
    }
}

impl Notifier for Notices {
    fn notify(&mut self, notice: Notice) {
        self.0.notices.borrow_mut().push(notice);
    }
}

/// Controller whose authority reports `permission`
pub fn recorded_controller(permission: PermissionState) -> (CaptureController, Rc<Recorder>) {
    let recorder = Rc::new(Recorder::default());
    recorder.permission.set(permission);
    let controller = CaptureController::new(
        Box::new(Authority(Rc::clone(&recorder))),
        Box::new(Facility(Rc::clone(&recorder))),
        Box::new(Consumer(Rc::clone(&recorder))),
        Box::new(Notices(Rc::clone(&recorder))),
    );
    (controller, recorder)
}

pub fn photo(name: &str) -> ImageHandle {
    ImageHandle::from_uri(format!("file:///tmp/captures/{}", name))
}
