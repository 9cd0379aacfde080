// SPDX-License-Identifier: MPL-2.0

//! Capture controller
//!
//! Mediates between the capture/pick buttons and the host facilities:
//!
//! ```text
//! capture pressed ──► permission? ──granted──► launch(CameraCapture, token)
//!                         │
//!                         └─otherwise─► request_permission(token)
//!                                            │
//!                    on_permission_result ◄──┘  granted → launch once
//!                                               denied  → notice, abandon
//!
//! pick pressed ─────────────────────────────► launch(GalleryPick, token)
//!
//! on_capture_result(token) ──► succeeded + image → consumer.consume(image)
//!                              otherwise         → back to Idle
//! ```
//!
//! Every result is matched by correlation token. A token that does not belong
//! to an outstanding request is ignored.

use super::request::{self, Completion, RequestHandle};
use super::tokens::{TokenAllocator, TokenChannel};
use super::types::{
    CaptureKind, ImageHandle, Notice, PermissionKind, PermissionState, RequestState, RequestToken,
};
use crate::backends::{CaptureFacility, ImageConsumer, Notifier, PermissionAuthority};
use crate::errors::CaptureError;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Request handed to the capture facility
#[derive(Debug)]
struct PendingCapture {
    token: RequestToken,
    completion: Completion,
}

/// Camera capture deferred until the permission dialog answers
#[derive(Debug)]
struct PendingPermission {
    token: RequestToken,
    completion: Completion,
}

/// Routes user intent to the host facilities and results to the consumer
pub struct CaptureController {
    authority: Box<dyn PermissionAuthority>,
    facility: Box<dyn CaptureFacility>,
    consumer: Box<dyn ImageConsumer>,
    notifier: Box<dyn Notifier>,
    tokens: TokenAllocator,
    /// Last answer from a permission result callback
    permission: PermissionState,
    pending_permission: Option<PendingPermission>,
    pending: HashMap<CaptureKind, PendingCapture>,
}

impl CaptureController {
    pub fn new(
        authority: Box<dyn PermissionAuthority>,
        facility: Box<dyn CaptureFacility>,
        consumer: Box<dyn ImageConsumer>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            authority,
            facility,
            consumer,
            notifier,
            tokens: TokenAllocator::new(),
            permission: PermissionState::Unknown,
            pending_permission: None,
            pending: HashMap::new(),
        }
    }

    // ===== UI entry points =====

    /// Take a photo, asking for camera permission first if needed
    pub fn on_capture_button_pressed(&mut self) -> RequestHandle {
        let (handle, completion) = request::channel(CaptureKind::CameraCapture);

        // A stale permission answer must not launch the camera again
        if let Some(previous) = self.pending_permission.take() {
            debug!(token = %previous.token, "Superseding pending permission request");
            previous.completion.resolve(Err(CaptureError::Superseded));
        }

        match self.authority.check_permission(PermissionKind::Camera) {
            PermissionState::Granted => self.launch(CaptureKind::CameraCapture, completion),
            state => {
                let token = self.tokens.allocate(TokenChannel::CameraPermission);
                info!(%token, %state, "Requesting camera permission");
                self.pending_permission = Some(PendingPermission { token, completion });
                self.authority
                    .request_permission(PermissionKind::Camera, token);
            }
        }

        handle
    }

    /// Pick an existing image. Camera permission is not involved.
    pub fn on_pick_button_pressed(&mut self) -> RequestHandle {
        let (handle, completion) = request::channel(CaptureKind::GalleryPick);
        self.launch(CaptureKind::GalleryPick, completion);
        handle
    }

    // ===== Host callbacks =====

    /// Answer to a permission request
    pub fn on_permission_result(&mut self, token: RequestToken, granted: bool) {
        let matches = self
            .pending_permission
            .as_ref()
            .is_some_and(|pending| pending.token == token);
        if !matches {
            debug!(%token, "Ignoring permission result for unknown token");
            return;
        }
        let Some(pending) = self.pending_permission.take() else {
            return;
        };

        self.permission = if granted {
            PermissionState::Granted
        } else {
            PermissionState::Denied
        };

        if pending.completion.is_cancelled() {
            debug!(%token, "Permission answered for a cancelled request");
            return;
        }

        if granted {
            info!(%token, "Camera permission granted");
            self.launch(CaptureKind::CameraCapture, pending.completion);
        } else {
            warn!(%token, "Camera permission denied, abandoning capture");
            self.notifier.notify(Notice::PermissionDenied);
            pending
                .completion
                .resolve(Err(CaptureError::PermissionDenied));
        }
    }

    /// Outcome of a camera capture or gallery pick
    pub fn on_capture_result(
        &mut self,
        token: RequestToken,
        succeeded: bool,
        image: Option<ImageHandle>,
    ) {
        let Some(kind) = self.kind_for_token(token) else {
            debug!(%token, "Ignoring capture result for unknown token");
            return;
        };
        let Some(pending) = self.pending.remove(&kind) else {
            return;
        };

        if pending.completion.is_cancelled() {
            debug!(%token, ?kind, "Result arrived for a cancelled request");
            return;
        }

        match image.filter(|_| succeeded) {
            Some(image) => {
                info!(%token, ?kind, %image, "Forwarding image to consumer");
                self.consumer.consume(image.clone());
                pending.completion.resolve(Ok(image));
            }
            None => {
                warn!(%token, ?kind, succeeded, "Capture cancelled or failed");
                pending
                    .completion
                    .resolve(Err(CaptureError::CancelledOrFailed));
            }
        }
    }

    // ===== Lifecycle =====

    /// Cancel every outstanding request.
    ///
    /// Called from the hosting screen's teardown path. Results that arrive
    /// afterwards match nothing and are ignored.
    pub fn teardown(&mut self) {
        let outstanding = self.pending.len() + usize::from(self.pending_permission.is_some());
        if outstanding > 0 {
            info!(outstanding, "Cancelling outstanding requests");
        }

        if let Some(pending) = self.pending_permission.take() {
            pending.completion.mark_cancelled();
            pending.completion.resolve(Err(CaptureError::Cancelled));
        }
        for (_, pending) in self.pending.drain() {
            pending.completion.mark_cancelled();
            pending.completion.resolve(Err(CaptureError::Cancelled));
        }
    }

    // ===== Queries =====

    /// Permission as last reported by a result callback
    pub fn permission_state(&self) -> PermissionState {
        self.permission
    }

    /// Permission as the authority reports it right now
    pub fn current_permission(&self) -> PermissionState {
        self.authority.check_permission(PermissionKind::Camera)
    }

    pub fn request_state(&self, kind: CaptureKind) -> RequestState {
        let waiting_on_permission = kind == CaptureKind::CameraCapture && self.awaiting_permission();
        let launched = self
            .pending
            .get(&kind)
            .is_some_and(|pending| !pending.completion.is_cancelled());

        if waiting_on_permission || launched {
            RequestState::Requested
        } else {
            RequestState::Idle
        }
    }

    /// Whether a camera capture is waiting on the permission dialog
    pub fn awaiting_permission(&self) -> bool {
        self.pending_permission
            .as_ref()
            .is_some_and(|pending| !pending.completion.is_cancelled())
    }

    /// Token of the outstanding request of `kind`, if any
    pub fn pending_token(&self, kind: CaptureKind) -> Option<RequestToken> {
        self.pending.get(&kind).map(|pending| pending.token)
    }

    /// Token of the outstanding permission request, if any
    pub fn pending_permission_token(&self) -> Option<RequestToken> {
        self.pending_permission.as_ref().map(|pending| pending.token)
    }

    // ===== Internals =====

    fn launch(&mut self, kind: CaptureKind, completion: Completion) {
        if let Some(previous) = self.pending.remove(&kind) {
            debug!(token = %previous.token, ?kind, "Superseding pending request");
            previous.completion.resolve(Err(CaptureError::Superseded));
        }

        let token = self.tokens.allocate(TokenChannel::Capture(kind));
        info!(%token, ?kind, "Launching capture facility");
        self.pending.insert(kind, PendingCapture { token, completion });
        self.facility.launch(kind, token);
    }

    fn kind_for_token(&self, token: RequestToken) -> Option<CaptureKind> {
        let TokenChannel::Capture(kind) = TokenChannel::of(token)? else {
            return None;
        };
        self.pending
            .get(&kind)
            .filter(|pending| pending.token == token)
            .map(|_| kind)
    }
}

impl std::fmt::Debug for CaptureController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureController")
            .field("permission", &self.permission)
            .field("pending_permission", &self.pending_permission_token())
            .field("camera", &self.pending_token(CaptureKind::CameraCapture))
            .field("gallery", &self.pending_token(CaptureKind::GalleryPick))
            .finish()
    }
}
