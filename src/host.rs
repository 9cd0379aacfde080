// SPDX-License-Identifier: GPL-3.0-only

//! Single-threaded host event loop
//!
//! Every controller entry point (button presses, permission results, capture
//! results, teardown) arrives as a [`HostEvent`] on one queue. The loop owns
//! the controller and dispatches events one at a time, so controller state is
//! never touched from two places at once. Facilities do blocking work on
//! their own threads and post results back here.

use crate::capture::{
    CaptureController, CaptureKind, ImageHandle, RequestHandle, RequestOutcome, RequestState,
    RequestToken,
};
use crate::errors::CaptureError;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Sending half of the host queue, cloned into facilities
pub type EventSender = mpsc::UnboundedSender<HostEvent>;
/// Receiving half of the host queue
pub type EventReceiver = mpsc::UnboundedReceiver<HostEvent>;

/// Everything the controller reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// User pressed the capture button
    CaptureButton,
    /// User pressed the pick button
    PickButton,
    /// Permission dialog answered
    PermissionResult { token: RequestToken, granted: bool },
    /// Camera or picker finished
    CaptureResult {
        token: RequestToken,
        succeeded: bool,
        image: Option<ImageHandle>,
    },
    /// Hosting screen is going away
    Teardown,
}

impl HostEvent {
    pub fn captured(token: RequestToken, image: ImageHandle) -> Self {
        HostEvent::CaptureResult {
            token,
            succeeded: true,
            image: Some(image),
        }
    }

    pub fn capture_failed(token: RequestToken) -> Self {
        HostEvent::CaptureResult {
            token,
            succeeded: false,
            image: None,
        }
    }
}

/// Create the host queue
pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// Post an event, ignoring a closed queue (the host is already gone)
pub fn post(events: &EventSender, event: HostEvent) {
    if events.send(event).is_err() {
        debug!("Host queue closed, dropping event");
    }
}

/// Whether the loop should keep draining
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Owns the controller and drains the host queue
pub struct Host {
    controller: CaptureController,
    events: EventReceiver,
    /// Handles for requests started by button events
    issued: Vec<RequestHandle>,
}

impl Host {
    pub fn new(controller: CaptureController, events: EventReceiver) -> Self {
        Self {
            controller,
            events,
            issued: Vec::new(),
        }
    }

    pub fn controller(&self) -> &CaptureController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut CaptureController {
        &mut self.controller
    }

    /// Route one event to the controller
    pub fn dispatch(&mut self, event: HostEvent) -> Flow {
        debug!(?event, "Dispatching host event");
        match event {
            HostEvent::CaptureButton => {
                let handle = self.controller.on_capture_button_pressed();
                self.issued.push(handle);
            }
            HostEvent::PickButton => {
                let handle = self.controller.on_pick_button_pressed();
                self.issued.push(handle);
            }
            HostEvent::PermissionResult { token, granted } => {
                self.controller.on_permission_result(token, granted);
            }
            HostEvent::CaptureResult {
                token,
                succeeded,
                image,
            } => {
                self.controller.on_capture_result(token, succeeded, image);
            }
            HostEvent::Teardown => {
                info!("Host teardown requested");
                self.controller.teardown();
                self.issued.clear();
                return Flow::Stop;
            }
        }
        self.reap_finished();
        Flow::Continue
    }

    /// Wait for the next queued event without dispatching it
    pub async fn next_event(&mut self) -> Option<HostEvent> {
        self.events.recv().await
    }

    /// Drain the queue until teardown or until every sender is gone
    pub async fn run(&mut self) {
        while let Some(event) = self.events.recv().await {
            if self.dispatch(event) == Flow::Stop {
                break;
            }
        }
        self.controller.teardown();
    }

    /// Drain the queue until `handle` resolves
    ///
    /// Returns `Cancelled` if the queue closes or a teardown arrives first.
    pub async fn run_until(&mut self, mut handle: RequestHandle) -> RequestOutcome {
        if let Some(outcome) = handle.try_outcome() {
            return outcome;
        }
        loop {
            tokio::select! {
                biased;
                outcome = handle.outcome_mut() => {
                    return outcome.unwrap_or(Err(CaptureError::Cancelled));
                }
                event = self.events.recv() => {
                    let Some(event) = event else {
                        return Err(CaptureError::Cancelled);
                    };
                    if self.dispatch(event) == Flow::Stop {
                        return Err(CaptureError::Cancelled);
                    }
                }
            }
        }
    }

    /// One-line summary of controller state
    pub fn status_line(&self) -> String {
        let state = |kind: CaptureKind| match self.controller.request_state(kind) {
            RequestState::Idle => "idle",
            RequestState::Requested => "requested",
        };
        format!(
            "permission: {} (device: {}) | camera: {} | gallery: {}",
            self.controller.permission_state(),
            self.controller.current_permission(),
            state(CaptureKind::CameraCapture),
            state(CaptureKind::GalleryPick),
        )
    }

    fn reap_finished(&mut self) {
        self.issued.retain_mut(|handle| match handle.try_outcome() {
            Some(outcome) => {
                match outcome {
                    Ok(image) => info!(kind = ?handle.kind(), %image, "Request delivered"),
                    Err(e) => info!(kind = ?handle.kind(), error = %e, "Request ended"),
                }
                false
            }
            None => true,
        });
    }
}
