// SPDX-License-Identifier: MPL-2.0

//! Request handles returned to the UI layer
//!
//! Each issuing call on the controller produces a [`RequestHandle`] for the
//! caller and a [`Completion`] kept by the controller. The completion resolves
//! the handle exactly once; dropping it unresolved reads as cancellation.

use super::types::{CaptureKind, ImageHandle};
use crate::errors::CaptureError;
use futures::channel::oneshot;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Final result of a capture or pick request
pub type RequestOutcome = Result<ImageHandle, CaptureError>;

/// Caller side of an issued request
#[derive(Debug)]
pub struct RequestHandle {
    kind: CaptureKind,
    cancelled: Arc<AtomicBool>,
    receiver: oneshot::Receiver<RequestOutcome>,
}

/// Controller side of an issued request
#[derive(Debug)]
pub(crate) struct Completion {
    cancelled: Arc<AtomicBool>,
    sender: oneshot::Sender<RequestOutcome>,
}

/// Create a linked handle/completion pair
pub(crate) fn channel(kind: CaptureKind) -> (RequestHandle, Completion) {
    let (sender, receiver) = oneshot::channel();
    let cancelled = Arc::new(AtomicBool::new(false));
    (
        RequestHandle {
            kind,
            cancelled: Arc::clone(&cancelled),
            receiver,
        },
        Completion { cancelled, sender },
    )
}

impl RequestHandle {
    pub fn kind(&self) -> CaptureKind {
        self.kind
    }

    /// Cancel the request.
    ///
    /// A result that arrives afterwards is discarded without side effects.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Non-blocking poll for the outcome
    ///
    /// Returns `None` while the request is still outstanding.
    pub fn try_outcome(&mut self) -> Option<RequestOutcome> {
        match self.receiver.try_recv() {
            Ok(outcome) => outcome,
            Err(oneshot::Canceled) => Some(Err(CaptureError::Cancelled)),
        }
    }

    /// Wait for the outcome
    pub async fn outcome(self) -> RequestOutcome {
        self.receiver.await.unwrap_or(Err(CaptureError::Cancelled))
    }

    /// Mutable future over the outcome, for use in `select!` loops
    pub fn outcome_mut(&mut self) -> &mut oneshot::Receiver<RequestOutcome> {
        &mut self.receiver
    }
}

impl Completion {
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub(crate) fn mark_cancelled(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Resolve the caller's handle. A dropped handle is not an error.
    pub(crate) fn resolve(self, outcome: RequestOutcome) {
        let _ = self.sender.send(outcome);
    }
}
