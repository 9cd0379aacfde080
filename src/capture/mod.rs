// SPDX-License-Identifier: MPL-2.0

//! Capture request handling
//!
//! - [`controller`]: the [`CaptureController`] state machine
//! - [`request`]: cancellable handles returned to callers
//! - [`tokens`]: non-colliding correlation token allocation
//! - [`types`]: permission, kind, token and image handle types

pub mod controller;
pub mod request;
pub mod tokens;
pub mod types;

pub use controller::CaptureController;
pub use request::{RequestHandle, RequestOutcome};
pub use tokens::{TokenAllocator, TokenChannel};
pub use types::{
    CaptureKind, ImageHandle, Notice, PermissionKind, PermissionState, RequestState, RequestToken,
};
