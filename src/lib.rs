// SPDX-License-Identifier: MPL-2.0

//! OCR Capture - capture shell for an OCR pipeline
//!
//! Takes a photo with the camera or picks an existing one, enforcing the
//! camera permission first, and hands the resulting image handle to a
//! pluggable consumer.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`capture`]: The [`CaptureController`] state machine and request handles
//! - [`backends`]: Capability traits and the desktop (V4L2, file dialog) implementations
//! - [`host`]: Single-threaded event loop that serializes all controller entry points
//! - [`shell`]: Wiring of controller, facilities and host from a [`Config`]
//! - [`config`]: User configuration handling
//! - [`storage`]: Capture file storage

pub mod backends;
pub mod capture;
pub mod config;
pub mod constants;
pub mod errors;
pub mod host;
pub mod shell;
pub mod storage;

// Re-export commonly used types
pub use capture::{CaptureController, CaptureKind, ImageHandle, PermissionState, RequestHandle};
pub use config::Config;
pub use errors::{AppError, AppResult, CaptureError};
pub use host::{Host, HostEvent};
