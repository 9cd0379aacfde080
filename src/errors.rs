// SPDX-License-Identifier: MPL-2.0

//! Error types for the capture shell

use thiserror::Error;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
    /// Storage/filesystem errors
    #[error("Storage error: {0}")]
    Storage(String),
    /// Host facility errors (camera device, file dialog)
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
    /// A capture or pick request ended without an image
    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),
}

/// Why a capture or pick request ended without delivering an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// The camera permission request came back denied
    #[error("Camera permission denied")]
    PermissionDenied,
    /// The facility reported failure, or the user backed out without an image
    #[error("Capture cancelled or failed")]
    CancelledOrFailed,
    /// A newer request of the same kind replaced this one
    #[error("Request superseded by a newer request")]
    Superseded,
    /// The request was cancelled by its owner or the controller was torn down
    #[error("Request cancelled")]
    Cancelled,
}

/// Errors from the desktop capture facilities
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// Device node missing
    #[error("Device not found: {0}")]
    DeviceNotFound(String),
    /// Device could not be opened or configured
    #[error("Device initialization failed: {0}")]
    InitializationFailed(String),
    /// Device refuses the formats we can decode
    #[error("Unsupported pixel format: {0}")]
    UnsupportedFormat(String),
    /// Streaming or decoding a frame failed
    #[error("Frame capture failed: {0}")]
    FrameCaptureFailed(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(err.to_string())
    }
}
