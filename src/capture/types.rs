// SPDX-License-Identifier: MPL-2.0

//! Shared types for capture requests

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Permission classes the controller may need
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermissionKind {
    /// Access to the camera device
    Camera,
}

/// Last known answer from the permission authority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionState {
    /// Never asked, or the authority cannot tell
    #[default]
    Unknown,
    Granted,
    Denied,
}

impl PermissionState {
    pub fn is_granted(self) -> bool {
        self == PermissionState::Granted
    }
}

impl fmt::Display for PermissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermissionState::Unknown => write!(f, "unknown"),
            PermissionState::Granted => write!(f, "granted"),
            PermissionState::Denied => write!(f, "denied"),
        }
    }
}

/// Which action a capture request performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaptureKind {
    /// Take a new photo with the camera
    CameraCapture,
    /// Select an existing image from storage
    GalleryPick,
}

impl CaptureKind {
    pub const ALL: [CaptureKind; 2] = [CaptureKind::CameraCapture, CaptureKind::GalleryPick];
}

impl fmt::Display for CaptureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureKind::CameraCapture => write!(f, "camera capture"),
            CaptureKind::GalleryPick => write!(f, "gallery pick"),
        }
    }
}

/// Per-kind request lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    Requested,
}

/// Small integer that matches an asynchronous result to its request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestToken(pub u16);

impl RequestToken {
    pub fn value(self) -> u16 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque reference to a produced image.
///
/// Stored as a URI; local files use the `file://` scheme. Interpretation is
/// left to the [`ImageConsumer`](crate::backends::ImageConsumer).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageHandle {
    uri: String,
}

impl ImageHandle {
    const FILE_SCHEME: &'static str = "file://";

    /// Wrap an arbitrary URI
    pub fn from_uri(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }

    /// Build a `file://` handle for a local path
    pub fn from_path(path: &Path) -> Self {
        Self {
            uri: format!("{}{}", Self::FILE_SCHEME, path.display()),
        }
    }

    pub fn as_uri(&self) -> &str {
        &self.uri
    }

    /// Local filesystem path, if this handle uses the `file://` scheme
    pub fn local_path(&self) -> Option<PathBuf> {
        self.uri.strip_prefix(Self::FILE_SCHEME).map(PathBuf::from)
    }
}

impl fmt::Display for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

/// User-visible notices raised by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// Camera permission was refused; capture abandoned
    PermissionDenied,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::PermissionDenied => {
                "Camera permission denied. Grant access to the camera device and try again."
            }
        }
    }
}
