// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

/// Application identifier used for config and cache directories
pub const APP_ID: &str = "ocr-capture";

// ===== Correlation tokens =====

/// First token of the camera permission channel
pub const CAMERA_PERMISSION_TOKEN_BASE: u16 = 100;
/// First token of the camera capture channel
pub const CAMERA_CAPTURE_TOKEN_BASE: u16 = 101;
/// First token of the gallery pick channel
pub const GALLERY_PICK_TOKEN_BASE: u16 = 102;
/// Distance between consecutive tokens of one channel.
///
/// Equal to the number of channels, so channels never share a token.
pub const TOKEN_STRIDE: u16 = 3;

// ===== Camera defaults =====

/// Default V4L2 device node
pub const DEFAULT_CAMERA_DEVICE: &str = "/dev/video0";
/// Default requested capture width
pub const DEFAULT_CAPTURE_WIDTH: u32 = 1920;
/// Default requested capture height
pub const DEFAULT_CAPTURE_HEIGHT: u32 = 1080;
/// Frames discarded while auto exposure settles
pub const DEFAULT_WARMUP_FRAMES: u32 = 5;
/// Number of mmap buffers for the capture stream
pub const CAPTURE_BUFFER_COUNT: u32 = 4;
/// JPEG quality for saved captures (maximum, matching the capture intent)
pub const DEFAULT_JPEG_QUALITY: u8 = 100;

// ===== Gallery =====

/// Image file extensions offered by the picker
pub const DEFAULT_IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Subdirectory of the cache dir that holds captured photos
pub const CAPTURE_CACHE_SUBDIR: &str = "captures";
