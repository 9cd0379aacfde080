// SPDX-License-Identifier: GPL-3.0-only

//! Still capture from a V4L2 device
//!
//! Each launch opens the device on a worker thread, negotiates MJPG (or YUYV),
//! lets auto exposure settle for a few frames, saves one frame as JPEG into
//! the capture directory and posts a `file://` handle back to the host.

use super::convert::{FramePixelFormat, decode_frame};
use crate::backends::CaptureFacility;
use crate::capture::{CaptureKind, ImageHandle, RequestToken};
use crate::config::Config;
use crate::constants::CAPTURE_BUFFER_COUNT;
use crate::errors::{AppResult, BackendError};
use crate::host::{EventSender, HostEvent, post};
use crate::storage;
use image::RgbImage;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use v4l::buffer::Type;
use v4l::io::mmap::Stream as MmapStream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::{Device, Format, FourCC};

/// Everything a capture worker needs, detached from the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSettings {
    pub device: PathBuf,
    pub width: u32,
    pub height: u32,
    pub warmup_frames: u32,
    pub jpeg_quality: u8,
    pub output_dir: PathBuf,
}

impl From<&Config> for CaptureSettings {
    fn from(config: &Config) -> Self {
        Self {
            device: PathBuf::from(&config.camera_device),
            width: config.capture_width,
            height: config.capture_height,
            warmup_frames: config.warmup_frames,
            jpeg_quality: config.jpeg_quality,
            output_dir: config.capture_dir(),
        }
    }
}

pub struct V4l2Camera {
    settings: CaptureSettings,
    events: EventSender,
}

impl V4l2Camera {
    pub fn new(settings: CaptureSettings, events: EventSender) -> Self {
        Self { settings, events }
    }
}

impl CaptureFacility for V4l2Camera {
    fn launch(&mut self, kind: CaptureKind, token: RequestToken) {
        if kind != CaptureKind::CameraCapture {
            warn!(%token, ?kind, "Camera asked to perform a non-camera request");
            post(&self.events, HostEvent::capture_failed(token));
            return;
        }

        let settings = self.settings.clone();
        let events = self.events.clone();

        std::thread::spawn(move || {
            let event = match capture_still(&settings) {
                Ok(path) => HostEvent::captured(token, ImageHandle::from_path(&path)),
                Err(e) => {
                    warn!(%token, error = %e, "Photo capture failed");
                    HostEvent::capture_failed(token)
                }
            };
            post(&events, event);
        });
    }
}

/// Capture one frame and save it. Blocking.
pub fn capture_still(settings: &CaptureSettings) -> AppResult<PathBuf> {
    let frame = grab_frame(settings)?;
    storage::save_capture(&frame, &settings.output_dir, settings.jpeg_quality)
}

/// Open the device and grab one decoded frame. Blocking.
pub fn grab_frame(settings: &CaptureSettings) -> Result<RgbImage, BackendError> {
    let path = settings.device.display().to_string();
    if !settings.device.exists() {
        return Err(BackendError::DeviceNotFound(path));
    }

    let dev = Device::with_path(&settings.device)
        .map_err(|e| BackendError::InitializationFailed(format!("{}: {}", path, e)))?;

    let (format, pixel_format) = negotiate_format(&dev, settings.width, settings.height)?;
    info!(
        device = %path,
        width = format.width,
        height = format.height,
        fourcc = ?pixel_format,
        "Capture format negotiated"
    );

    let mut stream = MmapStream::with_buffers(&dev, Type::VideoCapture, CAPTURE_BUFFER_COUNT)
        .map_err(|e| BackendError::InitializationFailed(format!("Failed to create stream: {}", e)))?;

    for frame in 0..settings.warmup_frames {
        stream
            .next()
            .map_err(|e| BackendError::FrameCaptureFailed(format!("warm-up frame {}: {}", frame, e)))?;
    }

    let (buf, meta) = stream
        .next()
        .map_err(|e| BackendError::FrameCaptureFailed(e.to_string()))?;

    // bytesused is 0 on some drivers; fall back to the whole buffer
    let used = match meta.bytesused as usize {
        0 => buf.len(),
        n => n.min(buf.len()),
    };
    debug!(bytes = used, sequence = meta.sequence, "Frame captured");

    decode_frame(
        &buf[..used],
        pixel_format,
        format.width,
        format.height,
        format.stride,
    )
}

/// Ask for each supported pixel format in preference order
fn negotiate_format(
    dev: &Device,
    width: u32,
    height: u32,
) -> Result<(Format, FramePixelFormat), BackendError> {
    for wanted in FramePixelFormat::PREFERENCE {
        let request = Format::new(width, height, FourCC::new(&wanted.fourcc()));
        match dev.set_format(&request) {
            Ok(actual) => match FramePixelFormat::from_fourcc(actual.fourcc.repr) {
                Some(pixel_format) => return Ok((actual, pixel_format)),
                None => debug!(?wanted, got = %actual.fourcc, "Driver substituted a different format"),
            },
            Err(e) => debug!(?wanted, error = %e, "Format rejected"),
        }
    }

    let current = dev
        .format()
        .map(|f| f.fourcc.to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    Err(BackendError::UnsupportedFormat(current))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(dir: &std::path::Path) -> CaptureSettings {
        CaptureSettings {
            device: PathBuf::from("/nonexistent/video-node"),
            width: 640,
            height: 480,
            warmup_frames: 0,
            jpeg_quality: 90,
            output_dir: dir.to_path_buf(),
        }
    }

    #[test]
    fn test_settings_follow_config() {
        let config = Config {
            camera_device: "/dev/video3".to_string(),
            cache_dir: Some(PathBuf::from("/tmp/captures")),
            ..Config::default()
        };
        let settings = CaptureSettings::from(&config);
        assert_eq!(settings.device, PathBuf::from("/dev/video3"));
        assert_eq!(settings.output_dir, PathBuf::from("/tmp/captures"));
        assert_eq!(settings.width, config.capture_width);
    }

    #[test]
    fn test_missing_device_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            grab_frame(&settings(dir.path())),
            Err(BackendError::DeviceNotFound(_))
        ));
    }

    #[test]
    fn test_missing_device_posts_failure() {
        let dir = tempfile::tempdir().unwrap();
        let (events, mut rx) = crate::host::event_channel();
        let mut camera = V4l2Camera::new(settings(dir.path()), events);

        camera.launch(CaptureKind::CameraCapture, RequestToken(101));

        let event = rx.blocking_recv().expect("capture result");
        assert_eq!(event, HostEvent::capture_failed(RequestToken(101)));
    }

    #[test]
    fn test_rejects_gallery_requests() {
        let dir = tempfile::tempdir().unwrap();
        let (events, mut rx) = crate::host::event_channel();
        let mut camera = V4l2Camera::new(settings(dir.path()), events);

        camera.launch(CaptureKind::GalleryPick, RequestToken(102));

        assert_eq!(
            rx.try_recv().ok(),
            Some(HostEvent::capture_failed(RequestToken(102)))
        );
    }
}
