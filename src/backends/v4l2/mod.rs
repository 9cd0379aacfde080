// SPDX-License-Identifier: GPL-3.0-only

//! V4L2 camera facility and device-access permission authority

pub mod camera;
pub mod convert;
pub mod devices;
pub mod permission;

pub use camera::{CaptureSettings, V4l2Camera};
pub use devices::{VideoDeviceInfo, list_video_devices};
pub use permission::{V4l2PermissionAuthority, probe_access};
