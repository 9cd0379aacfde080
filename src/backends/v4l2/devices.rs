// SPDX-License-Identifier: GPL-3.0-only

//! `/dev/video*` discovery

use super::permission::probe_access;
use crate::capture::PermissionState;
use std::path::{Path, PathBuf};
use tracing::debug;
use v4l::Device;

/// A V4L2 node and what we could learn about it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDeviceInfo {
    pub path: PathBuf,
    /// Card name from VIDIOC_QUERYCAP (empty when the node cannot be opened)
    pub card: String,
    pub driver: String,
    pub permission: PermissionState,
}

/// List video nodes under `/dev`, sorted by path
pub fn list_video_devices() -> Vec<VideoDeviceInfo> {
    list_video_devices_in(Path::new("/dev"))
}

pub(crate) fn list_video_devices_in(dir: &Path) -> Vec<VideoDeviceInfo> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .into_iter()
        .flatten()
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("video"))
        })
        .collect();
    paths.sort();

    paths.into_iter().map(|path| describe(&path)).collect()
}

fn describe(path: &Path) -> VideoDeviceInfo {
    let permission = probe_access(path);

    let (card, driver) = if permission.is_granted() {
        match Device::with_path(path).and_then(|dev| dev.query_caps()) {
            Ok(caps) => (caps.card, caps.driver),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "QUERYCAP failed");
                (String::new(), String::new())
            }
        }
    } else {
        (String::new(), String::new())
    };

    VideoDeviceInfo {
        path: path.to_path_buf(),
        card,
        driver,
        permission,
    }
}
