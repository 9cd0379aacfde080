// SPDX-License-Identifier: GPL-3.0-only

//! Camera permission backed by device node access rights
//!
//! On the desktop there is no permission dialog: the camera is usable when
//! the process may open the V4L2 node for reading and writing (typically via
//! membership of the `video` group or a logind ACL).

use crate::backends::PermissionAuthority;
use crate::capture::{PermissionKind, PermissionState, RequestToken};
use crate::host::{EventSender, HostEvent, post};
use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Check whether this process may use the device at `path`
///
/// `Unknown` when the node does not exist.
pub fn probe_access(path: &Path) -> PermissionState {
    if !path.exists() {
        return PermissionState::Unknown;
    }

    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return PermissionState::Unknown;
    };

    let result = unsafe { libc::access(c_path.as_ptr(), libc::R_OK | libc::W_OK) };
    if result == 0 {
        PermissionState::Granted
    } else {
        debug!(
            path = %path.display(),
            error = %std::io::Error::last_os_error(),
            "Device access refused"
        );
        PermissionState::Denied
    }
}

pub struct V4l2PermissionAuthority {
    device: PathBuf,
    events: EventSender,
}

impl V4l2PermissionAuthority {
    pub fn new(device: impl Into<PathBuf>, events: EventSender) -> Self {
        Self {
            device: device.into(),
            events,
        }
    }
}

impl PermissionAuthority for V4l2PermissionAuthority {
    fn check_permission(&self, kind: PermissionKind) -> PermissionState {
        match kind {
            PermissionKind::Camera => probe_access(&self.device),
        }
    }

    fn request_permission(&mut self, kind: PermissionKind, token: RequestToken) {
        debug!(?kind, %token, "Probing device access");
        let device = self.device.clone();
        let events = self.events.clone();

        // Answer asynchronously, like a dialog would
        std::thread::spawn(move || {
            let state = probe_access(&device);
            if state == PermissionState::Unknown {
                warn!(path = %device.display(), "Camera device not found");
            }
            post(
                &events,
                HostEvent::PermissionResult {
                    token,
                    granted: state.is_granted(),
                },
            );
        });
    }
}
