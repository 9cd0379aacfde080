// SPDX-License-Identifier: GPL-3.0-only

//! Desktop wiring
//!
//! Builds a [`Host`] whose controller talks to the V4L2 camera, the native
//! file dialog and the consumer chosen by the caller.

use crate::backends::consumer::consumer_for;
use crate::backends::v4l2::CaptureSettings;
use crate::backends::{
    DesktopFacility, FilePicker, ImageConsumer, TerminalNotifier, V4l2Camera,
    V4l2PermissionAuthority,
};
use crate::capture::CaptureController;
use crate::config::Config;
use crate::host::{EventSender, Host, event_channel};
use std::path::PathBuf;
use tracing::info;

/// Optional overrides on top of [`Config`]
#[derive(Debug, Clone, Default)]
pub struct ShellOptions {
    /// Camera device instead of `config.camera_device`
    pub device: Option<PathBuf>,
    /// Directory the picker opens in
    pub pick_dir: Option<PathBuf>,
}

/// Build the desktop host with the configured consumer
pub fn desktop_host(config: &Config, options: &ShellOptions) -> (Host, EventSender) {
    desktop_host_with_consumer(config, options, consumer_for(config.image_action))
}

/// Build the desktop host around a caller-supplied consumer
pub fn desktop_host_with_consumer(
    config: &Config,
    options: &ShellOptions,
    consumer: Box<dyn ImageConsumer>,
) -> (Host, EventSender) {
    let (events, receiver) = event_channel();

    let mut settings = CaptureSettings::from(config);
    if let Some(device) = &options.device {
        settings.device = device.clone();
    }
    info!(
        device = %settings.device.display(),
        output = %settings.output_dir.display(),
        "Building desktop capture shell"
    );

    let authority = V4l2PermissionAuthority::new(settings.device.clone(), events.clone());
    let camera = V4l2Camera::new(settings, events.clone());

    let mut picker = FilePicker::new(config.image_extensions.clone(), events.clone());
    if let Some(dir) = &options.pick_dir {
        picker = picker.with_start_dir(dir.clone());
    }

    let facility = DesktopFacility::new(Box::new(camera), Box::new(picker));

    let controller = CaptureController::new(
        Box::new(authority),
        Box::new(facility),
        consumer,
        Box::new(TerminalNotifier),
    );

    (Host::new(controller, receiver), events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CaptureError;

    #[tokio::test]
    async fn test_missing_device_ends_in_permission_denial() {
        let config = Config {
            camera_device: String::new(),
            ..Config::default()
        };
        let (mut host, _events) = desktop_host(&config, &ShellOptions::default());

        let handle = host.controller_mut().on_capture_button_pressed();
        assert!(host.controller().awaiting_permission());

        assert_eq!(
            host.run_until(handle).await,
            Err(CaptureError::PermissionDenied)
        );
        assert_eq!(host.controller().pending_token(crate::CaptureKind::CameraCapture), None);
    }
}
