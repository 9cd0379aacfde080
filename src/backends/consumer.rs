// SPDX-License-Identifier: MPL-2.0

//! Image consumers
//!
//! The controller hands every delivered image to exactly one consumer. These
//! are the stock ones; an OCR core plugs in through [`ChannelConsumer`] or
//! its own [`ImageConsumer`] implementation.

use crate::backends::ImageConsumer;
use crate::capture::ImageHandle;
use crate::config::ImageAction;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Logs each handle and does nothing else
#[derive(Debug, Default)]
pub struct LoggingConsumer;

impl ImageConsumer for LoggingConsumer {
    fn consume(&mut self, image: ImageHandle) {
        info!(%image, "Image ready");
    }
}

/// Opens each image with the desktop's default viewer
#[derive(Debug, Default)]
pub struct OpenConsumer;

impl ImageConsumer for OpenConsumer {
    fn consume(&mut self, image: ImageHandle) {
        let result = match image.local_path() {
            Some(path) => open::that_detached(&path),
            None => open::that_detached(image.as_uri()),
        };
        match result {
            Ok(()) => info!(%image, "Opened image"),
            Err(e) => warn!(%image, error = %e, "Failed to open image"),
        }
    }
}

/// Forwards handles to an async receiver
#[derive(Debug, Clone)]
pub struct ChannelConsumer {
    sender: mpsc::UnboundedSender<ImageHandle>,
}

impl ChannelConsumer {
    /// Create a consumer and the receiver that gets every handle
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ImageHandle>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl ImageConsumer for ChannelConsumer {
    fn consume(&mut self, image: ImageHandle) {
        if let Err(e) = self.sender.send(image) {
            warn!(image = %e.0, "Image receiver dropped");
        }
    }
}

/// Consumer matching the configured action
pub fn consumer_for(action: ImageAction) -> Box<dyn ImageConsumer> {
    match action {
        ImageAction::Log => Box::new(LoggingConsumer),
        ImageAction::Open => Box::new(OpenConsumer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_consumer_forwards_in_order() {
        let (mut consumer, mut rx) = ChannelConsumer::new();
        consumer.consume(ImageHandle::from_uri("file:///1.jpg"));
        consumer.consume(ImageHandle::from_uri("file:///2.jpg"));

        assert_eq!(rx.try_recv().unwrap().as_uri(), "file:///1.jpg");
        assert_eq!(rx.try_recv().unwrap().as_uri(), "file:///2.jpg");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_channel_consumer_survives_dropped_receiver() {
        let (mut consumer, rx) = ChannelConsumer::new();
        drop(rx);
        consumer.consume(ImageHandle::from_uri("file:///late.jpg"));
    }
}
