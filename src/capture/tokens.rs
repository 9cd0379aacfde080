// SPDX-License-Identifier: MPL-2.0

//! Correlation token allocation
//!
//! Tokens come from three interleaved channels. Each channel starts at its
//! own base and advances by [`TOKEN_STRIDE`], so `token % TOKEN_STRIDE`
//! identifies the channel and no two channels can ever hand out the same
//! value, including after wraparound.

use super::types::{CaptureKind, RequestToken};
use crate::constants::{
    CAMERA_CAPTURE_TOKEN_BASE, CAMERA_PERMISSION_TOKEN_BASE, GALLERY_PICK_TOKEN_BASE,
    TOKEN_STRIDE,
};

/// Source of a correlation token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenChannel {
    CameraPermission,
    Capture(CaptureKind),
}

impl TokenChannel {
    fn base(self) -> u16 {
        match self {
            TokenChannel::CameraPermission => CAMERA_PERMISSION_TOKEN_BASE,
            TokenChannel::Capture(CaptureKind::CameraCapture) => CAMERA_CAPTURE_TOKEN_BASE,
            TokenChannel::Capture(CaptureKind::GalleryPick) => GALLERY_PICK_TOKEN_BASE,
        }
    }

    fn index(self) -> usize {
        match self {
            TokenChannel::CameraPermission => 0,
            TokenChannel::Capture(CaptureKind::CameraCapture) => 1,
            TokenChannel::Capture(CaptureKind::GalleryPick) => 2,
        }
    }

    /// Channel a token was allocated from, if it is a valid token at all
    pub fn of(token: RequestToken) -> Option<TokenChannel> {
        let value = token.value();
        if value < CAMERA_PERMISSION_TOKEN_BASE {
            return None;
        }
        [
            TokenChannel::CameraPermission,
            TokenChannel::Capture(CaptureKind::CameraCapture),
            TokenChannel::Capture(CaptureKind::GalleryPick),
        ]
        .into_iter()
        .find(|channel| value % TOKEN_STRIDE == channel.base() % TOKEN_STRIDE)
    }
}

/// Hands out non-colliding tokens per channel
#[derive(Debug, Clone)]
pub struct TokenAllocator {
    next: [u16; 3],
}

impl TokenAllocator {
    pub fn new() -> Self {
        Self {
            next: [
                CAMERA_PERMISSION_TOKEN_BASE,
                CAMERA_CAPTURE_TOKEN_BASE,
                GALLERY_PICK_TOKEN_BASE,
            ],
        }
    }

    /// Allocate the next token for a channel
    pub fn allocate(&mut self, channel: TokenChannel) -> RequestToken {
        let slot = &mut self.next[channel.index()];
        let token = RequestToken(*slot);
        *slot = match slot.checked_add(TOKEN_STRIDE) {
            Some(next) => next,
            None => channel.base(),
        };
        token
    }
}

impl Default for TokenAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_first_tokens_use_channel_bases() {
        let mut tokens = TokenAllocator::new();
        assert_eq!(tokens.allocate(TokenChannel::CameraPermission), RequestToken(100));
        assert_eq!(
            tokens.allocate(TokenChannel::Capture(CaptureKind::CameraCapture)),
            RequestToken(101)
        );
        assert_eq!(
            tokens.allocate(TokenChannel::Capture(CaptureKind::GalleryPick)),
            RequestToken(102)
        );
    }

    #[test]
    fn test_channels_never_collide() {
        let mut tokens = TokenAllocator::new();
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            for channel in [
                TokenChannel::CameraPermission,
                TokenChannel::Capture(CaptureKind::CameraCapture),
                TokenChannel::Capture(CaptureKind::GalleryPick),
            ] {
                let token = tokens.allocate(channel);
                assert!(seen.insert(token), "token {} handed out twice", token);
                assert_eq!(TokenChannel::of(token), Some(channel));
            }
        }
    }

    #[test]
    fn test_wraparound_returns_to_base() {
        let mut tokens = TokenAllocator::new();
        let channel = TokenChannel::Capture(CaptureKind::GalleryPick);
        let mut last = tokens.allocate(channel);
        loop {
            let token = tokens.allocate(channel);
            if token < last {
                assert_eq!(token, RequestToken(GALLERY_PICK_TOKEN_BASE));
                break;
            }
            last = token;
        }
        assert_eq!(TokenChannel::of(last), Some(channel));
    }

    #[test]
    fn test_small_values_have_no_channel() {
        assert_eq!(TokenChannel::of(RequestToken(0)), None);
        assert_eq!(TokenChannel::of(RequestToken(99)), None);
    }
}
