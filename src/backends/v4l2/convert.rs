// SPDX-License-Identifier: GPL-3.0-only

//! Pixel format conversion for captured V4L2 frames

use crate::errors::BackendError;
use image::RgbImage;

/// FourCC codes we can decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePixelFormat {
    /// Motion JPEG, one JPEG image per frame
    Mjpg,
    /// Packed YUV 4:2:2, Y0 U Y1 V
    Yuyv,
}

impl FramePixelFormat {
    pub const PREFERENCE: [FramePixelFormat; 2] = [FramePixelFormat::Mjpg, FramePixelFormat::Yuyv];

    pub fn fourcc(self) -> [u8; 4] {
        match self {
            FramePixelFormat::Mjpg => *b"MJPG",
            FramePixelFormat::Yuyv => *b"YUYV",
        }
    }

    pub fn from_fourcc(repr: [u8; 4]) -> Option<Self> {
        Self::PREFERENCE
            .into_iter()
            .find(|format| format.fourcc() == repr)
    }
}

/// Decode one frame into an RGB image
pub fn decode_frame(
    data: &[u8],
    format: FramePixelFormat,
    width: u32,
    height: u32,
    stride: u32,
) -> Result<RgbImage, BackendError> {
    match format {
        FramePixelFormat::Mjpg => image::load_from_memory_with_format(data, image::ImageFormat::Jpeg)
            .map(|decoded| decoded.to_rgb8())
            .map_err(|e| BackendError::FrameCaptureFailed(format!("MJPG decode failed: {}", e))),
        FramePixelFormat::Yuyv => {
            let rgb = yuyv_to_rgb(data, width, height, stride)?;
            RgbImage::from_raw(width, height, rgb).ok_or_else(|| {
                BackendError::FrameCaptureFailed("YUYV buffer size mismatch".to_string())
            })
        }
    }
}

/// Convert YUYV (YUV 4:2:2) to packed RGB
///
/// Each 4-byte group Y0 U Y1 V encodes 2 pixels. BT.601 coefficients.
/// `stride` is the byte length of one row; 0 means tightly packed.
pub fn yuyv_to_rgb(
    data: &[u8],
    width: u32,
    height: u32,
    stride: u32,
) -> Result<Vec<u8>, BackendError> {
    let w = width as usize;
    let h = height as usize;
    let row_bytes = w * 2;
    let stride = if stride == 0 { row_bytes } else { stride as usize };

    if stride < row_bytes || data.len() < stride * h.saturating_sub(1) + row_bytes {
        return Err(BackendError::FrameCaptureFailed(format!(
            "YUYV frame too short: {} bytes for {}x{}",
            data.len(),
            width,
            height
        )));
    }

    let mut rgb = Vec::with_capacity(w * h * 3);
    for row in data.chunks(stride).take(h) {
        let row_start = rgb.len();
        for chunk in row[..row_bytes].chunks_exact(4) {
            let y0 = chunk[0] as f32;
            let u = chunk[1] as f32 - 128.0;
            let y1 = chunk[2] as f32;
            let v = chunk[3] as f32 - 128.0;

            for y in [y0, y1] {
                rgb.push((y + 1.402 * v).clamp(0.0, 255.0) as u8);
                rgb.push((y - 0.344 * u - 0.714 * v).clamp(0.0, 255.0) as u8);
                rgb.push((y + 1.772 * u).clamp(0.0, 255.0) as u8);
            }
        }
        // Odd widths leave the last pixel of each row black
        rgb.resize(row_start + w * 3, 0);
    }

    Ok(rgb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_chroma_is_gray() {
        // Two pixels, Y=100, neutral U/V
        let rgb = yuyv_to_rgb(&[100, 128, 100, 128], 2, 1, 0).unwrap();
        assert_eq!(rgb, vec![100; 6]);
    }

    #[test]
    fn test_stride_padding_is_skipped() {
        // 2x2 image, 4 bytes of row data plus 4 bytes padding
        let data = [
            50, 128, 50, 128, 0, 0, 0, 0, //
            200, 128, 200, 128, 0, 0, 0, 0,
        ];
        let rgb = yuyv_to_rgb(&data, 2, 2, 8).unwrap();
        assert_eq!(&rgb[..6], &[50; 6]);
        assert_eq!(&rgb[6..], &[200; 6]);
    }

    #[test]
    fn test_short_buffer_is_rejected() {
        assert!(yuyv_to_rgb(&[0; 4], 4, 4, 0).is_err());
    }

    #[test]
    fn test_fourcc_lookup() {
        assert_eq!(
            FramePixelFormat::from_fourcc(*b"MJPG"),
            Some(FramePixelFormat::Mjpg)
        );
        assert_eq!(FramePixelFormat::from_fourcc(*b"GRBG"), None);
    }

    #[test]
    fn test_mjpg_frame_decodes() {
        let image = RgbImage::from_pixel(4, 4, image::Rgb([0, 0, 255]));
        let jpeg = crate::storage::encode_jpeg(&image, 90).unwrap();
        let decoded = decode_frame(&jpeg, FramePixelFormat::Mjpg, 4, 4, 0).unwrap();
        assert_eq!(decoded.dimensions(), (4, 4));
    }
}
