//! Background image decoding: raw RGBA bytes → displayable bitmap.

use peniko::{Blob, Image, ImageFormat};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ImageError {
    #[error("Image has zero size ({width}x{height})")]
    Empty { width: u32, height: u32 },

    #[error("Image buffer is {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    LengthMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Non-premultiplied RGBA8 pixels, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Arc<Vec<u8>>,
}

impl Bitmap {
    pub fn from_rgba(width: u32, height: u32, bytes: Vec<u8>) -> Result<Self, ImageError> {
        if width == 0 || height == 0 {
            return Err(ImageError::Empty { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if bytes.len() != expected {
            return Err(ImageError::LengthMismatch {
                width,
                height,
                expected,
                actual: bytes.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels: Arc::new(bytes),
        })
    }

    /// Decode, logging and swallowing failures. A bad buffer means a blank
    /// background, never a failed component.
    pub fn decode_or_blank(width: u32, height: u32, bytes: Vec<u8>) -> Option<Self> {
        if bytes.is_empty() {
            log::debug!("no background image supplied");
            return None;
        }
        match Self::from_rgba(width, height, bytes) {
            Ok(bitmap) => Some(bitmap),
            Err(e) => {
                log::warn!("background image unusable, rendering blank: {e}");
                None
            }
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Peniko image sharing this bitmap's pixel buffer.
    pub fn to_image(&self) -> Image {
        Image::new(
            Blob::new(self.pixels.clone()),
            ImageFormat::Rgba8,
            self.width,
            self.height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_valid_buffer() {
        let bitmap = Bitmap::from_rgba(2, 1, vec![255; 8]).unwrap();
        assert_eq!(bitmap.width(), 2);
        assert_eq!(bitmap.pixels().len(), 8);
        let image = bitmap.to_image();
        assert_eq!(image.width, 2);
        assert_eq!(image.height, 1);
        assert_eq!(image.format, ImageFormat::Rgba8);
        assert_eq!(image.data.data().len(), 8);
    }

    #[test]
    fn length_mismatch_is_reported() {
        let err = Bitmap::from_rgba(2, 2, vec![0; 15]).unwrap_err();
        assert_eq!(
            err,
            ImageError::LengthMismatch {
                width: 2,
                height: 2,
                expected: 16,
                actual: 15
            }
        );
    }

    #[test]
    fn bad_buffer_degrades_to_blank() {
        assert!(Bitmap::decode_or_blank(3, 3, vec![1, 2, 3]).is_none());
        assert!(Bitmap::decode_or_blank(3, 3, Vec::new()).is_none());
        assert!(Bitmap::decode_or_blank(1, 1, vec![1, 2, 3, 4]).is_some());
    }
}
