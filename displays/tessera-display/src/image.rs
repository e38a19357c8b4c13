//! Indexed-color image views
//!
//! Frames arrive as borrowed views over the renderer's pixel storage:
//! small integer indices into a 16-entry palette, packed two pixels per
//! byte at the pipeline's native 4 bpp.

use crate::error::DisplayError;

/// Borrowed view of a packed indexed-color image
#[derive(Debug, Clone, Copy)]
pub struct ImageView<'a> {
    width: u16,
    height: u16,
    bpp: u8,
    pixels: &'a [u8],
}

impl<'a> ImageView<'a> {
    /// Create a view, checking that the pixel slice matches the geometry
    pub fn new(width: u16, height: u16, bpp: u8, pixels: &'a [u8]) -> Result<Self, DisplayError> {
        if pixels.len() != packed_len(width, height, bpp) {
            return Err(DisplayError::DimensionMismatch);
        }
        Ok(Self {
            width,
            height,
            bpp,
            pixels,
        })
    }

    /// Image width in pixels
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Bits per pixel
    pub fn bpp(&self) -> u8 {
        self.bpp
    }

    /// Packed pixel data
    pub fn pixels(&self) -> &'a [u8] {
        self.pixels
    }

    /// Whether the view covers no pixels
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

/// Byte length of a packed image of the given geometry
pub(crate) fn packed_len(width: u16, height: u16, bpp: u8) -> usize {
    (usize::from(width) * usize::from(height) * usize::from(bpp) + 7) / 8
}
