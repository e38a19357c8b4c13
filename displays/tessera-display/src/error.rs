//! Display pipeline errors
//!
//! These were hard panics in earlier firmware generations; they are typed
//! here so the firmware decides the halt policy and tests can observe the
//! failure.

/// Errors surfaced by the display pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Discovery read the all-ones sentinel: no panel is attached
    NotFound,
    /// Palette buffer is not exactly 16 RGB triples (48 bytes)
    InvalidPaletteSize,
    /// Image is not 4 bits per pixel
    BadBitDepth,
    /// Image dimensions do not match the target region
    DimensionMismatch,
    /// Staging buffer cannot hold a frame of the configured geometry
    BufferTooSmall,
    /// The panel driver reported a transport failure
    Panel,
}
