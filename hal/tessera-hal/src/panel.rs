//! Panel driver capability contract
//!
//! One trait covers every supported TFT controller (ST7735, ILI9341, ...).
//! The concrete variant is chosen at construction time by the board crate;
//! the display controller only sees this contract.

/// TFT panel command driver
///
/// Implementations own the command set of a specific controller chip and
/// the SPI/DMA plumbing to reach it.
pub trait PanelDriver {
    /// Error type for panel operations
    type Error;

    /// Run the controller's power-on init sequence
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Apply orientation/color-order (MADCTL) and frame timing settings
    fn configure(&mut self, madctl: u8, frmctr1: u32) -> Result<(), Self::Error>;

    /// Program the rectangular region the next image transfer writes into
    fn set_address_window(&mut self, x: u16, y: u16, w: u16, h: u16)
        -> Result<(), Self::Error>;

    /// Start an asynchronous transfer of a 4-bit indexed image
    ///
    /// `palette`, when present, is retransmitted ahead of the pixel data;
    /// `None` reuses the controller-resident table. Returns once the
    /// transfer is queued, not when it completes. The caller must not
    /// touch `buf` until [`PanelDriver::wait_for_send_done`] returns.
    fn send_indexed_image(
        &mut self,
        buf: &[u8],
        width: u16,
        height: u16,
        palette: Option<&[u32; 16]>,
    ) -> Result<(), Self::Error>;

    /// Block until the previously queued transfer has drained
    fn wait_for_send_done(&mut self);
}
