//! Display controller
//!
//! Owns the panel driver, the 16-entry palette, the staging buffer and
//! the pending status-bar image. Frame submission copies pixels into the
//! staging buffer and hands it to the panel's asynchronous indexed-image
//! transfer; the buffer is reused serially for the status-bar band, so
//! every mutation is fenced by a blocking wait on the previous transfer.

use tessera_hal::PanelDriver;

use crate::error::DisplayError;
use crate::image::{packed_len, ImageView};

/// Bits per pixel of every image the pipeline accepts
const FRAME_BPP: u8 = 4;

// cfg0 word layout: bits 0-7 MADCTL, 8-15 column offset, 16-23 row offset,
// bit 24 palette polarity flip.
const CFG0_PALETTE_FLIP: u32 = 0x0100_0000;

/// Fixed display configuration record
#[derive(Debug, Clone, Copy)]
pub struct DisplayConfig {
    /// Packed panel word: MADCTL, window offsets, palette polarity
    pub cfg0: u32,
    /// Frame timing word passed through to the panel (FRMCTR1)
    pub frmctr1: u32,
    /// Panel width in physical pixels
    pub width: u16,
    /// Panel height in physical pixels
    pub height: u16,
    /// SPI clock the panel is rated for, applied by bring-up glue
    pub spi_hz: u32,
    /// Map each logical pixel to a 2x2 physical block
    pub double_size: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            cfg0: 0x0000_0040,
            frmctr1: 0x0000_0603,
            width: 160,
            height: 128,
            spi_hz: 32_000_000,
            double_size: false,
        }
    }
}

/// Pending status-bar image, copied out of the caller's storage
#[derive(Debug)]
struct StatusImage<const BUF: usize> {
    width: u16,
    height: u16,
    bpp: u8,
    pixels: heapless::Vec<u8, BUF>,
}

/// Framebuffer-to-panel display controller
///
/// `BUF` sizes the staging buffer; it must hold a full 4 bpp frame of
/// the configured geometry (`width * height / 2` bytes).
#[derive(Debug)]
pub struct DisplayController<P, const BUF: usize> {
    panel: P,
    palette: [u32; 16],
    new_palette: bool,
    screen_buf: [u8; BUF],
    last_status: Option<StatusImage<BUF>>,
    width: u16,
    height: u16,
    display_height: u16,
    off_x: u8,
    off_y: u8,
    double_size: bool,
    pal_xor: u32,
    in_update: bool,
}

impl<P: PanelDriver, const BUF: usize> DisplayController<P, BUF> {
    /// Initialize the panel and build the controller
    ///
    /// Decodes the cfg0 word, runs the panel's init and configure
    /// sequences and programs the full-height main window (no status bar
    /// until [`DisplayController::configure_status_bar`]). SPI clocking,
    /// reset and backlight toggling happen in board bring-up before the
    /// panel driver is handed in.
    pub fn new(mut panel: P, config: DisplayConfig) -> Result<Self, DisplayError> {
        // double-size halves each axis, so the full frame is the worst case
        if BUF < packed_len(config.width, config.height, FRAME_BPP) {
            return Err(DisplayError::BufferTooSmall);
        }

        let pal_xor = if config.cfg0 & CFG0_PALETTE_FLIP != 0 {
            0x00ff_ffff
        } else {
            0
        };
        let madctl = (config.cfg0 & 0xff) as u8;
        let off_x = ((config.cfg0 >> 8) & 0xff) as u8;
        let off_y = ((config.cfg0 >> 16) & 0xff) as u8;

        panel.init().map_err(|_| DisplayError::Panel)?;
        panel
            .configure(madctl, config.frmctr1)
            .map_err(|_| DisplayError::Panel)?;

        let mut controller = Self {
            panel,
            palette: [0; 16],
            new_palette: false,
            screen_buf: [0; BUF],
            last_status: None,
            width: config.width,
            height: config.height,
            display_height: config.height,
            off_x,
            off_y,
            double_size: config.double_size,
            pal_xor,
            in_update: false,
        };
        controller.set_addr_main()?;
        Ok(controller)
    }

    /// Load a new palette from 16 packed RGB triples
    ///
    /// The palette is transmitted with the next frame only; unchanged
    /// palettes are never retransmitted.
    pub fn set_palette(&mut self, rgb: &[u8]) -> Result<(), DisplayError> {
        if rgb.len() != 48 {
            return Err(DisplayError::InvalidPaletteSize);
        }
        for (entry, triple) in self.palette.iter_mut().zip(rgb.chunks_exact(3)) {
            *entry = (u32::from(triple[0]) << 16 | u32::from(triple[1]) << 8 | u32::from(triple[2]))
                ^ self.pal_xor;
        }
        self.new_palette = true;
        Ok(())
    }

    /// Reserve a status-bar band at the bottom of the panel
    ///
    /// Shrinks the main region by `bar_height` rows and reprograms its
    /// window. No effect in double-size mode. Must not be called while a
    /// frame update is in flight.
    pub fn configure_status_bar(&mut self, bar_height: u16) -> Result<(), DisplayError> {
        if self.double_size {
            return Ok(());
        }
        if bar_height > self.height {
            return Err(DisplayError::DimensionMismatch);
        }
        self.display_height = self.height - bar_height;
        self.set_addr_main()
    }

    /// Stage a status-bar image for the next frame flush
    ///
    /// `None` and empty images are no-ops and leave any previously staged
    /// image pending. The pixels are copied out, replacing the pending
    /// image; dimensions are checked at flush time against the band.
    pub fn submit_status_image(&mut self, img: Option<&ImageView<'_>>) -> Result<(), DisplayError> {
        let Some(img) = img else {
            return Ok(());
        };
        if img.is_empty() {
            return Ok(());
        }
        let mut pixels = heapless::Vec::new();
        pixels
            .extend_from_slice(img.pixels())
            .map_err(|_| DisplayError::BufferTooSmall)?;
        self.last_status = Some(StatusImage {
            width: img.width(),
            height: img.height(),
            bpp: img.bpp(),
            pixels,
        });
        Ok(())
    }

    /// Send a frame, then flush any pending status-bar image
    ///
    /// The entry point application code calls once per rendered frame.
    /// Re-entrant calls are dropped silently: submission is already in
    /// progress on this context and there is no queue. `None` skips the
    /// main region and only flushes a pending status image.
    pub fn submit_frame(&mut self, img: Option<&ImageView<'_>>) -> Result<(), DisplayError> {
        if self.in_update {
            return Ok(());
        }
        self.in_update = true;
        let result = self.run_update(img);
        self.in_update = false;
        result
    }

    fn run_update(&mut self, img: Option<&ImageView<'_>>) -> Result<(), DisplayError> {
        let mult: u32 = if self.double_size { 2 } else { 1 };

        if let Some(img) = img {
            if img.bpp() != FRAME_BPP {
                return Err(DisplayError::BadBitDepth);
            }
            if u32::from(img.width()) * mult != u32::from(self.width)
                || u32::from(img.height()) * mult != u32::from(self.display_height)
            {
                return Err(DisplayError::DimensionMismatch);
            }

            // the staging buffer may still feed an in-flight transfer
            self.panel.wait_for_send_done();

            let palette = if self.new_palette {
                self.new_palette = false;
                Some(&self.palette)
            } else {
                None
            };

            let len = img.pixels().len();
            self.screen_buf[..len].copy_from_slice(img.pixels());
            self.panel
                .send_indexed_image(&self.screen_buf[..len], img.width(), img.height(), palette)
                .map_err(|_| DisplayError::Panel)?;
        }

        if !self.double_size {
            if let Some(status) = self.last_status.take() {
                let bar_height = self.height - self.display_height;
                if status.bpp != FRAME_BPP {
                    return Err(DisplayError::BadBitDepth);
                }
                if status.width != self.width || status.height != bar_height {
                    return Err(DisplayError::DimensionMismatch);
                }

                self.panel.wait_for_send_done();

                let len = status.pixels.len();
                self.screen_buf[..len].copy_from_slice(&status.pixels);
                self.set_addr_status()?;
                self.panel
                    .send_indexed_image(&self.screen_buf[..len], status.width, status.height, None)
                    .map_err(|_| DisplayError::Panel)?;
                self.panel.wait_for_send_done();
                self.set_addr_main()?;
            }
        }

        Ok(())
    }

    /// Panel width in physical pixels
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Panel height in physical pixels
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Height of the main drawing region
    pub fn display_height(&self) -> u16 {
        self.display_height
    }

    /// Height of the status-bar band
    pub fn status_height(&self) -> u16 {
        self.height - self.display_height
    }

    /// Whether a status image is staged and awaiting flush
    pub fn has_pending_status(&self) -> bool {
        self.last_status.is_some()
    }

    /// Whether brightness control is available on this wiring
    pub fn brightness_supported(&self) -> bool {
        false
    }

    /// Set panel brightness; no-op, the backlight has no PWM line
    pub fn set_brightness(&mut self, _level: u8) {}

    fn set_addr_main(&mut self) -> Result<(), DisplayError> {
        self.panel
            .set_address_window(
                u16::from(self.off_x),
                u16::from(self.off_y),
                self.width,
                self.display_height,
            )
            .map_err(|_| DisplayError::Panel)
    }

    fn set_addr_status(&mut self) -> Result<(), DisplayError> {
        self.panel
            .set_address_window(
                u16::from(self.off_x),
                u16::from(self.off_y) + self.display_height,
                self.width,
                self.height - self.display_height,
            )
            .map_err(|_| DisplayError::Panel)
    }
}
