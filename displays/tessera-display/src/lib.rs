//! Display pipeline for Tessera handhelds
//!
//! Drives a color SPI TFT panel from 4-bit indexed frame images:
//! palette translation with dirty-flag gating, a reusable staging buffer
//! serialized against in-flight transfers, and a status-bar band
//! composited independently of the main frame region.
//!
//! The pipeline is generic over [`tessera_hal::PanelDriver`], so the same
//! code drives an ST7735, an ILI9341, or a recording mock under test.
//! Panel discovery rides on the button multiplexer's shift-in primitive:
//! the attached panel variant answers a 17-bit identity code on the
//! shared data line during bring-up.

#![no_std]
#![deny(unsafe_code)]

pub mod bringup;
pub mod controller;
pub mod error;
pub mod image;

// Re-export key types
pub use bringup::{prepare_transport, wait_for_panel, IDENTITY_BITS, NO_PANEL};
pub use controller::{DisplayConfig, DisplayController};
pub use error::DisplayError;
pub use image::ImageView;
