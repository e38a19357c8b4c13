//! Tessera Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits consumed by the
//! Tessera driver crates. Chip-specific code (pin muxing, SPI peripheral
//! construction, panel command sets) implements these traits; the drivers
//! stay board-agnostic and host-testable.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Drivers (tessera-input, tessera-display)│
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tessera-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  board crate  │       │  host mocks   │
//! │  (firmware)   │       │  (unit tests) │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::DigitalPin`] - digital I/O with pull-mode reads
//! - [`spi::SpiBus`] - SPI transport configuration and raw writes
//! - [`panel::PanelDriver`] - TFT panel command capability contract
//! - [`config::ConfigSource`] - board configuration lookup

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod gpio;
pub mod panel;
pub mod spi;

// Re-export key traits at crate root for convenience
pub use config::ConfigSource;
pub use gpio::{DigitalPin, Pull};
pub use panel::PanelDriver;
pub use spi::{SpiBus, SpiConfig};
