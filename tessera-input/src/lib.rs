//! Button input driver for Tessera handhelds
//!
//! Up to eight buttons share three microcontroller pins through a
//! serial-in parallel-out shift register. This crate owns the 3-wire
//! shift-in protocol and the polling edge-detection state machine that
//! turns level changes into key events.
//!
//! The driver is generic over [`tessera_hal::DigitalPin`], so it runs
//! unmodified on any board crate and under host tests with mock pins.

#![no_std]
#![deny(unsafe_code)]

pub mod events;
pub mod multiplexer;

// Re-export key types
pub use events::{KeyEvent, KeySink, ANY_KEY};
pub use multiplexer::{ButtonMultiplexer, InputError, SLOT_COUNT};
