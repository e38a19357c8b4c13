//! GPIO pin abstractions
//!
//! Provides a trait for pins that are both driven as outputs and sampled
//! as inputs, as required by bit-banged serial protocols where a pin's
//! direction follows the protocol phase.

/// Input pull configuration applied while a pin is sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    /// No pull resistor (floating input)
    None,
    /// Pull-down resistor engaged
    Down,
}

/// Digital pin that can drive a level or be read back as an input
///
/// Implementations handle the actual register manipulation for the
/// specific chip. Reading reconfigures the pin as an input with the
/// requested pull; driving reconfigures it as an output. Reading with
/// [`Pull::None`] and never driving again releases the pin to a neutral,
/// non-driving state.
pub trait DigitalPin {
    /// Drive the pin to the given level
    fn set_value(&mut self, high: bool);

    /// Sample the pin with the given pull configuration
    fn read(&mut self, pull: Pull) -> bool;

    /// Drive the pin high (logic 1)
    fn set_high(&mut self) {
        self.set_value(true);
    }

    /// Drive the pin low (logic 0)
    fn set_low(&mut self) {
        self.set_value(false);
    }
}
