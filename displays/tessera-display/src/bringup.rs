//! Panel discovery handshake
//!
//! The display daughter-board answers a 17-bit identity code on the
//! button multiplexer's data line. Bring-up keeps pulsing the panel
//! reset line and re-reading until something answers; a code of all ones
//! means the data line is floating high and nothing is attached.

use embedded_hal::delay::DelayNs;
use tessera_hal::spi::Mode;
use tessera_hal::{DigitalPin, SpiBus, SpiConfig};
use tessera_input::ButtonMultiplexer;

use crate::error::DisplayError;

/// Number of identity bits shifted out during discovery
pub const IDENTITY_BITS: usize = 17;

/// Identity code read when nothing drives the data line
pub const NO_PANEL: u32 = 0x1ffff;

/// Poll for an attached panel and return its identity code
///
/// Each round pulses reset low for ~10 us, waits for the panel to come
/// out of reset (it needs around 1.2 ms, we give it 3) plus a settling
/// delay, then shifts the identity code out through the multiplexer.
/// Zero means the panel has not answered yet and the round repeats;
/// [`NO_PANEL`] means nothing is attached and bring-up cannot continue.
pub fn wait_for_panel<L, C, D, R, T>(
    mux: &mut ButtonMultiplexer<L, C, D>,
    reset: &mut R,
    delay: &mut T,
) -> Result<u32, DisplayError>
where
    L: DigitalPin,
    C: DigitalPin,
    D: DigitalPin,
    R: DigitalPin,
    T: DelayNs,
{
    loop {
        reset.set_value(false);
        delay.delay_us(10);
        reset.set_value(true);
        delay.delay_ms(3);

        delay.delay_ms(100);

        let code = mux.read_bits(IDENTITY_BITS);
        if code == NO_PANEL {
            return Err(DisplayError::NotFound);
        }
        if code != 0 {
            return Ok(code);
        }

        delay.delay_ms(100);
    }
}

/// Clock the SPI transport and force the peripheral out of reset
///
/// The peripheral only latches its configuration once it has clocked a
/// transfer, so a single throwaway byte goes out before the panel reset
/// line is toggled. The panel runs SPI mode 0.
pub fn prepare_transport<B: SpiBus>(bus: &mut B, frequency: u32) -> Result<(), DisplayError> {
    bus.configure(SpiConfig {
        frequency,
        mode: Mode::Mode0,
    })
    .map_err(|_| DisplayError::Panel)?;
    bus.write(&[0]).map_err(|_| DisplayError::Panel)
}
