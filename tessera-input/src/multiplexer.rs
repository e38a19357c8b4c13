//! Shift-register button multiplexer
//!
//! A serial-in parallel-out shift register lets eight button lines share
//! three pins: latch captures the parallel inputs, clock advances the
//! register, data carries the captured bits out one at a time. A periodic
//! [`ButtonMultiplexer::poll`] samples all eight lines and emits edge
//! events for bits whose level changed since the previous tick.
//!
//! [`ButtonMultiplexer::read_bits`] is also the probe primitive used
//! during display bring-up: the panel answers a 17-bit identity code on
//! the same data line.

use tessera_hal::{ConfigSource, DigitalPin, Pull};

use crate::events::{KeyEvent, KeySink, ANY_KEY};

/// Number of shift-register stages sampled per poll
pub const SLOT_COUNT: usize = 8;

// Legacy pin-slot bands used by board configuration tables. Values in the
// inverted band mark the line as active-low in addition to binding it.
const SLOT_BASE: u32 = 1000;
const SLOT_INVERTED_BASE: u32 = 1050;

/// Errors from multiplexer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputError {
    /// Slot index outside 0..8
    InvalidSlot,
}

/// Shift-register button multiplexer driver
///
/// Owns the three protocol pins and the per-bit binding table. Sampling
/// state lives here between polls, so [`ButtonMultiplexer::is_pressed`]
/// reflects the last stored sample rather than a fresh read.
pub struct ButtonMultiplexer<L, C, D> {
    latch: L,
    clock: C,
    data: D,
    state: u8,
    inv_mask: u8,
    button_id_per_bit: [u16; SLOT_COUNT],
    enabled: bool,
}

impl<L, C, D> ButtonMultiplexer<L, C, D>
where
    L: DigitalPin,
    C: DigitalPin,
    D: DigitalPin,
{
    /// Create the driver and prime the shift register
    ///
    /// Leaves latch and clock high with the data line held as a
    /// pull-down input, the idle state of the shift-in protocol.
    pub fn new(mut latch: L, mut clock: C, mut data: D) -> Self {
        data.read(Pull::Down);
        latch.set_value(true);
        clock.set_value(true);

        Self {
            latch,
            clock,
            data,
            state: 0,
            inv_mask: 0,
            button_id_per_bit: [0; SLOT_COUNT],
            enabled: true,
        }
    }

    /// Bind a logical button id to a shift-register slot
    ///
    /// Id 0 unbinds the slot; it is the "any key" broadcast id and never
    /// identifies a specific button.
    pub fn bind_button(&mut self, slot: u8, id: u16) -> Result<(), InputError> {
        let slot = usize::from(slot);
        if slot >= SLOT_COUNT {
            return Err(InputError::InvalidSlot);
        }
        self.button_id_per_bit[slot] = id;
        Ok(())
    }

    /// Mark a slot as active-low
    ///
    /// The sampled level of an inverted slot is flipped before edge
    /// detection, normalizing buttons wired active-low into the register.
    pub fn set_inverted(&mut self, slot: u8) -> Result<(), InputError> {
        if usize::from(slot) >= SLOT_COUNT {
            return Err(InputError::InvalidSlot);
        }
        self.inv_mask |= 1 << slot;
        Ok(())
    }

    /// Bind a button from a board configuration entry
    ///
    /// Resolves `key` through the board table and decodes the legacy
    /// slot numbering: 1000..1008 binds the slot directly, 1050..1058
    /// binds the slot and marks it active-low. Returns whether a binding
    /// was made; absent keys and out-of-band values are ignored.
    pub fn bind_from_config<S: ConfigSource>(&mut self, config: &S, key: u16, id: u16) -> bool {
        let Some(raw) = config.get(key) else {
            return false;
        };
        let mut code = (raw as u32) & 0xffff;
        if (SLOT_INVERTED_BASE..SLOT_INVERTED_BASE + 8).contains(&code) {
            code -= SLOT_INVERTED_BASE - SLOT_BASE;
            self.inv_mask |= 1 << (code - SLOT_BASE);
        }
        if (SLOT_BASE..SLOT_BASE + 8).contains(&code) {
            self.button_id_per_bit[(code - SLOT_BASE) as usize] = id;
            return true;
        }
        false
    }

    /// Shift `bits` bits out of the register, MSB first
    ///
    /// Pulses latch low-then-high to capture the parallel inputs, then
    /// per bit: sample the data line, shift it into the accumulator,
    /// pulse clock low-then-high to advance the register. `bits` of 0
    /// returns 0 without touching the clock.
    pub fn read_bits(&mut self, bits: usize) -> u32 {
        self.latch.set_value(false);
        self.latch.set_value(true);

        let mut acc = 0u32;
        for _ in 0..bits {
            acc <<= 1;
            if self.data.read(Pull::Down) {
                acc |= 1;
            }

            self.clock.set_value(false);
            self.clock.set_value(true);
        }

        acc
    }

    /// Sample all eight lines and emit edge events
    ///
    /// Invoked once per scheduler tick. Each 0→1 transition on a bound
    /// bit emits [`KeyEvent::Down`] for its id and then for [`ANY_KEY`];
    /// 1→0 emits [`KeyEvent::Up`] the same way. Unbound bits never emit,
    /// but their level still lands in the stored state.
    pub fn poll<S: KeySink>(&mut self, sink: &mut S) {
        if !self.enabled {
            return;
        }

        let new_state = (self.read_bits(SLOT_COUNT) as u8) ^ self.inv_mask;
        if new_state == self.state {
            return;
        }

        for bit in 0..SLOT_COUNT {
            let mask = 1u8 << bit;
            let id = self.button_id_per_bit[bit];
            if id == 0 {
                continue;
            }
            let event = match (self.state & mask != 0, new_state & mask != 0) {
                (false, true) => Some(KeyEvent::Down),
                (true, false) => Some(KeyEvent::Up),
                _ => None,
            };
            if let Some(event) = event {
                sink.emit(event, id);
                sink.emit(event, ANY_KEY);
            }
        }

        self.state = new_state;
    }

    /// Check a button against the last stored sample
    ///
    /// Scans the binding table in increasing bit order and reports the
    /// first slot bound to `id`; false if the id is bound nowhere.
    pub fn is_pressed(&self, id: u16) -> bool {
        if id == 0 {
            return false;
        }
        for bit in 0..SLOT_COUNT {
            if self.button_id_per_bit[bit] == id {
                return self.state & (1 << bit) != 0;
            }
        }
        false
    }

    /// Pressure shim for analog-button call sites
    ///
    /// Digital buttons report full scale (512) when pressed and 0
    /// otherwise.
    pub fn pressure_level(&self, id: u16) -> u16 {
        if self.is_pressed(id) {
            512
        } else {
            0
        }
    }

    /// Check whether sampling is active
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Release the pins and stop sampling
    ///
    /// All three pins go back to floating inputs so the lines can be
    /// repurposed. Terminal: there is no re-enable path.
    pub fn disable(&mut self) {
        self.data.read(Pull::None);
        self.latch.read(Pull::None);
        self.clock.read(Pull::None);
        self.enabled = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::Vec;
    use proptest::prelude::*;

    /// Pin that replays a fixed bit pattern, MSB first, wrapping around
    struct ScriptPin {
        pattern: u32,
        width: usize,
        cursor: usize,
        last_pull: Option<Pull>,
    }

    impl ScriptPin {
        fn new(pattern: u32, width: usize) -> Self {
            Self {
                pattern,
                width,
                cursor: 0,
                last_pull: None,
            }
        }

        fn rewind(&mut self, pattern: u32) {
            self.pattern = pattern;
            self.cursor = 0;
        }
    }

    impl DigitalPin for ScriptPin {
        fn set_value(&mut self, _high: bool) {}

        fn read(&mut self, pull: Pull) -> bool {
            self.last_pull = Some(pull);
            let shift = self.width - 1 - (self.cursor % self.width);
            self.cursor += 1;
            (self.pattern >> shift) & 1 == 1
        }
    }

    /// Pin that counts falling edges driven onto it
    #[derive(Default)]
    struct PulsePin {
        level: bool,
        falling: u32,
        last_pull: Option<Pull>,
    }

    impl DigitalPin for PulsePin {
        fn set_value(&mut self, high: bool) {
            if self.level && !high {
                self.falling += 1;
            }
            self.level = high;
        }

        fn read(&mut self, pull: Pull) -> bool {
            self.last_pull = Some(pull);
            false
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        events: Vec<(KeyEvent, u16), 64>,
    }

    impl KeySink for RecordingSink {
        fn emit(&mut self, event: KeyEvent, button: u16) {
            self.events.push((event, button)).unwrap();
        }
    }

    struct MapConfig {
        entries: &'static [(u16, i32)],
    }

    impl ConfigSource for MapConfig {
        fn get(&self, key: u16) -> Option<i32> {
            self.entries
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| *v)
        }
    }

    fn mux(pattern: u32) -> ButtonMultiplexer<PulsePin, PulsePin, ScriptPin> {
        let mut mux = ButtonMultiplexer::new(
            PulsePin::default(),
            PulsePin::default(),
            ScriptPin::new(pattern, 8),
        );
        // discard the priming read so the script starts aligned
        mux.data.cursor = 0;
        mux
    }

    #[test]
    fn read_bits_zero_is_zero() {
        let mut mux = mux(0xff);
        assert_eq!(mux.read_bits(0), 0);
        assert_eq!(mux.clock.falling, 0);
    }

    #[test]
    fn read_bits_msb_first() {
        let mut mux = mux(0b1011_0010);
        assert_eq!(mux.read_bits(8), 0b1011_0010);
        // one latch capture, one clock pulse per bit
        assert_eq!(mux.latch.falling, 1);
        assert_eq!(mux.clock.falling, 8);
        assert_eq!(mux.data.last_pull, Some(Pull::Down));
    }

    #[test]
    fn down_emits_id_then_any_key() {
        let mut mux = mux(0b0000_0010);
        mux.bind_button(1, 5).unwrap();

        let mut sink = RecordingSink::default();
        mux.poll(&mut sink);

        assert_eq!(
            sink.events.as_slice(),
            &[(KeyEvent::Down, 5), (KeyEvent::Down, ANY_KEY)]
        );
    }

    #[test]
    fn release_emits_up() {
        let mut mux = mux(0b0000_0010);
        mux.bind_button(1, 5).unwrap();

        let mut sink = RecordingSink::default();
        mux.poll(&mut sink);
        sink.events.clear();

        mux.data.rewind(0);
        mux.poll(&mut sink);

        assert_eq!(
            sink.events.as_slice(),
            &[(KeyEvent::Up, 5), (KeyEvent::Up, ANY_KEY)]
        );
    }

    #[test]
    fn unbound_bit_is_silent_but_stored() {
        let mut mux = mux(0b0000_0001);
        let mut sink = RecordingSink::default();
        mux.poll(&mut sink);

        assert!(sink.events.is_empty());
        assert_eq!(mux.state, 0b0000_0001);
    }

    #[test]
    fn unchanged_state_emits_nothing() {
        let mut mux = mux(0b0000_0010);
        mux.bind_button(1, 5).unwrap();

        let mut sink = RecordingSink::default();
        mux.poll(&mut sink);
        sink.events.clear();
        mux.poll(&mut sink);

        assert!(sink.events.is_empty());
    }

    #[test]
    fn inverted_slot_flips_idle_level() {
        let mut mux = mux(0);
        mux.bind_button(2, 7).unwrap();
        mux.set_inverted(2).unwrap();

        // line idles low, inversion makes that read as pressed
        let mut sink = RecordingSink::default();
        mux.poll(&mut sink);

        assert_eq!(
            sink.events.as_slice(),
            &[(KeyEvent::Down, 7), (KeyEvent::Down, ANY_KEY)]
        );
        assert!(mux.is_pressed(7));
    }

    #[test]
    fn duplicate_id_resolves_to_lowest_bit() {
        let mut mux = mux(0b0000_1000);
        mux.bind_button(0, 9).unwrap();
        mux.bind_button(3, 9).unwrap();

        let mut sink = RecordingSink::default();
        mux.poll(&mut sink);

        // bit 3 is down, but the scan stops at bit 0
        assert!(!mux.is_pressed(9));

        mux.data.rewind(0b0000_1001);
        mux.poll(&mut sink);
        assert!(mux.is_pressed(9));
    }

    #[test]
    fn is_pressed_uses_stored_state_not_a_fresh_read() {
        let mut mux = mux(0b0000_0001);
        mux.bind_button(0, 3).unwrap();

        let mut sink = RecordingSink::default();
        mux.poll(&mut sink);
        assert!(mux.is_pressed(3));

        // line level changes, but no poll has stored it yet
        mux.data.rewind(0);
        assert!(mux.is_pressed(3));
    }

    #[test]
    fn is_pressed_false_for_unbound_id() {
        let mut mux = mux(0xff);
        let mut sink = RecordingSink::default();
        mux.poll(&mut sink);

        assert!(!mux.is_pressed(42));
        assert!(!mux.is_pressed(ANY_KEY));
    }

    #[test]
    fn pressure_level_is_full_scale_or_zero() {
        let mut mux = mux(0b0000_0001);
        mux.bind_button(0, 3).unwrap();

        assert_eq!(mux.pressure_level(3), 0);

        let mut sink = RecordingSink::default();
        mux.poll(&mut sink);
        assert_eq!(mux.pressure_level(3), 512);
    }

    #[test]
    fn out_of_range_slot_is_rejected() {
        let mut mux = mux(0);
        assert_eq!(mux.bind_button(8, 1), Err(InputError::InvalidSlot));
        assert_eq!(mux.set_inverted(8), Err(InputError::InvalidSlot));
    }

    #[test]
    fn disable_releases_pins_and_stops_sampling() {
        let mut mux = mux(0b0000_0010);
        mux.bind_button(1, 5).unwrap();
        mux.disable();

        let mut sink = RecordingSink::default();
        mux.poll(&mut sink);

        assert!(sink.events.is_empty());
        assert!(!mux.is_enabled());
        assert_eq!(mux.data.last_pull, Some(Pull::None));
        assert_eq!(mux.latch.last_pull, Some(Pull::None));
        assert_eq!(mux.clock.last_pull, Some(Pull::None));
    }

    #[test]
    fn config_binding_decodes_legacy_bands() {
        let config = MapConfig {
            entries: &[(1, 1052), (2, 1003), (3, 5)],
        };

        let mut mux = mux(0);
        // inverted band: binds the slot and marks it active-low
        assert!(mux.bind_from_config(&config, 1, 20));
        assert_eq!(mux.button_id_per_bit[2], 20);
        assert_eq!(mux.inv_mask, 0b0000_0100);

        // plain band: binds without inversion
        assert!(mux.bind_from_config(&config, 2, 21));
        assert_eq!(mux.button_id_per_bit[3], 21);
        assert_eq!(mux.inv_mask, 0b0000_0100);

        // absent key and out-of-band values are ignored
        assert!(!mux.bind_from_config(&config, 9, 22));
        assert!(!mux.bind_from_config(&config, 3, 22));
    }

    proptest! {
        #[test]
        fn arbitrary_sequences_emit_two_events_per_bound_transition(
            samples in proptest::collection::vec(any::<u8>(), 1..64)
        ) {
            let mut mux = mux(0);
            mux.bind_button(1, 5).unwrap();
            mux.bind_button(4, 6).unwrap();

            let bound_mask = 0b0001_0010u8;
            let mut prev = 0u8;
            let mut sink = RecordingSink::default();

            for &pattern in &samples {
                mux.data.rewind(u32::from(pattern));
                sink.events.clear();
                mux.poll(&mut sink);

                // one (id, any-key) pair per bound bit that changed level
                let expected = ((pattern ^ prev) & bound_mask).count_ones() as usize * 2;
                prop_assert_eq!(sink.events.len(), expected);
                for pair in sink.events.chunks(2) {
                    prop_assert_eq!(pair[0].0, pair[1].0);
                    prop_assert_eq!(pair[1].1, ANY_KEY);
                }
                prev = pattern;
            }
        }
    }
}
