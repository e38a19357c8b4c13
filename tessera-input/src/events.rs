//! Key events emitted by the button multiplexer

/// Broadcast subject id meaning "any key"
///
/// Every specific key event is followed by a second emission with this id,
/// so listeners can subscribe to all buttons at once. Id 0 is therefore
/// never a valid button id.
pub const ANY_KEY: u16 = 0;

/// Edge kind of a key transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyEvent {
    /// Button went from released to pressed
    Down,
    /// Button went from pressed to released
    Up,
}

impl KeyEvent {
    /// Returns true for the pressed edge
    pub fn is_down(&self) -> bool {
        matches!(self, KeyEvent::Down)
    }
}

/// Sink for key transition events
///
/// The firmware wires this to its event bus; tests record emissions.
pub trait KeySink {
    /// Deliver one key event for the given button id
    fn emit(&mut self, event: KeyEvent, button: u16);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn down_up_edges() {
        assert!(KeyEvent::Down.is_down());
        assert!(!KeyEvent::Up.is_down());
    }
}
