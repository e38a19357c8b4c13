//! Board configuration lookup
//!
//! Boards carry a small key/value table (button wiring, display geometry)
//! baked in at build time. Drivers resolve wiring through this trait so
//! the same driver code serves every board revision.

/// Board configuration lookup
pub trait ConfigSource {
    /// Look up a configuration value by key
    ///
    /// Returns `None` for absent keys.
    fn get(&self, key: u16) -> Option<i32>;
}
