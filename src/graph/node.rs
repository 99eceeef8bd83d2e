//! Station handle.
//!
//! Stations are the vertices of the map. Identity is the handle, never the
//! position: two stations may share coordinates when inserted that way.

use std::fmt;

/// Stable station identifier.
///
/// Handles are assigned monotonically and never reused, so a handle to a
/// removed station stays invalid even after its storage slot is recycled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationId(pub u32);

impl StationId {
    /// Create a new StationId from a raw u32.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Station({})", self.0)
    }
}

impl From<u32> for StationId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<StationId> for u32 {
    #[inline]
    fn from(id: StationId) -> Self {
        id.0
    }
}
