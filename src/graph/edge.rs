//! Link handle and the unordered endpoint pair.
//!
//! A link connects two stations with no direction: `Link::new(a, b)` and
//! `Link::new(b, a)` compare and hash equal. A self-loop (`a == b`) is
//! structurally allowed.

use std::fmt;
use std::hash::{Hash, Hasher};

use super::node::StationId;

/// Stable link identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkId(pub u32);

impl LinkId {
    /// Create a new LinkId from a raw u32.
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

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Link({})", self.0)
    }
}

impl From<u32> for LinkId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<LinkId> for u32 {
    #[inline]
    fn from(id: LinkId) -> Self {
        id.0
    }
}

/// The endpoints of a link, compared without regard to order.
#[derive(Debug, Clone, Copy)]
pub struct Link {
    pub a: StationId,
    pub b: StationId,
}

impl Link {
    #[inline]
    pub fn new(a: StationId, b: StationId) -> Self {
        Self { a, b }
    }

    /// The endpoint across from `station`, or `None` if `station` is not an
    /// endpoint. A self-loop is its own opposite.
    #[inline]
    pub fn opposite(self, station: StationId) -> Option<StationId> {
        if station == self.a {
            Some(self.b)
        } else if station == self.b {
            Some(self.a)
        } else {
            None
        }
    }

    #[inline]
    pub fn is_self_loop(self) -> bool {
        self.a == self.b
    }

    #[inline]
    pub fn touches(self, station: StationId) -> bool {
        self.a == station || self.b == station
    }

    /// Endpoints in ascending order.
    #[inline]
    fn ordered(self) -> (StationId, StationId) {
        if self.a <= self.b {
            (self.a, self.b)
        } else {
            (self.b, self.a)
        }
    }
}

impl PartialEq for Link {
    fn eq(&self, other: &Self) -> bool {
        self.ordered() == other.ordered()
    }
}

impl Eq for Link {}

impl Hash for Link {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ordered().hash(state);
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -- {}", self.a, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_link_id() {
        let id = LinkId::new(7);
        assert_eq!(id.raw(), 7);
        assert_eq!(format!("{}", id), "Link(7)");

        let raw: u32 = LinkId::from(9).into();
        assert_eq!(raw, 9);
    }

    #[test]
    fn test_link_equality_is_symmetric() {
        let u = StationId(1);
        let v = StationId(2);
        assert_eq!(Link::new(u, v), Link::new(v, u));
        assert_ne!(Link::new(u, v), Link::new(u, StationId(3)));

        let mut set = HashSet::new();
        set.insert(Link::new(u, v));
        assert!(set.contains(&Link::new(v, u)));
    }

    #[test]
    fn test_opposite() {
        let u = StationId(1);
        let v = StationId(2);
        let link = Link::new(u, v);
        assert_eq!(link.opposite(u), Some(v));
        assert_eq!(link.opposite(v), Some(u));
        assert_eq!(link.opposite(StationId(3)), None);
    }

    #[test]
    fn test_self_loop() {
        let u = StationId(4);
        let link = Link::new(u, u);
        assert!(link.is_self_loop());
        assert_eq!(link.opposite(u), Some(u));
        assert!(link.touches(u));
        assert!(!Link::new(u, StationId(5)).is_self_loop());
    }
}
