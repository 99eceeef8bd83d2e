//! R-tree over station positions using the rstar crate.
//!
//! Provides:
//! - Exact occupancy checks (is a station at this point?)
//! - Nearest station
//! - Stations within a radius

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use crate::graph::StationId;

/// A station position stored in the index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StationPoint {
    pub id: StationId,
    pub x: f64,
    pub y: f64,
}

impl StationPoint {
    pub fn new(id: StationId, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }
}

impl RTreeObject for StationPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.x, self.y])
    }
}

impl PointDistance for StationPoint {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.x - point[0];
        let dy = self.y - point[1];
        dx * dx + dy * dy
    }

    // Occupancy is exact coordinate equality.
    fn contains_point(&self, point: &[f64; 2]) -> bool {
        self.x == point[0] && self.y == point[1]
    }
}

/// Spatial index for stations.
///
/// Kept in sync incrementally by the graph on every insert, remove and move.
pub struct SpatialIndex {
    tree: RTree<StationPoint>,
}

impl SpatialIndex {
    /// Create a new empty spatial index.
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Insert a station into the index.
    pub fn insert(&mut self, id: StationId, x: f64, y: f64) {
        self.tree.insert(StationPoint::new(id, x, y));
    }

    /// Remove a station from the index.
    ///
    /// Returns true if the station was found at `(x, y)` and removed.
    pub fn remove(&mut self, id: StationId, x: f64, y: f64) -> bool {
        self.tree.remove(&StationPoint::new(id, x, y)).is_some()
    }

    /// Stations located exactly at `(x, y)`.
    pub fn at_point(&self, x: f64, y: f64) -> Vec<StationId> {
        self.tree
            .locate_all_at_point(&[x, y])
            .map(|point| point.id)
            .collect()
    }

    /// Whether any station other than `except` sits exactly at `(x, y)`.
    pub fn is_occupied(&self, x: f64, y: f64, except: Option<StationId>) -> bool {
        self.tree
            .locate_all_at_point(&[x, y])
            .any(|point| Some(point.id) != except)
    }

    /// Find the station nearest to a point.
    pub fn nearest(&self, x: f64, y: f64) -> Option<StationId> {
        self.tree.nearest_neighbor(&[x, y]).map(|point| point.id)
    }

    /// Find all stations within `radius` of a point, boundary included.
    pub fn in_radius(&self, x: f64, y: f64, radius: f64) -> Vec<StationId> {
        self.tree
            .locate_within_distance([x, y], radius * radius)
            .map(|point| point.id)
            .collect()
    }

    /// Clear all stations from the index.
    pub fn clear(&mut self) {
        self.tree = RTree::new();
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}
