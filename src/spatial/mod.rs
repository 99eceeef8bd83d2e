//! Spatial indexing of station positions.
//!
//! An R-tree answers exact occupancy checks for station moves as well as
//! nearest-station and radius queries.

mod rtree;

pub use rtree::SpatialIndex;
