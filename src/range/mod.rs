//! Range-constrained reachability.
//!
//! - `paths`: simple-path enumeration by backtracking DFS
//! - `evaluator`: radius checks, path bottlenecks, minimum range
//!
//! Queries borrow the graph immutably for their whole duration.

mod evaluator;
mod paths;

pub use evaluator::{RANGE_DECIMALS, RangeEvaluator, round_range};
pub use paths::{Enumeration, Path, PathEnumerator};

use crate::error::GraphError;
use crate::graph::{StationGraph, StationId};

/// Range queries with default (unlimited) search limits.
impl StationGraph {
    /// See [`RangeEvaluator::find_emergency_range`].
    pub fn find_emergency_range(&self, station: StationId) -> Result<f64, GraphError> {
        RangeEvaluator::new(self).find_emergency_range(station)
    }

    /// See [`RangeEvaluator::find_path`].
    pub fn find_path(
        &self,
        start: StationId,
        dest: StationId,
        radius: f64,
    ) -> Result<Option<Path>, GraphError> {
        RangeEvaluator::new(self).find_path(start, dest, radius)
    }

    /// See [`RangeEvaluator::minimum_range`].
    pub fn minimum_range(&self, start: StationId, dest: StationId) -> Result<f64, GraphError> {
        RangeEvaluator::new(self).minimum_range(start, dest)
    }
}
