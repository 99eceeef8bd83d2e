//! Radio-range queries over enumerated paths.
//!
//! Every distance here is measured from a path's first station, never hop
//! to hop: a path is usable with radius `r` when no station on it is
//! farther than `r` from where the path starts.

use std::collections::{HashSet, VecDeque};

use crate::config::SearchLimits;
use crate::error::GraphError;
use crate::graph::{StationGraph, StationId};

use super::paths::{Path, PathEnumerator};

/// Decimal places kept by rounded range results.
pub const RANGE_DECIMALS: i32 = 5;

/// Round half away from zero to [`RANGE_DECIMALS`] places.
pub fn round_range(value: f64) -> f64 {
    let scale = 10f64.powi(RANGE_DECIMALS);
    (value * scale).round() / scale
}

/// Answers range queries against a borrowed graph.
#[derive(Clone, Copy)]
pub struct RangeEvaluator<'g> {
    graph: &'g StationGraph,
    enumerator: PathEnumerator<'g>,
}

impl<'g> RangeEvaluator<'g> {
    pub fn new(graph: &'g StationGraph) -> Self {
        Self::with_limits(graph, SearchLimits::default())
    }

    pub fn with_limits(graph: &'g StationGraph, limits: SearchLimits) -> Self {
        Self {
            graph,
            enumerator: PathEnumerator::with_limits(graph, limits),
        }
    }

    /// Distance from `station` to the farthest station in the graph,
    /// rounded to five decimals. Zero when `station` is alone.
    pub fn find_emergency_range(&self, station: StationId) -> Result<f64, GraphError> {
        let (x, y) = self
            .graph
            .position(station)
            .ok_or(GraphError::StationNotFound { id: station })?;

        let farthest = self
            .graph
            .positions()
            .map(|(_, px, py)| {
                let dx = px - x;
                let dy = py - y;
                (dx * dx + dy * dy).sqrt()
            })
            .fold(0.0, f64::max);

        Ok(round_range(farthest))
    }

    /// Whether every station after the first lies within `radius` of the
    /// first. Empty and single-station paths are trivially in range.
    pub fn in_range(&self, radius: f64, path: &[StationId]) -> bool {
        let Some((&origin, rest)) = path.split_first() else {
            return true;
        };
        rest.iter().all(|&station| {
            self.graph
                .distance(origin, station)
                .is_some_and(|d| d <= radius)
        })
    }

    /// The largest distance from the first station to any other station on
    /// the path. Zero for empty and single-station paths.
    ///
    /// A station missing from the graph is infinitely far, so a path that
    /// [`RangeEvaluator::in_range`] rejects for any radius has an infinite
    /// bottleneck.
    pub fn path_bottleneck(&self, path: &[StationId]) -> f64 {
        let Some((&origin, rest)) = path.split_first() else {
            return 0.0;
        };
        rest.iter()
            .map(|&station| {
                self.graph
                    .distance(origin, station)
                    .unwrap_or(f64::INFINITY)
            })
            .fold(0.0, f64::max)
    }

    /// The first enumerated path from `start` to `dest` that stays within
    /// `radius` of `start`.
    ///
    /// `start == dest` always yields `[start]`, even for a zero radius.
    /// Otherwise a non-positive radius never yields a path.
    pub fn find_path(
        &self,
        start: StationId,
        dest: StationId,
        radius: f64,
    ) -> Result<Option<Path>, GraphError> {
        if start == dest {
            return if self.graph.contains_station(start) {
                Ok(Some(vec![start]))
            } else {
                Err(GraphError::StationNotFound { id: start })
            };
        }
        if radius <= 0.0 {
            for id in [start, dest] {
                if !self.graph.contains_station(id) {
                    return Err(GraphError::StationNotFound { id });
                }
            }
            return Ok(None);
        }

        let found = self.enumerator.enumerate(start, dest)?;
        let path = found
            .paths
            .into_iter()
            .find(|path| self.in_range(radius, path));

        tracing::debug!(
            "find_path {} -> {} within {}: {}",
            start,
            dest,
            radius,
            if path.is_some() { "found" } else { "none" }
        );
        Ok(path)
    }

    /// The smallest radius that admits at least one path from `start` to
    /// `dest`, rounded to five decimals.
    ///
    /// Fails with [`GraphError::Unreachable`] when no path exists.
    pub fn minimum_range(&self, start: StationId, dest: StationId) -> Result<f64, GraphError> {
        let found = self.enumerator.enumerate(start, dest)?;
        if start == dest {
            return Ok(0.0);
        }

        let minimum = found
            .paths
            .iter()
            .map(|path| self.path_bottleneck(path))
            .min_by(f64::total_cmp)
            .ok_or(GraphError::Unreachable {
                from: start,
                to: dest,
            })?;

        tracing::debug!("minimum range {} -> {}: {}", start, dest, minimum);
        Ok(round_range(minimum))
    }

    /// Every station reachable from `start` by a path that stays within
    /// `radius` of `start`, in insertion order. `start` itself is included.
    ///
    /// Matches [`RangeEvaluator::find_path`]: a non-positive radius reaches
    /// only `start`, and a `max_depth` limit bounds the hop count. Stations
    /// outside the radius are never entered, so this is a breadth-first
    /// flood fill over the in-range part of the graph. `max_paths` does not
    /// apply.
    pub fn reachable_within(
        &self,
        start: StationId,
        radius: f64,
    ) -> Result<Vec<StationId>, GraphError> {
        if !self.graph.contains_station(start) {
            return Err(GraphError::StationNotFound { id: start });
        }
        if radius <= 0.0 {
            return Ok(vec![start]);
        }

        let limits = self.enumerator.limits();
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([(start, 0)]);
        while let Some((station, hops)) = queue.pop_front() {
            // Breadth-first, so `hops` is the fewest links to `station`.
            if !limits.allows_hops(hops + 1) {
                continue;
            }
            for next in self.graph.neighbors(station) {
                if seen.contains(&next) || !self.in_range(radius, &[start, next]) {
                    continue;
                }
                seen.insert(next);
                queue.push_back((next, hops + 1));
            }
        }

        let mut reached: Vec<_> = seen.into_iter().collect();
        reached.sort_unstable();
        Ok(reached)
    }
}
