//! Simple-path enumeration between two stations.
//!
//! Depth-first search with explicit backtracking. The search keeps a prefix
//! (the stations from the start to the current station) and a cursor into
//! each prefix station's link list. Stepping onto a neighbour pushes it,
//! exhausting a station's links pops it, so the prefix is always restored
//! to exactly its state before a branch was entered.
//!
//! Neighbours already on the prefix are skipped, which keeps every path
//! simple and guarantees termination on cyclic graphs. A neighbour that is
//! not the destination and whose links all lead back onto the prefix (or to
//! itself) is never entered, since no path can continue through it.
//!
//! The stack is explicit rather than recursive so long chains cannot
//! overflow the call stack.

use std::collections::HashSet;

use crate::config::SearchLimits;
use crate::error::GraphError;
use crate::graph::{StationGraph, StationId};

/// An ordered sequence of stations from a start to a destination, inclusive.
pub type Path = Vec<StationId>;

/// Enumerates simple paths over a borrowed graph.
///
/// All backtracking state lives in the call to [`PathEnumerator::enumerate`],
/// so one enumerator may serve any number of queries.
#[derive(Clone, Copy)]
pub struct PathEnumerator<'g> {
    graph: &'g StationGraph,
    limits: SearchLimits,
}

/// Result of one enumeration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Enumeration {
    /// Completed paths in discovery order.
    pub paths: Vec<Path>,
    /// Whether a search limit cut off a branch that was still open; more
    /// paths may exist. Reaching `max_paths` with nothing left to explore
    /// does not count.
    pub truncated: bool,
}

impl<'g> PathEnumerator<'g> {
    /// Create an enumerator without search limits.
    pub fn new(graph: &'g StationGraph) -> Self {
        Self::with_limits(graph, SearchLimits::default())
    }

    pub fn with_limits(graph: &'g StationGraph, limits: SearchLimits) -> Self {
        Self { graph, limits }
    }

    pub fn limits(&self) -> SearchLimits {
        self.limits
    }

    /// Enumerate the simple paths from `start` to `dest`.
    ///
    /// - `start == dest` yields the single path `[start]`.
    /// - A start whose only link is a self-loop yields nothing.
    /// - An unreachable destination yields nothing.
    ///
    /// Paths are discovered in link insertion order at every station.
    pub fn enumerate(&self, start: StationId, dest: StationId) -> Result<Enumeration, GraphError> {
        for id in [start, dest] {
            if !self.graph.contains_station(id) {
                return Err(GraphError::StationNotFound { id });
            }
        }

        if start == dest {
            return Ok(Enumeration {
                paths: vec![vec![start]],
                truncated: false,
            });
        }
        if self.graph.is_self_loop_only(start) {
            tracing::trace!("{} is cut off by its self-loop", start);
            return Ok(Enumeration::default());
        }

        let mut search = Search::new(start);

        while let Some(&current) = search.prefix.last() {
            let depth = search.prefix.len() - 1;
            let cursor = search.cursors[depth];
            let Some(&link) = self.graph.links_of(current).get(cursor) else {
                search.pop();
                continue;
            };
            search.cursors[depth] += 1;

            let Some(next) = self.graph.opposite(link, current) else {
                continue;
            };
            if search.on_path.contains(&next) {
                continue;
            }

            // Links on the path once `next` is taken.
            let hops = depth + 1;

            if next == dest {
                if !self.limits.allows_hops(hops) {
                    search.truncated = true;
                    continue;
                }
                if self.limits.is_full(search.paths.len()) {
                    search.truncated = true;
                    break;
                }
                let mut path = search.prefix.clone();
                path.push(next);
                tracing::trace!("found path {:?}", path);
                search.paths.push(path);
                continue;
            }

            if self.is_dead_end(next, &search.on_path) {
                tracing::trace!("pruned dead end {}", next);
                continue;
            }
            // Entering `next` only pays off if one more hop is allowed.
            if !self.limits.allows_hops(hops + 1) {
                search.truncated = true;
                continue;
            }
            if self.limits.is_full(search.paths.len()) {
                search.truncated = true;
                break;
            }

            search.push(next);
        }

        if search.truncated {
            tracing::warn!(
                "path search {} -> {} truncated by limits {:?} after {} path(s)",
                start,
                dest,
                self.limits,
                search.paths.len()
            );
        }

        Ok(Enumeration {
            paths: search.paths,
            truncated: search.truncated,
        })
    }

    /// A station is a dead end when every link leads to itself or back onto
    /// the current path.
    fn is_dead_end(&self, station: StationId, on_path: &HashSet<StationId>) -> bool {
        self.graph.links_of(station).iter().all(|&link| {
            self.graph
                .opposite(link, station)
                .is_none_or(|other| other == station || on_path.contains(&other))
        })
    }
}

/// Backtracking state for one enumeration.
struct Search {
    prefix: Vec<StationId>,
    /// Next link to try for each prefix station.
    cursors: Vec<usize>,
    on_path: HashSet<StationId>,
    paths: Vec<Path>,
    truncated: bool,
}

impl Search {
    fn new(start: StationId) -> Self {
        Self {
            prefix: vec![start],
            cursors: vec![0],
            on_path: HashSet::from([start]),
            paths: Vec::new(),
            truncated: false,
        }
    }

    fn push(&mut self, station: StationId) {
        self.prefix.push(station);
        self.cursors.push(0);
        self.on_path.insert(station);
    }

    fn pop(&mut self) {
        if let Some(station) = self.prefix.pop() {
            self.cursors.pop();
            self.on_path.remove(&station);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A(0,0) B(2,0) C(2,98) D(2,99) E(3,3) F(4,6);
    /// A-B, A-C, A-D, C-E, C-F, D-F.
    fn expedition() -> (StationGraph, Vec<StationId>) {
        let mut graph = StationGraph::new();
        let ids = graph.insert_stations_from_positions(&[
            0.0, 0.0, 2.0, 0.0, 2.0, 98.0, 2.0, 99.0, 3.0, 3.0, 4.0, 6.0,
        ]).unwrap();
        let [a, b, c, d, e, f] = ids[..] else {
            unreachable!()
        };
        for (u, v) in [(a, b), (a, c), (a, d), (c, e), (c, f), (d, f)] {
            graph.insert_link(u, v).unwrap();
        }
        (graph, ids)
    }

    #[test]
    fn test_start_equals_dest() {
        let (graph, ids) = expedition();
        let found = PathEnumerator::new(&graph).enumerate(ids[0], ids[0]).unwrap();
        assert_eq!(found.paths, vec![vec![ids[0]]]);
    }

    #[test]
    fn test_enumerates_all_simple_paths_in_link_order() {
        let (graph, ids) = expedition();
        let [a, _b, c, d, _e, f] = ids[..] else {
            unreachable!()
        };

        let found = PathEnumerator::new(&graph).enumerate(a, f).unwrap();
        assert_eq!(found.paths, vec![vec![a, c, f], vec![a, d, f]]);
        assert!(!found.truncated);
    }

    #[test]
    fn test_paths_through_cycle() {
        // Square a-b-c-d-a with a diagonal a-c.
        let mut graph = StationGraph::new();
        let ids = graph.insert_stations_from_positions(&[0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0]).unwrap();
        let [a, b, c, d] = ids[..] else { unreachable!() };
        for (u, v) in [(a, b), (b, c), (c, d), (d, a), (a, c)] {
            graph.insert_link(u, v).unwrap();
        }

        let found = PathEnumerator::new(&graph).enumerate(a, c).unwrap();
        assert_eq!(
            found.paths,
            vec![vec![a, b, c], vec![a, d, c], vec![a, c]]
        );
    }

    #[test]
    fn test_backtracking_restores_prefix() {
        // Two branches off the start, each with its own detour before the
        // destination. A prefix that is not restored on backtrack would
        // leak stations from the first branch into the second.
        let mut graph = StationGraph::new();
        let ids = graph.insert_stations_from_positions(&[
            0.0, 0.0, 1.0, 0.0, 2.0, 0.0, 1.0, 1.0, 2.0, 1.0, 3.0, 0.0,
        ]).unwrap();
        let [s, p, q, x, y, t] = ids[..] else { unreachable!() };
        for (u, v) in [(s, p), (p, q), (q, t), (s, x), (x, y), (y, t), (p, x)] {
            graph.insert_link(u, v).unwrap();
        }

        let found = PathEnumerator::new(&graph).enumerate(s, t).unwrap();
        assert_eq!(
            found.paths,
            vec![
                vec![s, p, q, t],
                vec![s, p, x, y, t],
                vec![s, x, y, t],
                vec![s, x, p, q, t],
            ]
        );
    }

    #[test]
    fn test_unreachable_destination() {
        let mut graph = StationGraph::new();
        let a = graph.insert_station(0.0, 0.0).unwrap();
        let b = graph.insert_station(1.0, 0.0).unwrap();
        let c = graph.insert_station(5.0, 5.0).unwrap();
        graph.insert_link(a, b).unwrap();

        let found = PathEnumerator::new(&graph).enumerate(a, c).unwrap();
        assert!(found.paths.is_empty());
    }

    #[test]
    fn test_self_loop_only_start_is_cut_off() {
        let mut graph = StationGraph::new();
        let a = graph.insert_station(0.0, 0.0).unwrap();
        let b = graph.insert_station(1.0, 0.0).unwrap();
        graph.insert_link(a, a).unwrap();

        let found = PathEnumerator::new(&graph).enumerate(a, b).unwrap();
        assert!(found.paths.is_empty());
    }

    #[test]
    fn test_self_loops_do_not_block_paths() {
        let mut graph = StationGraph::new();
        let a = graph.insert_station(0.0, 0.0).unwrap();
        let b = graph.insert_station(1.0, 0.0).unwrap();
        let c = graph.insert_station(2.0, 0.0).unwrap();
        graph.insert_link(a, a).unwrap();
        graph.insert_link(a, b).unwrap();
        graph.insert_link(b, b).unwrap();
        graph.insert_link(b, c).unwrap();

        let found = PathEnumerator::new(&graph).enumerate(a, c).unwrap();
        assert_eq!(found.paths, vec![vec![a, b, c]]);
    }

    #[test]
    fn test_dead_end_pruning_keeps_results() {
        let mut graph = StationGraph::new();
        let ids = graph.insert_stations_from_positions(&[0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 2.0, 0.0]).unwrap();
        let [a, spur, loop_end, z] = ids[..] else { unreachable!() };
        graph.insert_link(a, spur).unwrap();
        graph.insert_link(spur, loop_end).unwrap();
        graph.insert_link(loop_end, loop_end).unwrap();
        graph.insert_link(a, z).unwrap();

        let found = PathEnumerator::new(&graph).enumerate(a, z).unwrap();
        assert_eq!(found.paths, vec![vec![a, z]]);
    }

    #[test]
    fn test_unknown_station() {
        let (graph, ids) = expedition();
        let ghost = StationId(1000);
        assert_eq!(
            PathEnumerator::new(&graph).enumerate(ids[0], ghost),
            Err(GraphError::StationNotFound { id: ghost })
        );
    }

    #[test]
    fn test_max_depth_limit() {
        let (graph, ids) = expedition();
        let [a, _b, _c, _d, e, f] = ids[..] else {
            unreachable!()
        };

        let limits = SearchLimits::unlimited().with_max_depth(1);
        let found = PathEnumerator::with_limits(&graph, limits).enumerate(a, f).unwrap();
        assert!(found.paths.is_empty());
        assert!(found.truncated);

        let limits = SearchLimits::unlimited().with_max_depth(2);
        let found = PathEnumerator::with_limits(&graph, limits).enumerate(a, e).unwrap();
        assert_eq!(found.paths, vec![vec![a, ids[2], e]]);
    }

    #[test]
    fn test_max_paths_limit() {
        let (graph, ids) = expedition();
        let [a, _b, c, _d, _e, f] = ids[..] else {
            unreachable!()
        };

        let limits = SearchLimits::unlimited().with_max_paths(1);
        let found = PathEnumerator::with_limits(&graph, limits).enumerate(a, f).unwrap();
        assert_eq!(found.paths, vec![vec![a, c, f]]);
        assert!(found.truncated);
    }

    #[test]
    fn test_limits_met_exactly_are_not_truncation() {
        let (graph, ids) = expedition();
        let [a, _b, c, d, _e, f] = ids[..] else {
            unreachable!()
        };
        let all = vec![vec![a, c, f], vec![a, d, f]];

        for limits in [
            SearchLimits::unlimited().with_max_paths(2),
            SearchLimits::unlimited().with_max_depth(2),
            SearchLimits::unlimited().with_max_depth(2).with_max_paths(2),
        ] {
            let found = PathEnumerator::with_limits(&graph, limits).enumerate(a, f).unwrap();
            assert_eq!(found.paths, all, "{limits:?}");
            assert!(!found.truncated, "{limits:?}");
        }
    }

    #[test]
    fn test_dead_end_beyond_depth_is_not_truncation() {
        // a - b - c with a spur b - s; the spur cannot lead anywhere, so a
        // depth limit that forbids entering it loses nothing.
        let mut graph = StationGraph::new();
        let ids = graph
            .insert_stations_from_positions(&[0.0, 0.0, 1.0, 0.0, 2.0, 0.0, 1.0, 1.0])
            .unwrap();
        let [a, b, c, s] = ids[..] else { unreachable!() };
        for (u, v) in [(a, b), (b, s), (b, c)] {
            graph.insert_link(u, v).unwrap();
        }

        let limits = SearchLimits::unlimited().with_max_depth(2);
        let found = PathEnumerator::with_limits(&graph, limits).enumerate(a, c).unwrap();
        assert_eq!(found.paths, vec![vec![a, b, c]]);
        assert!(!found.truncated);
    }
}
