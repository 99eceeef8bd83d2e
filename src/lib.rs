//! Polar Range - WASM Module
//!
//! Models a map of field stations connected by radio links and answers
//! range-constrained reachability questions: how far the farthest station
//! is, whether a route exists that never leaves a radio radius around its
//! origin, and the smallest radius that makes such a route possible.
//!
//! # Architecture
//!
//! - `graph`: Station graph using petgraph's StableGraph
//! - `spatial`: R-tree over station positions (occupancy, proximity)
//! - `range`: Path enumeration and radius queries
//! - `config`: Search limits
//! - `error`: Error types
//!
//! The Rust API lives in [`StationGraph`] and [`RangeEvaluator`];
//! [`ExpeditionMapWasm`] exposes the same operations to JavaScript.

use js_sys::Float64Array;
use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod graph;
pub mod range;
pub mod spatial;

pub use config::SearchLimits;
pub use error::GraphError;
pub use graph::{Link, LinkId, StationGraph, StationId};
pub use range::{Path, PathEnumerator, RangeEvaluator};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Main entry point for JavaScript hosts.
///
/// Wraps a [`StationGraph`] together with the search limits applied to its
/// path queries. Station and link handles cross the boundary as raw `u32`.
#[wasm_bindgen]
pub struct ExpeditionMapWasm {
    graph: StationGraph,
    limits: SearchLimits,
}

#[wasm_bindgen]
impl ExpeditionMapWasm {
    /// Create a new empty map.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            graph: StationGraph::new(),
            limits: SearchLimits::default(),
        }
    }

    /// Create a map with pre-allocated capacity.
    #[wasm_bindgen(js_name = withCapacity)]
    pub fn with_capacity(station_capacity: usize, link_capacity: usize) -> Self {
        Self {
            graph: StationGraph::with_capacity(station_capacity, link_capacity),
            limits: SearchLimits::default(),
        }
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Set path search limits from a plain object such as
    /// `{ maxDepth: 12, maxPaths: 10000 }`. Missing keys mean unlimited.
    #[wasm_bindgen(js_name = setSearchLimits)]
    pub fn set_search_limits(&mut self, limits: JsValue) -> Result<(), JsValue> {
        self.limits = serde_wasm_bindgen::from_value(limits)?;
        Ok(())
    }

    /// Get the current search limits as a plain object.
    #[wasm_bindgen(js_name = getSearchLimits)]
    pub fn get_search_limits(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.limits)?)
    }

    // =========================================================================
    // Station Operations
    // =========================================================================

    /// Insert a station. Returns its handle.
    ///
    /// Throws if either coordinate is NaN or infinite.
    #[wasm_bindgen(js_name = insertStation)]
    pub fn insert_station(&mut self, x: f64, y: f64) -> Result<u32, JsError> {
        Ok(self.graph.insert_station(x, y)?.raw())
    }

    /// Insert stations from [x0, y0, x1, y1, ...]. Returns their handles.
    ///
    /// Throws, inserting nothing, if any coordinate is NaN or infinite.
    #[wasm_bindgen(js_name = insertStationsFromPositions)]
    pub fn insert_stations_from_positions(&mut self, positions: &[f64]) -> Result<Vec<u32>, JsError> {
        Ok(self
            .graph
            .insert_stations_from_positions(positions)?
            .into_iter()
            .map(StationId::raw)
            .collect())
    }

    /// Remove a station and its links.
    ///
    /// Returns true if the station existed and was removed.
    #[wasm_bindgen(js_name = removeStation)]
    pub fn remove_station(&mut self, station: u32) -> bool {
        self.graph.remove_station(StationId(station))
    }

    #[wasm_bindgen(js_name = stationCount)]
    pub fn station_count(&self) -> u32 {
        self.graph.station_count() as u32
    }

    #[wasm_bindgen(js_name = getStationX)]
    pub fn get_station_x(&self, station: u32) -> Option<f64> {
        self.graph.position(StationId(station)).map(|(x, _)| x)
    }

    #[wasm_bindgen(js_name = getStationY)]
    pub fn get_station_y(&self, station: u32) -> Option<f64> {
        self.graph.position(StationId(station)).map(|(_, y)| y)
    }

    /// Move a station.
    ///
    /// Returns false, leaving the station in place, when another station
    /// already occupies the target position. Throws on a non-finite target.
    #[wasm_bindgen(js_name = moveStation)]
    pub fn move_station(&mut self, station: u32, x: f64, y: f64) -> Result<bool, JsError> {
        Ok(self.graph.move_station(StationId(station), x, y)?)
    }

    // =========================================================================
    // Link Operations
    // =========================================================================

    /// Insert a link between two stations. Returns its handle.
    ///
    /// Throws if the stations are already linked.
    #[wasm_bindgen(js_name = insertLink)]
    pub fn insert_link(&mut self, u: u32, v: u32) -> Result<u32, JsError> {
        Ok(self.graph.insert_link(StationId(u), StationId(v))?.raw())
    }

    /// Insert links from [a0, b0, a1, b1, ...], skipping invalid pairs.
    /// Returns the number of links inserted.
    #[wasm_bindgen(js_name = insertLinksFromPairs)]
    pub fn insert_links_from_pairs(&mut self, pairs: &[u32]) -> u32 {
        self.graph.insert_links_from_pairs(pairs) as u32
    }

    #[wasm_bindgen(js_name = removeLink)]
    pub fn remove_link(&mut self, link: u32) -> bool {
        self.graph.remove_link(LinkId(link))
    }

    #[wasm_bindgen(js_name = linkCount)]
    pub fn link_count(&self) -> u32 {
        self.graph.link_count() as u32
    }

    /// Stations across each link of a station, in link order.
    pub fn neighbors(&self, station: u32) -> Vec<u32> {
        self.graph
            .neighbors(StationId(station))
            .into_iter()
            .map(StationId::raw)
            .collect()
    }

    /// The other endpoint of a link, or undefined if `station` is not on it.
    pub fn opposite(&self, link: u32, station: u32) -> Option<u32> {
        self.graph
            .opposite(LinkId(link), StationId(station))
            .map(StationId::raw)
    }

    // =========================================================================
    // Geometry and Range Queries
    // =========================================================================

    /// Euclidean distance between two stations.
    pub fn distance(&self, u: u32, v: u32) -> Option<f64> {
        self.graph.distance(StationId(u), StationId(v))
    }

    /// Distance to the station farthest from `station`, rounded to 5 dp.
    #[wasm_bindgen(js_name = findEmergencyRange)]
    pub fn find_emergency_range(&self, station: u32) -> Result<f64, JsError> {
        Ok(self.graph.find_emergency_range(StationId(station))?)
    }

    /// A path from `start` to `dest` staying within `radius` of `start`.
    ///
    /// Returns the station handles along the path, or undefined if none.
    #[wasm_bindgen(js_name = findPath)]
    pub fn find_path(&self, start: u32, dest: u32, radius: f64) -> Result<Option<Vec<u32>>, JsError> {
        let path = self
            .evaluator()
            .find_path(StationId(start), StationId(dest), radius)?;
        Ok(path.map(|path| path.into_iter().map(StationId::raw).collect()))
    }

    /// The smallest radius admitting a path, rounded to 5 dp.
    ///
    /// Throws if the stations are not connected.
    #[wasm_bindgen(js_name = minimumRange)]
    pub fn minimum_range(&self, start: u32, dest: u32) -> Result<f64, JsError> {
        Ok(self
            .evaluator()
            .minimum_range(StationId(start), StationId(dest))?)
    }

    /// Stations reachable from `start` without leaving `radius` of it.
    #[wasm_bindgen(js_name = reachableWithin)]
    pub fn reachable_within(&self, start: u32, radius: f64) -> Result<Vec<u32>, JsError> {
        let reached = self.evaluator().reachable_within(StationId(start), radius)?;
        Ok(reached.into_iter().map(StationId::raw).collect())
    }

    // =========================================================================
    // Spatial Queries and Buffers
    // =========================================================================

    /// Find the station nearest to a point.
    #[wasm_bindgen(js_name = nearestStation)]
    pub fn nearest_station(&self, x: f64, y: f64) -> Option<u32> {
        self.graph.nearest_station(x, y).map(StationId::raw)
    }

    /// Stations within `radius` of a point.
    #[wasm_bindgen(js_name = stationsWithin)]
    pub fn stations_within(&self, x: f64, y: f64, radius: f64) -> Vec<u32> {
        self.graph
            .stations_within(x, y, radius)
            .into_iter()
            .map(StationId::raw)
            .collect()
    }

    /// Station handles in insertion order; matches `getPositionsX/Y`.
    #[wasm_bindgen(js_name = getStationIds)]
    pub fn get_station_ids(&self) -> Vec<u32> {
        self.graph.station_ids().map(StationId::raw).collect()
    }

    /// X positions in `getStationIds` order.
    #[wasm_bindgen(js_name = getPositionsX)]
    pub fn get_positions_x(&self) -> Float64Array {
        let xs: Vec<f64> = self.graph.positions().map(|(_, x, _)| x).collect();
        Float64Array::from(&xs[..])
    }

    /// Y positions in `getStationIds` order.
    #[wasm_bindgen(js_name = getPositionsY)]
    pub fn get_positions_y(&self) -> Float64Array {
        let ys: Vec<f64> = self.graph.positions().map(|(_, _, y)| y).collect();
        Float64Array::from(&ys[..])
    }

    /// Returns [min_x, min_y, max_x, max_y], or undefined if the map is empty.
    #[wasm_bindgen(js_name = getBounds)]
    pub fn get_bounds(&self) -> Option<Vec<f64>> {
        self.graph
            .bounds()
            .map(|(min_x, min_y, max_x, max_y)| vec![min_x, min_y, max_x, max_y])
    }

    /// Remove all stations and links.
    pub fn clear(&mut self) {
        self.graph.clear();
    }
}

impl ExpeditionMapWasm {
    fn evaluator(&self) -> RangeEvaluator<'_> {
        RangeEvaluator::with_limits(&self.graph, self.limits)
    }

    /// The underlying graph.
    pub fn graph(&self) -> &StationGraph {
        &self.graph
    }
}

impl Default for ExpeditionMapWasm {
    fn default() -> Self {
        Self::new()
    }
}
