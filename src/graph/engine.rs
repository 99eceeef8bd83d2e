//! StationGraph - the map of base stations and their links.
//!
//! Topology lives in petgraph's StableGraph (an arena addressed by indices,
//! so the station/link/station cycle never becomes an ownership cycle).
//! Positions and per-station link lists are kept in SoA buffers indexed by
//! the petgraph slot.

use petgraph::Undirected;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use std::collections::{BTreeMap, HashMap};

use super::edge::{Link, LinkId};
use super::node::StationId;
use crate::error::GraphError;
use crate::spatial::SpatialIndex;

/// The station graph.
///
/// This struct manages:
/// - Graph topology via petgraph
/// - Station positions in SoA layout
/// - Insertion-ordered link lists per station (the traversal order)
/// - Spatial index for occupancy and proximity queries
/// - ID mapping between stable handles and internal indices
///
/// Queries borrow the graph immutably and mutation borrows it mutably, so a
/// path search can never observe a half-applied mutation.
pub struct StationGraph {
    /// Nodes store their stable StationId, edges their stable LinkId.
    graph: StableGraph<StationId, LinkId, Undirected>,

    /// Map from StationId to petgraph NodeIndex. Ordered by id, which is
    /// insertion order since ids are assigned monotonically.
    station_index: BTreeMap<StationId, NodeIndex>,

    /// Map from LinkId to petgraph EdgeIndex
    link_index: HashMap<LinkId, EdgeIndex>,

    next_station_id: u32,
    next_link_id: u32,

    /// X positions (SoA layout)
    pos_x: Vec<f64>,

    /// Y positions (SoA layout)
    pos_y: Vec<f64>,

    /// Links touching each station, in insertion order. A self-loop appears once.
    links: Vec<Vec<LinkId>>,

    spatial: SpatialIndex,
}

impl StationGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self {
            graph: StableGraph::default(),
            station_index: BTreeMap::new(),
            link_index: HashMap::new(),
            next_station_id: 0,
            next_link_id: 0,
            pos_x: Vec::new(),
            pos_y: Vec::new(),
            links: Vec::new(),
            spatial: SpatialIndex::new(),
        }
    }

    /// Create a graph with pre-allocated capacity.
    pub fn with_capacity(station_capacity: usize, link_capacity: usize) -> Self {
        Self {
            graph: StableGraph::with_capacity(station_capacity, link_capacity),
            station_index: BTreeMap::new(),
            link_index: HashMap::with_capacity(link_capacity),
            next_station_id: 0,
            next_link_id: 0,
            pos_x: Vec::with_capacity(station_capacity),
            pos_y: Vec::with_capacity(station_capacity),
            links: Vec::with_capacity(station_capacity),
            spatial: SpatialIndex::new(),
        }
    }

    // =========================================================================
    // Station Operations
    // =========================================================================

    /// Insert a station at the given position. No uniqueness check is made
    /// on the position.
    ///
    /// Fails with [`GraphError::InvalidPosition`] if either coordinate is
    /// NaN or infinite; the graph is left untouched in that case.
    pub fn insert_station(&mut self, x: f64, y: f64) -> Result<StationId, GraphError> {
        check_position(x, y)?;

        let id = StationId(self.next_station_id);
        self.next_station_id += 1;

        let index = self.graph.add_node(id);
        self.station_index.insert(id, index);

        // StableGraph recycles vacant slots; overwrite the stale entry then.
        let slot = index.index();
        if slot < self.pos_x.len() {
            self.pos_x[slot] = x;
            self.pos_y[slot] = y;
            self.links[slot].clear();
        } else {
            self.pos_x.push(x);
            self.pos_y.push(y);
            self.links.push(Vec::new());
        }

        self.spatial.insert(id, x, y);
        tracing::debug!("inserted {} at ({}, {})", id, x, y);
        Ok(id)
    }

    /// Insert stations from a positions array [x0, y0, x1, y1, ...].
    ///
    /// Returns the new handles in order. A trailing odd value is ignored.
    /// Every position is checked before any station is inserted, so a
    /// non-finite coordinate anywhere rejects the whole batch.
    pub fn insert_stations_from_positions(
        &mut self,
        positions: &[f64],
    ) -> Result<Vec<StationId>, GraphError> {
        let pairs = positions.chunks_exact(2);
        for pair in pairs.clone() {
            check_position(pair[0], pair[1])?;
        }

        let mut ids = Vec::with_capacity(pairs.len());
        for pair in pairs {
            ids.push(self.insert_station(pair[0], pair[1])?);
        }
        Ok(ids)
    }

    /// Remove a station and every link touching it.
    ///
    /// Each link is also dropped from the opposite endpoint's link list.
    /// Returns false if the station does not exist.
    pub fn remove_station(&mut self, id: StationId) -> bool {
        let Some(index) = self.station_index.remove(&id) else {
            return false;
        };
        let slot = index.index();

        let links = std::mem::take(&mut self.links[slot]);
        let severed = links.len();
        for link_id in links {
            let Some(edge_index) = self.link_index.remove(&link_id) else {
                continue;
            };
            if let Some((a, b)) = self.graph.edge_endpoints(edge_index) {
                let other = if a == index { b } else { a };
                if other != index {
                    self.links[other.index()].retain(|&l| l != link_id);
                }
            }
        }

        self.spatial.remove(id, self.pos_x[slot], self.pos_y[slot]);
        self.pos_x[slot] = 0.0;
        self.pos_y[slot] = 0.0;

        // Drops the petgraph edges along with the node.
        self.graph.remove_node(index);
        tracing::debug!("removed {} and {} link(s)", id, severed);
        true
    }

    pub fn station_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn contains_station(&self, id: StationId) -> bool {
        self.station_index.contains_key(&id)
    }

    /// All stations in insertion order.
    pub fn station_ids(&self) -> impl Iterator<Item = StationId> + '_ {
        self.station_index.keys().copied()
    }

    /// All stations with their positions, in insertion order.
    pub fn positions(&self) -> impl Iterator<Item = (StationId, f64, f64)> + '_ {
        self.station_index.iter().map(|(&id, &index)| {
            let i = index.index();
            (id, self.pos_x[i], self.pos_y[i])
        })
    }

    /// Get a station's position.
    pub fn position(&self, id: StationId) -> Option<(f64, f64)> {
        self.station_index.get(&id).map(|&index| {
            let i = index.index();
            (self.pos_x[i], self.pos_y[i])
        })
    }

    /// Move a station unless another station already sits exactly at the
    /// target position.
    ///
    /// Returns `Ok(true)` when moved and `Ok(false)` when the target was
    /// occupied, in which case nothing changes. A non-finite target fails
    /// with [`GraphError::InvalidPosition`].
    pub fn move_station(&mut self, id: StationId, x: f64, y: f64) -> Result<bool, GraphError> {
        let index = *self
            .station_index
            .get(&id)
            .ok_or(GraphError::StationNotFound { id })?;
        check_position(x, y)?;

        if self.spatial.is_occupied(x, y, Some(id)) {
            tracing::debug!("move of {} to ({}, {}) ignored: position occupied", id, x, y);
            return Ok(false);
        }

        let i = index.index();
        self.spatial.remove(id, self.pos_x[i], self.pos_y[i]);
        self.pos_x[i] = x;
        self.pos_y[i] = y;
        self.spatial.insert(id, x, y);
        tracing::debug!("moved {} to ({}, {})", id, x, y);
        Ok(true)
    }

    // =========================================================================
    // Link Operations
    // =========================================================================

    /// Insert a link between two stations.
    ///
    /// Fails with [`GraphError::DuplicateLink`] if the unordered pair is
    /// already linked; the graph is left untouched in that case.
    pub fn insert_link(&mut self, u: StationId, v: StationId) -> Result<LinkId, GraphError> {
        let u_index = *self
            .station_index
            .get(&u)
            .ok_or(GraphError::StationNotFound { id: u })?;
        let v_index = *self
            .station_index
            .get(&v)
            .ok_or(GraphError::StationNotFound { id: v })?;

        if self.graph.find_edge(u_index, v_index).is_some() {
            return Err(GraphError::DuplicateLink { a: u, b: v });
        }

        let id = LinkId(self.next_link_id);
        self.next_link_id += 1;

        let index = self.graph.add_edge(u_index, v_index, id);
        self.link_index.insert(id, index);

        self.links[u_index.index()].push(id);
        if u_index != v_index {
            self.links[v_index.index()].push(id);
        }

        tracing::debug!("inserted {} between {} and {}", id, u, v);
        Ok(id)
    }

    /// Insert links from raw pairs [a0, b0, a1, b1, ...].
    ///
    /// Pairs naming unknown stations or already linked stations are skipped.
    /// Returns the number of links inserted.
    pub fn insert_links_from_pairs(&mut self, pairs: &[u32]) -> usize {
        let mut added = 0;
        for pair in pairs.chunks_exact(2) {
            match self.insert_link(StationId(pair[0]), StationId(pair[1])) {
                Ok(_) => added += 1,
                Err(err) => tracing::debug!("skipped pair: {}", err),
            }
        }
        added
    }

    /// Remove a single link. Returns false if it does not exist.
    pub fn remove_link(&mut self, id: LinkId) -> bool {
        let Some(index) = self.link_index.remove(&id) else {
            return false;
        };
        if let Some((a, b)) = self.graph.edge_endpoints(index) {
            self.links[a.index()].retain(|&l| l != id);
            self.links[b.index()].retain(|&l| l != id);
        }
        self.graph.remove_edge(index);
        tracing::debug!("removed {}", id);
        true
    }

    pub fn link_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// The endpoints of a link.
    pub fn link(&self, id: LinkId) -> Option<Link> {
        let &index = self.link_index.get(&id)?;
        let (a, b) = self.graph.edge_endpoints(index)?;
        Some(Link::new(self.graph[a], self.graph[b]))
    }

    /// Links touching a station in insertion order. Empty for unknown stations.
    pub fn links_of(&self, id: StationId) -> &[LinkId] {
        self.station_index
            .get(&id)
            .map(|&index| self.links[index.index()].as_slice())
            .unwrap_or(&[])
    }

    /// Number of links touching a station. A self-loop counts once.
    pub fn degree(&self, id: StationId) -> usize {
        self.links_of(id).len()
    }

    /// Stations across each link of `id`, in link order.
    pub fn neighbors(&self, id: StationId) -> Vec<StationId> {
        self.links_of(id)
            .iter()
            .filter_map(|&link| self.opposite(link, id))
            .collect()
    }

    /// Whether a station's only link is a self-loop, leaving it cut off.
    pub fn is_self_loop_only(&self, id: StationId) -> bool {
        match self.links_of(id) {
            [only] => self.link(*only).is_some_and(Link::is_self_loop),
            _ => false,
        }
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Euclidean distance between two stations.
    pub fn distance(&self, u: StationId, v: StationId) -> Option<f64> {
        let (ux, uy) = self.position(u)?;
        let (vx, vy) = self.position(v)?;
        let dx = vx - ux;
        let dy = vy - uy;
        Some((dx * dx + dy * dy).sqrt())
    }

    /// The station at the other end of `link` from `station`.
    ///
    /// Returns `None` if the link does not exist or `station` is not one of
    /// its endpoints.
    pub fn opposite(&self, link: LinkId, station: StationId) -> Option<StationId> {
        self.link(link)?.opposite(station)
    }

    // =========================================================================
    // Spatial Queries
    // =========================================================================

    /// Whether any station sits exactly at `(x, y)`.
    pub fn is_occupied(&self, x: f64, y: f64) -> bool {
        self.spatial.is_occupied(x, y, None)
    }

    /// Find the station nearest to a point.
    pub fn nearest_station(&self, x: f64, y: f64) -> Option<StationId> {
        self.spatial.nearest(x, y)
    }

    /// Stations within `radius` of a point, in insertion order.
    pub fn stations_within(&self, x: f64, y: f64, radius: f64) -> Vec<StationId> {
        let mut found = self.spatial.in_radius(x, y, radius);
        found.sort_unstable();
        found
    }

    // =========================================================================
    // Utilities
    // =========================================================================

    /// Get the bounding box (min_x, min_y, max_x, max_y) of all stations.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        self.positions().fold(None, |acc, (_, x, y)| match acc {
            None => Some((x, y, x, y)),
            Some((min_x, min_y, max_x, max_y)) => {
                Some((min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y)))
            }
        })
    }

    /// Remove every station and link.
    ///
    /// Handle counters keep running so stale handles stay invalid.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.station_index.clear();
        self.link_index.clear();
        self.pos_x.clear();
        self.pos_y.clear();
        self.links.clear();
        self.spatial.clear();
    }
}

impl Default for StationGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Positions feed the R-tree, which cannot order NaN or infinite coordinates.
fn check_position(x: f64, y: f64) -> Result<(), GraphError> {
    if x.is_finite() && y.is_finite() {
        Ok(())
    } else {
        Err(GraphError::InvalidPosition { x, y })
    }
}
