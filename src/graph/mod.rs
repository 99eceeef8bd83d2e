//! Station graph data structures and operations.
//!
//! Stations live in petgraph's StableGraph and are addressed by stable
//! handles; links store handle pairs, never references. Positions are kept
//! in Structure of Arrays (SoA) buffers beside the topology.

mod edge;
mod engine;
mod node;

pub use edge::{Link, LinkId};
pub use engine::StationGraph;
pub use node::StationId;
