//! Error types for the station graph and its range queries.
//!
//! Structural violations are reported immediately; "no answer" outcomes of
//! path queries are represented as `Ok(None)` except where a numeric answer
//! is required, in which case [`GraphError::Unreachable`] is returned.

use thiserror::Error;

use crate::graph::StationId;

/// Errors produced by graph mutation and range queries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// A link between the same unordered pair of stations already exists.
    #[error("link already exists between {a} and {b}")]
    DuplicateLink { a: StationId, b: StationId },

    /// The station handle does not refer to a station in this graph.
    #[error("station not found: {id}")]
    StationNotFound { id: StationId },

    /// No path connects the two stations.
    #[error("no path from {from} to {to}")]
    Unreachable { from: StationId, to: StationId },

    /// A station position with a NaN or infinite coordinate.
    #[error("invalid position ({x}, {y}): coordinates must be finite")]
    InvalidPosition { x: f64, y: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GraphError::DuplicateLink {
            a: StationId(1),
            b: StationId(2),
        };
        assert_eq!(err.to_string(), "link already exists between Station(1) and Station(2)");

        let err = GraphError::Unreachable {
            from: StationId(0),
            to: StationId(7),
        };
        assert_eq!(err.to_string(), "no path from Station(0) to Station(7)");

        let err = GraphError::StationNotFound { id: StationId(3) };
        assert_eq!(err.to_string(), "station not found: Station(3)");

        let err = GraphError::InvalidPosition {
            x: f64::NAN,
            y: 1.5,
        };
        assert_eq!(
            err.to_string(),
            "invalid position (NaN, 1.5): coordinates must be finite"
        );
    }
}
