//! Error type used by the crate.

use thiserror::Error;

use crate::ring::RingKind;

/// Error enum.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// A ring was given fewer points than its kind requires.
    #[error("invalid input geometry: {kind:?} ring needs at least {required} points, got {actual}")]
    InvalidRing {
        /// Kind of the rejected ring.
        kind: RingKind,
        /// Minimum number of points for this kind.
        required: usize,
        /// Number of points supplied.
        actual: usize,
    },
    /// A ring contains a non-finite coordinate.
    #[error("invalid input geometry: coordinate #{index} is not finite")]
    NonFiniteCoordinate {
        /// Position of the offending point in the ring.
        index: usize,
    },
    /// A shape was built without any rings.
    #[error("invalid input geometry: shape '{id}' has no rings")]
    EmptyShape {
        /// Identifier of the shape.
        id: String,
    },
    /// Coordinate reference descriptor cannot be parsed.
    #[error("invalid coordinate reference definition: '{0}'")]
    InvalidCrs(String),
}
