//! Geometry primitives for feature collections: points, [rings](Ring), [shapes](Shape), coordinate reference
//! descriptors ([`Crs`](geo::Crs)) and projections between them.
//!
//! Geometries are built bottom-up and never change after construction:
//!
//! ```
//! use featuremap_types::cartesian::Point2d;
//! use featuremap_types::{Ring, Shape};
//!
//! let walls = Ring::solid(vec![
//!     Point2d::new(0.0, 0.0),
//!     Point2d::new(10.0, 0.0),
//!     Point2d::new(10.0, 10.0),
//!     Point2d::new(0.0, 10.0),
//! ])?;
//! let roof = Ring::solid(vec![
//!     Point2d::new(0.0, 10.0),
//!     Point2d::new(10.0, 10.0),
//!     Point2d::new(5.0, 15.0),
//! ])?;
//! let house = Shape::new("house1", vec![walls, roof])?;
//! assert_eq!(house.rings().len(), 2);
//! # Ok::<(), featuremap_types::error::GeometryError>(())
//! ```

pub mod cartesian;
pub mod contour;
pub mod error;
pub mod geo;
pub mod ring;
pub mod segment;
pub mod shape;

pub use ring::{Ring, RingKind, Winding};
pub use shape::Shape;
