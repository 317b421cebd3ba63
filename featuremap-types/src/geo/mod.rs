//! Coordinate reference descriptors (see [`Crs`]) and conversion of coordinates between them (see [`Projection`]).

mod crs;
mod datum;
pub mod projection;

pub use crs::Crs;
pub use datum::Datum;
pub use projection::{ChainProjection, IdentityProjection, InvertedProjection, Projection, WebMercator};

#[cfg(feature = "geodesy")]
pub use projection::GeodesyProjection;
