//! Conversion of points between coordinate reference systems.

mod chain;
mod identity;
mod web_mercator;

#[cfg(feature = "geodesy")]
mod geodesy;

pub use chain::{ChainProjection, InvertedProjection};
pub use identity::IdentityProjection;
pub use web_mercator::{WebMercator, MAX_LATITUDE};

#[cfg(feature = "geodesy")]
pub use self::geodesy::GeodesyProjection;

/// Converts points from one coordinate system into another.
pub trait Projection {
    /// Type of the input points.
    type InPoint;
    /// Type of the output points.
    type OutPoint;

    /// Projects a point. Returns `None` if the point cannot be represented in the target system.
    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint>;
    /// Inverse of [`Projection::project`].
    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint>;
}

impl<T: Projection + ?Sized> Projection for Box<T> {
    type InPoint = T::InPoint;
    type OutPoint = T::OutPoint;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        (**self).project(input)
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        (**self).unproject(input)
    }
}
