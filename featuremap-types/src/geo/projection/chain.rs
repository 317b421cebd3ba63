use crate::geo::Projection;

/// Projection that swaps the direction of the inner projection.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvertedProjection<P>(P);

impl<P> InvertedProjection<P> {
    /// Wraps the given projection.
    pub fn new(inner: P) -> Self {
        Self(inner)
    }
}

impl<P: Projection> Projection for InvertedProjection<P> {
    type InPoint = P::OutPoint;
    type OutPoint = P::InPoint;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        self.0.unproject(input)
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        self.0.project(input)
    }
}

/// Applies two projections one after another.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChainProjection<First, Second> {
    first: First,
    second: Second,
}

impl<First, Second> ChainProjection<First, Second> {
    /// Creates a projection that applies `first` and then `second`.
    pub fn new(first: First, second: Second) -> Self {
        Self { first, second }
    }
}

impl<First, Second> Projection for ChainProjection<First, Second>
where
    First: Projection,
    Second: Projection<InPoint = First::OutPoint>,
{
    type InPoint = First::InPoint;
    type OutPoint = Second::OutPoint;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        self.second.project(&self.first.project(input)?)
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        self.first.unproject(&self.second.unproject(input)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartesian::{CartesianPoint2d, Point2d};
    use crate::geo::WebMercator;
    use approx::assert_relative_eq;

    #[test]
    fn inverted_and_chained() {
        let forward = WebMercator::<Point2d, Point2d>::default();
        let round_trip = ChainProjection::new(forward, InvertedProjection::new(forward));

        let point = Point2d::new(-73.98, 40.75);
        let result = round_trip.project(&point).unwrap();
        assert_relative_eq!(result.x(), point.x(), epsilon = 1e-9);
        assert_relative_eq!(result.y(), point.y(), epsilon = 1e-9);

        let inverted = InvertedProjection::new(forward);
        let projected = forward.project(&point).unwrap();
        let back = inverted.project(&projected).unwrap();
        assert_relative_eq!(back.y(), point.y(), epsilon = 1e-9);
    }
}
