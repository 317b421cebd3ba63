//! [`Shape`] is the geometry of one observation: one or more [`Ring`]s under a single identifier.

use num_traits::{Float, Zero};
use serde::Serialize;

use crate::cartesian::{CartesianPoint2d, Point2d, Rect};
use crate::error::GeometryError;
use crate::geo::Projection;
use crate::ring::{Ring, RingKind};

/// Geometry unit: an identifier plus an ordered list of rings.
///
/// A shape may be multi-part (several solid rings, e.g. islands of an archipelago), may contain holes, and may
/// consist of line rings. The identifier must be unique inside a feature collection; this is checked when the
/// collection is assembled, since a shape does not know which collection it will be added to.
///
/// Shapes are immutable. To change a shape, build a new one and replace the old one in its collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shape<P = Point2d> {
    id: String,
    rings: Vec<Ring<P>>,
}

impl<P> Shape<P> {
    /// Creates a new shape. Fails if `rings` is empty.
    pub fn new(id: impl Into<String>, rings: Vec<Ring<P>>) -> Result<Self, GeometryError> {
        let id = id.into();
        if rings.is_empty() {
            return Err(GeometryError::EmptyShape { id });
        }

        Ok(Self { id, rings })
    }

    /// Creates a shape consisting of a single ring.
    pub fn single(id: impl Into<String>, ring: Ring<P>) -> Self {
        Self {
            id: id.into(),
            rings: vec![ring],
        }
    }

    /// Identifier of the shape.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// All rings in the order they were given.
    pub fn rings(&self) -> &[Ring<P>] {
        &self.rings
    }

    /// Iterates over solid rings.
    pub fn solid_rings(&self) -> impl Iterator<Item = &Ring<P>> {
        self.rings_of(RingKind::Solid)
    }

    /// Iterates over hole rings.
    pub fn holes(&self) -> impl Iterator<Item = &Ring<P>> {
        self.rings_of(RingKind::Hole)
    }

    /// Iterates over line rings.
    pub fn line_rings(&self) -> impl Iterator<Item = &Ring<P>> {
        self.rings_of(RingKind::Line)
    }

    fn rings_of(&self, kind: RingKind) -> impl Iterator<Item = &Ring<P>> {
        self.rings.iter().filter(move |r| r.kind() == kind)
    }

    /// Returns the same shape under another identifier.
    pub fn with_id(self, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rings: self.rings,
        }
    }

    /// Consumes the shape and returns its identifier and rings.
    pub fn into_parts(self) -> (String, Vec<Ring<P>>) {
        (self.id, self.rings)
    }
}

impl<P: CartesianPoint2d> Shape<P> {
    /// Bounding rectangle of all rings.
    pub fn bounding_rect(&self) -> Option<Rect<P::Num>> {
        Rect::merge_all(self.rings.iter().filter_map(Ring::bounding_rect))
    }

    /// Area of the solid rings minus the area of the holes.
    pub fn area(&self) -> P::Num {
        let solid = self
            .solid_rings()
            .fold(P::Num::zero(), |acc, r| acc + r.area());
        let holes = self.holes().fold(P::Num::zero(), |acc, r| acc + r.area());
        solid - holes
    }

    /// Returns true if the point is inside one of the solid rings and not strictly inside any of the holes, or if
    /// the point is within `tolerance` of one of the line rings.
    pub fn contains_point(&self, point: &impl CartesianPoint2d<Num = P::Num>, tolerance: P::Num) -> bool {
        let near_line = self
            .line_rings()
            .any(|r| r.distance_to_point_sq(point) <= tolerance * tolerance);
        if near_line {
            return true;
        }

        self.solid_rings().any(|r| r.contains_point(point))
            && !self.holes().any(|r| {
                r.contains_point(point) && r.distance_to_point_sq(point) > P::Num::epsilon()
            })
    }

    /// Projects all rings with the given projection, keeping the identifier and the ring kinds.
    ///
    /// Returns `None` if any of the points cannot be projected.
    pub fn project<Proj>(&self, projection: &Proj) -> Option<Shape<Proj::OutPoint>>
    where
        Proj: Projection<InPoint = P> + ?Sized,
        Proj::OutPoint: CartesianPoint2d,
    {
        let rings = self
            .rings
            .iter()
            .map(|r| r.project_points(projection))
            .collect::<Option<Vec<_>>>()?;
        Some(Shape {
            id: self.id.clone(),
            rings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::WebMercator;
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;

    fn points(coords: &[(f64, f64)]) -> Vec<Point2d> {
        coords.iter().map(|&(x, y)| Point2d::new(x, y)).collect()
    }

    fn house_with_hole() -> Shape {
        Shape::new(
            "house2",
            vec![
                Ring::solid(points(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)])).unwrap(),
                Ring::solid(points(&[(0.0, 10.0), (10.0, 10.0), (5.0, 15.0)])).unwrap(),
                Ring::hole(points(&[(2.0, 2.0), (4.0, 2.0), (4.0, 4.0), (2.0, 4.0)])).unwrap(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn empty_shape() {
        assert_matches!(
            Shape::<Point2d>::new("nothing", vec![]),
            Err(GeometryError::EmptyShape { id }) if id == "nothing"
        );
    }

    #[test]
    fn rings_are_returned_unchanged() {
        let rings = vec![
            Ring::solid(points(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)])).unwrap(),
            Ring::hole(points(&[(0.2, 0.1), (0.8, 0.1), (0.8, 0.5)])).unwrap(),
            Ring::line(points(&[(5.0, 5.0), (6.0, 6.0)])).unwrap(),
        ];
        let shape = Shape::new("a", rings.clone()).unwrap();
        assert_eq!(shape.rings(), &rings[..]);
        assert_eq!(shape.solid_rings().count(), 1);
        assert_eq!(shape.holes().count(), 1);
        assert_eq!(shape.line_rings().count(), 1);

        let (id, back) = shape.with_id("b").into_parts();
        assert_eq!(id, "b");
        assert_eq!(back, rings);
    }

    #[test]
    fn area_and_bounds() {
        let shape = house_with_hole();
        assert_relative_eq!(shape.area(), 100.0 + 25.0 - 4.0);
        assert_eq!(shape.bounding_rect(), Some(Rect::new(0.0, 0.0, 10.0, 15.0)));
    }

    #[test]
    fn contains_point() {
        let shape = house_with_hole();
        assert!(shape.contains_point(&Point2d::new(1.0, 1.0), 0.0));
        assert!(shape.contains_point(&Point2d::new(5.0, 12.0), 0.0));
        assert!(!shape.contains_point(&Point2d::new(3.0, 3.0), 0.0));
        assert!(!shape.contains_point(&Point2d::new(20.0, 5.0), 0.0));

        let road = Shape::single(
            "road",
            Ring::line(points(&[(0.0, 0.0), (10.0, 0.0)])).unwrap(),
        );
        assert!(road.contains_point(&Point2d::new(5.0, 0.5), 1.0));
        assert!(!road.contains_point(&Point2d::new(5.0, 1.5), 1.0));
    }

    #[test]
    fn project() {
        let shape = house_with_hole();
        let projected = shape
            .project(&WebMercator::<Point2d, Point2d>::default())
            .unwrap();
        assert_eq!(projected.id(), "house2");
        assert_eq!(projected.rings().len(), 3);
        assert!(projected.rings()[2].is_hole());
        assert_relative_eq!(projected.rings()[0].points()[1].x, 1_113_194.9, epsilon = 0.1);
    }
}
