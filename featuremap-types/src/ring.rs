//! [`Ring`] is the smallest building block of a [`Shape`](crate::Shape): one simple boundary.
//!
//! A ring is either a *line* (an open sequence of points, e.g. a road) or a closed polygon outline. Closed rings
//! are either *solid* (they add area to the shape) or *holes* (they cut area out of the solid rings of the same
//! shape).
//!
//! A hole is expected to lie inside one of the solid rings of its shape. This is not checked: a hole outside of
//! any solid ring is stored as given and simply never affects [`Shape::contains_point`](crate::Shape::contains_point).

use serde::{Deserialize, Serialize};

use crate::cartesian::{CartesianPoint2d, Rect};
use crate::contour::Contour;
use crate::error::GeometryError;
use crate::geo::Projection;
use nalgebra::Point2;
use num_traits::{Float, One, Zero};

/// Role of a ring inside a shape.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RingKind {
    /// Open line.
    Line,
    /// Closed outline of solid area.
    Solid,
    /// Closed outline of an excluded area.
    Hole,
}

impl RingKind {
    /// Minimum number of points a ring of this kind must have.
    pub fn min_points(&self) -> usize {
        match self {
            RingKind::Line => 2,
            RingKind::Solid | RingKind::Hole => 3,
        }
    }

    /// Whether rings of this kind connect the last point back to the first one.
    pub fn is_closed(&self) -> bool {
        !matches!(self, RingKind::Line)
    }
}

/// Direction in which a closed ring goes around its area.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Winding {
    /// Clockwise.
    Clockwise,
    /// Counterclockwise.
    CounterClockwise,
}

/// Ordered sequence of points describing one boundary. See module documentation for details.
///
/// Rings are immutable: the points given at construction are returned unchanged by [`Ring::points`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ring<P = Point2<f64>> {
    points: Vec<P>,
    kind: RingKind,
}

impl<P: CartesianPoint2d> Ring<P> {
    /// Creates a new ring of the given kind.
    ///
    /// Fails if there are fewer points than [`RingKind::min_points`] or if any coordinate is not finite.
    pub fn new(points: Vec<P>, kind: RingKind) -> Result<Self, GeometryError> {
        if points.len() < kind.min_points() {
            return Err(GeometryError::InvalidRing {
                kind,
                required: kind.min_points(),
                actual: points.len(),
            });
        }

        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(GeometryError::NonFiniteCoordinate { index });
        }

        Ok(Self { points, kind })
    }

    /// Creates an open line ring.
    pub fn line(points: Vec<P>) -> Result<Self, GeometryError> {
        Self::new(points, RingKind::Line)
    }

    /// Creates a closed ring of solid area.
    pub fn solid(points: Vec<P>) -> Result<Self, GeometryError> {
        Self::new(points, RingKind::Solid)
    }

    /// Creates a closed hole ring.
    pub fn hole(points: Vec<P>) -> Result<Self, GeometryError> {
        Self::new(points, RingKind::Hole)
    }

    /// Creates a closed polygon ring, which is a hole if `is_hole` is set.
    pub fn polygon(points: Vec<P>, is_hole: bool) -> Result<Self, GeometryError> {
        Self::new(
            points,
            if is_hole {
                RingKind::Hole
            } else {
                RingKind::Solid
            },
        )
    }

    /// Signed area of the ring. Positive for counterclockwise rings, negative for clockwise. Line rings have zero
    /// area.
    pub fn area_signed(&self) -> P::Num {
        if !self.is_closed() {
            return P::Num::zero();
        }

        let mut iter = self.iter_points_closing();
        let Some(mut prev) = iter.next() else {
            return P::Num::zero();
        };

        let mut aggr = P::Num::zero();
        for p in iter {
            aggr = aggr + prev.x() * p.y() - p.x() * prev.y();
            prev = p;
        }

        aggr / (P::Num::one() + P::Num::one())
    }

    /// Absolute area enclosed by the ring.
    pub fn area(&self) -> P::Num {
        self.area_signed().abs()
    }

    /// Winding of the ring. Degenerate rings with zero area are reported as clockwise.
    pub fn winding(&self) -> Winding {
        if self.area_signed() <= P::Num::zero() {
            Winding::Clockwise
        } else {
            Winding::CounterClockwise
        }
    }

    /// Bounding rectangle of the ring points.
    pub fn bounding_rect(&self) -> Option<Rect<P::Num>> {
        Rect::from_points(self.points.iter())
    }

    /// Shortest squared distance from the point to the ring line (including the closing segment of closed rings).
    pub fn distance_to_point_sq(&self, point: &impl CartesianPoint2d<Num = P::Num>) -> P::Num {
        self.iter_segments()
            .map(|s| s.distance_to_point_sq(point))
            .fold(P::Num::infinity(), |a, b| a.min(b))
    }

    /// Returns true if the point is inside the closed ring or on its border. Always false for line rings.
    pub fn contains_point(&self, point: &impl CartesianPoint2d<Num = P::Num>) -> bool {
        if !self.is_closed() {
            return false;
        }

        let mut wn = 0i64;
        let x = point.x();
        let y = point.y();

        for segment in self.iter_segments() {
            if segment.0.x() < x && segment.1.x() < x {
                continue;
            }

            let is_to_right = segment.0.x() > x && segment.1.x() > x || {
                let ray_p1 = Point2::new(x, y);
                let ray_p2 = Point2::new(segment.0.x().max(segment.1.x()), y);
                segment.intersects(&crate::segment::Segment(&ray_p1, &ray_p2))
            };

            if is_to_right {
                if segment.0.y() < y && segment.1.y() >= y {
                    wn += 1;
                } else if segment.0.y() > y && segment.1.y() <= y {
                    wn -= 1;
                }
            }
        }

        wn != 0
    }

    /// Projects all the points of the ring with the given `projection`, keeping the ring kind.
    ///
    /// Returns `None` if any of the points cannot be projected.
    pub fn project_points<Proj>(&self, projection: &Proj) -> Option<Ring<Proj::OutPoint>>
    where
        Proj: Projection<InPoint = P> + ?Sized,
        Proj::OutPoint: CartesianPoint2d,
    {
        let points = self
            .points
            .iter()
            .map(|p| projection.project(p))
            .collect::<Option<Vec<_>>>()?;
        Ring::new(points, self.kind).ok()
    }
}

impl<P> Ring<P> {
    /// Points of the ring in the order they were given.
    pub fn points(&self) -> &[P] {
        &self.points
    }

    /// Role of the ring.
    pub fn kind(&self) -> RingKind {
        self.kind
    }

    /// Returns true if this ring is a hole.
    pub fn is_hole(&self) -> bool {
        self.kind == RingKind::Hole
    }

    /// Returns true if this ring is a closed solid outline.
    pub fn is_solid(&self) -> bool {
        self.kind == RingKind::Solid
    }

    /// Number of points in the ring.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed ring.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Consumes the ring and returns its points.
    pub fn into_points(self) -> Vec<P> {
        self.points
    }
}

impl<P> Contour for Ring<P> {
    type Point = P;

    fn is_closed(&self) -> bool {
        self.kind.is_closed()
    }

    fn iter_points(&self) -> impl Iterator<Item = &'_ P> {
        self.points.iter()
    }
}
