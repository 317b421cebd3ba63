use nalgebra::{Point2, Scalar, Vector2};
use num_traits::Float;

/// Point with `f64` coordinates. This is the coordinate type used by rings and shapes unless stated otherwise.
pub type Point2d = Point2<f64>;

/// Point in 2d cartesian space.
///
/// For geographic coordinate reference systems `x` is longitude and `y` is latitude, both in degrees.
pub trait CartesianPoint2d {
    /// Numeric type of the coordinates.
    type Num: Float + Scalar;

    /// X coordinate.
    fn x(&self) -> Self::Num;
    /// Y coordinate.
    fn y(&self) -> Self::Num;

    /// Returns true if both coordinates of the points are exactly equal.
    fn equal(&self, other: &impl CartesianPoint2d<Num = Self::Num>) -> bool {
        self.x() == other.x() && self.y() == other.y()
    }

    /// Vector from `other` to `self`.
    fn sub(&self, other: &impl CartesianPoint2d<Num = Self::Num>) -> Vector2<Self::Num> {
        Vector2::new(self.x() - other.x(), self.y() - other.y())
    }

    /// Squared euclidean distance between the points.
    fn distance_sq(&self, other: &impl CartesianPoint2d<Num = Self::Num>) -> Self::Num {
        let v = self.sub(other);
        v.x * v.x + v.y * v.y
    }

    /// Returns true if both coordinates are finite numbers.
    fn is_finite(&self) -> bool {
        self.x().is_finite() && self.y().is_finite()
    }
}

/// Point that can be constructed from its coordinates.
pub trait NewCartesianPoint2d<Num = f64>: CartesianPoint2d<Num = Num> {
    /// Creates a new point.
    fn new(x: Num, y: Num) -> Self;
}

impl<Num: Float + Scalar> CartesianPoint2d for Point2<Num> {
    type Num = Num;

    fn x(&self) -> Num {
        self.x
    }

    fn y(&self) -> Num {
        self.y
    }
}

impl<Num: Float + Scalar> NewCartesianPoint2d<Num> for Point2<Num> {
    fn new(x: Num, y: Num) -> Self {
        Point2::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance() {
        let a = Point2d::new(1.0, 1.0);
        let b = Point2d::new(4.0, 5.0);
        assert_eq!(a.distance_sq(&b), 25.0);
        assert!(a.equal(&Point2d::new(1.0, 1.0)));
        assert!(!Point2d::new(f64::NAN, 0.0).is_finite());
    }
}
