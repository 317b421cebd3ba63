use crate::cartesian::CartesianPoint2d;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

/// Orientation of a triplet of points.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Clockwise
    Clockwise,
    /// Counterclockwise
    Counterclockwise,
    /// Collinear
    Collinear,
}

impl Orientation {
    /// Determines orientation of a triplet of points.
    pub fn triplet<P: CartesianPoint2d>(
        p: &P,
        q: &impl CartesianPoint2d<Num = P::Num>,
        r: &impl CartesianPoint2d<Num = P::Num>,
    ) -> Self {
        let v = (q.y() - p.y()) * (r.x() - q.x()) - (q.x() - p.x()) * (r.y() - q.y());
        if v > P::Num::zero() {
            Self::Clockwise
        } else if v < P::Num::zero() {
            Self::Counterclockwise
        } else {
            Self::Collinear
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartesian::Point2d;

    #[test]
    fn triplet() {
        let p = Point2d::new(0.0, 0.0);
        assert_eq!(
            Orientation::triplet(&p, &Point2d::new(1.0, 0.0), &Point2d::new(1.0, 1.0)),
            Orientation::Counterclockwise
        );
        assert_eq!(
            Orientation::triplet(&p, &Point2d::new(1.0, 1.0), &Point2d::new(1.0, 0.0)),
            Orientation::Clockwise
        );
        assert_eq!(
            Orientation::triplet(&p, &Point2d::new(1.0, 1.0), &Point2d::new(2.0, 2.0)),
            Orientation::Collinear
        );
    }
}
