use crate::cartesian::{CartesianPoint2d, Point2d};
use nalgebra::{Point2, Scalar};
use num_traits::Float;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, usually a bounding box of some geometry.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rect<N = f64> {
    /// Minimum x.
    pub x_min: N,
    /// Minimum y.
    pub y_min: N,
    /// Maximum x.
    pub x_max: N,
    /// Maximum y.
    pub y_max: N,
}

impl<N: Float + Scalar> Rect<N> {
    /// Creates a new rectangle.
    pub fn new(x_min: N, y_min: N, x_max: N, y_max: N) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Width of the rectangle.
    pub fn width(&self) -> N {
        self.x_max - self.x_min
    }

    /// Height of the rectangle.
    pub fn height(&self) -> N {
        self.y_max - self.y_min
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn merge(&self, other: Self) -> Self {
        Self {
            x_min: self.x_min.min(other.x_min),
            y_min: self.y_min.min(other.y_min),
            x_max: self.x_max.max(other.x_max),
            y_max: self.y_max.max(other.y_max),
        }
    }

    /// Merges all the rectangles of the iterator. Returns `None` for an empty iterator.
    pub fn merge_all(rects: impl IntoIterator<Item = Self>) -> Option<Self> {
        rects.into_iter().reduce(|acc, r| acc.merge(r))
    }

    /// Bounding rectangle of the given points. Returns `None` if there are no points.
    pub fn from_points<'a, P: CartesianPoint2d<Num = N> + 'a>(
        mut points: impl Iterator<Item = &'a P>,
    ) -> Option<Self> {
        let first = points.next()?;
        let init = Self::new(first.x(), first.y(), first.x(), first.y());

        Some(points.fold(init, |r, p| Self {
            x_min: r.x_min.min(p.x()),
            y_min: r.y_min.min(p.y()),
            x_max: r.x_max.max(p.x()),
            y_max: r.y_max.max(p.y()),
        }))
    }

    /// Returns true if the point is inside the rectangle or on its border.
    pub fn contains(&self, point: &impl CartesianPoint2d<Num = N>) -> bool {
        self.x_min <= point.x()
            && self.x_max >= point.x()
            && self.y_min <= point.y()
            && self.y_max >= point.y()
    }

    /// Expands the rectangle by `amount` in every direction.
    pub fn expand(&self, amount: N) -> Self {
        Self {
            x_min: self.x_min - amount,
            y_min: self.y_min - amount,
            x_max: self.x_max + amount,
            y_max: self.y_max + amount,
        }
    }

    /// Center point of the rectangle.
    pub fn center(&self) -> Point2<N> {
        let two = N::one() + N::one();
        Point2::new(
            (self.x_min + self.x_max) / two,
            (self.y_min + self.y_max) / two,
        )
    }
}

impl Rect<f64> {
    /// Corner points of the rectangle, counterclockwise starting from the bottom left corner.
    pub fn into_quadrangle(self) -> [Point2d; 4] {
        [
            Point2d::new(self.x_min, self.y_min),
            Point2d::new(self.x_max, self.y_min),
            Point2d::new(self.x_max, self.y_max),
            Point2d::new(self.x_min, self.y_max),
        ]
    }
}
