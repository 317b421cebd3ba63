use crate::cartesian::NewCartesianPoint2d;
use crate::geo::datum::Datum;
use crate::geo::Projection;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};
use std::marker::PhantomData;

/// Latitudes beyond this limit (in degrees) cannot be represented in web mercator.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Spherical web mercator projection (EPSG:3857).
///
/// Input points are geographic with longitude as `x` and latitude as `y`, in degrees. Output points are in meters.
/// Points with latitude beyond [`MAX_LATITUDE`] are not projected.
#[derive(Debug, Copy, Clone)]
pub struct WebMercator<In, Out> {
    datum: Datum,
    phantom_in: PhantomData<In>,
    phantom_out: PhantomData<Out>,
}

impl<In, Out> WebMercator<In, Out> {
    /// Creates a new projection on the given datum.
    pub fn new(datum: Datum) -> Self {
        Self {
            datum,
            phantom_in: Default::default(),
            phantom_out: Default::default(),
        }
    }
}

impl<In, Out> Default for WebMercator<In, Out> {
    fn default() -> Self {
        Self::new(Datum::WGS84)
    }
}

impl<In: NewCartesianPoint2d<f64>, Out: NewCartesianPoint2d<f64>> Projection for WebMercator<In, Out> {
    type InPoint = In;
    type OutPoint = Out;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        if input.y().abs() > MAX_LATITUDE {
            return None;
        }

        let x = self.datum.semimajor() * input.x().to_radians();
        let y = self.datum.semimajor() * (FRAC_PI_4 + input.y().to_radians() / 2.0).tan().ln();

        if x.is_finite() && y.is_finite() {
            Some(Self::OutPoint::new(x, y))
        } else {
            None
        }
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        let lat = FRAC_PI_2 - 2.0 * (-input.y() / self.datum.semimajor()).exp().atan();
        let lon = input.x() / self.datum.semimajor();

        if lat.is_finite() && lon.is_finite() {
            Some(Self::InPoint::new(lon.to_degrees(), lat.to_degrees()))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartesian::{CartesianPoint2d, Point2d};
    use approx::assert_relative_eq;

    #[test]
    fn project_and_back() {
        let projection = WebMercator::<Point2d, Point2d>::default();

        let origin = projection.project(&Point2d::new(0.0, 0.0)).unwrap();
        assert_relative_eq!(origin.x(), 0.0);
        assert_relative_eq!(origin.y(), 0.0, epsilon = 1e-9);

        let point = Point2d::new(37.6, 55.75);
        let projected = projection.project(&point).unwrap();
        assert_relative_eq!(projected.x(), 4_185_612.9, epsilon = 1.0);
        assert_relative_eq!(projected.y(), 7_508_807.0, epsilon = 1.0);

        let back = projection.unproject(&projected).unwrap();
        assert_relative_eq!(back.x(), point.x(), epsilon = 1e-9);
        assert_relative_eq!(back.y(), point.y(), epsilon = 1e-9);
    }

    #[test]
    fn pole_cannot_be_projected() {
        let projection = WebMercator::<Point2d, Point2d>::default();
        assert!(projection.project(&Point2d::new(0.0, 90.0)).is_none());
    }
}
