use crate::cartesian::NewCartesianPoint2d;
use crate::geo::Projection;
use geodesy::prelude::*;
use std::marker::PhantomData;

/// Projection backed by a [`geodesy`] operator, e.g. `"utm zone=32"` or `"laea lon_0=10 lat_0=52"`.
///
/// Input points are geographic with longitude as `x` and latitude as `y`, in degrees.
pub struct GeodesyProjection<In, Out> {
    context: Minimal,
    op: OpHandle,
    phantom_in: PhantomData<In>,
    phantom_out: PhantomData<Out>,
}

impl<In, Out> GeodesyProjection<In, Out> {
    /// Creates a projection from the operator definition. Returns `None` if the definition is not understood by
    /// `geodesy`.
    pub fn new(definition: &str) -> Option<Self> {
        let mut context = Minimal::new();
        let op = context.op(definition).ok()?;
        Some(Self {
            context,
            op,
            phantom_in: Default::default(),
            phantom_out: Default::default(),
        })
    }
}

impl<In: NewCartesianPoint2d<f64>, Out: NewCartesianPoint2d<f64>> Projection
    for GeodesyProjection<In, Out>
{
    type InPoint = In;
    type OutPoint = Out;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        let mut data = [Coor2D::geo(input.y(), input.x())];
        self.context.apply(self.op, Fwd, &mut data).ok()?;

        if !data[0].0[0].is_finite() || !data[0].0[1].is_finite() {
            return None;
        }

        Some(Out::new(data[0].0[0], data[0].0[1]))
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        let mut data = [Coor2D([input.x(), input.y()])];
        self.context.apply(self.op, Inv, &mut data).ok()?;

        Some(In::new(data[0].0[0].to_degrees(), data[0].0[1].to_degrees()))
    }
}
