use crate::cartesian::NewCartesianPoint2d;
use crate::geo::Projection;
use std::marker::PhantomData;

/// Projection that copies coordinates as is. Used between equivalent coordinate systems.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityProjection<In, Out> {
    phantom_in: PhantomData<In>,
    phantom_out: PhantomData<Out>,
}

impl<In, Out> IdentityProjection<In, Out> {
    /// Creates a new instance.
    pub fn new() -> Self {
        Self {
            phantom_in: Default::default(),
            phantom_out: Default::default(),
        }
    }
}

impl<In: NewCartesianPoint2d, Out: NewCartesianPoint2d> Projection for IdentityProjection<In, Out> {
    type InPoint = In;
    type OutPoint = Out;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        Some(Out::new(input.x(), input.y()))
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        Some(In::new(input.x(), input.y()))
    }
}
