//! See [`FeatureCollection`].

use std::collections::HashMap;

use ahash::RandomState;
use featuremap_types::cartesian::{Point2d, Rect};
use featuremap_types::geo::Crs;
use featuremap_types::Shape;

use crate::error::FeatureMapError;

/// Ordered sequence of [shapes](Shape) with unique identifiers, sharing one coordinate reference descriptor.
///
/// A new collection has an undefined descriptor (`None`). This is different from a defined, but non-projected
/// descriptor such as [`Crs::WGS84`]. The descriptor belongs to the collection as a whole: setting it changes the
/// interpretation of every shape, and never changes coordinates. Use [`FeatureCollection::reproject`] to convert
/// coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCollection {
    shapes: Vec<Shape>,
    index: HashMap<String, usize, RandomState>,
    crs: Option<Crs>,
}

impl FeatureCollection {
    /// Assembles a collection. Fails if two shapes have the same identifier.
    pub fn new(shapes: Vec<Shape>) -> Result<Self, FeatureMapError> {
        let index = build_index(&shapes)?;
        log::debug!("Assembled feature collection of {} shapes", shapes.len());

        Ok(Self {
            shapes,
            index,
            crs: None,
        })
    }

    /// Sets the descriptor of a collection and returns it.
    pub fn with_crs(mut self, crs: Crs) -> Self {
        self.set_crs(Some(crs));
        self
    }

    /// Number of shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns true if there are no shapes.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Shapes in collection order.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Iterates over shapes in collection order.
    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    /// Shape at the given position.
    pub fn get(&self, index: usize) -> Option<&Shape> {
        self.shapes.get(index)
    }

    /// Shape with the given identifier.
    pub fn get_by_id(&self, id: &str) -> Option<&Shape> {
        self.position(id).map(|i| &self.shapes[i])
    }

    /// Position of the shape with the given identifier.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Identifiers of the shapes in collection order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.shapes.iter().map(Shape::id)
    }

    /// Coordinate reference descriptor of the collection, `None` if undefined.
    pub fn crs(&self) -> Option<&Crs> {
        self.crs.as_ref()
    }

    /// Replaces the descriptor and returns the previous one.
    ///
    /// This always succeeds. Replacing a defined descriptor with a different one reinterprets the existing
    /// coordinates instead of converting them, so it is logged as a warning. Use [`FeatureCollection::try_set_crs`] to
    /// refuse such changes, or [`FeatureCollection::reproject`] to convert the coordinates.
    pub fn set_crs(&mut self, crs: Option<Crs>) -> Option<Crs> {
        if let Some(current) = &self.crs {
            if crs.as_ref() != Some(current) {
                log::warn!(
                    "Coordinate reference descriptor '{current}' is replaced by {}, coordinates are not converted",
                    crs.as_ref()
                        .map_or_else(|| "undefined".to_string(), |c| format!("'{c}'"))
                );
            }
        }

        std::mem::replace(&mut self.crs, crs)
    }

    /// Sets the descriptor if it is undefined or equal to the given one. Fails if the collection already has a
    /// different descriptor.
    pub fn try_set_crs(&mut self, crs: Crs) -> Result<(), FeatureMapError> {
        match &self.crs {
            Some(current) if *current != crs => Err(FeatureMapError::IncompatibleDescriptor {
                current: current.clone(),
                requested: crs,
            }),
            _ => {
                self.crs = Some(crs);
                Ok(())
            }
        }
    }

    /// Adds a shape to the end of the collection. Fails if the identifier is already used.
    pub fn push(&mut self, shape: Shape) -> Result<(), FeatureMapError> {
        if self.index.contains_key(shape.id()) {
            return Err(FeatureMapError::DuplicateIdentifier(shape.id().to_string()));
        }

        self.index.insert(shape.id().to_string(), self.shapes.len());
        self.shapes.push(shape);
        Ok(())
    }

    /// Replaces the shape at the given position and returns the old one. The new shape may have a different
    /// identifier, as long as it is not used by another shape.
    pub fn replace(&mut self, index: usize, shape: Shape) -> Result<Shape, FeatureMapError> {
        let Some(old) = self.shapes.get(index) else {
            return Err(FeatureMapError::IndexOutOfBounds {
                index,
                len: self.len(),
            });
        };

        if old.id() != shape.id() {
            if self.index.contains_key(shape.id()) {
                return Err(FeatureMapError::DuplicateIdentifier(shape.id().to_string()));
            }
            self.index.remove(old.id());
            self.index.insert(shape.id().to_string(), index);
        }

        Ok(std::mem::replace(&mut self.shapes[index], shape))
    }

    /// Bounding rectangle of all shapes.
    pub fn bounding_rect(&self) -> Option<Rect> {
        Rect::merge_all(self.shapes.iter().filter_map(Shape::bounding_rect))
    }

    /// Shapes that contain the point, or have a line within `tolerance` from it, with their positions.
    pub fn features_at(&self, point: &Point2d, tolerance: f64) -> Vec<(usize, &Shape)> {
        self.shapes
            .iter()
            .enumerate()
            .filter(|(_, shape)| {
                shape
                    .bounding_rect()
                    .is_some_and(|r| r.expand(tolerance).contains(point))
                    && shape.contains_point(point, tolerance)
            })
            .collect()
    }

    /// Converts coordinates of all shapes into the `target` system and returns the new collection.
    pub fn reproject(&self, target: &Crs) -> Result<Self, FeatureMapError> {
        let source = self.crs.as_ref().ok_or(FeatureMapError::UndefinedDescriptor)?;
        let projection_error = || FeatureMapError::Projection {
            from: source.clone(),
            to: target.clone(),
        };

        let projection = source.projection_to(target).ok_or_else(projection_error)?;
        let shapes = self
            .shapes
            .iter()
            .map(|shape| shape.project(&projection).ok_or_else(projection_error))
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!("Reprojected {} shapes from '{source}' to '{target}'", shapes.len());

        Ok(Self {
            shapes,
            index: self.index.clone(),
            crs: Some(target.clone()),
        })
    }

    /// Creates a new collection with the shapes at the given positions, in the given order, with the same
    /// descriptor.
    pub(crate) fn take(&self, indices: &[usize]) -> Result<Self, FeatureMapError> {
        if let Some(&index) = indices.iter().find(|&&i| i >= self.len()) {
            return Err(FeatureMapError::IndexOutOfBounds {
                index,
                len: self.len(),
            });
        }

        let shapes: Vec<Shape> = indices.iter().map(|&i| self.shapes[i].clone()).collect();
        let index = build_index(&shapes)?;

        Ok(Self {
            shapes,
            index,
            crs: self.crs.clone(),
        })
    }

    /// Consumes the collection and returns its shapes.
    pub fn into_shapes(self) -> Vec<Shape> {
        self.shapes
    }
}

fn build_index(shapes: &[Shape]) -> Result<HashMap<String, usize, RandomState>, FeatureMapError> {
    let mut index = HashMap::with_capacity_and_hasher(shapes.len(), RandomState::new());
    for (i, shape) in shapes.iter().enumerate() {
        if index.insert(shape.id().to_string(), i).is_some() {
            return Err(FeatureMapError::DuplicateIdentifier(shape.id().to_string()));
        }
    }

    Ok(index)
}

impl<'a> IntoIterator for &'a FeatureCollection {
    type Item = &'a Shape;
    type IntoIter = std::slice::Iter<'a, Shape>;

    fn into_iter(self) -> Self::IntoIter {
        self.shapes.iter()
    }
}
