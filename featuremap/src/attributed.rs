//! See [`AttributedCollection`].

use featuremap_types::geo::Crs;
use featuremap_types::Shape;

use crate::collection::FeatureCollection;
use crate::error::FeatureMapError;
use crate::filter::Filter;
use crate::join::attach;
use crate::table::{AttributeTable, Row};
use crate::value::Value;

/// Feature collection with an attribute table row for every shape.
///
/// Rows are matched to shapes by identifier once, when the collection is created (see [`attach`]). After that,
/// shape `i` is paired with row `i` purely by position.
///
/// <div class="warning">
///
/// [`AttributedCollection::table_mut`] gives direct access to the table. Reordering the table through it (e.g. with
/// [`AttributeTable::sort_by_column`]) does not reorder the shapes, so the attributes silently end up paired with
/// other shapes. Use [`AttributedCollection::select`] to get a subset in a different order instead.
///
/// </div>
#[derive(Debug, Clone, PartialEq)]
pub struct AttributedCollection {
    collection: FeatureCollection,
    table: AttributeTable,
}

/// Shape with its attribute row.
#[derive(Debug, Clone, Copy)]
pub struct Feature<'a> {
    shape: &'a Shape,
    row: Row<'a>,
}

impl<'a> Feature<'a> {
    /// Shape of the feature.
    pub fn shape(&self) -> &'a Shape {
        self.shape
    }

    /// Attribute row of the feature.
    pub fn row(&self) -> Row<'a> {
        self.row
    }

    /// Identifier of the shape.
    pub fn id(&self) -> &'a str {
        self.shape.id()
    }

    /// Attribute value of the feature.
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        self.row.get(column)
    }
}

/// Rows to select from an [`AttributedCollection`].
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// Rows at the given positions. Duplicates are ignored; the result keeps the collection order.
    Indices(Vec<usize>),
    /// Rows for which the filter is true.
    Filter(Filter),
}

impl From<Vec<usize>> for Selection {
    fn from(value: Vec<usize>) -> Self {
        Self::Indices(value)
    }
}

impl From<&[usize]> for Selection {
    fn from(value: &[usize]) -> Self {
        Self::Indices(value.to_vec())
    }
}

impl From<Filter> for Selection {
    fn from(value: Filter) -> Self {
        Self::Filter(value)
    }
}

impl AttributedCollection {
    /// Joins the table to the collection by the table row identifiers. See [`attach`].
    pub fn new(collection: FeatureCollection, table: AttributeTable) -> Result<Self, FeatureMapError> {
        attach(collection, table, None)
    }

    /// Joins the table to the collection using the values of `id_column` as row identifiers. See [`attach`].
    pub fn with_id_column(
        collection: FeatureCollection,
        table: AttributeTable,
        id_column: &str,
    ) -> Result<Self, FeatureMapError> {
        attach(collection, table, Some(id_column))
    }

    pub(crate) fn from_matched(collection: FeatureCollection, table: AttributeTable) -> Self {
        debug_assert_eq!(collection.len(), table.len());
        Self { collection, table }
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.collection.len()
    }

    /// Returns true if there are no features.
    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    /// Coordinate reference descriptor of the shapes.
    pub fn crs(&self) -> Option<&Crs> {
        self.collection.crs()
    }

    /// See [`FeatureCollection::set_crs`].
    pub fn set_crs(&mut self, crs: Option<Crs>) -> Option<Crs> {
        self.collection.set_crs(crs)
    }

    /// See [`FeatureCollection::try_set_crs`].
    pub fn try_set_crs(&mut self, crs: Crs) -> Result<(), FeatureMapError> {
        self.collection.try_set_crs(crs)
    }

    /// Shapes of the collection, in the table order.
    pub fn collection(&self) -> &FeatureCollection {
        &self.collection
    }

    /// Attribute table.
    pub fn table(&self) -> &AttributeTable {
        &self.table
    }

    /// Mutable access to the attribute table.
    ///
    /// Adding or removing columns is safe. Reordering the rows desynchronizes the attributes from the shapes, see
    /// the type documentation.
    pub fn table_mut(&mut self) -> &mut AttributeTable {
        &mut self.table
    }

    /// Shape at the given position.
    pub fn shape(&self, index: usize) -> Option<&Shape> {
        self.collection.get(index)
    }

    /// Attribute row at the given position.
    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        self.table.row(index)
    }

    /// Shape and attribute row at the given position.
    pub fn feature(&self, index: usize) -> Option<Feature<'_>> {
        Some(Feature {
            shape: self.collection.get(index)?,
            row: self.table.row(index)?,
        })
    }

    /// Iterates over the features in collection order.
    pub fn iter(&self) -> impl Iterator<Item = Feature<'_>> {
        self.collection
            .iter()
            .zip(self.table.rows())
            .map(|(shape, row)| Feature { shape, row })
    }

    /// Values of the column, in collection order.
    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.table.column(name)
    }

    /// Creates a new collection with the selected features.
    ///
    /// The features keep their relative order and their pairing, and the new collection has the same descriptor.
    ///
    /// ```
    /// # use featuremap::{AttributeTable, AttributedCollection, FeatureCollection, Filter};
    /// # use featuremap::featuremap_types::{cartesian::Point2d, Ring, Shape};
    /// # fn square(id: &str, x: f64) -> Shape {
    /// #     let points = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
    /// #     Shape::single(id, Ring::solid(points.iter().map(|&(px, py)| Point2d::new(px + x, py)).collect()).unwrap())
    /// # }
    /// let collection = FeatureCollection::new(vec![square("a", 0.0), square("b", 2.0), square("c", 4.0)])?;
    /// let table = AttributeTable::new(["a", "b", "c"])?.with_column("height", [10, 25, 40])?;
    /// let attributed = AttributedCollection::new(collection, table)?;
    ///
    /// let tall = attributed.select(Filter::gt("height", 20))?;
    /// assert_eq!(tall.collection().ids().collect::<Vec<_>>(), ["b", "c"]);
    ///
    /// let first = attributed.select(vec![0_usize])?;
    /// assert_eq!(first.len(), 1);
    /// # Ok::<(), featuremap::error::FeatureMapError>(())
    /// ```
    pub fn select(&self, selection: impl Into<Selection>) -> Result<Self, FeatureMapError> {
        let indices = match selection.into() {
            Selection::Indices(mut indices) => {
                indices.sort_unstable();
                indices.dedup();
                indices
            }
            Selection::Filter(filter) => {
                filter.check_columns(&self.table)?;
                let mut indices = vec![];
                for row in self.table.rows() {
                    if filter.evaluate(&row)? {
                        indices.push(row.index());
                    }
                }
                indices
            }
        };

        let selected = self.take(&indices)?;
        log::debug!("Selected {} of {} features", selected.len(), self.len());

        Ok(selected)
    }

    /// Creates a new collection with the features for which the predicate returns true.
    pub fn select_where(
        &self,
        mut predicate: impl FnMut(&Feature) -> bool,
    ) -> Result<Self, FeatureMapError> {
        let indices: Vec<usize> = self
            .iter()
            .enumerate()
            .filter(|(_, feature)| predicate(feature))
            .map(|(i, _)| i)
            .collect();

        self.take(&indices)
    }

    fn take(&self, indices: &[usize]) -> Result<Self, FeatureMapError> {
        Ok(Self {
            collection: self.collection.take(indices)?,
            table: self.table.take(indices)?,
        })
    }

    /// Converts the shapes into the `target` system. Attributes are not changed.
    pub fn reproject(&self, target: &Crs) -> Result<Self, FeatureMapError> {
        Ok(Self {
            collection: self.collection.reproject(target)?,
            table: self.table.clone(),
        })
    }

    /// Consumes the collection and returns its shapes and attribute table.
    pub fn into_parts(self) -> (FeatureCollection, AttributeTable) {
        (self.collection, self.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{house1, house2, houses};
    use assert_matches::assert_matches;

    fn attributed() -> AttributedCollection {
        let table = AttributeTable::new(["house2", "house1"])
            .unwrap()
            .with_column("attr1", [1, 2])
            .unwrap()
            .with_column("attr2", [6, 5])
            .unwrap();
        AttributedCollection::new(houses(), table).unwrap()
    }

    #[test]
    fn assemble_two_houses() {
        let collection = houses();
        assert_eq!(collection.len(), 2);
        assert!(collection.crs().is_none());
    }

    #[test]
    fn attach_reorders_shapes() {
        let attributed = attributed();
        assert_eq!(
            attributed.iter().map(|f| f.id()).collect::<Vec<_>>(),
            vec!["house2", "house1"]
        );
        assert_eq!(attributed.row(0).unwrap().get("attr1"), Some(&Value::Int(1)));
        let feature = attributed.feature(1).unwrap();
        assert_eq!(feature.shape(), &house1());
        assert_eq!(feature.get("attr2"), Some(&Value::Int(5)));
    }

    #[test]
    fn unmatched_table() {
        let table = AttributeTable::new(["house1", "house3"]).unwrap();
        let Err(FeatureMapError::UnmatchedIdentifier {
            missing_from_table,
            missing_from_geometry,
        }) = AttributedCollection::new(houses(), table)
        else {
            panic!("join must fail");
        };

        let mut mismatch = [missing_from_table, missing_from_geometry].concat();
        mismatch.sort();
        assert_eq!(mismatch, ["house2", "house3"]);
    }

    #[test]
    fn select_by_filter() {
        let attributed = attributed();
        let selected = attributed.select(Filter::gt("attr2", 5)).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected.shape(0), Some(&house2()));
        assert_eq!(selected.row(0).unwrap().id(), "house2");
        assert_eq!(selected.column("attr2").unwrap(), &[Value::Int(6)]);

        let none = attributed.select(Filter::gt("attr2", 100)).unwrap();
        assert!(none.is_empty());

        assert_matches!(
            attributed.select(Filter::gt("attr3", 1)),
            Err(FeatureMapError::UnknownColumn(_))
        );
    }

    #[test]
    fn select_by_indices_keeps_order() {
        let attributed = attributed();
        let selected = attributed.select(vec![1_usize, 0, 1]).unwrap();
        assert_eq!(selected, attributed);

        let selected = attributed.select(vec![1_usize]).unwrap();
        assert_eq!(selected.shape(0).unwrap().id(), "house1");
        assert_eq!(selected.row(0).unwrap().get("attr1"), Some(&Value::Int(2)));

        assert_matches!(
            attributed.select(vec![2_usize]),
            Err(FeatureMapError::IndexOutOfBounds { index: 2, len: 2 })
        );
    }

    #[test]
    fn select_where() {
        let attributed = attributed();
        let selected = attributed
            .select_where(|f| f.shape().holes().count() == 0)
            .unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected.feature(0).unwrap().id(), "house1");
    }

    #[test]
    fn selection_keeps_descriptor() {
        let mut attributed = attributed();
        attributed.set_crs(Some(Crs::WGS84));
        let selected = attributed.select(Filter::gt("attr2", 5)).unwrap();
        assert_eq!(selected.crs(), Some(&Crs::WGS84));

        let mut selected = selected;
        selected.set_crs(Some(Crs::EPSG3857));
        assert_eq!(attributed.crs(), Some(&Crs::WGS84));
    }

    #[test]
    fn reproject_keeps_attributes() {
        let mut attributed = attributed();
        assert_matches!(
            attributed.reproject(&Crs::EPSG3857),
            Err(FeatureMapError::UndefinedDescriptor)
        );

        attributed.try_set_crs(Crs::WGS84).unwrap();
        let projected = attributed.reproject(&Crs::EPSG3857).unwrap();
        assert_eq!(projected.crs(), Some(&Crs::EPSG3857));
        assert_eq!(projected.table(), attributed.table());
        assert_eq!(projected.shape(0).unwrap().id(), "house2");
    }

    #[test]
    fn reordering_table_desynchronizes_rows() {
        let mut attributed = attributed();
        attributed
            .table_mut()
            .sort_by_column("attr1", true)
            .unwrap();

        // Shapes stay where they are, rows have moved.
        assert_eq!(attributed.shape(0).unwrap().id(), "house2");
        assert_eq!(attributed.row(0).unwrap().id(), "house1");
        assert_eq!(attributed.row(0).unwrap().get("attr2"), Some(&Value::Int(5)));
    }

    #[test]
    fn adding_columns() {
        let mut attributed = attributed();
        attributed
            .table_mut()
            .add_column("area", attributed_areas())
            .unwrap();
        assert_eq!(attributed.column("area").unwrap().len(), 2);
        assert_eq!(attributed.into_parts().1.columns().len(), 3);
    }

    fn attributed_areas() -> Vec<f64> {
        attributed().iter().map(|f| f.shape().area()).collect()
    }
}
