//! Featuremap is a vector feature data model: geometry shapes grouped into collections that share a coordinate
//! reference descriptor, and attribute tables joined to them.
//!
//! # Quick start
//!
//! ```
//! use featuremap::{AttributeTable, AttributedCollection, FeatureCollection, Filter, Value};
//! use featuremap::featuremap_types::cartesian::Point2d;
//! use featuremap::featuremap_types::geo::Crs;
//! use featuremap::featuremap_types::{Ring, Shape};
//!
//! let points = |coords: &[(f64, f64)]| -> Vec<Point2d> { coords.iter().map(|&(x, y)| Point2d::new(x, y)).collect() };
//!
//! let house1 = Shape::new("house1", vec![
//!     Ring::solid(points(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]))?,
//!     Ring::solid(points(&[(0.0, 10.0), (10.0, 10.0), (5.0, 15.0)]))?,
//! ])?;
//! let house2 = Shape::new("house2", vec![
//!     Ring::solid(points(&[(20.0, 0.0), (30.0, 0.0), (30.0, 10.0), (20.0, 10.0)]))?,
//!     Ring::hole(points(&[(22.0, 2.0), (24.0, 2.0), (24.0, 4.0), (22.0, 4.0)]))?,
//! ])?;
//!
//! let collection = FeatureCollection::new(vec![house1, house2])?.with_crs(Crs::WGS84);
//! let table = AttributeTable::new(["house2", "house1"])?
//!     .with_column("attr1", [1, 2])?
//!     .with_column("attr2", [6, 5])?;
//!
//! // Shapes follow the order of the table rows
//! let houses = AttributedCollection::new(collection, table)?;
//! assert_eq!(houses.shape(0).map(|s| s.id()), Some("house2"));
//!
//! let big = houses.select(Filter::gt("attr2", 5))?;
//! assert_eq!(big.len(), 1);
//! assert_eq!(big.row(0).and_then(|r| r.get("attr1").cloned()), Some(Value::Int(1)));
//! # Ok::<(), featuremap::error::FeatureMapError>(())
//! ```
//!
//! # Main components
//!
//! * Geometry types live in the [`featuremap_types`] crate, re-exported here: [rings](featuremap_types::Ring),
//!   [shapes](featuremap_types::Shape), [coordinate reference descriptors](featuremap_types::geo::Crs) and
//!   projections.
//! * [`FeatureCollection`] is an ordered set of shapes with unique identifiers and one descriptor.
//! * [`AttributeTable`] stores [values](Value) in named columns, one row per identifier.
//! * [`AttributedCollection`] pairs every shape with a table row. The pairing is established by identifiers in
//!   [`attach`] and is positional afterwards.
//! * [`Filter`] expressions select rows by their values.
//! * With the `geojson` feature (on by default), the [`geojson`] module reads and writes attributed collections.

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

mod attributed;
mod collection;
pub mod error;
mod filter;
mod join;
mod table;
mod value;

#[cfg(feature = "geojson")]
pub mod geojson;

pub use attributed::{AttributedCollection, Feature, Selection};
pub use collection::FeatureCollection;
pub use filter::{CompareOp, Filter};
pub use join::attach;
pub use table::{AttributeTable, Column, Row};
pub use value::Value;

pub use featuremap_types;

#[cfg(test)]
pub(crate) mod tests {
    use featuremap_types::cartesian::Point2d;
    use featuremap_types::{Ring, Shape};

    use crate::FeatureCollection;

    pub(crate) fn points(coords: &[(f64, f64)]) -> Vec<Point2d> {
        coords.iter().map(|&(x, y)| Point2d::new(x, y)).collect()
    }

    /// Rectangle with a roof.
    pub(crate) fn house1() -> Shape {
        Shape::new(
            "house1",
            vec![
                Ring::solid(points(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)])).unwrap(),
                Ring::solid(points(&[(0.0, 10.0), (10.0, 10.0), (5.0, 15.0)])).unwrap(),
            ],
        )
        .unwrap()
    }

    /// Rectangle with a roof and a courtyard.
    pub(crate) fn house2() -> Shape {
        Shape::new(
            "house2",
            vec![
                Ring::solid(points(&[(20.0, 0.0), (30.0, 0.0), (30.0, 10.0), (20.0, 10.0)])).unwrap(),
                Ring::solid(points(&[(20.0, 10.0), (30.0, 10.0), (25.0, 15.0)])).unwrap(),
                Ring::hole(points(&[(22.0, 2.0), (24.0, 2.0), (24.0, 4.0), (22.0, 4.0)])).unwrap(),
            ],
        )
        .unwrap()
    }

    pub(crate) fn houses() -> FeatureCollection {
        FeatureCollection::new(vec![house1(), house2()]).unwrap()
    }
}
