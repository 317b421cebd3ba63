//! Error types used by the crate.

use featuremap_types::error::GeometryError;
use featuremap_types::geo::Crs;
use thiserror::Error;

/// Featuremap error type.
///
/// All errors are reported by the call that detects them, and failed operations produce no partial results.
/// Operations that borrow their inputs leave them untouched. Operations that take their inputs by value, such as
/// [`attach`](crate::attach) and [`AttributedCollection::new`](crate::AttributedCollection::new), drop them on
/// failure, so clone the inputs first if you need to correct and retry.
#[derive(Debug, Error)]
pub enum FeatureMapError {
    /// Ring or shape cannot be constructed from the given input.
    #[error(transparent)]
    InvalidGeometry(#[from] GeometryError),
    /// Two shapes (or two attribute rows) share an identifier.
    #[error("duplicate identifier '{0}'")]
    DuplicateIdentifier(String),
    /// Shape identifiers and attribute row identifiers are different sets.
    #[error(
        "identifiers do not match: missing from table {missing_from_table:?}, missing from geometry {missing_from_geometry:?}"
    )]
    UnmatchedIdentifier {
        /// Shape identifiers that have no attribute row, sorted.
        missing_from_table: Vec<String>,
        /// Attribute row identifiers that have no shape, sorted.
        missing_from_geometry: Vec<String>,
    },
    /// Refused to overwrite a defined coordinate reference descriptor with a different one.
    #[error("collection is already defined in '{current}', refusing to reinterpret it as '{requested}'")]
    IncompatibleDescriptor {
        /// Descriptor of the collection.
        current: Crs,
        /// Descriptor that was requested.
        requested: Crs,
    },
    /// Operation needs a coordinate reference descriptor, but the collection has none.
    #[error("coordinate reference descriptor is undefined")]
    UndefinedDescriptor,
    /// Coordinates cannot be converted between the descriptors.
    #[error("cannot project from '{from}' to '{to}'")]
    Projection {
        /// Source descriptor.
        from: Crs,
        /// Target descriptor.
        to: Crs,
    },
    /// Column with this name already exists in the table.
    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),
    /// Column has a different number of values than the table has rows.
    #[error("column '{column}' has {actual} values, expected {expected}")]
    ColumnLength {
        /// Column name.
        column: String,
        /// Number of rows in the table.
        expected: usize,
        /// Number of values in the column.
        actual: usize,
    },
    /// Column with this name does not exist.
    #[error("unknown column '{0}'")]
    UnknownColumn(String),
    /// Values of the column cannot be used as identifiers.
    #[error("column '{column}' cannot be used as identifier: {reason}")]
    InvalidIdentifierColumn {
        /// Column name.
        column: String,
        /// What is wrong with the values.
        reason: String,
    },
    /// Index is larger than the number of elements.
    #[error("index {index} is out of bounds for length {len}")]
    IndexOutOfBounds {
        /// Requested index.
        index: usize,
        /// Number of elements.
        len: usize,
    },
    /// Values of different kinds cannot be compared.
    #[error("cannot compare {left} with {right} in column '{column}'")]
    TypeMismatch {
        /// Column name.
        column: String,
        /// Kind of the column value.
        left: &'static str,
        /// Kind of the filter value.
        right: &'static str,
    },
    /// Invalid GeoJSON input.
    #[cfg(feature = "geojson")]
    #[error("geojson error: {0}")]
    GeoJson(#[from] geojson::Error),
    /// GeoJSON is valid, but cannot be represented as a feature collection.
    #[cfg(feature = "geojson")]
    #[error("unsupported geojson content: {0}")]
    UnsupportedGeoJson(String),
    /// Error reading/writing data to the FS.
    #[error("failed to access file")]
    Io(#[from] std::io::Error),
}
