//! Attribute join: matching the rows of an [`AttributeTable`] to the shapes of a [`FeatureCollection`].

use std::collections::HashSet;

use ahash::RandomState;

use crate::attributed::AttributedCollection;
use crate::collection::FeatureCollection;
use crate::error::FeatureMapError;
use crate::table::AttributeTable;

/// Joins the table to the collection by identifiers.
///
/// Row identifiers are taken from `id_column` if it is given (the row identifiers of the table are replaced by the
/// column values), or the table's own row identifiers otherwise. Identifiers are compared as exact, case-sensitive
/// strings.
///
/// The identifier sets of the shapes and of the rows must be equal, otherwise
/// [`FeatureMapError::UnmatchedIdentifier`] is returned listing the identifiers found on one side only. On success
/// the shapes are reordered to follow the order of the table rows, and from that point on shape `i` is paired with
/// row `i` by position.
///
/// Both inputs are consumed, including on failure. Clone them beforehand to correct the identifiers and retry.
pub fn attach(
    collection: FeatureCollection,
    mut table: AttributeTable,
    id_column: Option<&str>,
) -> Result<AttributedCollection, FeatureMapError> {
    let row_ids = match id_column {
        Some(column) => {
            let ids = table.ids_from_column(column)?;
            let mut seen = HashSet::with_capacity_and_hasher(ids.len(), RandomState::new());
            if let Some(duplicate) = ids.iter().find(|id| !seen.insert(id.as_str())) {
                return Err(FeatureMapError::DuplicateIdentifier(duplicate.clone()));
            }
            Some(ids)
        }
        None => None,
    };

    let ids = row_ids.as_deref().unwrap_or(table.row_ids());
    let mut order = Vec::with_capacity(ids.len());
    let mut missing_from_geometry = vec![];
    for id in ids {
        match collection.position(id) {
            Some(position) => order.push(position),
            None => missing_from_geometry.push(id.clone()),
        }
    }

    let table_ids: HashSet<&str, RandomState> = ids.iter().map(String::as_str).collect();
    let mut missing_from_table: Vec<String> = collection
        .ids()
        .filter(|id| !table_ids.contains(id))
        .map(str::to_string)
        .collect();

    if !missing_from_table.is_empty() || !missing_from_geometry.is_empty() {
        missing_from_table.sort();
        missing_from_geometry.sort();
        log::debug!(
            "Attribute join failed: {} shape ids without rows, {} row ids without shapes",
            missing_from_table.len(),
            missing_from_geometry.len()
        );
        return Err(FeatureMapError::UnmatchedIdentifier {
            missing_from_table,
            missing_from_geometry,
        });
    }

    let collection = if order.iter().enumerate().all(|(i, &p)| i == p) {
        collection
    } else {
        collection.take(&order)?
    };

    if let Some(ids) = row_ids {
        table.set_row_ids(ids);
    }

    log::debug!(
        "Attached {} attribute rows with {} columns to feature collection",
        table.len(),
        table.columns().len()
    );

    Ok(AttributedCollection::from_matched(collection, table))
}
