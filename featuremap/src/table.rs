//! See [`AttributeTable`].

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::FeatureMapError;
use crate::value::Value;

/// Tabular attribute store: identified rows and named columns of scalar [values](Value).
///
/// Every row has a string identifier, which is used to match rows to shapes when the table is attached to a
/// [`FeatureCollection`](crate::FeatureCollection). Row identifiers are unique.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeTable {
    row_ids: Vec<String>,
    columns: Vec<Column>,
}

/// Named column of an [`AttributeTable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    values: Vec<Value>,
}

impl Column {
    /// Name of the column.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Values of the column, one per row.
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

impl AttributeTable {
    /// Creates a table without columns. Fails if row identifiers are not unique.
    pub fn new<I, S>(row_ids: I) -> Result<Self, FeatureMapError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row_ids: Vec<String> = row_ids.into_iter().map(Into::into).collect();
        check_unique(&row_ids)?;

        Ok(Self {
            row_ids,
            columns: vec![],
        })
    }

    /// Creates a table from `(row id, [(column, value)])` records.
    ///
    /// Columns appear in the order they are first met. Cells missing in a record are [`Value::Null`].
    pub fn from_records<I>(records: I) -> Result<Self, FeatureMapError>
    where
        I: IntoIterator<Item = (String, Vec<(String, Value)>)>,
    {
        let records: Vec<_> = records.into_iter().collect();
        let mut table = Self::new(records.iter().map(|(id, _)| id.clone()))?;
        let row_count = table.len();

        for (row, (_, cells)) in records.into_iter().enumerate() {
            for (name, value) in cells {
                let index = match table.column_index(&name) {
                    Some(index) => index,
                    None => {
                        table.columns.push(Column {
                            name,
                            values: vec![Value::Null; row_count],
                        });
                        table.columns.len() - 1
                    }
                };
                table.columns[index].values[row] = value;
            }
        }

        Ok(table)
    }

    /// Adds a column and returns the table.
    pub fn with_column<I, V>(mut self, name: impl Into<String>, values: I) -> Result<Self, FeatureMapError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.add_column(name, values)?;
        Ok(self)
    }

    /// Adds a column. Fails if a column with this name exists or if the number of values differs from the number
    /// of rows.
    pub fn add_column<I, V>(&mut self, name: impl Into<String>, values: I) -> Result<(), FeatureMapError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let name = name.into();
        if self.column_index(&name).is_some() {
            return Err(FeatureMapError::DuplicateColumn(name));
        }

        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if values.len() != self.len() {
            return Err(FeatureMapError::ColumnLength {
                column: name,
                expected: self.len(),
                actual: values.len(),
            });
        }

        self.columns.push(Column { name, values });
        Ok(())
    }

    /// Removes a column and returns its values.
    pub fn remove_column(&mut self, name: &str) -> Result<Vec<Value>, FeatureMapError> {
        let index = self
            .column_index(name)
            .ok_or_else(|| FeatureMapError::UnknownColumn(name.to_string()))?;
        Ok(self.columns.remove(index).values)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.row_ids.len()
    }

    /// Returns true if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.row_ids.is_empty()
    }

    /// Row identifiers in row order.
    pub fn row_ids(&self) -> &[String] {
        &self.row_ids
    }

    /// Column names in column order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Columns in column order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Values of the column with the given name.
    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.column_index(name).map(|i| &self.columns[i].values[..])
    }

    /// Returns true if the table has a column with the given name.
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Value of the cell.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        self.column(column)?.get(row)
    }

    /// Row with the given index.
    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        (index < self.len()).then_some(Row { table: self, index })
    }

    /// Iterates over rows in order.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        (0..self.len()).map(move |index| Row { table: self, index })
    }

    /// Creates a new table with the rows at the given indices, in the given order.
    pub fn take(&self, indices: &[usize]) -> Result<Self, FeatureMapError> {
        if let Some(&index) = indices.iter().find(|&&i| i >= self.len()) {
            return Err(FeatureMapError::IndexOutOfBounds {
                index,
                len: self.len(),
            });
        }

        let row_ids: Vec<String> = indices.iter().map(|&i| self.row_ids[i].clone()).collect();
        check_unique(&row_ids)?;

        Ok(Self {
            row_ids,
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    values: indices.iter().map(|&i| c.values[i].clone()).collect(),
                })
                .collect(),
        })
    }

    /// Reorders the rows by the values of the column. The sort is stable.
    ///
    /// Columns with values of different kinds are ordered by kind first: booleans, then numbers (integers and floats
    /// together), then text. Nulls and NaN go last in both directions.
    ///
    /// Only the table is reordered. If the table belongs to an
    /// [`AttributedCollection`](crate::AttributedCollection), its rows no longer match the shapes afterwards.
    pub fn sort_by_column(&mut self, name: &str, descending: bool) -> Result<(), FeatureMapError> {
        let values = self
            .column(name)
            .ok_or_else(|| FeatureMapError::UnknownColumn(name.to_string()))?;

        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by(|&a, &b| {
            let (va, vb) = (&values[a], &values[b]);
            let (ra, rb) = (sort_rank(va), sort_rank(vb));
            if ra == MISSING_RANK || rb == MISSING_RANK {
                return ra.cmp(&rb);
            }

            // Values of the same rank are always comparable
            let ord = ra
                .cmp(&rb)
                .then_with(|| va.compare(vb).unwrap_or(Ordering::Equal));
            if descending {
                ord.reverse()
            } else {
                ord
            }
        });

        *self = self.take(&order)?;
        Ok(())
    }

    /// Values of the column converted into row identifiers. Text values are used as is, integers are formatted.
    pub fn ids_from_column(&self, name: &str) -> Result<Vec<String>, FeatureMapError> {
        let values = self
            .column(name)
            .ok_or_else(|| FeatureMapError::UnknownColumn(name.to_string()))?;

        values
            .iter()
            .map(|v| match v {
                Value::Text(s) => Ok(s.clone()),
                Value::Int(i) => Ok(i.to_string()),
                other => Err(FeatureMapError::InvalidIdentifierColumn {
                    column: name.to_string(),
                    reason: format!("{} value cannot be an identifier", other.kind_name()),
                }),
            })
            .collect()
    }

    pub(crate) fn set_row_ids(&mut self, row_ids: Vec<String>) {
        debug_assert_eq!(row_ids.len(), self.len());
        self.row_ids = row_ids;
    }
}

const MISSING_RANK: u8 = 3;

fn sort_rank(value: &Value) -> u8 {
    match value {
        Value::Bool(_) => 0,
        Value::Int(_) => 1,
        Value::Float(v) if !v.is_nan() => 1,
        Value::Text(_) => 2,
        Value::Float(_) | Value::Null => MISSING_RANK,
    }
}

fn check_unique(ids: &[String]) -> Result<(), FeatureMapError> {
    let mut seen = HashSet::with_capacity(ids.len());
    match ids.iter().find(|id| !seen.insert(id.as_str())) {
        Some(id) => Err(FeatureMapError::DuplicateIdentifier(id.clone())),
        None => Ok(()),
    }
}

/// View of one row of an [`AttributeTable`].
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a AttributeTable,
    index: usize,
}

impl<'a> Row<'a> {
    /// Position of the row in the table.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Identifier of the row.
    pub fn id(&self) -> &'a str {
        &self.table.row_ids[self.index]
    }

    /// Value of the given column in this row.
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        self.table.value(self.index, column)
    }

    /// Iterates over `(column name, value)` pairs of the row.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a Value)> + 'a {
        let index = self.index;
        self.table
            .columns
            .iter()
            .map(move |c| (c.name.as_str(), &c.values[index]))
    }
}
