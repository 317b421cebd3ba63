//! See [`Filter`].

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::FeatureMapError;
use crate::table::{AttributeTable, Row};
use crate::value::Value;

/// Boolean expression over the values of an attribute table row.
///
/// Filters are plain data and can be stored in configuration files:
///
/// ```
/// use featuremap::Filter;
///
/// let filter: Filter = serde_json::from_str(
///     r#"{"compare": {"column": "attr2", "op": "gt", "value": 5}}"#,
/// ).unwrap();
/// assert_eq!(filter, Filter::gt("attr2", 5));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    /// Compares the value of a column with a constant.
    ///
    /// Integers and floats are compared as numbers. If either value is null, the comparison is false, including
    /// [`CompareOp::Ne`]. Use [`Filter::IsNull`] to match nulls.
    Compare {
        /// Column name.
        column: String,
        /// Comparison operator. The column value is the left operand.
        op: CompareOp,
        /// Constant to compare with.
        value: Value,
    },
    /// True if the value of the column is null.
    IsNull(String),
    /// True if all the filters are true. Empty list is true.
    And(Vec<Filter>),
    /// True if any of the filters is true. Empty list is false.
    Or(Vec<Filter>),
    /// Negation.
    Not(Box<Filter>),
}

/// Comparison operator of [`Filter::Compare`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    /// Equal.
    Eq,
    /// Not equal.
    Ne,
    /// Less than.
    Lt,
    /// Less than or equal.
    Le,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Ge,
}

impl CompareOp {
    fn matches(&self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Ne => ordering != Ordering::Equal,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Le => ordering != Ordering::Greater,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Ge => ordering != Ordering::Less,
        }
    }
}

macro_rules! compare_constructor {
    ($(#[$doc:meta] $name:ident => $op:ident),* $(,)?) => {
        $(
            #[$doc]
            pub fn $name(column: impl Into<String>, value: impl Into<Value>) -> Self {
                Self::Compare {
                    column: column.into(),
                    op: CompareOp::$op,
                    value: value.into(),
                }
            }
        )*
    };
}

impl Filter {
    compare_constructor!(
        /// `column == value`
        eq => Eq,
        /// `column != value`
        ne => Ne,
        /// `column < value`
        lt => Lt,
        /// `column <= value`
        le => Le,
        /// `column > value`
        gt => Gt,
        /// `column >= value`
        ge => Ge,
    );

    /// `column is null`
    pub fn is_null(column: impl Into<String>) -> Self {
        Self::IsNull(column.into())
    }

    /// Combines two filters with logical `and`.
    pub fn and(self, other: Filter) -> Self {
        match self {
            Self::And(mut filters) => {
                filters.push(other);
                Self::And(filters)
            }
            filter => Self::And(vec![filter, other]),
        }
    }

    /// Combines two filters with logical `or`.
    pub fn or(self, other: Filter) -> Self {
        match self {
            Self::Or(mut filters) => {
                filters.push(other);
                Self::Or(filters)
            }
            filter => Self::Or(vec![filter, other]),
        }
    }

    /// Logical negation of the filter.
    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Evaluates the filter for the given row.
    ///
    /// Fails if the filter refers to a column the table does not have, or compares values that cannot be compared.
    pub fn evaluate(&self, row: &Row) -> Result<bool, FeatureMapError> {
        match self {
            Filter::Compare { column, op, value } => {
                let cell = row
                    .get(column)
                    .ok_or_else(|| FeatureMapError::UnknownColumn(column.clone()))?;
                if cell.is_null() || value.is_null() {
                    return Ok(false);
                }

                if !cell.is_comparable_with(value) {
                    return Err(FeatureMapError::TypeMismatch {
                        column: column.clone(),
                        left: cell.kind_name(),
                        right: value.kind_name(),
                    });
                }

                // NaN compares false with anything
                Ok(cell.compare(value).is_some_and(|ord| op.matches(ord)))
            }
            Filter::IsNull(column) => row
                .get(column)
                .map(Value::is_null)
                .ok_or_else(|| FeatureMapError::UnknownColumn(column.clone())),
            Filter::And(filters) => {
                for filter in filters {
                    if !filter.evaluate(row)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Filter::Or(filters) => {
                for filter in filters {
                    if filter.evaluate(row)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Filter::Not(filter) => Ok(!filter.evaluate(row)?),
        }
    }

    /// Checks that all the columns the filter refers to exist in the table.
    ///
    /// [`Filter::evaluate`] short-circuits, so a misspelled column in an unreached branch (or in any branch, if the
    /// table is empty) is not reported by it.
    pub fn check_columns(&self, table: &AttributeTable) -> Result<(), FeatureMapError> {
        match self {
            Filter::Compare { column, .. } | Filter::IsNull(column) => {
                if table.has_column(column) {
                    Ok(())
                } else {
                    Err(FeatureMapError::UnknownColumn(column.clone()))
                }
            }
            Filter::And(filters) | Filter::Or(filters) => filters
                .iter()
                .try_for_each(|filter| filter.check_columns(table)),
            Filter::Not(filter) => filter.check_columns(table),
        }
    }
}
