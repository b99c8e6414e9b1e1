//! Typed, row-ordered tables.
//!
//! A [`Table`] carries a [`Schema`] established when it is created, and every
//! row pushed into it is checked against that schema. Rows that do not fit are
//! rejected, never coerced beyond widening integers into float columns.
//!
//! - [`value`]: [`Value`] cells and [`ColumnType`]
//! - [`schema`]: [`Schema`] and [`Column`]
//! - [`csv`]: delimited-text reading and writing

pub mod csv;
pub mod schema;
pub mod value;

pub use schema::{Column, Schema};
pub use value::{ColumnType, Value};

use celestial_core::SkyPoint;
use serde::Serialize;

use crate::errors::{XMatchError, XMatchResult};

/// One table row, one value per schema column.
pub type Row = Vec<Value>;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Table {
    schema: Schema,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    /// Build a table and push every row through [`Table::push_row`].
    pub fn with_rows<I>(schema: Schema, rows: I) -> XMatchResult<Self>
    where
        I: IntoIterator<Item = Row>,
    {
        let mut table = Self::new(schema);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Append a row after checking its arity and each value's type.
    ///
    /// # Errors
    /// [`XMatchError::Schema`] naming the offending row and column.
    pub fn push_row(&mut self, row: Row) -> XMatchResult<()> {
        let row_index = self.rows.len();
        if row.len() != self.schema.len() {
            return Err(XMatchError::schema(
                row_index,
                format!(
                    "expected {} values, found {}",
                    self.schema.len(),
                    row.len()
                ),
            ));
        }

        let mut checked = Vec::with_capacity(row.len());
        for (column, value) in self.schema.columns().iter().zip(row) {
            match column.ty.conform(value) {
                Ok(value) => checked.push(value),
                Err(value) => {
                    return Err(XMatchError::schema(
                        row_index,
                        format!(
                            "column '{}' expects {}, found {} value '{}'",
                            column.name,
                            column.ty,
                            value.type_name(),
                            value
                        ),
                    ))
                }
            }
        }

        self.rows.push(checked);
        Ok(())
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// # Errors
    /// [`XMatchError::InvalidParameter`] if the column does not exist.
    pub fn column_index(&self, name: &str) -> XMatchResult<usize> {
        self.schema.index_of(name).ok_or_else(|| {
            XMatchError::invalid_parameter(format!(
                "unknown column '{}' (available: {})",
                name,
                self.schema.names().collect::<Vec<_>>().join(", ")
            ))
        })
    }

    pub fn column_values(&self, name: &str) -> XMatchResult<Vec<&Value>> {
        let index = self.column_index(name)?;
        Ok(self.rows.iter().map(|row| &row[index]).collect())
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.schema.index_of(column)?;
        self.rows.get(row).map(|r| &r[index])
    }

    /// Extract validated sky positions from a pair of numeric degree columns.
    ///
    /// # Errors
    /// [`XMatchError::InvalidParameter`] for an unknown or non-numeric column,
    /// a null cell, or a coordinate that fails [`SkyPoint::new`]. The message
    /// names the row.
    pub fn positions(&self, ra_column: &str, dec_column: &str) -> XMatchResult<Vec<SkyPoint>> {
        let ra_index = self.numeric_column(ra_column)?;
        let dec_index = self.numeric_column(dec_column)?;

        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let ra = cell_degrees(&row[ra_index], ra_column, i)?;
                let dec = cell_degrees(&row[dec_index], dec_column, i)?;
                SkyPoint::new(ra, dec).map_err(|e| {
                    XMatchError::invalid_parameter(format!("row {}: {}", i, e))
                })
            })
            .collect()
    }

    fn numeric_column(&self, name: &str) -> XMatchResult<usize> {
        let index = self.column_index(name)?;
        let ty = self.schema.columns()[index].ty;
        if !ty.is_numeric() {
            return Err(XMatchError::invalid_parameter(format!(
                "column '{}' is {}, expected a numeric coordinate column",
                name, ty
            )));
        }
        Ok(index)
    }
}

fn cell_degrees(value: &Value, column: &str, row: usize) -> XMatchResult<f64> {
    value.as_f64().ok_or_else(|| {
        XMatchError::invalid_parameter(format!("row {}: column '{}' is null", row, column))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Table {
        let schema = Schema::from_pairs([
            ("id", ColumnType::Int),
            ("ra", ColumnType::Float),
            ("dec", ColumnType::Float),
            ("name", ColumnType::Text),
        ])
        .unwrap();
        Table::with_rows(
            schema,
            [
                vec![Value::Int(1), 10.0.into(), 5.0.into(), "M87".into()],
                vec![Value::Int(2), (-20.0).into(), (-45.0).into(), Value::Null],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_push_row_checks_arity() {
        let mut table = catalog();
        let err = table.push_row(vec![Value::Int(3)]).unwrap_err();
        assert!(matches!(err, XMatchError::Schema { row: 2, .. }));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_push_row_checks_types() {
        let mut table = catalog();
        let err = table
            .push_row(vec!["three".into(), 1.0.into(), 2.0.into(), "x".into()])
            .unwrap_err();
        assert!(err.to_string().contains("column 'id' expects int"));
    }

    #[test]
    fn test_int_widened_in_float_column() {
        let mut table = catalog();
        table
            .push_row(vec![Value::Int(3), Value::Int(7), Value::Int(8), "y".into()])
            .unwrap();
        assert_eq!(table.value(2, "ra"), Some(&Value::Float(7.0)));
    }

    #[test]
    fn test_positions_wraps_ra() {
        let positions = catalog().positions("ra", "dec").unwrap();
        assert_eq!(positions.len(), 2);
        assert_eq!(positions[1].ra_deg(), 340.0);
        assert_eq!(positions[1].dec_deg(), -45.0);
    }

    #[test]
    fn test_positions_unknown_column() {
        let err = catalog().positions("RA", "dec").unwrap_err();
        assert!(matches!(err, XMatchError::InvalidParameter { .. }));
        assert!(err.to_string().contains("unknown column 'RA'"));
    }

    #[test]
    fn test_positions_text_column_rejected() {
        let err = catalog().positions("name", "dec").unwrap_err();
        assert!(err.to_string().contains("expected a numeric coordinate column"));
    }

    #[test]
    fn test_positions_null_and_out_of_range() {
        let schema =
            Schema::from_pairs([("ra", ColumnType::Float), ("dec", ColumnType::Float)]).unwrap();
        let nulls = Table::with_rows(schema.clone(), [vec![Value::Null, 0.0.into()]]).unwrap();
        assert!(nulls.positions("ra", "dec").unwrap_err().to_string().contains("row 0"));

        let polar = Table::with_rows(schema, [vec![0.0.into(), 91.0.into()]]).unwrap();
        assert!(matches!(
            polar.positions("ra", "dec"),
            Err(XMatchError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_column_values() {
        let table = catalog();
        let ids = table.column_values("id").unwrap();
        assert_eq!(ids, vec![&Value::Int(1), &Value::Int(2)]);
    }
}
