//! Merge two tables and their match records into one joined table.
//!
//! Output columns are table A's (in order), then table B's (in order), then the
//! synthetic [`SEPARATION_COLUMN`]. Names present on both sides are resolved by
//! an explicit [`CollisionPolicy`]; nothing is ever silently overwritten.
//!
//! A record is kept when `separation_arcsec <= threshold_arcsec`. Source rows
//! left without a kept record are dropped ([`NonMatchPolicy::Drop`]) or emitted
//! once with null target columns ([`NonMatchPolicy::KeepWithNulls`]).
//!
//! Records are re-sorted by source index (then separation, then target index)
//! before rows are emitted, so output order follows table A regardless of how
//! the records were produced.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::errors::{XMatchError, XMatchResult};
use crate::matcher::MatchRecord;
use crate::table::{Column, ColumnType, Schema, Table, Value};

/// Name of the separation column appended to every joined table.
pub const SEPARATION_COLUMN: &str = "separation_arcsec";

/// How to rename columns whose names clash across the two tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Fail with [`XMatchError::ColumnCollision`] on any clash.
    Reject,
    /// Prepend `left` to clashing table A names and `right` to clashing table B names.
    Prefix { left: String, right: String },
    /// Append `left` / `right` to clashing names instead.
    Suffix { left: String, right: String },
}

impl CollisionPolicy {
    pub fn prefix(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self::Prefix {
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn suffix(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self::Suffix {
            left: left.into(),
            right: right.into(),
        }
    }

    fn rename(&self, name: &str, side: Side, reason: &str) -> XMatchResult<String> {
        match self {
            CollisionPolicy::Reject => Err(XMatchError::column_collision(
                name,
                format!("{} and the collision policy is reject", reason),
            )),
            CollisionPolicy::Prefix { left, right } => Ok(match side {
                Side::Left => format!("{}{}", left, name),
                Side::Right => format!("{}{}", right, name),
            }),
            CollisionPolicy::Suffix { left, right } => Ok(match side {
                Side::Left => format!("{}{}", name, left),
                Side::Right => format!("{}{}", name, right),
            }),
        }
    }
}

/// What to do with source rows that have no match within the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonMatchPolicy {
    #[default]
    Drop,
    KeepWithNulls,
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone)]
pub struct JoinBuilder {
    threshold_arcsec: f64,
    collision_policy: CollisionPolicy,
    non_match_policy: NonMatchPolicy,
}

impl JoinBuilder {
    /// Join keeping records within `threshold_arcsec`, rejecting column
    /// collisions and dropping unmatched rows.
    pub fn new(threshold_arcsec: f64) -> Self {
        Self {
            threshold_arcsec,
            collision_policy: CollisionPolicy::Reject,
            non_match_policy: NonMatchPolicy::Drop,
        }
    }

    pub fn collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = policy;
        self
    }

    pub fn non_match_policy(mut self, policy: NonMatchPolicy) -> Self {
        self.non_match_policy = policy;
        self
    }

    pub fn threshold_arcsec(&self) -> f64 {
        self.threshold_arcsec
    }

    /// Output schema for joining tables with schemas `a` and `b`.
    ///
    /// # Errors
    /// [`XMatchError::ColumnCollision`] if a clash is rejected by the policy or
    /// renaming still leaves duplicate names.
    pub fn joined_schema(&self, a: &Schema, b: &Schema) -> XMatchResult<Schema> {
        let a_names: HashSet<&str> = a.names().collect();
        let b_names: HashSet<&str> = b.names().collect();

        let mut columns = Vec::with_capacity(a.len() + b.len() + 1);
        for column in a.columns() {
            let name = self.resolve_name(&column.name, &b_names, Side::Left)?;
            columns.push(Column::new(name, column.ty));
        }
        for column in b.columns() {
            let name = self.resolve_name(&column.name, &a_names, Side::Right)?;
            columns.push(Column::new(name, column.ty));
        }
        columns.push(Column::new(SEPARATION_COLUMN, ColumnType::Float));

        Schema::new(columns)
    }

    fn resolve_name(
        &self,
        name: &str,
        other_side: &HashSet<&str>,
        side: Side,
    ) -> XMatchResult<String> {
        if name == SEPARATION_COLUMN {
            return self
                .collision_policy
                .rename(name, side, "clashes with the separation column");
        }
        if other_side.contains(name) {
            return self
                .collision_policy
                .rename(name, side, "exists in both tables");
        }
        Ok(name.to_string())
    }

    /// Build the joined table.
    ///
    /// # Errors
    /// - [`XMatchError::InvalidParameter`] for a negative or non-finite
    ///   threshold, a record pointing outside either table, or a record with a
    ///   negative or NaN separation
    /// - [`XMatchError::ColumnCollision`] as for [`JoinBuilder::joined_schema`]
    pub fn build(
        &self,
        table_a: &Table,
        table_b: &Table,
        matches: &[MatchRecord],
    ) -> XMatchResult<Table> {
        if !(self.threshold_arcsec.is_finite() && self.threshold_arcsec >= 0.0) {
            return Err(XMatchError::invalid_parameter(format!(
                "threshold_arcsec must be finite and >= 0, got {}",
                self.threshold_arcsec
            )));
        }
        validate_records(matches, table_a.len(), table_b.len())?;

        let schema = self.joined_schema(table_a.schema(), table_b.schema())?;

        let mut kept: Vec<&MatchRecord> = matches
            .iter()
            .filter(|m| m.separation_arcsec <= self.threshold_arcsec)
            .collect();
        kept.sort_by(|x, y| {
            x.source_index
                .cmp(&y.source_index)
                .then(x.separation_arcsec.total_cmp(&y.separation_arcsec))
                .then(x.target_index.cmp(&y.target_index))
        });

        let mut joined = Table::new(schema);
        let mut cursor = kept.iter().peekable();
        for (source_index, source_row) in table_a.rows().iter().enumerate() {
            let mut emitted = false;
            while let Some(record) = cursor.next_if(|m| m.source_index == source_index) {
                let mut row = Vec::with_capacity(joined.schema().len());
                row.extend_from_slice(source_row);
                row.extend_from_slice(&table_b.rows()[record.target_index]);
                row.push(Value::Float(record.separation_arcsec));
                joined.push_row(row)?;
                emitted = true;
            }

            if !emitted && self.non_match_policy == NonMatchPolicy::KeepWithNulls {
                let mut row = Vec::with_capacity(joined.schema().len());
                row.extend_from_slice(source_row);
                row.extend(std::iter::repeat(Value::Null).take(table_b.schema().len() + 1));
                joined.push_row(row)?;
            }
        }

        log::debug!(
            "join: {} of {} records within {}\", {} of {} source rows emitted",
            kept.len(),
            matches.len(),
            self.threshold_arcsec,
            joined.len(),
            table_a.len()
        );
        Ok(joined)
    }
}

fn validate_records(matches: &[MatchRecord], source_len: usize, target_len: usize) -> XMatchResult<()> {
    for record in matches {
        if record.source_index >= source_len || record.target_index >= target_len {
            return Err(XMatchError::invalid_parameter(format!(
                "match record ({}, {}) outside tables of {} and {} rows",
                record.source_index, record.target_index, source_len, target_len
            )));
        }
        if record.separation_arcsec.is_nan() || record.separation_arcsec < 0.0 {
            return Err(XMatchError::invalid_parameter(format!(
                "match record ({}, {}) has invalid separation {}",
                record.source_index, record.target_index, record.separation_arcsec
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_a() -> Table {
        let schema = Schema::from_pairs([
            ("id", ColumnType::Int),
            ("ra", ColumnType::Float),
            ("dec", ColumnType::Float),
        ])
        .unwrap();
        Table::with_rows(
            schema,
            [
                vec![Value::Int(1), 10.0.into(), 5.0.into()],
                vec![Value::Int(2), 20.0.into(), 6.0.into()],
                vec![Value::Int(3), 30.0.into(), 7.0.into()],
            ],
        )
        .unwrap()
    }

    fn table_b() -> Table {
        let schema = Schema::from_pairs([
            ("name", ColumnType::Text),
            ("ra", ColumnType::Float),
            ("dec", ColumnType::Float),
        ])
        .unwrap();
        Table::with_rows(
            schema,
            [
                vec!["x".into(), 10.0003.into(), 5.0.into()],
                vec!["y".into(), 30.0.into(), 7.0.into()],
            ],
        )
        .unwrap()
    }

    fn record(source_index: usize, target_index: usize, separation_arcsec: f64) -> MatchRecord {
        MatchRecord {
            source_index,
            target_index,
            separation_arcsec,
        }
    }

    fn records() -> Vec<MatchRecord> {
        vec![record(0, 0, 1.08), record(1, 0, 36000.0), record(2, 1, 0.0)]
    }

    fn prefixed() -> JoinBuilder {
        JoinBuilder::new(2.0).collision_policy(CollisionPolicy::prefix("a_", "b_"))
    }

    #[test]
    fn test_reject_policy_fails_on_shared_names() {
        let err = JoinBuilder::new(2.0)
            .build(&table_a(), &table_b(), &records())
            .unwrap_err();
        assert!(matches!(err, XMatchError::ColumnCollision { ref column, .. } if column == "ra"));
    }

    #[test]
    fn test_column_order_with_prefix() {
        let joined = prefixed().build(&table_a(), &table_b(), &records()).unwrap();
        let names: Vec<&str> = joined.schema().names().collect();
        assert_eq!(
            names,
            ["id", "a_ra", "a_dec", "name", "b_ra", "b_dec", SEPARATION_COLUMN]
        );
    }

    #[test]
    fn test_suffix_policy() {
        let joined = JoinBuilder::new(2.0)
            .collision_policy(CollisionPolicy::suffix("_1", "_2"))
            .build(&table_a(), &table_b(), &records())
            .unwrap();
        assert!(joined.schema().contains("ra_1"));
        assert!(joined.schema().contains("dec_2"));
    }

    #[test]
    fn test_renaming_into_existing_name_collides() {
        let schema_a = Schema::from_pairs([("ra", ColumnType::Float), ("b_ra", ColumnType::Float)])
            .unwrap();
        let schema_b = Schema::from_pairs([("ra", ColumnType::Float)]).unwrap();
        let err = JoinBuilder::new(1.0)
            .collision_policy(CollisionPolicy::prefix("", "b_"))
            .joined_schema(&schema_a, &schema_b)
            .unwrap_err();
        assert!(matches!(err, XMatchError::ColumnCollision { ref column, .. } if column == "b_ra"));
    }

    #[test]
    fn test_separation_column_name_in_input() {
        let schema_a =
            Schema::from_pairs([("ra", ColumnType::Float), (SEPARATION_COLUMN, ColumnType::Float)])
                .unwrap();
        let schema_b = Schema::from_pairs([("dec", ColumnType::Float)]).unwrap();
        assert!(JoinBuilder::new(1.0)
            .joined_schema(&schema_a, &schema_b)
            .is_err());
        let schema = prefixed().joined_schema(&schema_a, &schema_b).unwrap();
        assert!(schema.contains("a_separation_arcsec"));
    }

    #[test]
    fn test_threshold_drops_rows() {
        let joined = prefixed().build(&table_a(), &table_b(), &records()).unwrap();
        assert_eq!(joined.len(), 2);
        assert_eq!(joined.value(0, "id"), Some(&Value::Int(1)));
        assert_eq!(joined.value(0, "name"), Some(&Value::Text("x".into())));
        assert_eq!(joined.value(0, SEPARATION_COLUMN), Some(&Value::Float(1.08)));
        assert_eq!(joined.value(1, "id"), Some(&Value::Int(3)));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let joined = JoinBuilder::new(1.08)
            .collision_policy(CollisionPolicy::prefix("a_", "b_"))
            .build(&table_a(), &table_b(), &records())
            .unwrap();
        assert_eq!(joined.len(), 2);
    }

    #[test]
    fn test_keep_with_nulls() {
        let joined = prefixed()
            .non_match_policy(NonMatchPolicy::KeepWithNulls)
            .build(&table_a(), &table_b(), &records())
            .unwrap();
        assert_eq!(joined.len(), 3);
        assert_eq!(joined.value(1, "id"), Some(&Value::Int(2)));
        assert_eq!(joined.value(1, "name"), Some(&Value::Null));
        assert_eq!(joined.value(1, SEPARATION_COLUMN), Some(&Value::Null));
    }

    #[test]
    fn test_order_follows_source_rows() {
        let mut shuffled = records();
        shuffled.reverse();
        let expected = prefixed().build(&table_a(), &table_b(), &records()).unwrap();
        let joined = prefixed().build(&table_a(), &table_b(), &shuffled).unwrap();
        assert_eq!(joined, expected);
    }

    #[test]
    fn test_multiple_records_per_source() {
        let matches = vec![record(0, 1, 1.5), record(0, 0, 0.5)];
        let joined = prefixed().build(&table_a(), &table_b(), &matches).unwrap();
        assert_eq!(joined.len(), 2);
        assert_eq!(joined.value(0, "name"), Some(&Value::Text("x".into())));
        assert_eq!(joined.value(1, "name"), Some(&Value::Text("y".into())));
    }

    #[test]
    fn test_invalid_threshold() {
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                JoinBuilder::new(bad)
                    .collision_policy(CollisionPolicy::prefix("a_", "b_"))
                    .build(&table_a(), &table_b(), &records()),
                Err(XMatchError::InvalidParameter { .. })
            ));
        }
    }

    #[test]
    fn test_out_of_bounds_record() {
        let err = prefixed()
            .build(&table_a(), &table_b(), &[record(0, 5, 0.1)])
            .unwrap_err();
        assert!(matches!(err, XMatchError::InvalidParameter { .. }));
    }

    #[test]
    fn test_serialization_is_stable() {
        let joined = prefixed().build(&table_a(), &table_b(), &records()).unwrap();
        let first = joined.to_delimited(',').unwrap();
        let second = prefixed()
            .build(&table_a(), &table_b(), &records())
            .unwrap()
            .to_delimited(',')
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first,
            "id,a_ra,a_dec,name,b_ra,b_dec,separation_arcsec\n\
             1,10.0,5.0,x,10.0003,5.0,1.08\n\
             3,30.0,7.0,y,30.0,7.0,0.0\n"
        );
    }

    #[test]
    fn test_policy_serde() {
        let policy: CollisionPolicy =
            serde_json::from_str(r#"{"kind":"prefix","left":"a_","right":"b_"}"#).unwrap();
        assert_eq!(policy, CollisionPolicy::prefix("a_", "b_"));
        let reject: CollisionPolicy = serde_json::from_str(r#"{"kind":"reject"}"#).unwrap();
        assert_eq!(reject, CollisionPolicy::Reject);
        let keep: NonMatchPolicy = serde_json::from_str(r#""keep_with_nulls""#).unwrap();
        assert_eq!(keep, NonMatchPolicy::KeepWithNulls);
    }
}
