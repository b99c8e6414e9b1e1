//! End-to-end cross-match of two tables.

use std::time::Instant;

use serde::Serialize;

use crate::config::CrossMatchConfig;
use crate::errors::{XMatchError, XMatchResult};
use crate::index::CoordinateIndex;
use crate::matcher::{match_all, MatchRecord};
use crate::summary::MatchSummary;
use crate::table::Table;

#[derive(Debug, Clone, Serialize)]
pub struct CrossMatchOutput {
    pub joined: Table,
    pub records: Vec<MatchRecord>,
    pub summary: MatchSummary,
}

/// Match every row of `table_a` against `table_b` and join the results.
///
/// The index is built over `table_b`; `table_a` drives row order in the
/// output. Nothing is returned unless every stage succeeds.
pub fn cross_match(
    table_a: &Table,
    table_b: &Table,
    config: &CrossMatchConfig,
) -> XMatchResult<CrossMatchOutput> {
    config.validate()?;
    if table_a.is_empty() {
        return Err(XMatchError::empty_input("table A"));
    }
    if table_b.is_empty() {
        return Err(XMatchError::empty_input("table B"));
    }

    let start = Instant::now();
    let builder = config.join_builder();
    // Fail on column collisions before doing any spatial work.
    builder.joined_schema(table_a.schema(), table_b.schema())?;

    let source_positions = table_a.positions(&config.ra_column_a, &config.dec_column_a)?;
    let target_positions = table_b.positions(&config.ra_column_b, &config.dec_column_b)?;

    let index = CoordinateIndex::build(&target_positions)?;
    let records = match_all(
        &source_positions,
        &index,
        config.mode,
        config.max_separation_arcsec,
    )?;
    let joined = builder.build(table_a, table_b, &records)?;
    let summary = MatchSummary::from_records(
        &records,
        table_a.len(),
        table_b.len(),
        config.threshold_arcsec,
    );

    log::info!(
        "Cross-matched {} x {} rows: {} joined rows in {:.2} ms",
        table_a.len(),
        table_b.len(),
        joined.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );
    Ok(CrossMatchOutput {
        joined,
        records,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::join::{CollisionPolicy, NonMatchPolicy, SEPARATION_COLUMN};
    use crate::table::{ColumnType, Schema, Value};

    fn table_a() -> Table {
        let schema = Schema::from_pairs([
            ("id", ColumnType::Int),
            ("ra", ColumnType::Float),
            ("dec", ColumnType::Float),
        ])
        .unwrap();
        Table::with_rows(schema, [vec![Value::Int(1), 10.0.into(), 5.0.into()]]).unwrap()
    }

    fn table_b() -> Table {
        let schema = Schema::from_pairs([
            ("id", ColumnType::Text),
            ("ra", ColumnType::Float),
            ("dec", ColumnType::Float),
        ])
        .unwrap();
        Table::with_rows(schema, [vec!["x".into(), 10.0003.into(), 5.0.into()]]).unwrap()
    }

    fn config(threshold_arcsec: f64) -> CrossMatchConfig {
        CrossMatchConfig::nearest(
            "ra",
            "dec",
            "ra",
            "dec",
            threshold_arcsec,
            CollisionPolicy::prefix("a_", "b_"),
        )
    }

    #[test]
    fn test_single_pair_within_threshold() {
        let output = cross_match(&table_a(), &table_b(), &config(2.0)).unwrap();
        assert_eq!(output.records.len(), 1);
        let sep = output.records[0].separation_arcsec;
        // 0.0003° of RA at dec 5° ≈ 1.0759″
        assert!((sep - 1.0759).abs() < 1e-3, "separation {}", sep);

        assert_eq!(output.joined.len(), 1);
        assert_eq!(output.joined.value(0, "a_id"), Some(&Value::Int(1)));
        assert_eq!(output.joined.value(0, "b_id"), Some(&Value::Text("x".into())));
        assert_eq!(output.joined.value(0, SEPARATION_COLUMN), Some(&Value::Float(sep)));
        assert_eq!(output.summary.matched_sources, 1);
    }

    #[test]
    fn test_single_pair_outside_threshold() {
        let output = cross_match(&table_a(), &table_b(), &config(0.5)).unwrap();
        assert!(output.joined.is_empty());
        assert_eq!(output.records.len(), 1);
        assert_eq!(output.summary.matched_sources, 0);

        let kept = cross_match(
            &table_a(),
            &table_b(),
            &config(0.5).with_non_match_policy(NonMatchPolicy::KeepWithNulls),
        )
        .unwrap();
        assert_eq!(kept.joined.len(), 1);
        assert_eq!(kept.joined.value(0, "b_id"), Some(&Value::Null));
    }

    #[test]
    fn test_collision_detected_before_matching() {
        let mut cfg = config(2.0);
        cfg.column_collision_policy = CollisionPolicy::Reject;
        assert!(matches!(
            cross_match(&table_a(), &table_b(), &cfg),
            Err(XMatchError::ColumnCollision { .. })
        ));
    }

    #[test]
    fn test_empty_tables() {
        let empty = Table::new(table_a().schema().clone());
        assert!(matches!(
            cross_match(&empty, &table_b(), &config(2.0)),
            Err(XMatchError::EmptyInput { .. })
        ));
        let empty_b = Table::new(table_b().schema().clone());
        assert!(matches!(
            cross_match(&table_a(), &empty_b, &config(2.0)),
            Err(XMatchError::EmptyInput { .. })
        ));
    }

    #[test]
    fn test_unknown_coordinate_column() {
        let mut cfg = config(2.0);
        cfg.ra_column_b = "RA_ICRS".into();
        let err = cross_match(&table_a(), &table_b(), &cfg).unwrap_err();
        assert!(err.to_string().contains("RA_ICRS"));
    }
}
