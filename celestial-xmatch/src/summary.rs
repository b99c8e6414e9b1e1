//! Separation statistics for a set of match records.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::matcher::MatchRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeparationStats {
    pub mean_arcsec: f64,
    /// Population standard deviation.
    pub std_arcsec: f64,
    pub median_arcsec: f64,
    pub min_arcsec: f64,
    pub max_arcsec: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSummary {
    pub source_count: usize,
    pub target_count: usize,
    pub record_count: usize,
    pub threshold_arcsec: f64,
    /// Distinct source rows with at least one record within the threshold.
    pub matched_sources: usize,
    /// Over all records, not just those within the threshold.
    pub separation: Option<SeparationStats>,
}

impl MatchSummary {
    pub fn from_records(
        records: &[MatchRecord],
        source_count: usize,
        target_count: usize,
        threshold_arcsec: f64,
    ) -> Self {
        let matched_sources = records
            .iter()
            .filter(|r| r.separation_arcsec <= threshold_arcsec)
            .map(|r| r.source_index)
            .collect::<BTreeSet<_>>()
            .len();

        let separations: Vec<f64> = records.iter().map(|r| r.separation_arcsec).collect();

        Self {
            source_count,
            target_count,
            record_count: records.len(),
            threshold_arcsec,
            matched_sources,
            separation: SeparationStats::from_values(separations),
        }
    }

    /// Fraction of source rows matched within the threshold.
    pub fn match_fraction(&self) -> f64 {
        if self.source_count == 0 {
            0.0
        } else {
            self.matched_sources as f64 / self.source_count as f64
        }
    }
}

impl SeparationStats {
    fn from_values(mut values: Vec<f64>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        values.sort_by(f64::total_cmp);

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let mid = values.len() / 2;
        let median = if values.len() % 2 == 0 {
            (values[mid - 1] + values[mid]) / 2.0
        } else {
            values[mid]
        };

        Some(Self {
            mean_arcsec: mean,
            std_arcsec: variance.sqrt(),
            median_arcsec: median,
            min_arcsec: values[0],
            max_arcsec: values[values.len() - 1],
        })
    }
}

impl fmt::Display for MatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cross-match summary")?;
        writeln!(f, "  Source rows: {}", self.source_count)?;
        writeln!(f, "  Target rows: {}", self.target_count)?;
        writeln!(f, "  Records: {}", self.record_count)?;
        writeln!(
            f,
            "  Matched within {}\": {} ({:.1}%)",
            self.threshold_arcsec,
            self.matched_sources,
            self.match_fraction() * 100.0
        )?;
        match &self.separation {
            Some(stats) => {
                writeln!(
                    f,
                    "  Separation mean: {:.4}\" (std {:.4}\")",
                    stats.mean_arcsec, stats.std_arcsec
                )?;
                writeln!(f, "  Separation median: {:.4}\"", stats.median_arcsec)?;
                write!(
                    f,
                    "  Separation range: {:.4}\" - {:.4}\"",
                    stats.min_arcsec, stats.max_arcsec
                )
            }
            None => write!(f, "  Separation: no records"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(source_index: usize, separation_arcsec: f64) -> MatchRecord {
        MatchRecord {
            source_index,
            target_index: 0,
            separation_arcsec,
        }
    }

    #[test]
    fn test_statistics() {
        let records = [record(0, 1.0), record(1, 2.0), record(2, 3.0), record(3, 10.0)];
        let summary = MatchSummary::from_records(&records, 4, 7, 2.5);

        assert_eq!(summary.record_count, 4);
        assert_eq!(summary.matched_sources, 2);
        assert!((summary.match_fraction() - 0.5).abs() < 1e-12);

        let stats = summary.separation.unwrap();
        assert!((stats.mean_arcsec - 4.0).abs() < 1e-12);
        assert!((stats.median_arcsec - 2.5).abs() < 1e-12);
        // deviations -3, -2, -1, 6 → variance 50/4
        assert!((stats.std_arcsec - 12.5_f64.sqrt()).abs() < 1e-12);
        assert_eq!(stats.min_arcsec, 1.0);
        assert_eq!(stats.max_arcsec, 10.0);
    }

    #[test]
    fn test_matched_sources_counts_distinct_rows() {
        let records = [record(0, 0.1), record(0, 0.2), record(1, 5.0)];
        let summary = MatchSummary::from_records(&records, 2, 3, 1.0);
        assert_eq!(summary.matched_sources, 1);
        assert!((summary.separation.unwrap().median_arcsec - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_no_records() {
        let summary = MatchSummary::from_records(&[], 3, 3, 1.0);
        assert_eq!(summary.separation, None);
        assert_eq!(summary.matched_sources, 0);
        assert!(summary.to_string().contains("no records"));
    }

    #[test]
    fn test_display() {
        let summary = MatchSummary::from_records(&[record(0, 1.08)], 1, 1, 2.0);
        let text = summary.to_string();
        assert!(text.contains("Matched within 2\": 1 (100.0%)"));
        assert!(text.contains("1.0800\""));
    }
}
