//! Picking the single dustbin a map view should emphasize.

use serde::{Deserialize, Serialize};

use crate::model::AnnotatedDustbin;
use crate::ranker::by_distance_then_id;
use crate::severity::Severity;

/// Choose the dustbin to highlight from a ranked sequence.
///
/// The nearest [`Severity::Critical`] entry wins even over closer bins of lower
/// severity; without one, the first (nearest) entry is returned.
#[must_use]
pub fn select_highlight(ranked: &[AnnotatedDustbin]) -> Option<&AnnotatedDustbin> {
    ranked
        .iter()
        .filter(|entry| entry.severity == Severity::Critical)
        .min_by(|left, right| by_distance_then_id(left, right))
        .or_else(|| ranked.first())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Count of ranked dustbins per severity.
pub struct SeveritySummary {
    /// Bins below 40 %.
    pub low: usize,
    /// Bins from 40 % to 59 %.
    pub medium: usize,
    /// Bins from 60 % to 79 %.
    pub high: usize,
    /// Bins at 80 % or above.
    pub critical: usize,
}

impl SeveritySummary {
    /// Tally the severities of `ranked`.
    #[must_use]
    pub fn from_ranked(ranked: &[AnnotatedDustbin]) -> Self {
        ranked.iter().fold(Self::default(), |mut summary, entry| {
            *summary.slot_mut(entry.severity) += 1;
            summary
        })
    }

    /// Number of bins with the given severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        match severity {
            Severity::Low => self.low,
            Severity::Medium => self.medium,
            Severity::High => self.high,
            Severity::Critical => self.critical,
        }
    }

    /// Total number of bins counted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.low + self.medium + self.high + self.critical
    }

    fn slot_mut(&mut self, severity: Severity) -> &mut usize {
        match severity {
            Severity::Low => &mut self.low,
            Severity::Medium => &mut self.medium,
            Severity::High => &mut self.high,
            Severity::Critical => &mut self.critical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Coordinate, DustbinRecord};
    use crate::severity::classify;

    fn annotated(id: &str, distance_meters: f64, fill_level: i32) -> AnnotatedDustbin {
        AnnotatedDustbin {
            record: DustbinRecord::new(id, Coordinate { lat: 0.0, lng: 0.0 }, fill_level),
            fill_percent: crate::severity::clamp_fill_level(fill_level),
            distance_meters,
            severity: classify(fill_level),
        }
    }

    fn highlighted_id(ranked: &[AnnotatedDustbin]) -> Option<&str> {
        select_highlight(ranked).map(|entry| entry.id().0.as_str())
    }

    #[test]
    fn empty_has_no_highlight() {
        assert!(select_highlight(&[]).is_none());
    }

    #[test]
    fn critical_outranks_nearer_bins() {
        let ranked = vec![annotated("A", 50.0, 20), annotated("B", 300.0, 85)];
        assert_eq!(highlighted_id(&ranked), Some("B"));
    }

    #[test]
    fn falls_back_to_nearest_without_critical() {
        let ranked = vec![annotated("A", 50.0, 20), annotated("C", 80.0, 79)];
        assert_eq!(highlighted_id(&ranked), Some("A"));
    }

    #[test]
    fn nearest_of_several_critical() {
        let ranked = vec![
            annotated("A", 10.0, 30),
            annotated("far", 900.0, 100),
            annotated("near", 200.0, 81),
            annotated("mid", 500.0, 95),
        ];
        assert_eq!(highlighted_id(&ranked), Some("near"));
    }

    #[test]
    fn equally_near_critical_bins_resolve_by_id() {
        let ranked = vec![annotated("Z", 100.0, 90), annotated("Y", 100.0, 90)];
        assert_eq!(highlighted_id(&ranked), Some("Y"));
    }

    #[test]
    fn summary_counts_each_bucket() {
        let ranked = vec![
            annotated("1", 1.0, 20),
            annotated("2", 2.0, 35),
            annotated("3", 3.0, 45),
            annotated("4", 4.0, 60),
            annotated("5", 5.0, 85),
            annotated("6", 6.0, 150),
        ];
        let summary = SeveritySummary::from_ranked(&ranked);
        assert_eq!(
            summary,
            SeveritySummary {
                low: 2,
                medium: 1,
                high: 1,
                critical: 2,
            }
        );
        assert_eq!(summary.total(), ranked.len());
        assert_eq!(summary.count(Severity::Critical), 2);
    }
}
