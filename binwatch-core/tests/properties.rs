//! Property tests for the triage engine.

use binwatch_core::{
    AnnotatedDustbin, Coordinate, DustbinRecord, ProximityQuery, Severity, classify, distance,
    rank, select_highlight,
};
use proptest::prelude::*;

fn coordinate() -> impl Strategy<Value = Coordinate> {
    (-90.0..=90.0_f64, -180.0..=180.0_f64).prop_map(|(lat, lng)| Coordinate { lat, lng })
}

/// Coordinates within roughly 5 km of a town centre.
fn nearby_coordinate() -> impl Strategy<Value = Coordinate> {
    (-0.05..=0.05_f64, -0.05..=0.05_f64).prop_map(|(dlat, dlng)| Coordinate {
        lat: 21.0932 + dlat,
        lng: 78.9816 + dlng,
    })
}

fn snapshot() -> impl Strategy<Value = Vec<DustbinRecord>> {
    prop::collection::vec((nearby_coordinate(), -20..=130_i32), 0..40).prop_map(|bins| {
        bins.into_iter()
            .enumerate()
            .map(|(index, (location, fill_level))| {
                DustbinRecord::new(format!("DB-{index:03}"), location, fill_level)
            })
            .collect()
    })
}

proptest! {
    /// Critical exactly when the clamped fill level reaches 80.
    #[test]
    fn critical_iff_at_least_eighty(fill_level in any::<i32>()) {
        let clamped = fill_level.clamp(0, 100);
        prop_assert_eq!(classify(fill_level) == Severity::Critical, clamped >= 80);
    }

    /// A fuller bin is never classified as less severe.
    #[test]
    fn classification_is_monotonic(first in -50..=150_i32, second in -50..=150_i32) {
        let (lower, higher) = if first <= second { (first, second) } else { (second, first) };
        prop_assert!(classify(lower) <= classify(higher));
    }

    #[test]
    fn distance_to_self_is_zero(point in coordinate()) {
        prop_assert_eq!(distance(point, point), Ok(0.0));
    }

    #[test]
    fn distance_is_symmetric(from in coordinate(), to in coordinate()) {
        let there = distance(from, to).expect("valid coordinates");
        let back = distance(to, from).expect("valid coordinates");
        prop_assert!((there - back).abs() <= there.max(1.0) * 1e-6, "{there} vs {back}");
    }

    #[test]
    fn distance_obeys_triangle_inequality(
        first in coordinate(),
        second in coordinate(),
        third in coordinate(),
    ) {
        let direct = distance(first, third).expect("valid coordinates");
        let detour = distance(first, second).expect("valid coordinates")
            + distance(second, third).expect("valid coordinates");
        prop_assert!(direct <= detour + 1.0, "{direct} > {detour}");
    }

    /// Ranked entries are all in range, sorted, and every in-range bin is ranked.
    #[test]
    fn rank_respects_radius_and_order(
        observer in nearby_coordinate(),
        radius in 1.0..6000.0_f64,
        bins in snapshot(),
    ) {
        let ranking = rank(&ProximityQuery::new(observer, radius, &bins));

        for entry in &ranking.entries {
            prop_assert!(entry.distance_meters <= radius);
        }
        for pair in ranking.entries.windows(2) {
            if let [left, right] = pair {
                prop_assert!(left.distance_meters <= right.distance_meters);
            }
        }

        let expected = bins
            .iter()
            .filter(|bin| distance(observer, bin.location).is_ok_and(|meters| meters <= radius))
            .count();
        prop_assert_eq!(ranking.entries.len(), expected);
        prop_assert!(ranking.skipped.is_empty());
    }

    /// Whenever a critical bin is ranked, the highlight is critical.
    #[test]
    fn highlight_prefers_critical(
        observer in nearby_coordinate(),
        radius in 1.0..6000.0_f64,
        bins in snapshot(),
    ) {
        let ranking = rank(&ProximityQuery::new(observer, radius, &bins));
        let highlight = select_highlight(&ranking.entries);

        let any_critical = ranking
            .entries
            .iter()
            .any(|entry: &AnnotatedDustbin| entry.severity == Severity::Critical);

        match highlight {
            None => prop_assert!(ranking.entries.is_empty()),
            Some(chosen) if any_critical => prop_assert_eq!(chosen.severity, Severity::Critical),
            Some(chosen) => prop_assert_eq!(Some(chosen), ranking.entries.first()),
        }
    }
}
