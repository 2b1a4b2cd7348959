use proptest::prelude::*;
use wayfinding::{bearing::normalize_heading, compute_bearing_offset, is_aligned};

proptest! {
    #[test]
    fn offset_stays_within_half_turn(current in 0.0f64..360.0, target in 0u16..360) {
        let offset = compute_bearing_offset(current, f64::from(target));
        prop_assert!(offset > -180.0 && offset <= 180.0, "offset {offset} out of range");
    }

    #[test]
    fn facing_the_target_has_no_offset(heading in 0u16..360) {
        let heading = f64::from(heading);
        prop_assert_eq!(compute_bearing_offset(heading, heading), 0.0);
    }

    #[test]
    fn offset_brings_heading_onto_target(current in 0u16..360, target in 0u16..360) {
        let offset = compute_bearing_offset(f64::from(current), f64::from(target));
        let turned = normalize_heading(f64::from(current) + offset);
        prop_assert_eq!(turned, f64::from(target));
    }

    #[test]
    fn alignment_matches_tolerance(offset in -180.0f64..=180.0) {
        prop_assert_eq!(is_aligned(offset), offset.abs() < 15.0);
    }

    #[test]
    fn normalized_heading_is_in_range(degrees in -10_000.0f64..10_000.0) {
        let heading = normalize_heading(degrees);
        prop_assert!((0.0..360.0).contains(&heading));
    }
}
