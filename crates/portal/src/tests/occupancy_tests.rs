use super::*;

#[test]
fn initial_zones_match_floor_plan() {
    let sim = OccupancySim::new(Some(7));
    let zones = sim.zones();
    assert_eq!(zones.len(), 5);

    let consultation = zones
        .iter()
        .find(|z| z.zone_id.as_str() == "consultation")
        .expect("consultation zone");
    assert_eq!(consultation.capacity, 10);
    assert!(consultation.overloaded);
    assert_eq!(consultation.heat, HeatLevel::High);

    let lab = &zones[2];
    assert_eq!(lab.heat, HeatLevel::Low);
    assert_eq!(lab.trend, Trend::Down);
    assert_eq!(sim.snapshot().tick, 0);
}

#[test]
fn heat_thresholds() {
    assert_eq!(heat_level(29.9), HeatLevel::Low);
    assert_eq!(heat_level(30.0), HeatLevel::Moderate);
    assert_eq!(heat_level(69.9), HeatLevel::Moderate);
    assert_eq!(heat_level(70.0), HeatLevel::High);
}

#[test]
fn trend_follows_delta() {
    assert_eq!(trend_for(3.0), Trend::Up);
    assert_eq!(trend_for(-2.5), Trend::Down);
    assert_eq!(trend_for(0.4), Trend::Stable);
}

#[test]
fn ticks_stay_bounded_and_consistent() {
    let mut sim = OccupancySim::new(Some(42));
    for expected_tick in 1..=500 {
        let before: Vec<f64> = sim.zones().iter().map(|z| z.occupancy).collect();
        let snapshot = sim.advance();
        assert_eq!(snapshot.tick, expected_tick);
        for (zone, previous) in snapshot.zones.iter().zip(before) {
            assert!((0.0..=100.0).contains(&zone.occupancy));
            assert!((zone.occupancy - previous).abs() <= JITTER_PERCENT);
            assert_eq!(zone.heat, heat_level(zone.occupancy));
            assert_eq!(zone.overloaded, zone.occupancy > OVERLOAD_PERCENT);
            assert_eq!(zone.trend, trend_for(zone.occupancy - previous));
        }
    }
}

#[test]
fn same_seed_replays_same_sequence() {
    let mut a = OccupancySim::new(Some(1234));
    let mut b = OccupancySim::new(Some(1234));
    for _ in 0..20 {
        assert_eq!(a.advance().zones, b.advance().zones);
    }
}
