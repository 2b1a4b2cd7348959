use super::*;
use crate::itinerary::{Maneuver, Waypoint};

fn radiology_session() -> NavigationSession {
    NavigationSession::new(Arc::new(Itinerary::radiology()))
}

#[test]
fn new_session_starts_at_first_waypoint() {
    let session = radiology_session();
    assert_eq!(session.current_waypoint_index(), 0);
    assert_eq!(session.distance_remaining(), 15);
    assert_eq!(session.current_heading_degrees(), 0.0);
    assert!(!session.sensor_authorized());
    assert!(!session.is_arrived());
}

#[test]
fn each_step_consumes_one_meter() {
    let mut session = radiology_session();
    assert_eq!(
        session.advance_step(),
        StepOutcome::Walked {
            distance_remaining: 14
        }
    );
    assert_eq!(session.distance_remaining(), 14);
    assert_eq!(session.current_waypoint_index(), 0);
}

#[test]
fn step_at_zero_distance_loads_next_waypoint() {
    let mut session = radiology_session();
    for _ in 0..15 {
        session.advance_step();
    }
    assert_eq!(session.distance_remaining(), 0);
    assert_eq!(session.current_waypoint_index(), 0);

    assert_eq!(
        session.advance_step(),
        StepOutcome::Advanced { waypoint_index: 1 }
    );
    assert_eq!(session.current_waypoint_index(), 1);
    assert_eq!(session.distance_remaining(), 10);
}

#[test]
fn stepping_at_terminal_waypoint_is_idempotent() {
    let route = Itinerary::new(vec![
        Waypoint::new(1, Maneuver::Straight, 0),
        Waypoint::new(0, Maneuver::ArrivedAtDestination, 0),
    ])
    .unwrap();
    let mut session = NavigationSession::new(Arc::new(route));
    session.advance_step();
    session.advance_step();
    assert!(session.is_arrived());

    let before = session.clone();
    assert_eq!(session.advance_step(), StepOutcome::AlreadyArrived);
    assert_eq!(session, before);
}

#[test]
fn zero_distance_intermediate_waypoint_advances_immediately() {
    let route = Itinerary::new(vec![
        Waypoint::new(0, Maneuver::UseElevator, 90),
        Waypoint::new(2, Maneuver::Straight, 90),
        Waypoint::new(0, Maneuver::ArrivedAtDestination, 0),
    ])
    .unwrap();
    let mut session = NavigationSession::new(Arc::new(route));
    assert_eq!(
        session.advance_step(),
        StepOutcome::Advanced { waypoint_index: 1 }
    );
    assert_eq!(session.distance_remaining(), 2);
}

#[test]
fn heading_override_wraps_and_feeds_next_offset() {
    let mut session = radiology_session();
    session.set_heading(360.0);
    assert_eq!(session.current_heading_degrees(), 0.0);

    session.set_heading(90.0);
    assert_eq!(session.bearing_offset(), -90.0);
}

#[test]
fn sensor_authorization_latches() {
    let mut session = radiology_session();
    session.authorize_sensor();
    session.authorize_sensor();
    assert!(session.sensor_authorized());
}
