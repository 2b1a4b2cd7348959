use std::sync::Arc;

use tracing::debug;

use crate::{
    bearing::{compute_bearing_offset, normalize_heading},
    itinerary::{Itinerary, Waypoint},
};

/// What a single call to [`NavigationSession::advance_step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Walked { distance_remaining: u32 },
    Advanced { waypoint_index: usize },
    AlreadyArrived,
}

/// In-memory state of one walk along an itinerary.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationSession {
    itinerary: Arc<Itinerary>,
    current_waypoint_index: usize,
    distance_remaining: u32,
    current_heading_degrees: f64,
    sensor_authorized: bool,
}

impl NavigationSession {
    pub fn new(itinerary: Arc<Itinerary>) -> Self {
        let distance_remaining = itinerary.first().remaining_distance();
        Self {
            itinerary,
            current_waypoint_index: 0,
            distance_remaining,
            current_heading_degrees: 0.0,
            sensor_authorized: false,
        }
    }

    pub fn itinerary(&self) -> &Arc<Itinerary> {
        &self.itinerary
    }

    pub fn current_waypoint_index(&self) -> usize {
        self.current_waypoint_index
    }

    pub fn current_waypoint(&self) -> &Waypoint {
        &self.itinerary.waypoints()[self.current_waypoint_index]
    }

    pub fn distance_remaining(&self) -> u32 {
        self.distance_remaining
    }

    pub fn current_heading_degrees(&self) -> f64 {
        self.current_heading_degrees
    }

    pub fn sensor_authorized(&self) -> bool {
        self.sensor_authorized
    }

    pub fn is_arrived(&self) -> bool {
        self.current_waypoint_index == self.itinerary.last_index() && self.distance_remaining == 0
    }

    /// Replaces the heading outright; callers reject non-finite input.
    pub fn set_heading(&mut self, degrees: f64) {
        self.current_heading_degrees = normalize_heading(degrees);
    }

    /// One-way latch: authorization never reverts within a session.
    pub fn authorize_sensor(&mut self) {
        self.sensor_authorized = true;
    }

    pub fn bearing_offset(&self) -> f64 {
        compute_bearing_offset(
            self.current_heading_degrees,
            f64::from(self.current_waypoint().target_heading_degrees()),
        )
    }

    pub fn advance_step(&mut self) -> StepOutcome {
        if self.distance_remaining > 0 {
            self.distance_remaining -= 1;
            return StepOutcome::Walked {
                distance_remaining: self.distance_remaining,
            };
        }

        if self.current_waypoint_index < self.itinerary.last_index() {
            self.current_waypoint_index += 1;
            self.distance_remaining = self.current_waypoint().remaining_distance();
            debug!(
                waypoint_index = self.current_waypoint_index,
                distance = self.distance_remaining,
                "advanced to next waypoint"
            );
            return StepOutcome::Advanced {
                waypoint_index: self.current_waypoint_index,
            };
        }

        StepOutcome::AlreadyArrived
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
