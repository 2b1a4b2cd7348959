//! Compass arithmetic for the guided walk.
//!
//! Headings are degrees clockwise from north in `[0, 360)`. A bearing offset
//! is the signed turn from the current heading to the target heading, in
//! `(-180, 180]`: positive steers right, negative steers left.

use serde::{Deserialize, Serialize};

pub const FULL_TURN_DEGREES: f64 = 360.0;
pub const HALF_TURN_DEGREES: f64 = 180.0;

/// Fixed tolerance below which the walker counts as facing the target.
pub const ALIGNMENT_TOLERANCE_DEGREES: f64 = 15.0;

/// Signed shortest turn from `current_heading` to `target_heading`.
///
/// The result lies in `(-180, 180]`. A target exactly opposite the current
/// heading always resolves to `+180`.
pub fn compute_bearing_offset(current_heading: f64, target_heading: f64) -> f64 {
    let offset = (target_heading - current_heading).rem_euclid(FULL_TURN_DEGREES);
    // rem_euclid may round a tiny negative up to exactly 360
    if offset > HALF_TURN_DEGREES {
        offset - FULL_TURN_DEGREES
    } else {
        offset
    }
}

/// Wraps any finite angle into `[0, 360)`.
pub fn normalize_heading(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(FULL_TURN_DEGREES);
    if wrapped >= FULL_TURN_DEGREES {
        0.0
    } else {
        wrapped
    }
}

pub fn is_aligned(bearing_offset: f64) -> bool {
    is_aligned_within(bearing_offset, ALIGNMENT_TOLERANCE_DEGREES)
}

pub fn is_aligned_within(bearing_offset: f64, tolerance_degrees: f64) -> bool {
    bearing_offset.abs() < tolerance_degrees
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Steering {
    Forward,
    TurnLeft,
    TurnRight,
    /// Intermediate waypoint reached; the next step loads the following leg.
    WaypointReached,
    Arrived,
}

impl Steering {
    /// Steering for a leg that still has distance to cover.
    pub fn from_offset(bearing_offset: f64, tolerance_degrees: f64) -> Self {
        if is_aligned_within(bearing_offset, tolerance_degrees) {
            Self::Forward
        } else if bearing_offset > 0.0 {
            Self::TurnRight
        } else {
            Self::TurnLeft
        }
    }
}

#[cfg(test)]
#[path = "tests/bearing_tests.rs"]
mod tests;
