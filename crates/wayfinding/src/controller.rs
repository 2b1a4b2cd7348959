use std::{sync::Arc, time::Duration};

use serde::Serialize;
use shared::domain::Language;
use tracing::{debug, info};

use crate::{
    bearing::{is_aligned_within, Steering, ALIGNMENT_TOLERANCE_DEGREES},
    haptics::{HapticCondition, HAPTIC_PERIOD, HAPTIC_PULSE},
    heading::{
        parse_manual_heading, HeadingAcquisition, HeadingError, HeadingMode, HeadingSample,
        PermissionResolution,
    },
    itinerary::{Itinerary, Maneuver},
    session::{NavigationSession, StepOutcome},
    text::{waypoint_instruction, WalkText},
};

#[derive(Debug, Clone, PartialEq)]
pub struct WalkConfig {
    pub alignment_tolerance_degrees: f64,
    pub haptic_period: Duration,
    pub haptic_pulse: Duration,
    pub language: Language,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            alignment_tolerance_degrees: ALIGNMENT_TOLERANCE_DEGREES,
            haptic_period: HAPTIC_PERIOD,
            haptic_pulse: HAPTIC_PULSE,
            language: Language::En,
        }
    }
}

/// Everything the walk screen renders, recomputed after each input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalkView {
    pub waypoint_index: usize,
    pub waypoint_count: usize,
    pub maneuver: Maneuver,
    pub instruction: String,
    pub distance_remaining: u32,
    pub heading: f64,
    pub target_heading: u16,
    pub bearing_offset: f64,
    pub aligned: bool,
    pub steering: Steering,
    /// Steering text; absent until navigation has started.
    pub guidance: Option<String>,
    pub mode: HeadingMode,
    pub sensor_authorized: bool,
    pub notice: Option<String>,
    pub arrived: bool,
}

/// Guided Walk Controller: one navigation session plus the heading
/// acquisition machine that feeds it.
#[derive(Debug, Clone)]
pub struct GuidedWalk {
    config: WalkConfig,
    session: NavigationSession,
    acquisition: HeadingAcquisition,
}

impl GuidedWalk {
    pub fn new(itinerary: Arc<Itinerary>, config: WalkConfig) -> Self {
        Self {
            config,
            session: NavigationSession::new(itinerary),
            acquisition: HeadingAcquisition::default(),
        }
    }

    pub fn config(&self) -> &WalkConfig {
        &self.config
    }

    pub fn session(&self) -> &NavigationSession {
        &self.session
    }

    pub fn mode(&self) -> HeadingMode {
        self.acquisition.mode()
    }

    pub fn set_language(&mut self, language: Language) {
        self.config.language = language;
    }

    /// "Start navigation": asks for sensor access.
    pub fn start_navigation(&mut self) -> Result<(), HeadingError> {
        self.acquisition.request()
    }

    pub fn resolve_permission(&mut self, resolution: PermissionResolution) -> HeadingMode {
        if self.acquisition.resolve(resolution) {
            self.session.authorize_sensor();
        }
        self.acquisition.mode()
    }

    pub fn dismiss_notice(&mut self) {
        self.acquisition.dismiss_notice();
    }

    /// Applies a live sample. Returns `Ok(false)` when the sensor is not the
    /// active heading source and the sample was dropped.
    pub fn apply_sensor_sample(&mut self, sample: HeadingSample) -> Result<bool, HeadingError> {
        if !self.acquisition.accepts_sensor_samples() {
            return Ok(false);
        }
        let heading = sample.to_heading()?;
        self.session.set_heading(heading);
        Ok(true)
    }

    /// Manual override, accepted in every mode.
    pub fn set_manual_heading(&mut self, degrees: f64) -> Result<(), HeadingError> {
        let heading = parse_manual_heading(degrees)?;
        self.session.set_heading(heading);
        debug!(heading, "manual heading override");
        Ok(())
    }

    pub fn step(&mut self) -> StepOutcome {
        let outcome = self.session.advance_step();
        match outcome {
            StepOutcome::Advanced { waypoint_index } => {
                info!(waypoint_index, "waypoint reached");
                if self.session.is_arrived() {
                    info!("destination reached");
                }
            }
            StepOutcome::AlreadyArrived => debug!("step ignored after arrival"),
            StepOutcome::Walked { .. } => {}
        }
        outcome
    }

    /// Discards the session and starts over from the first waypoint.
    pub fn restart(&mut self) {
        let itinerary = Arc::clone(self.session.itinerary());
        self.session = NavigationSession::new(itinerary);
        self.acquisition = HeadingAcquisition::default();
        info!("walk restarted");
    }

    pub fn bearing_offset(&self) -> f64 {
        self.session.bearing_offset()
    }

    pub fn is_aligned(&self) -> bool {
        is_aligned_within(
            self.bearing_offset(),
            self.config.alignment_tolerance_degrees,
        )
    }

    pub fn is_arrived(&self) -> bool {
        self.session.is_arrived()
    }

    pub fn steering(&self) -> Steering {
        if self.session.is_arrived() {
            Steering::Arrived
        } else if self.session.distance_remaining() == 0 {
            Steering::WaypointReached
        } else {
            Steering::from_offset(
                self.bearing_offset(),
                self.config.alignment_tolerance_degrees,
            )
        }
    }

    pub fn haptic_condition(&self) -> HapticCondition {
        HapticCondition {
            aligned: self.is_aligned(),
            distance_remaining: self.session.distance_remaining(),
            sensor_authorized: self.session.sensor_authorized(),
        }
    }

    pub fn view(&self) -> WalkView {
        let text = WalkText::for_language(self.config.language);
        let waypoint = self.session.current_waypoint();
        let steering = self.steering();
        let arrived = self.session.is_arrived();
        let started = matches!(self.mode(), HeadingMode::Live | HeadingMode::Manual);
        let guidance = (started || arrived).then(|| text.steering(steering).to_string());
        let notice = self
            .acquisition
            .notice()
            .map(|notice| text.notice(notice).to_string());

        WalkView {
            waypoint_index: self.session.current_waypoint_index(),
            waypoint_count: self.session.itinerary().len(),
            maneuver: waypoint.maneuver(),
            instruction: waypoint_instruction(waypoint, self.config.language),
            distance_remaining: self.session.distance_remaining(),
            heading: self.session.current_heading_degrees(),
            target_heading: waypoint.target_heading_degrees(),
            bearing_offset: self.bearing_offset(),
            aligned: self.is_aligned(),
            steering,
            guidance,
            mode: self.mode(),
            sensor_authorized: self.session.sensor_authorized(),
            notice,
            arrived,
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
