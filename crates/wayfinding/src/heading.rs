//! Heading acquisition: permission gating for the orientation sensor and
//! decoding of the samples it delivers.
//!
//! ```text
//! Unauthorized --start--> AwaitingPermission --granted / no gating--> Live
//!                                            \--denied / failed / no sensor--> Manual
//! ```
//!
//! Manual heading input is accepted in every state and never moves the
//! machine back to `Live`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::bearing::{normalize_heading, FULL_TURN_DEGREES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingMode {
    Unauthorized,
    AwaitingPermission,
    Live,
    Manual,
}

/// Answer from the platform's one-time permission prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionOutcome {
    Granted,
    Denied,
    /// The platform has no permission concept; the sensor is usable as-is.
    NotRequired,
}

/// How the pending permission request ended, from the controller's view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionResolution {
    Granted,
    NotRequired,
    Denied,
    RequestFailed,
    SensorUnavailable,
}

impl From<PermissionOutcome> for PermissionResolution {
    fn from(value: PermissionOutcome) -> Self {
        match value {
            PermissionOutcome::Granted => Self::Granted,
            PermissionOutcome::Denied => Self::Denied,
            PermissionOutcome::NotRequired => Self::NotRequired,
        }
    }
}

/// Blocking notice raised to the walker when sensor access is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessNotice {
    PermissionDenied,
    PermissionRequestFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum HeadingError {
    #[error("heading value {0} is not a finite number")]
    NotFinite(f64),
    #[error("manual heading {0} is outside [0, 360]")]
    ManualOutOfRange(f64),
    #[error("navigation already started (mode {0:?})")]
    AlreadyStarted(HeadingMode),
}

/// Raw orientation reading from the device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeadingSample {
    /// Absolute compass heading in degrees clockwise from north.
    Compass(f64),
    /// Counter-clockwise rotation about the vertical axis in degrees.
    Alpha(f64),
}

impl HeadingSample {
    pub fn to_heading(self) -> Result<f64, HeadingError> {
        let raw = match self {
            Self::Compass(degrees) => degrees,
            Self::Alpha(alpha) => (alpha - FULL_TURN_DEGREES).abs(),
        };
        if !raw.is_finite() {
            return Err(HeadingError::NotFinite(raw));
        }
        Ok(normalize_heading(raw))
    }
}

/// Validates a heading typed or dragged in by the walker.
pub fn parse_manual_heading(degrees: f64) -> Result<f64, HeadingError> {
    if !degrees.is_finite() {
        return Err(HeadingError::NotFinite(degrees));
    }
    if !(0.0..=FULL_TURN_DEGREES).contains(&degrees) {
        return Err(HeadingError::ManualOutOfRange(degrees));
    }
    Ok(normalize_heading(degrees))
}

#[async_trait]
pub trait OrientationSensor: Send + Sync {
    /// One-time permission prompt. Platforms without gating answer
    /// [`PermissionOutcome::NotRequired`].
    async fn request_permission(&self) -> anyhow::Result<PermissionOutcome>;

    fn subscribe(&self) -> broadcast::Receiver<HeadingSample>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingAcquisition {
    mode: HeadingMode,
    notice: Option<AccessNotice>,
}

impl Default for HeadingAcquisition {
    fn default() -> Self {
        Self {
            mode: HeadingMode::Unauthorized,
            notice: None,
        }
    }
}

impl HeadingAcquisition {
    pub fn mode(&self) -> HeadingMode {
        self.mode
    }

    pub fn notice(&self) -> Option<AccessNotice> {
        self.notice
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn accepts_sensor_samples(&self) -> bool {
        self.mode == HeadingMode::Live
    }

    pub fn has_started(&self) -> bool {
        self.mode != HeadingMode::Unauthorized
    }

    pub fn request(&mut self) -> Result<(), HeadingError> {
        if self.mode != HeadingMode::Unauthorized {
            return Err(HeadingError::AlreadyStarted(self.mode));
        }
        self.mode = HeadingMode::AwaitingPermission;
        info!("orientation permission requested");
        Ok(())
    }

    /// Settles a pending request. Returns true when the sensor became
    /// authorized.
    pub fn resolve(&mut self, resolution: PermissionResolution) -> bool {
        if self.mode != HeadingMode::AwaitingPermission {
            warn!(mode = ?self.mode, ?resolution, "ignoring permission result outside of a request");
            return false;
        }

        let (mode, notice) = match resolution {
            PermissionResolution::Granted | PermissionResolution::NotRequired => {
                (HeadingMode::Live, None)
            }
            PermissionResolution::Denied => {
                (HeadingMode::Manual, Some(AccessNotice::PermissionDenied))
            }
            PermissionResolution::RequestFailed => (
                HeadingMode::Manual,
                Some(AccessNotice::PermissionRequestFailed),
            ),
            PermissionResolution::SensorUnavailable => (HeadingMode::Manual, None),
        };
        self.mode = mode;
        self.notice = notice;
        info!(?resolution, ?mode, "orientation permission resolved");
        mode == HeadingMode::Live
    }
}

#[cfg(test)]
#[path = "tests/heading_tests.rs"]
mod tests;
