//! Stand-in devices for kiosks and tests without real hardware.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::info;

use crate::{
    haptics::HapticSink,
    heading::{HeadingSample, OrientationSensor, PermissionOutcome},
};

/// Orientation sensor whose samples are pushed by the caller.
pub struct ScriptedSensor {
    outcome: Result<PermissionOutcome, String>,
    samples: broadcast::Sender<HeadingSample>,
}

impl ScriptedSensor {
    pub fn new(outcome: PermissionOutcome) -> Self {
        let (samples, _) = broadcast::channel(64);
        Self {
            outcome: Ok(outcome),
            samples,
        }
    }

    /// Sensor whose permission prompt errors out.
    pub fn failing(reason: impl Into<String>) -> Self {
        let (samples, _) = broadcast::channel(64);
        Self {
            outcome: Err(reason.into()),
            samples,
        }
    }

    /// Returns false when nobody is listening yet.
    pub fn push(&self, sample: HeadingSample) -> bool {
        self.samples.send(sample).is_ok()
    }
}

#[async_trait]
impl OrientationSensor for ScriptedSensor {
    async fn request_permission(&self) -> anyhow::Result<PermissionOutcome> {
        self.outcome.clone().map_err(|reason| anyhow::anyhow!(reason))
    }

    fn subscribe(&self) -> broadcast::Receiver<HeadingSample> {
        self.samples.subscribe()
    }
}

/// Haptic sink that writes each pulse to the log.
pub struct LoggingHaptics;

impl HapticSink for LoggingHaptics {
    fn pulse(&self, duration: Duration) {
        info!(duration_ms = duration.as_millis() as u64, "haptic pulse");
    }
}
