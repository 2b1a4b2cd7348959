use std::{sync::Arc, time::Duration};

use tokio::{task::JoinHandle, time::Instant};
use tracing::debug;

pub const HAPTIC_PERIOD: Duration = Duration::from_millis(500);
pub const HAPTIC_PULSE: Duration = Duration::from_millis(10);

/// Fire-and-forget vibration capability of the device.
pub trait HapticSink: Send + Sync {
    fn pulse(&self, duration: Duration);
}

/// Inputs the feedback loop depends on. Any change re-arms the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HapticCondition {
    pub aligned: bool,
    pub distance_remaining: u32,
    pub sensor_authorized: bool,
}

impl HapticCondition {
    pub fn is_active(&self) -> bool {
        self.aligned && self.distance_remaining > 0 && self.sensor_authorized
    }
}

/// Periodic pulse emitter owned by the walk driver.
pub struct HapticLoop {
    sink: Option<Arc<dyn HapticSink>>,
    period: Duration,
    pulse: Duration,
    armed_for: Option<HapticCondition>,
    task: Option<JoinHandle<()>>,
}

impl HapticLoop {
    pub fn new(sink: Option<Arc<dyn HapticSink>>, period: Duration, pulse: Duration) -> Self {
        Self {
            sink,
            period,
            pulse,
            armed_for: None,
            task: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Must run inside a tokio runtime whenever the condition is active.
    pub fn sync(&mut self, condition: HapticCondition) {
        if self.armed_for == Some(condition) {
            return;
        }
        self.cancel();
        self.armed_for = Some(condition);

        if !condition.is_active() {
            return;
        }
        let Some(sink) = self.sink.clone() else {
            return;
        };

        let period = self.period;
        let pulse = self.pulse;
        debug!(?condition, "arming haptic feedback");
        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            loop {
                ticker.tick().await;
                sink.pulse(pulse);
            }
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("haptic feedback stopped");
        }
        self.armed_for = None;
    }
}

impl Drop for HapticLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
#[path = "tests/haptics_tests.rs"]
mod tests;
