//! Event loop that owns a [`GuidedWalk`].
//!
//! Sensor samples, user actions and permission answers all funnel into one
//! task through a single queue, so the session is never shared. The
//! permission prompt runs in its own task and reports back through that
//! queue, so manual input keeps flowing while the platform is asking.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use shared::domain::Language;
use tokio::{
    sync::{broadcast, mpsc, watch},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{
    controller::{GuidedWalk, WalkConfig, WalkView},
    haptics::{HapticLoop, HapticSink},
    heading::{HeadingMode, HeadingSample, OrientationSensor, PermissionResolution},
    itinerary::Itinerary,
};

const INPUT_QUEUE_DEPTH: usize = 128;

#[derive(Debug, Clone, PartialEq)]
pub enum WalkInput {
    StartNavigation,
    Sensor(HeadingSample),
    ManualHeading(f64),
    Step,
    DismissNotice,
    SetLanguage(Language),
    Restart,
    /// Answer to the prompt issued by the `request`-th start since spawn.
    /// Answers to superseded requests are ignored.
    PermissionResolved {
        request: u64,
        resolution: PermissionResolution,
    },
}

/// Owner-side handle. Dropping it tears the walk down.
pub struct WalkHandle {
    inputs: mpsc::Sender<WalkInput>,
    views: watch::Receiver<WalkView>,
    task: Option<JoinHandle<()>>,
}

impl WalkHandle {
    pub async fn send(&self, input: WalkInput) -> Result<()> {
        self.inputs
            .send(input)
            .await
            .map_err(|_| anyhow!("walk driver has stopped"))
    }

    pub fn view(&self) -> WalkView {
        self.views.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<WalkView> {
        self.views.clone()
    }

    /// Waits for the driver to drain queued input and stop.
    pub async fn shutdown(mut self) {
        let Some(task) = self.task.take() else {
            return;
        };
        drop(self);
        if let Err(error) = task.await {
            if !error.is_cancelled() {
                warn!(%error, "walk driver ended abnormally");
            }
        }
    }
}

impl Drop for WalkHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

pub fn spawn_walk(
    itinerary: Arc<Itinerary>,
    config: WalkConfig,
    sensor: Option<Arc<dyn OrientationSensor>>,
    haptics: Option<Arc<dyn HapticSink>>,
) -> WalkHandle {
    let haptic_loop = HapticLoop::new(haptics, config.haptic_period, config.haptic_pulse);
    let walk = GuidedWalk::new(itinerary, config);
    let (views_tx, views_rx) = watch::channel(walk.view());
    let (inputs_tx, inputs_rx) = mpsc::channel(INPUT_QUEUE_DEPTH);

    let driver = WalkDriver {
        walk,
        sensor,
        haptics: haptic_loop,
        sensor_task: None,
        permission_task: None,
        permission_request: 0,
        inputs: inputs_tx.downgrade(),
        views: views_tx,
    };
    let task = tokio::spawn(driver.run(inputs_rx));

    WalkHandle {
        inputs: inputs_tx,
        views: views_rx,
        task: Some(task),
    }
}

struct WalkDriver {
    walk: GuidedWalk,
    sensor: Option<Arc<dyn OrientationSensor>>,
    haptics: HapticLoop,
    sensor_task: Option<JoinHandle<()>>,
    permission_task: Option<JoinHandle<()>>,
    permission_request: u64,
    inputs: mpsc::WeakSender<WalkInput>,
    views: watch::Sender<WalkView>,
}

impl WalkDriver {
    async fn run(mut self, mut inputs: mpsc::Receiver<WalkInput>) {
        while let Some(input) = inputs.recv().await {
            self.handle(input);
            self.publish();
        }
        debug!("walk input queue closed");
    }

    fn handle(&mut self, input: WalkInput) {
        match input {
            WalkInput::StartNavigation => self.start_navigation(),
            WalkInput::Sensor(sample) => {
                if let Err(error) = self.walk.apply_sensor_sample(sample) {
                    warn!(%error, "dropping sensor sample");
                }
            }
            WalkInput::ManualHeading(degrees) => {
                if let Err(error) = self.walk.set_manual_heading(degrees) {
                    warn!(%error, "rejecting manual heading");
                }
            }
            WalkInput::Step => {
                self.walk.step();
            }
            WalkInput::DismissNotice => self.walk.dismiss_notice(),
            WalkInput::SetLanguage(language) => self.walk.set_language(language),
            WalkInput::Restart => {
                self.cancel_permission_request();
                self.detach_sensor();
                self.walk.restart();
            }
            WalkInput::PermissionResolved {
                request,
                resolution,
            } => self.permission_resolved(request, resolution),
        }
    }

    fn start_navigation(&mut self) {
        if let Err(error) = self.walk.start_navigation() {
            warn!(%error, "start navigation ignored");
            return;
        }

        let Some(sensor) = self.sensor.clone() else {
            self.walk
                .resolve_permission(PermissionResolution::SensorUnavailable);
            return;
        };

        self.cancel_permission_request();
        self.permission_request += 1;
        let request = self.permission_request;
        let inputs = self.inputs.clone();
        self.permission_task = Some(tokio::spawn(async move {
            let resolution = match sensor.request_permission().await {
                Ok(outcome) => outcome.into(),
                Err(error) => {
                    warn!(%error, "orientation permission request failed");
                    PermissionResolution::RequestFailed
                }
            };
            if let Some(tx) = inputs.upgrade() {
                let _ = tx
                    .send(WalkInput::PermissionResolved {
                        request,
                        resolution,
                    })
                    .await;
            }
        }));
    }

    fn permission_resolved(&mut self, request: u64, resolution: PermissionResolution) {
        if request != self.permission_request || self.permission_task.is_none() {
            debug!(request, ?resolution, "dropping stale permission answer");
            return;
        }
        self.permission_task = None;
        if self.walk.resolve_permission(resolution) == HeadingMode::Live {
            self.attach_sensor();
        }
    }

    fn cancel_permission_request(&mut self) {
        if let Some(task) = self.permission_task.take() {
            task.abort();
        }
    }

    fn attach_sensor(&mut self) {
        let Some(sensor) = self.sensor.clone() else {
            return;
        };
        self.detach_sensor();

        let mut samples = sensor.subscribe();
        let inputs = self.inputs.clone();
        self.sensor_task = Some(tokio::spawn(async move {
            loop {
                match samples.recv().await {
                    Ok(sample) => {
                        let Some(tx) = inputs.upgrade() else {
                            break;
                        };
                        if tx.send(WalkInput::Sensor(sample)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "sensor samples skipped; newer samples supersede them");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }));
        info!("orientation sensor attached");
    }

    fn detach_sensor(&mut self) {
        if let Some(task) = self.sensor_task.take() {
            task.abort();
        }
    }

    fn publish(&mut self) {
        self.haptics.sync(self.walk.haptic_condition());
        self.views.send_replace(self.walk.view());
    }
}

impl Drop for WalkDriver {
    fn drop(&mut self) {
        self.cancel_permission_request();
        self.detach_sensor();
        self.haptics.cancel();
    }
}

#[cfg(test)]
#[path = "tests/driver_tests.rs"]
mod tests;
