use std::{sync::Arc, time::Duration};

use portal::OccupancySim;
use shared::protocol::ServerEvent;
use tokio::{
    sync::broadcast,
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};
use tracing::debug;

use crate::api::ApiContext;

const EVENT_BUFFER: usize = 256;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) api: ApiContext,
    pub(crate) events: broadcast::Sender<ServerEvent>,
}

impl AppState {
    pub(crate) fn new(api: ApiContext) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Arc::new(Self { api, events })
    }
}

/// Advances the simulation every `tick`, stores the snapshot and pushes it
/// to WebSocket subscribers.
pub(crate) fn spawn_occupancy_ticker(
    state: Arc<AppState>,
    mut sim: OccupancySim,
    tick: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + tick, tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            let snapshot = sim.advance();
            *state.api.occupancy.write().await = snapshot.clone();
            let receivers = state
                .events
                .send(ServerEvent::OccupancyUpdated(snapshot))
                .unwrap_or(0);
            debug!(receivers, "occupancy broadcast");
        }
    })
}
