//! Simulated floor occupancy for the clinician heat map.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use shared::{
    domain::{HeatLevel, Trend, ZoneId, ZoneOccupancy},
    protocol::OccupancySnapshot,
};
use tracing::debug;

pub const DEFAULT_TICK: Duration = Duration::from_secs(2);
/// Per-tick occupancy change is drawn from `[-JITTER, JITTER)` percent.
pub const JITTER_PERCENT: f64 = 7.5;
pub const OVERLOAD_PERCENT: f64 = 85.0;
pub const LOW_HEAT_BELOW: f64 = 30.0;
pub const MODERATE_HEAT_BELOW: f64 = 70.0;
/// Changes smaller than this keep the trend stable.
pub const TREND_DEADBAND_PERCENT: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccupancyConfig {
    pub tick: Duration,
    /// `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for OccupancyConfig {
    fn default() -> Self {
        Self {
            tick: DEFAULT_TICK,
            seed: None,
        }
    }
}

pub fn heat_level(occupancy: f64) -> HeatLevel {
    if occupancy < LOW_HEAT_BELOW {
        HeatLevel::Low
    } else if occupancy < MODERATE_HEAT_BELOW {
        HeatLevel::Moderate
    } else {
        HeatLevel::High
    }
}

pub fn trend_for(delta: f64) -> Trend {
    if delta >= TREND_DEADBAND_PERCENT {
        Trend::Up
    } else if delta <= -TREND_DEADBAND_PERCENT {
        Trend::Down
    } else {
        Trend::Stable
    }
}

fn zone(id: &str, label: &str, occupancy: f64, capacity: u32, trend: Trend) -> ZoneOccupancy {
    ZoneOccupancy {
        zone_id: ZoneId::new(id),
        label: label.to_string(),
        occupancy,
        capacity,
        trend,
        heat: heat_level(occupancy),
        overloaded: occupancy > OVERLOAD_PERCENT,
    }
}

/// Five clinic zones whose occupancy drifts randomly every tick.
pub struct OccupancySim {
    zones: Vec<ZoneOccupancy>,
    rng: Pcg64,
    tick: u64,
}

impl OccupancySim {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => Pcg64::seed_from_u64(seed),
            None => Pcg64::from_entropy(),
        };
        Self {
            zones: vec![
                zone("waiting", "Waiting Room", 75.0, 40, Trend::Up),
                zone("treatment", "Treatment Wing", 45.0, 20, Trend::Stable),
                zone("lab", "Sterilization / Lab", 10.0, 5, Trend::Down),
                zone("consultation", "Consultation", 90.0, 10, Trend::Up),
                zone("reception", "Reception", 30.0, 15, Trend::Stable),
            ],
            rng,
            tick: 0,
        }
    }

    pub fn zones(&self) -> &[ZoneOccupancy] {
        &self.zones
    }

    pub fn snapshot(&self) -> OccupancySnapshot {
        OccupancySnapshot {
            tick: self.tick,
            zones: self.zones.clone(),
        }
    }

    /// Perturbs every zone once and returns the new snapshot.
    pub fn advance(&mut self) -> OccupancySnapshot {
        for zone in &mut self.zones {
            let jitter = self.rng.gen_range(-JITTER_PERCENT..JITTER_PERCENT);
            let next = (zone.occupancy + jitter).clamp(0.0, 100.0);
            zone.trend = trend_for(next - zone.occupancy);
            zone.occupancy = next;
            zone.heat = heat_level(next);
            zone.overloaded = next > OVERLOAD_PERCENT;
        }
        self.tick += 1;
        let overloaded = self.zones.iter().filter(|z| z.overloaded).count();
        debug!(tick = self.tick, overloaded, "occupancy advanced");
        self.snapshot()
    }
}

#[cfg(test)]
#[path = "tests/occupancy_tests.rs"]
mod tests;
