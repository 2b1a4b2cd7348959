//! Clinic portal state: who is signed in, their preferences, and the mock
//! schedule and floor occupancy the dashboards render.

pub mod auth;
pub mod occupancy;
pub mod preferences;
pub mod schedule;
pub mod translations;

pub use auth::{AuthError, AuthSession, CredentialVerifier, DemoDirectory};
pub use occupancy::{OccupancyConfig, OccupancySim};
pub use preferences::Preferences;
pub use schedule::Schedule;
