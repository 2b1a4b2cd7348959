//! Indoor guided-walk engine: itinerary model, bearing math, heading source
//! negotiation and haptic feedback for the kiosk and patient apps.

pub mod bearing;
pub mod controller;
pub mod driver;
pub mod haptics;
pub mod heading;
pub mod itinerary;
pub mod session;
pub mod sim;
pub mod text;

pub use bearing::{compute_bearing_offset, is_aligned, Steering};
pub use controller::{GuidedWalk, WalkConfig, WalkView};
pub use driver::{spawn_walk, WalkHandle, WalkInput};
pub use haptics::HapticSink;
pub use heading::{
    HeadingMode, HeadingSample, OrientationSensor, PermissionOutcome, PermissionResolution,
};
pub use itinerary::{Itinerary, ItineraryError, Maneuver, Waypoint};
pub use session::{NavigationSession, StepOutcome};
