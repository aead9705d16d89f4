pub mod autopilot;
pub mod phase;
pub mod telemetry;

pub use autopilot::{transition, Autopilot, AutopilotConfig, MissionKind, GSO_ALTITUDE};
pub use phase::MissionPhase;
pub use telemetry::Telemetry;
