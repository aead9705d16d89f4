pub mod bodies;
pub mod dynamics;
pub mod gnc;
pub mod io;
pub mod orbital;
pub mod physics;
pub mod sim;
pub mod vehicle;

// Flat re-exports for the common surface
pub mod atmosphere {
    pub use crate::physics::atmosphere::*;
}

pub mod types {
    pub use crate::bodies::{BodySet, CelestialBody};
    pub use crate::dynamics::state::{Deriv, GncCommand, SimConfig, State, G0};
    pub use crate::gnc::{Autopilot, MissionKind, MissionPhase, Telemetry};
    pub use crate::sim::{EventKind, PathSample, Predictor, SimEvent, Simulation, Snapshot};
    pub use crate::vehicle::{Rocket, Stage, StageBuilder, StagingState};
}
