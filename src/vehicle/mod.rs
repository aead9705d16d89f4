pub mod rocket;
pub mod stage;

pub use rocket::{presets, Rocket, StagingState, PROP_EPSILON};
pub use stage::{Stage, StageBuilder};
