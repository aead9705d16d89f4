pub mod event;
pub mod integrator;
pub mod predictor;
pub mod runner;

pub use event::{EventKind, SimEvent};
pub use integrator::rk4_step;
pub use predictor::{PathSample, Predictor};
pub use runner::{Simulation, Snapshot, ATTITUDE_SLEW_RATE, MAX_TIME_WARP};
