use nalgebra::Vector2;

use super::integrator::rk4_step;
use super::runner::Simulation;
use crate::bodies::BodySet;
use crate::dynamics::state::{GncCommand, State};
use crate::vehicle::Rocket;

/// One point of a predicted trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSample {
    pub time: f64,
    pub pos: Vector2<f64>,
}

// ---------------------------------------------------------------------------
// Trajectory prediction
// ---------------------------------------------------------------------------

/// Forward-propagates a copy of the world with the same integrator the live
/// run uses, without touching the live run. Ballistic by default; a held
/// command models a constant burn. Iteration ends at the step horizon or at
/// surface contact, whichever comes first.
pub struct Predictor {
    state: State,
    rocket: Rocket,
    bodies: BodySet,
    dt: f64,
    remaining: usize,
    impacted: bool,
}

impl Predictor {
    /// Engines-off look-ahead from the live simulation state.
    pub fn ballistic(sim: &Simulation, steps: usize, dt: f64) -> Self {
        let mut state = sim.state.clone();
        state.throttle = 0.0;
        Predictor {
            state,
            rocket: sim.rocket.clone(),
            bodies: sim.bodies.clone(),
            dt,
            remaining: steps,
            impacted: false,
        }
    }

    /// Hold a fixed command (throttle and attitude) for the whole horizon.
    pub fn with_command(mut self, cmd: GncCommand) -> Self {
        self.state.throttle = cmd.throttle.clamp(0.0, 1.0);
        self.state.attitude = cmd.attitude;
        self
    }

    /// Collect the whole look-ahead into a polyline.
    pub fn path(self) -> Vec<PathSample> {
        self.collect()
    }

    fn grounded(&self) -> bool {
        self.bodies
            .iter()
            .any(|b| (self.state.pos - b.position).norm() < b.radius)
    }
}

impl Iterator for Predictor {
    type Item = PathSample;

    fn next(&mut self) -> Option<PathSample> {
        if self.remaining == 0 || self.impacted {
            return None;
        }
        self.remaining -= 1;

        self.state = rk4_step(&self.state, &self.rocket, &self.bodies, self.dt);
        self.bodies.step(self.dt);
        if self.grounded() {
            // Emit the contact point, then stop
            self.impacted = true;
        }
        Some(PathSample {
            time: self.state.time,
            pos: self.state.pos,
        })
    }
}
