pub mod state;

pub use state::{Deriv, GncCommand, SimConfig, State, G0};

use nalgebra::Vector2;

use crate::bodies::BodySet;
use crate::physics::{aerodynamics, atmosphere, gravity};
use crate::vehicle::{Rocket, StagingState};

// ---------------------------------------------------------------------------
// Equations of motion (2D point-mass)
// ---------------------------------------------------------------------------

/// Compute state derivatives for a given vehicle state.
///
/// Forces modeled:
///   1. Gravity — inverse-square pull from every body in the set
///   2. Thrust  — throttle x stage thrust along the attitude vector,
///                gated on the staging state (no propellant, no thrust)
///   3. Drag    — quadratic, opposing velocity, zero above the atmosphere
///
/// Pure function of its inputs: the live integrator and the trajectory
/// predictor both evaluate exactly this.
pub fn derivatives(state: &State, rocket: &Rocket, bodies: &BodySet) -> Deriv {
    let a_gravity = gravity::net_accel(&state.pos, bodies);

    let (a_thrust, dmass) = match rocket.propulsion(state.mass, state.stage_idx) {
        StagingState::Active { stage } if state.throttle > 0.0 => {
            let s = &rocket.stages[stage];
            let accel = state.attitude.into_inner() * (s.thrust * state.throttle / state.mass);
            (accel, -s.mass_flow() * state.throttle)
        }
        _ => (Vector2::zeros(), 0.0),
    };

    let a_drag = match rocket.drag_reference(state.stage_idx) {
        Some((cd, area)) => {
            let rho = atmosphere::density(state.altitude());
            aerodynamics::drag_accel(&state.vel, rho, cd, area, state.mass)
        }
        None => Vector2::zeros(),
    };

    Deriv {
        dpos: state.vel,
        dvel: a_gravity + a_thrust + a_drag,
        dmass,
    }
}
