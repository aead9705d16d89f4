use nalgebra::{Unit, UnitVector2, Vector2};

use crate::physics::frame::perp;
use crate::physics::gravity::EARTH_RADIUS;

// ---------------------------------------------------------------------------
// Physical constants
// ---------------------------------------------------------------------------

pub const G0: f64 = 9.80665; // standard gravity, m/s^2

// ---------------------------------------------------------------------------
// Vehicle state
// ---------------------------------------------------------------------------

/// Full vehicle state at a single point in time.
/// Frame: Earth-centric inertial, Earth at the origin.
#[derive(Debug, Clone)]
pub struct State {
    pub time: f64,                   // s
    pub pos: Vector2<f64>,           // m
    pub vel: Vector2<f64>,           // m/s
    pub attitude: UnitVector2<f64>,  // thrust direction
    pub throttle: f64,               // [0, 1]
    pub mass: f64,                   // kg (decreases during burn)
    pub stage_idx: usize,            // active stage index, burn order
}

impl State {
    /// Advance state by a derivative scaled by dt (used inside RK4).
    /// Attitude, throttle, and stage index are held constant over a step.
    pub fn apply(&self, d: &Deriv, dt: f64) -> State {
        State {
            time: self.time + dt,
            pos: self.pos + d.dpos * dt,
            vel: self.vel + d.dvel * dt,
            attitude: self.attitude,
            throttle: self.throttle,
            mass: (self.mass + d.dmass * dt).max(0.0),
            stage_idx: self.stage_idx,
        }
    }

    pub fn radius(&self) -> f64 {
        self.pos.norm()
    }

    /// Altitude above the Earth's surface, m.
    pub fn altitude(&self) -> f64 {
        self.pos.norm() - EARTH_RADIUS
    }

    pub fn speed(&self) -> f64 {
        self.vel.norm()
    }

    /// Local "up": radially outward from the Earth.
    pub fn radial_out(&self) -> UnitVector2<f64> {
        Unit::new_normalize(self.pos)
    }

    /// Local horizontal in the counterclockwise (launch) direction.
    pub fn tangent(&self) -> UnitVector2<f64> {
        Unit::new_normalize(perp(&self.pos))
    }
}

// ---------------------------------------------------------------------------
// State derivative (dp/dt, dv/dt, dm/dt)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Deriv {
    pub dpos: Vector2<f64>, // velocity
    pub dvel: Vector2<f64>, // acceleration
    pub dmass: f64,         // mass flow rate (negative during burn)
}

// ---------------------------------------------------------------------------
// GNC command output
// ---------------------------------------------------------------------------

/// One tick's worth of control input: throttle, attitude target, and an
/// optional explicit stage-separation request.
#[derive(Debug, Clone, Copy)]
pub struct GncCommand {
    pub throttle: f64,
    pub attitude: UnitVector2<f64>,
    pub separate: bool,
}

impl GncCommand {
    /// Engines off, hold the given attitude.
    pub fn ballistic(attitude: UnitVector2<f64>) -> Self {
        GncCommand {
            throttle: 0.0,
            attitude,
            separate: false,
        }
    }

    pub fn burn(throttle: f64, attitude: UnitVector2<f64>) -> Self {
        GncCommand {
            throttle,
            attitude,
            separate: false,
        }
    }

    /// Boundary-clamped construction for externally supplied (manual)
    /// control: throttle clamped to [0, 1], attitude normalized, with a
    /// degenerate zero vector falling back to +x.
    pub fn clamped(throttle: f64, attitude: Vector2<f64>, separate: bool) -> Self {
        let attitude = if attitude.norm() > 1e-9 {
            Unit::new_normalize(attitude)
        } else {
            Unit::new_unchecked(Vector2::x())
        };
        GncCommand {
            throttle: throttle.clamp(0.0, 1.0),
            attitude,
            separate,
        }
    }
}

impl Default for GncCommand {
    fn default() -> Self {
        GncCommand::ballistic(Unit::new_unchecked(Vector2::x()))
    }
}

// ---------------------------------------------------------------------------
// Simulation config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SimConfig {
    pub dt: f64,       // physics timestep, s — fixed regardless of time warp
    pub max_time: f64, // hard stop, s
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 0.1,
            max_time: 1_500_000.0, // ~17 days, enough for a lunar transfer
        }
    }
}
