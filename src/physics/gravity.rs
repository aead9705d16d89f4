use nalgebra::Vector2;

use crate::bodies::{BodySet, CelestialBody};

// ---------------------------------------------------------------------------
// Physical constants (Earth/Moon system)
// ---------------------------------------------------------------------------

pub const G: f64 = 6.674_30e-11; // gravitational constant, m^3/(kg·s^2)

pub const EARTH_MASS: f64 = 5.972e24;      // kg
pub const EARTH_RADIUS: f64 = 6.371e6;     // m
pub const MOON_MASS: f64 = 7.347_67e22;    // kg
pub const MOON_RADIUS: f64 = 1.737_1e6;    // m
pub const MOON_DISTANCE: f64 = 3.844e8;    // m, mean Earth-Moon distance
pub const MOON_VELOCITY: f64 = 1022.0;     // m/s, tangential at mean distance

pub const MU_EARTH: f64 = G * EARTH_MASS;  // m^3/s^2
pub const MU_MOON: f64 = G * MOON_MASS;    // m^3/s^2

// ---------------------------------------------------------------------------
// Point-mass gravity
// ---------------------------------------------------------------------------

/// Gravitational acceleration toward a single body at the given position.
pub fn point_mass_accel(pos: &Vector2<f64>, body: &CelestialBody) -> Vector2<f64> {
    let r = body.position - pos;
    let d = r.norm();
    if d < 1.0 {
        return Vector2::zeros();
    }
    r * (G * body.mass / (d * d * d))
}

/// Net gravitational acceleration from every body in the set.
pub fn net_accel(pos: &Vector2<f64>, bodies: &BodySet) -> Vector2<f64> {
    bodies
        .iter()
        .fold(Vector2::zeros(), |acc, b| acc + point_mass_accel(pos, b))
}
