use nalgebra::Vector2;

use crate::physics::gravity::{
    EARTH_MASS, EARTH_RADIUS, G, MOON_DISTANCE, MOON_MASS, MOON_RADIUS, MOON_VELOCITY,
};

// ---------------------------------------------------------------------------
// Celestial bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CelestialBody {
    pub name: String,
    pub mass: f64,               // kg
    pub radius: f64,             // m
    pub position: Vector2<f64>,  // m, Earth-centric inertial
    pub velocity: Vector2<f64>,  // m/s
    pub fixed: bool,             // anchored at its position (Earth)
}

impl CelestialBody {
    pub fn mu(&self) -> f64 {
        G * self.mass
    }

    pub fn surface_distance(&self, pos: &Vector2<f64>) -> f64 {
        (pos - self.position).norm() - self.radius
    }
}

// ---------------------------------------------------------------------------
// Body set: Earth fixed at the origin, Moon in orbit around it
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct BodySet {
    pub earth: CelestialBody,
    pub moon: CelestialBody,
}

impl BodySet {
    pub fn earth_moon() -> Self {
        BodySet {
            earth: CelestialBody {
                name: "Earth".into(),
                mass: EARTH_MASS,
                radius: EARTH_RADIUS,
                position: Vector2::zeros(),
                velocity: Vector2::zeros(),
                fixed: true,
            },
            moon: CelestialBody {
                name: "Moon".into(),
                mass: MOON_MASS,
                radius: MOON_RADIUS,
                position: Vector2::new(MOON_DISTANCE, 0.0),
                velocity: Vector2::new(0.0, MOON_VELOCITY),
                fixed: false,
            },
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CelestialBody> {
        [&self.earth, &self.moon].into_iter()
    }

    /// Advance the Moon one timestep around the fixed Earth (RK4 two-body).
    ///
    /// Used identically by the live tick loop and the trajectory predictor's
    /// ghost copy, so predicted and authoritative Moon positions agree.
    pub fn step(&mut self, dt: f64) {
        if self.moon.fixed {
            return;
        }
        let center = self.earth.position;
        let mu = self.earth.mu();
        let acc = |p: &Vector2<f64>| -> Vector2<f64> {
            let r = center - p;
            let d = r.norm();
            r * (mu / (d * d * d))
        };

        let p0 = self.moon.position;
        let v0 = self.moon.velocity;

        let a1 = acc(&p0);
        let a2 = acc(&(p0 + v0 * (dt * 0.5)));
        let v2 = v0 + a1 * (dt * 0.5);
        let a3 = acc(&(p0 + v2 * (dt * 0.5)));
        let v3 = v0 + a2 * (dt * 0.5);
        let a4 = acc(&(p0 + v3 * dt));
        let v4 = v0 + a3 * dt;

        self.moon.position = p0 + (v0 + 2.0 * v2 + 2.0 * v3 + v4) * (dt / 6.0);
        self.moon.velocity = v0 + (a1 + 2.0 * a2 + 2.0 * a3 + a4) * (dt / 6.0);
    }
}
