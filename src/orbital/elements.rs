use nalgebra::Vector2;

use crate::physics::gravity::MU_EARTH;

/// Planar two-body orbital elements, derived from an instantaneous state
/// relative to the dominant body. Recomputed on demand, never stored.
#[derive(Debug, Clone, Copy)]
pub struct OrbitalElements {
    pub semi_major_axis: f64,   // m (negative on hyperbolic orbits)
    pub eccentricity: f64,
    pub specific_energy: f64,   // J/kg
    pub angular_momentum: f64,  // m^2/s, scalar (z-component)
    pub periapsis: f64,         // m, radius of closest approach
    pub apoapsis: Option<f64>,  // m; None on escape trajectories
}

impl OrbitalElements {
    /// Elements relative to Earth.
    pub fn from_state(pos: &Vector2<f64>, vel: &Vector2<f64>) -> Self {
        Self::from_state_mu(pos, vel, MU_EARTH)
    }

    /// Elements with an explicit gravitational parameter.
    ///
    /// Degenerate inputs never fault: hyperbolic states report
    /// `apoapsis = None`, radial trajectories (zero angular momentum) yield
    /// e = 1 and periapsis 0, and a state at the body center returns zeros.
    pub fn from_state_mu(pos: &Vector2<f64>, vel: &Vector2<f64>, mu: f64) -> Self {
        let r = pos.norm();
        if r < 1.0 {
            return OrbitalElements {
                semi_major_axis: 0.0,
                eccentricity: 0.0,
                specific_energy: 0.0,
                angular_momentum: 0.0,
                periapsis: 0.0,
                apoapsis: None,
            };
        }

        let v2 = vel.norm_squared();
        let energy = 0.5 * v2 - mu / r;
        let h = pos.x * vel.y - pos.y * vel.x;
        let ecc = (1.0 + 2.0 * energy * h * h / (mu * mu)).max(0.0).sqrt();

        let sma = if energy.abs() > 1e-12 {
            -mu / (2.0 * energy)
        } else {
            f64::INFINITY // parabolic
        };

        // Semi-latus rectum form: valid for every conic, including h = 0
        let periapsis = (h * h / mu) / (1.0 + ecc);

        let apoapsis = if energy < 0.0 {
            Some(sma * (1.0 + ecc))
        } else {
            None
        };

        OrbitalElements {
            semi_major_axis: sma,
            eccentricity: ecc,
            specific_energy: energy,
            angular_momentum: h,
            periapsis,
            apoapsis,
        }
    }

    /// Positive specific energy: the vehicle is on an escape trajectory.
    pub fn is_escape(&self) -> bool {
        self.specific_energy >= 0.0
    }

    pub fn apoapsis_altitude(&self, body_radius: f64) -> Option<f64> {
        self.apoapsis.map(|r| r - body_radius)
    }

    pub fn periapsis_altitude(&self, body_radius: f64) -> f64 {
        self.periapsis - body_radius
    }

    /// Orbital period, s. None for open (escape) trajectories.
    pub fn period_mu(&self, mu: f64) -> Option<f64> {
        if self.is_escape() || !self.semi_major_axis.is_finite() {
            return None;
        }
        Some(2.0 * std::f64::consts::PI * (self.semi_major_axis.powi(3) / mu).sqrt())
    }
}
