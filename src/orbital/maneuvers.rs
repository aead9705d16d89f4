use crate::physics::gravity::MU_EARTH;

/// Result of a Hohmann transfer calculation between circular orbits.
#[derive(Debug, Clone, Copy)]
pub struct HohmannTransfer {
    pub dv1: f64,           // m/s, first burn (raise apoapsis)
    pub dv2: f64,           // m/s, second burn (circularize)
    pub total_dv: f64,      // m/s
    pub transfer_time: f64, // s, half the transfer orbit period
    pub r1: f64,            // m, initial orbit radius
    pub r2: f64,            // m, final orbit radius
}

/// Hohmann transfer between two circular orbits around Earth.
/// `r1` and `r2` are orbital radii (not altitudes), in meters.
pub fn hohmann(r1: f64, r2: f64) -> HohmannTransfer {
    hohmann_mu(r1, r2, MU_EARTH)
}

pub fn hohmann_mu(r1: f64, r2: f64, mu: f64) -> HohmannTransfer {
    let a_transfer = (r1 + r2) / 2.0;

    let v_circ1 = (mu / r1).sqrt();
    let v_circ2 = (mu / r2).sqrt();

    let v_transfer_1 = vis_viva(r1, a_transfer, mu);
    let v_transfer_2 = vis_viva(r2, a_transfer, mu);

    let dv1 = (v_transfer_1 - v_circ1).abs();
    let dv2 = (v_circ2 - v_transfer_2).abs();

    let transfer_time = std::f64::consts::PI * (a_transfer.powi(3) / mu).sqrt();

    HohmannTransfer {
        dv1,
        dv2,
        total_dv: dv1 + dv2,
        transfer_time,
        r1,
        r2,
    }
}

/// Vis-viva: orbital speed at radius `r` on an orbit with semi-major axis `a`.
pub fn vis_viva(r: f64, a: f64, mu: f64) -> f64 {
    (mu * (2.0 / r - 1.0 / a)).sqrt()
}

/// Circular orbit velocity at a given radius.
pub fn circular_velocity(r: f64) -> f64 {
    circular_velocity_mu(r, MU_EARTH)
}

pub fn circular_velocity_mu(r: f64, mu: f64) -> f64 {
    (mu / r).sqrt()
}

/// Escape velocity at a given radius.
pub fn escape_velocity_mu(r: f64, mu: f64) -> f64 {
    (2.0 * mu / r).sqrt()
}
