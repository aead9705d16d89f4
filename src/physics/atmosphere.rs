// ---------------------------------------------------------------------------
// Layered exponential atmosphere (sea level to 140 km)
// ---------------------------------------------------------------------------

/// Altitude above which the atmosphere is treated as hard vacuum, m.
pub const ATMOSPHERE_TOP: f64 = 140_000.0;

pub const SEA_LEVEL_DENSITY: f64 = 1.225; // kg/m^3

// Scale heights per layer, m
const H_TROPO: f64 = 8_440.0;
const H_STRATO: f64 = 6_350.0;
const H_THERMO: f64 = 5_000.0;

// Layer base altitudes, m
const STRATO_BASE: f64 = 25_000.0;
const THERMO_BASE: f64 = 90_000.0;

/// Air density at a given altitude.
///
/// Three exponential layers with matched base densities, so the profile is
/// continuous and strictly decreasing. Negative altitudes clamp to sea
/// level; anything at or above `ATMOSPHERE_TOP` is exactly zero.
pub fn density(altitude_m: f64) -> f64 {
    if altitude_m >= ATMOSPHERE_TOP {
        return 0.0;
    }
    let h = altitude_m.max(0.0);

    let rho_strato = SEA_LEVEL_DENSITY * (-STRATO_BASE / H_TROPO).exp();
    let rho_thermo = rho_strato * (-(THERMO_BASE - STRATO_BASE) / H_STRATO).exp();

    if h < STRATO_BASE {
        SEA_LEVEL_DENSITY * (-h / H_TROPO).exp()
    } else if h < THERMO_BASE {
        rho_strato * (-(h - STRATO_BASE) / H_STRATO).exp()
    } else {
        rho_thermo * (-(h - THERMO_BASE) / H_THERMO).exp()
    }
}
