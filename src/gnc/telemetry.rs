use nalgebra::{Unit, UnitVector2, Vector2};

use crate::bodies::BodySet;
use crate::dynamics::state::State;
use crate::orbital::OrbitalElements;
use crate::physics::frame::{perp, Frame, RelativeState};
use crate::physics::gravity::{EARTH_RADIUS, MU_EARTH, MU_MOON};
use crate::vehicle::{Rocket, StagingState};

/// Derived flight state consumed by the guidance FSM every tick.
///
/// Everything here is recomputed from the authoritative state; nothing is
/// cached across ticks.
#[derive(Debug, Clone)]
pub struct Telemetry {
    pub time: f64,
    pub frame: Frame,

    // Earth-relative
    pub radius: f64,
    pub altitude: f64,
    pub speed: f64,
    pub radial_velocity: f64,
    pub radial: UnitVector2<f64>,   // local up
    pub prograde: UnitVector2<f64>, // local horizontal, launch (CCW) direction
    pub earth_elements: OrbitalElements,

    /// Elements relative to whichever body currently dominates (SOI check).
    pub elements: OrbitalElements,

    // Moon-relative
    pub moon_distance: f64,
    pub moon_rel_speed: f64,
    pub moon_radial_velocity: f64,
    pub moon_prograde: UnitVector2<f64>,
    pub moon_retrograde: UnitVector2<f64>,

    /// Angle from the vehicle to the Moon around Earth, rad in [0, 2pi).
    pub phase_angle: f64,

    pub propulsion: StagingState,
}

impl Telemetry {
    pub fn capture(state: &State, rocket: &Rocket, bodies: &BodySet) -> Self {
        let frame = Frame::dominant(&state.pos, bodies);
        let earth_rel = RelativeState::of(&state.pos, &state.vel, Frame::EarthCentric, bodies);
        let moon_rel = RelativeState::of(&state.pos, &state.vel, Frame::MoonCentric, bodies);

        let radius = earth_rel.radius();
        let radial = if radius > 1.0 {
            Unit::new_normalize(earth_rel.pos)
        } else {
            Unit::new_unchecked(Vector2::x())
        };
        let prograde = Unit::new_normalize(perp(&radial));

        let moon_rel_speed = moon_rel.speed();
        let moon_prograde = if moon_rel_speed > 1e-9 {
            Unit::new_normalize(moon_rel.vel)
        } else {
            prograde
        };
        let moon_retrograde = Unit::new_unchecked(-moon_prograde.into_inner());

        let earth_elements = OrbitalElements::from_state_mu(&earth_rel.pos, &earth_rel.vel, MU_EARTH);
        let elements = match frame {
            Frame::EarthCentric => earth_elements,
            Frame::MoonCentric => {
                OrbitalElements::from_state_mu(&moon_rel.pos, &moon_rel.vel, MU_MOON)
            }
        };

        let theta_vehicle = state.pos.y.atan2(state.pos.x);
        let theta_moon = bodies.moon.position.y.atan2(bodies.moon.position.x);
        let phase_angle = (theta_moon - theta_vehicle).rem_euclid(std::f64::consts::TAU);

        Telemetry {
            time: state.time,
            frame,
            radius,
            altitude: radius - EARTH_RADIUS,
            speed: earth_rel.speed(),
            radial_velocity: earth_rel.radial_velocity(),
            radial,
            prograde,
            earth_elements,
            elements,
            moon_distance: moon_rel.radius(),
            moon_rel_speed,
            moon_radial_velocity: moon_rel.radial_velocity(),
            moon_prograde,
            moon_retrograde,
            phase_angle,
            propulsion: rocket.propulsion(state.mass, state.stage_idx),
        }
    }
}
