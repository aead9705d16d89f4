use crate::bodies::BodySet;
use crate::dynamics::state::State;
use crate::dynamics::{self, Deriv};
use crate::vehicle::Rocket;

/// Fourth-order Runge-Kutta step of the vehicle state. Attitude, throttle
/// and the active stage are held constant across the step; celestial bodies
/// are advanced separately by [`BodySet::step`].
pub fn rk4_step(state: &State, rocket: &Rocket, bodies: &BodySet, dt: f64) -> State {
    let k1 = dynamics::derivatives(state, rocket, bodies);
    let k2 = dynamics::derivatives(&state.apply(&k1, dt * 0.5), rocket, bodies);
    let k3 = dynamics::derivatives(&state.apply(&k2, dt * 0.5), rocket, bodies);
    let k4 = dynamics::derivatives(&state.apply(&k3, dt), rocket, bodies);

    let combined = Deriv {
        dpos: (k1.dpos + 2.0 * k2.dpos + 2.0 * k3.dpos + k4.dpos) / 6.0,
        dvel: (k1.dvel + 2.0 * k2.dvel + 2.0 * k3.dvel + k4.dvel) / 6.0,
        dmass: (k1.dmass + 2.0 * k2.dmass + 2.0 * k3.dmass + k4.dmass) / 6.0,
    };
    state.apply(&combined, dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orbital::maneuvers::circular_velocity_mu;
    use crate::physics::gravity::{EARTH_RADIUS, MU_EARTH};
    use crate::vehicle::presets;
    use nalgebra::{Unit, Vector2};

    fn earth_only() -> BodySet {
        let mut bodies = BodySet::earth_moon();
        bodies.moon.mass = 0.0;
        bodies
    }

    fn coasting(pos: Vector2<f64>, vel: Vector2<f64>) -> State {
        State {
            time: 0.0,
            pos,
            vel,
            attitude: Unit::new_unchecked(Vector2::x()),
            throttle: 0.0,
            mass: 5_000.0,
            stage_idx: 3,
        }
    }

    #[test]
    fn circular_orbit_conserves_energy_and_momentum() {
        let bodies = earth_only();
        let rocket = presets::saturn_v();
        let r = EARTH_RADIUS + 400_000.0;
        let v = circular_velocity_mu(r, MU_EARTH);
        let mut state = coasting(Vector2::new(r, 0.0), Vector2::new(0.0, v));

        let energy = |s: &State| 0.5 * s.vel.norm_squared() - MU_EARTH / s.pos.norm();
        let momentum = |s: &State| s.pos.x * s.vel.y - s.pos.y * s.vel.x;
        let (e0, h0) = (energy(&state), momentum(&state));

        // One full orbit at dt = 1 s (period ~5,550 s)
        for _ in 0..6_000 {
            state = rk4_step(&state, &rocket, &bodies, 1.0);
        }
        assert!(
            ((energy(&state) - e0) / e0).abs() < 1e-8,
            "Specific energy drift: {} vs {}",
            energy(&state),
            e0
        );
        assert!(
            ((momentum(&state) - h0) / h0).abs() < 1e-8,
            "Angular momentum drift"
        );
        assert!(
            (state.pos.norm() - r).abs() < 100.0,
            "Circular radius held: {}",
            state.pos.norm()
        );
    }

    #[test]
    fn thrust_depletes_mass_at_flow_rate() {
        let bodies = earth_only();
        let rocket = presets::saturn_v();
        let mut state = State {
            time: 0.0,
            pos: Vector2::new(EARTH_RADIUS, 0.0),
            vel: Vector2::zeros(),
            attitude: Unit::new_unchecked(Vector2::x()),
            throttle: 1.0,
            mass: rocket.total_mass(),
            stage_idx: 0,
        };
        let flow = rocket.stages[0].mass_flow();
        let m0 = state.mass;
        for _ in 0..100 {
            state = rk4_step(&state, &rocket, &bodies, 0.1);
        }
        let burned = m0 - state.mass;
        assert!(
            (burned - flow * 10.0).abs() < flow * 0.01,
            "10 s full-throttle burn consumed {} kg, expected {}",
            burned,
            flow * 10.0
        );
        assert!((state.time - 10.0).abs() < 1e-9);
    }

    #[test]
    fn hohmann_transfer_to_gso_within_tolerance() {
        use crate::gnc::GSO_ALTITUDE;
        use crate::orbital::{hohmann, OrbitalElements};

        let bodies = earth_only();
        let rocket = presets::saturn_v();
        let r1 = EARTH_RADIUS + 200_000.0;
        let r2 = EARTH_RADIUS + GSO_ALTITUDE;
        let transfer = hohmann(r1, r2);

        // Impulsive first burn at the parking orbit, then coast the half
        // ellipse to apogee
        let v1 = circular_velocity_mu(r1, MU_EARTH);
        let mut state = coasting(Vector2::new(r1, 0.0), Vector2::new(0.0, v1 + transfer.dv1));
        let steps = transfer.transfer_time.round() as usize;
        for _ in 0..steps {
            state = rk4_step(&state, &rocket, &bodies, 1.0);
        }
        assert!(
            (state.pos.norm() - r2).abs() < 50_000.0,
            "Apogee radius off by {:.0} m",
            (state.pos.norm() - r2).abs()
        );

        // Impulsive circularization at apogee
        state.vel += state.vel.normalize() * transfer.dv2;
        let el = OrbitalElements::from_state(&state.pos, &state.vel);
        let apo = el.apoapsis.expect("closed final orbit");
        assert!(
            (apo - r2).abs() < 50_000.0,
            "Final apogee {:.0} km",
            (apo - EARTH_RADIUS) / 1000.0
        );
        assert!(
            (el.periapsis - r2).abs() < 50_000.0,
            "Final perigee {:.0} km",
            (el.periapsis - EARTH_RADIUS) / 1000.0
        );
        assert!(el.eccentricity < 0.01);
    }

    #[test]
    fn step_is_deterministic() {
        let bodies = BodySet::earth_moon();
        let rocket = presets::saturn_v();
        let state = coasting(
            Vector2::new(EARTH_RADIUS + 1.0e6, 2.0e5),
            Vector2::new(-500.0, 7_000.0),
        );
        let a = rk4_step(&state, &rocket, &bodies, 0.1);
        let b = rk4_step(&state, &rocket, &bodies, 0.1);
        assert_eq!(a.pos, b.pos);
        assert_eq!(a.vel, b.vel);
        assert_eq!(a.mass, b.mass);
    }
}
