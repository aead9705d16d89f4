use nalgebra::{Rotation2, Unit, Vector2};

use super::event::{EventKind, SimEvent};
use super::integrator::rk4_step;
use crate::bodies::BodySet;
use crate::dynamics::state::{GncCommand, SimConfig, State};
use crate::gnc::{Autopilot, MissionKind, MissionPhase, Telemetry};
use crate::physics::frame::{signed_angle, Frame};
use crate::physics::gravity::EARTH_RADIUS;
use crate::vehicle::{Rocket, PROP_EPSILON};

/// Ticks folded into one `advance_frame` call at maximum warp.
pub const MAX_TIME_WARP: u32 = 1_000;

/// Attitude slew rate limit, rad/s. The vehicle reorients at this rate
/// toward the commanded attitude rather than snapping.
pub const ATTITUDE_SLEW_RATE: f64 = 0.35;

// ---------------------------------------------------------------------------
// Simulation driver
// ---------------------------------------------------------------------------

/// Owns the vehicle, the celestial bodies and the mission clock, and runs
/// the fixed-step pipeline: sense -> guide -> slew -> integrate -> resolve.
pub struct Simulation {
    pub rocket: Rocket,
    pub bodies: BodySet,
    pub state: State,
    pub config: SimConfig,
    pub autopilot: Option<Autopilot>,
    pub frame: Frame,
    pub events: Vec<SimEvent>,
    manual: GncCommand,
    time_warp: u32,
    launched: bool,
    grounded: bool,
}

impl Simulation {
    /// Vehicle on the pad at the Earth's surface, pointing up, mission
    /// sequencer armed (or manual control for [`MissionKind::Manual`]).
    pub fn new(kind: MissionKind, rocket: Rocket, config: SimConfig) -> Self {
        let state = State {
            time: 0.0,
            pos: Vector2::new(EARTH_RADIUS, 0.0),
            vel: Vector2::zeros(),
            attitude: Unit::new_unchecked(Vector2::x()),
            throttle: 0.0,
            mass: rocket.total_mass(),
            stage_idx: 0,
        };
        let manual = GncCommand::ballistic(state.attitude);
        Simulation {
            rocket,
            bodies: BodySet::earth_moon(),
            state,
            config,
            autopilot: Autopilot::for_mission(kind),
            frame: Frame::EarthCentric,
            events: Vec::new(),
            manual,
            time_warp: 1,
            launched: false,
            grounded: true,
        }
    }

    // -- control inputs -----------------------------------------------------

    /// Simulated seconds per wall frame, clamped to `1..=MAX_TIME_WARP`
    /// ticks. Physics fidelity is unchanged; only ticks-per-frame varies.
    pub fn set_time_warp(&mut self, warp: u32) {
        self.time_warp = warp.clamp(1, MAX_TIME_WARP);
    }

    pub fn time_warp(&self) -> u32 {
        self.time_warp
    }

    /// Pilot input for manual missions. Ignored while an autopilot flies.
    pub fn set_manual_command(&mut self, throttle: f64, attitude: Vector2<f64>, separate: bool) {
        self.manual = GncCommand::clamped(throttle, attitude, separate);
    }

    // -- observation --------------------------------------------------------

    pub fn phase(&self) -> MissionPhase {
        self.autopilot
            .as_ref()
            .map(|ap| ap.phase)
            .unwrap_or(MissionPhase::Idle)
    }

    pub fn guidance_message(&self) -> &str {
        self.autopilot
            .as_ref()
            .map(|ap| ap.message.as_str())
            .unwrap_or("Manual control")
    }

    pub fn finished(&self) -> bool {
        self.phase().is_terminal() || self.state.time >= self.config.max_time
    }

    pub fn telemetry(&self) -> Telemetry {
        Telemetry::capture(&self.state, &self.rocket, &self.bodies)
    }

    // -- stepping -----------------------------------------------------------

    /// Advance one render frame: `time_warp` fixed-dt ticks.
    pub fn advance_frame(&mut self) {
        for _ in 0..self.time_warp {
            if self.finished() {
                break;
            }
            self.tick();
        }
    }

    /// One fixed time step of the whole pipeline.
    pub fn tick(&mut self) {
        let dt = self.config.dt;
        let tm = self.telemetry();

        // Guidance: autopilot phase step, or the held manual command
        let (commanded, phase_event) = match &mut self.autopilot {
            Some(ap) => {
                let before = ap.phase;
                let cmd = ap.step(&tm);
                let ev = (ap.phase != before).then(|| EventKind::PhaseChange {
                    from: before.name().to_string(),
                    to: ap.phase.name().to_string(),
                });
                (cmd, ev)
            }
            None => (self.manual, None),
        };
        if let Some(ev) = phase_event {
            self.push_event(ev);
        }
        // A manual separation request is one-shot, not a held input
        self.manual.separate = false;

        // Actuation: throttle is immediate, attitude slews at a bounded rate
        self.state.throttle = commanded.throttle.clamp(0.0, 1.0);
        self.state.attitude = slew(self.state.attitude, commanded.attitude, dt);

        // Integrate the vehicle, then move the Moon the same dt
        self.state = rk4_step(&self.state, &self.rocket, &self.bodies, dt);
        self.bodies.step(dt);

        if let Some(ev) = check_staging(&mut self.state, &self.rocket, commanded.separate) {
            self.push_event(ev);
        }

        self.resolve_collisions();
        self.update_frame();

        if !self.launched && self.state.altitude() > 1.0 {
            self.launched = true;
            self.push_event(EventKind::Liftoff);
        }
    }

    // -- internals ----------------------------------------------------------

    /// Ground the vehicle on whichever surface it penetrated: push it back
    /// to the surface radially and pin it to the body's velocity.
    fn resolve_collisions(&mut self) {
        let mut contact = None;
        for body in self.bodies.iter() {
            let rel = self.state.pos - body.position;
            let d = rel.norm();
            if d < body.radius && d > 1.0 {
                self.state.pos = body.position + rel / d * body.radius;
                self.state.vel = body.velocity;
                contact = Some(body.name.clone());
            }
        }
        match contact {
            Some(body) => {
                if !self.grounded && self.launched {
                    self.push_event(EventKind::Impact { body });
                }
                self.grounded = true;
            }
            None => self.grounded = false,
        }
    }

    /// Relabel the reference frame on SOI crossings, same tick.
    fn update_frame(&mut self) {
        let now = Frame::dominant(&self.state.pos, &self.bodies);
        if now != self.frame {
            let ev = match now {
                Frame::MoonCentric => EventKind::SoiEntry,
                Frame::EarthCentric => EventKind::SoiExit,
            };
            self.frame = now;
            self.push_event(ev);
        }
    }

    fn push_event(&mut self, kind: EventKind) {
        self.events.push(SimEvent {
            time: self.state.time,
            kind,
        });
    }

    pub fn snapshot(&self) -> Snapshot {
        let tm = self.telemetry();
        let stage_name = self
            .rocket
            .stages
            .get(self.state.stage_idx)
            .map(|s| s.name.clone())
            .unwrap_or_default();
        Snapshot {
            time: self.state.time,
            pos: self.state.pos,
            vel: self.state.vel,
            attitude: self.state.attitude.into_inner(),
            throttle: self.state.throttle,
            mass: self.state.mass,
            stage_idx: self.state.stage_idx,
            stage_name,
            phase: self.phase().name().to_string(),
            frame: self.frame.name().to_string(),
            altitude: tm.altitude,
            speed: tm.speed,
            apoapsis_altitude: tm.earth_elements.apoapsis_altitude(EARTH_RADIUS),
            periapsis_altitude: tm.earth_elements.periapsis_altitude(EARTH_RADIUS),
            eccentricity: tm.elements.eccentricity,
            moon_position: self.bodies.moon.position,
            moon_distance: tm.moon_distance,
            status: self.guidance_message().to_string(),
        }
    }
}

/// Staging check after each tick: an exhausted lower stage separates
/// automatically; `separate` forces it. Separation is impulse-free. The
/// mass of the departing stage vanishes from the stack; nothing else
/// changes until the next tick.
pub fn check_staging(state: &mut State, rocket: &Rocket, commanded: bool) -> Option<EventKind> {
    // Final stage (payload) never separates
    if state.stage_idx + 1 >= rocket.stages.len() {
        return None;
    }
    let burnout =
        rocket.remaining_propellant(state.mass, state.stage_idx) <= PROP_EPSILON;
    if !burnout && !commanded {
        return None;
    }
    let from = rocket.stages[state.stage_idx].name.clone();
    state.mass = rocket.upper_mass(state.stage_idx);
    state.stage_idx += 1;
    let to = rocket.stages[state.stage_idx].name.clone();
    Some(EventKind::Staging { from, to })
}

/// Rotate `current` toward `target` at the slew-rate limit.
fn slew(
    current: nalgebra::UnitVector2<f64>,
    target: nalgebra::UnitVector2<f64>,
    dt: f64,
) -> nalgebra::UnitVector2<f64> {
    let err = signed_angle(&current.into_inner(), &target.into_inner());
    let max = ATTITUDE_SLEW_RATE * dt;
    if err.abs() <= max {
        return target;
    }
    let rot = Rotation2::new(max.copysign(err));
    Unit::new_normalize(rot * current.into_inner())
}

/// Immutable view of a tick for display and logging.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub time: f64,
    pub pos: Vector2<f64>,
    pub vel: Vector2<f64>,
    pub attitude: Vector2<f64>,
    pub throttle: f64,
    pub mass: f64,
    pub stage_idx: usize,
    pub stage_name: String,
    pub phase: String,
    pub frame: String,
    pub altitude: f64,
    pub speed: f64,
    pub apoapsis_altitude: Option<f64>,
    pub periapsis_altitude: f64,
    pub eccentricity: f64,
    pub moon_position: Vector2<f64>,
    pub moon_distance: f64,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orbital::maneuvers::circular_velocity_mu;
    use crate::physics::frame::SOI_RADIUS;
    use crate::physics::gravity::MU_EARTH;
    use crate::vehicle::presets;

    fn sim(kind: MissionKind) -> Simulation {
        Simulation::new(kind, presets::saturn_v(), SimConfig::default())
    }

    #[test]
    fn starts_grounded_on_the_pad() {
        let sim = sim(MissionKind::GsoInsertion);
        assert!((sim.state.pos.x - EARTH_RADIUS).abs() < 1e-6);
        assert_eq!(sim.state.mass, sim.rocket.total_mass());
        assert_eq!(sim.phase(), MissionPhase::Idle);
        assert!(sim.events.is_empty());
    }

    #[test]
    fn time_warp_clamps_to_bounds() {
        let mut sim = sim(MissionKind::Manual);
        sim.set_time_warp(0);
        assert_eq!(sim.time_warp(), 1);
        sim.set_time_warp(5_000);
        assert_eq!(sim.time_warp(), MAX_TIME_WARP);
        sim.set_time_warp(40);
        assert_eq!(sim.time_warp(), 40);
    }

    #[test]
    fn manual_command_is_sanitized() {
        let mut sim = sim(MissionKind::Manual);
        sim.set_manual_command(3.0, Vector2::new(0.0, 2.0), false);
        assert_eq!(sim.manual.throttle, 1.0);
        assert!((sim.manual.attitude.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn staging_is_impulse_free() {
        let rocket = presets::saturn_v();
        let mut state = State {
            time: 100.0,
            pos: Vector2::new(EARTH_RADIUS + 60_000.0, 0.0),
            vel: Vector2::new(1_200.0, 800.0),
            attitude: Unit::new_unchecked(Vector2::x()),
            throttle: 1.0,
            // Exactly burnout mass of the first stage
            mass: rocket.stages[0].dry_mass + rocket.upper_mass(0),
            stage_idx: 0,
        };
        let vel = state.vel;
        let ev = check_staging(&mut state, &rocket, false);
        assert!(matches!(ev, Some(EventKind::Staging { .. })));
        assert_eq!(state.stage_idx, 1);
        assert_eq!(state.mass, rocket.upper_mass(0));
        assert_eq!(state.vel, vel, "Separation adds no delta-v");
    }

    #[test]
    fn commanded_separation_with_propellant_left() {
        let rocket = presets::saturn_v();
        let mut state = State {
            time: 50.0,
            pos: Vector2::new(EARTH_RADIUS + 40_000.0, 0.0),
            vel: Vector2::new(900.0, 500.0),
            attitude: Unit::new_unchecked(Vector2::x()),
            throttle: 1.0,
            mass: rocket.total_mass() - 100_000.0,
            stage_idx: 0,
        };
        let ev = check_staging(&mut state, &rocket, true);
        assert!(ev.is_some());
        assert_eq!(state.stage_idx, 1);
    }

    #[test]
    fn payload_stage_never_separates() {
        let rocket = presets::saturn_v();
        let last = rocket.stages.len() - 1;
        let mut state = State {
            time: 0.0,
            pos: Vector2::new(EARTH_RADIUS + 2.0e7, 0.0),
            vel: Vector2::new(0.0, 3_000.0),
            attitude: Unit::new_unchecked(Vector2::x()),
            throttle: 0.0,
            mass: rocket.stages[last].dry_mass,
            stage_idx: last,
        };
        assert!(check_staging(&mut state, &rocket, true).is_none());
        assert_eq!(state.stage_idx, last);
    }

    #[test]
    fn ascent_reaches_gravity_turn_and_stages() {
        let mut sim = sim(MissionKind::GsoInsertion);
        sim.set_time_warp(MAX_TIME_WARP);
        // ~300 s of flight: through pitchover and first staging
        for _ in 0..3 {
            sim.advance_frame();
        }
        assert!(sim.state.altitude() > 2_000.0, "Cleared pitchover altitude");
        assert!(
            sim.events
                .iter()
                .any(|e| matches!(e.kind, EventKind::Liftoff)),
            "Liftoff recorded"
        );
        assert!(
            sim.events
                .iter()
                .any(|e| matches!(e.kind, EventKind::Staging { .. })),
            "First stage separated within 300 s"
        );
        assert!(
            sim.events
                .iter()
                .any(|e| matches!(&e.kind, EventKind::PhaseChange { to, .. } if to == "GRAVITY TURN")),
            "Pitchover handover logged"
        );
        assert!(sim.state.vel.norm() > 500.0);
    }

    #[test]
    fn manual_separation_fires_once() {
        let mut sim = sim(MissionKind::Manual);
        sim.launched = true;
        sim.grounded = false;
        // Coasting on the full stack, well clear of the ground
        sim.state.pos = Vector2::new(EARTH_RADIUS + 200_000.0, 0.0);
        sim.state.vel = Vector2::new(0.0, 7_800.0);
        sim.set_manual_command(0.0, Vector2::y(), true);
        for _ in 0..5 {
            sim.tick();
        }
        let stagings = sim
            .events
            .iter()
            .filter(|e| matches!(e.kind, EventKind::Staging { .. }))
            .count();
        assert_eq!(stagings, 1, "One request, one separation");
        assert_eq!(sim.state.stage_idx, 1);
    }

    #[test]
    fn gso_mission_flies_to_completion() {
        let config = SimConfig {
            dt: 0.5,
            max_time: 1_500_000.0,
        };
        let mut sim = Simulation::new(MissionKind::GsoInsertion, presets::saturn_v(), config);
        sim.set_time_warp(MAX_TIME_WARP);
        while !sim.finished() {
            sim.advance_frame();
        }
        assert_eq!(sim.phase(), MissionPhase::Complete, "{}", sim.guidance_message());
        let tm = sim.telemetry();
        assert!(
            tm.earth_elements.eccentricity < 0.05,
            "Near-circular final orbit, e = {}",
            tm.earth_elements.eccentricity
        );
        assert!(
            (tm.altitude - crate::gnc::GSO_ALTITUDE).abs() < 5.0e6,
            "GSO altitude reached, got {} km",
            tm.altitude / 1_000.0
        );
    }

    #[test]
    fn lunar_mission_flies_to_completion() {
        let config = SimConfig {
            dt: 0.5,
            max_time: 1_500_000.0,
        };
        let mut sim = Simulation::new(MissionKind::LunarMission, presets::saturn_v(), config);
        sim.set_time_warp(MAX_TIME_WARP);
        while !sim.finished() {
            sim.advance_frame();
        }
        assert_eq!(sim.phase(), MissionPhase::Complete, "{}", sim.guidance_message());
        assert_eq!(sim.frame, Frame::MoonCentric);
        let tm = sim.telemetry();
        assert!(tm.moon_distance < SOI_RADIUS, "Captured inside the SOI");
        assert!(
            !tm.elements.is_escape(),
            "Bound lunar orbit, e = {}",
            tm.elements.eccentricity
        );
    }

    #[test]
    fn exhausted_ascent_aborts_and_coasts_ballistic() {
        let mut sim = sim(MissionKind::GsoInsertion);
        sim.launched = true;
        sim.grounded = false;
        // Dry payload mid-ascent with the sequencer still expecting thrust
        let last = sim.rocket.stages.len() - 1;
        sim.state.pos = Vector2::new(EARTH_RADIUS + 120_000.0, 0.0);
        sim.state.vel = Vector2::new(800.0, 2_500.0);
        sim.state.stage_idx = last;
        sim.state.mass = sim.rocket.stages[last].dry_mass;
        sim.autopilot.as_mut().unwrap().phase = MissionPhase::GravityTurn;

        sim.tick();
        assert_eq!(sim.phase(), MissionPhase::Aborted);
        assert!(sim.finished());

        // The vehicle keeps propagating unpowered; nothing halts the physics
        let mass = sim.state.mass;
        let time = sim.state.time;
        for _ in 0..100 {
            sim.tick();
        }
        assert!(sim.state.time > time + 5.0);
        assert_eq!(sim.state.mass, mass, "No thrust after abort");
        assert_eq!(sim.state.throttle, 0.0);
    }

    #[test]
    fn slew_limits_attitude_rate() {
        let up = Unit::new_unchecked(Vector2::<f64>::x());
        let side = Unit::new_unchecked(Vector2::<f64>::y());
        let moved = slew(up, side, 0.1);
        let turned = signed_angle(&up.into_inner(), &moved.into_inner());
        assert!(
            (turned - ATTITUDE_SLEW_RATE * 0.1).abs() < 1e-9,
            "Turned {} rad in one tick",
            turned
        );
        // Small errors finish in one step
        let near = Unit::new_normalize(Vector2::new(1.0, 0.01));
        let done = slew(up, near, 0.1);
        assert!((done.into_inner() - near.into_inner()).norm() < 1e-12);
    }

    #[test]
    fn soi_crossing_relabels_frame_and_logs() {
        let mut sim = sim(MissionKind::Manual);
        sim.launched = true;
        sim.grounded = false;
        // Park the vehicle just outside the SOI on the Earth-Moon line,
        // drifting inward faster than the boundary moves
        let inward = (sim.bodies.moon.position - Vector2::new(SOI_RADIUS + 50.0, 0.0)).normalize();
        sim.state.pos = sim.bodies.moon.position - Vector2::new(SOI_RADIUS + 50.0, 0.0);
        sim.state.vel = sim.bodies.moon.velocity + inward * 1_000.0;
        sim.state.stage_idx = 3;
        sim.state.mass = 5_000.0;

        assert_eq!(sim.frame, Frame::EarthCentric);
        for _ in 0..10 {
            sim.tick();
        }
        assert_eq!(sim.frame, Frame::MoonCentric);
        assert!(
            sim.events
                .iter()
                .any(|e| matches!(e.kind, EventKind::SoiEntry)),
            "SOI entry logged"
        );

        // Reverse the drift: exit logs too
        sim.state.vel = sim.bodies.moon.velocity - inward * 3_000.0;
        for _ in 0..300 {
            sim.tick();
        }
        assert_eq!(sim.frame, Frame::EarthCentric);
        assert!(
            sim.events
                .iter()
                .any(|e| matches!(e.kind, EventKind::SoiExit)),
            "SOI exit logged"
        );
    }

    #[test]
    fn impact_grounds_the_vehicle_once() {
        let mut sim = sim(MissionKind::Manual);
        sim.launched = true;
        sim.grounded = false;
        // Falling straight down from just above the surface
        sim.state.pos = Vector2::new(EARTH_RADIUS + 50.0, 0.0);
        sim.state.vel = Vector2::new(-200.0, 0.0);
        sim.state.stage_idx = 3;
        sim.state.mass = 5_000.0;
        for _ in 0..20 {
            sim.tick();
        }
        let impacts = sim
            .events
            .iter()
            .filter(|e| matches!(e.kind, EventKind::Impact { .. }))
            .count();
        assert_eq!(impacts, 1, "One impact event, then grounded");
        assert!((sim.state.pos.norm() - EARTH_RADIUS).abs() < 1e-6);
        assert_eq!(sim.state.vel, Vector2::zeros());
    }

    #[test]
    fn circular_orbit_snapshot_reports_elements() {
        let mut sim = sim(MissionKind::Manual);
        sim.launched = true;
        sim.grounded = false;
        let r = EARTH_RADIUS + 400_000.0;
        sim.state.pos = Vector2::new(r, 0.0);
        sim.state.vel = Vector2::new(0.0, circular_velocity_mu(r, MU_EARTH));
        sim.state.stage_idx = 3;
        sim.state.mass = 5_000.0;
        let snap = sim.snapshot();
        assert!(snap.eccentricity < 0.01);
        assert!((snap.periapsis_altitude - 400_000.0).abs() < 5_000.0);
        let apo = snap.apoapsis_altitude.unwrap();
        assert!((apo - 400_000.0).abs() < 5_000.0);
    }
}
