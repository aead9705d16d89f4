use std::f64::consts::FRAC_PI_2;

use nalgebra::{Unit, UnitVector2};

use super::phase::MissionPhase;
use super::telemetry::Telemetry;
use crate::dynamics::state::GncCommand;
use crate::orbital::maneuvers::circular_velocity_mu;
use crate::physics::frame::{Frame, SOI_RADIUS};
use crate::physics::gravity::{EARTH_RADIUS, MU_EARTH, MU_MOON};
use crate::vehicle::StagingState;

/// Geostationary altitude above the Earth's surface, m.
pub const GSO_ALTITUDE: f64 = 35_786_000.0;

// ---------------------------------------------------------------------------
// Mission selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionKind {
    Manual,
    GsoInsertion,
    LunarMission,
}

impl MissionKind {
    pub fn name(&self) -> &'static str {
        match self {
            MissionKind::Manual => "Manual",
            MissionKind::GsoInsertion => "GSO Insertion",
            MissionKind::LunarMission => "Lunar Mission",
        }
    }
}

// ---------------------------------------------------------------------------
// Autopilot tuning
// ---------------------------------------------------------------------------

/// Tunable guidance parameters. Targets stated in the mission profile
/// (GSO altitude, SOI radius) are contracts; the rest are tuning knobs.
#[derive(Debug, Clone)]
pub struct AutopilotConfig {
    /// Predicted-apogee target that ends the gravity turn, m altitude.
    pub ascent_target_altitude: f64,
    /// Altitude band of the linear pitchover program, m.
    pub pitch_start_altitude: f64,
    pub pitch_end_altitude: f64,
    /// |radial velocity| below this counts as "at apogee", m/s.
    pub apogee_radial_cutoff: f64,
    /// Radial velocity below this means falling; burn now, m/s (negative).
    pub falling_radial_cutoff: f64,
    /// Throttle = delta-v / gain during closed-loop burns.
    pub burn_gain: f64,
    pub min_burn_throttle: f64,
    /// Eccentricity below which the orbit counts as circularized.
    pub complete_eccentricity: f64,
    /// Parking orbit is accepted once perigee altitude exceeds this, m.
    pub park_periapsis_floor: f64,
    /// Emergency station-keeping threshold, m altitude.
    pub station_keep_floor: f64,
    /// Vehicle->Moon phase-angle window that opens the TLI burn, degrees.
    pub phase_window_deg: (f64, f64),
    /// Predicted apogee altitude that ends the TLI burn, m.
    pub tli_apogee_target: f64,
    /// Moon distance that starts the capture burn, m.
    pub capture_trigger_distance: f64,
}

impl AutopilotConfig {
    pub fn gso() -> Self {
        AutopilotConfig {
            ascent_target_altitude: GSO_ALTITUDE,
            pitch_start_altitude: 2_000.0,
            pitch_end_altitude: 82_000.0,
            apogee_radial_cutoff: 10.0,
            falling_radial_cutoff: -50.0,
            burn_gain: 100.0,
            min_burn_throttle: 0.1,
            complete_eccentricity: 0.02,
            park_periapsis_floor: 200_000.0,
            station_keep_floor: 180_000.0,
            phase_window_deg: (108.0, 112.0),
            tli_apogee_target: 3.75e8,
            capture_trigger_distance: 5.0e6,
        }
    }

    pub fn lunar() -> Self {
        AutopilotConfig {
            ascent_target_altitude: 250_000.0,
            falling_radial_cutoff: -20.0,
            burn_gain: 50.0,
            ..Self::gso()
        }
    }
}

// ---------------------------------------------------------------------------
// Autopilot: mission-phase FSM
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Autopilot {
    pub kind: MissionKind,
    pub phase: MissionPhase,
    pub config: AutopilotConfig,
    /// Human-readable status line for the UI, refreshed every tick.
    pub message: String,
}

impl Autopilot {
    /// Build the flight computer for a mission, or None for manual control.
    pub fn for_mission(kind: MissionKind) -> Option<Self> {
        let config = match kind {
            MissionKind::Manual => return None,
            MissionKind::GsoInsertion => AutopilotConfig::gso(),
            MissionKind::LunarMission => AutopilotConfig::lunar(),
        };
        Some(Autopilot {
            kind,
            phase: MissionPhase::Idle,
            config,
            message: "Auto-sequence start".into(),
        })
    }

    /// Evaluate one guidance tick: possibly advance the phase, and emit the
    /// control command for the next integration step.
    pub fn step(&mut self, tm: &Telemetry) -> GncCommand {
        let (next, cmd, message) = transition(self.kind, self.phase, &self.config, tm);
        self.phase = next;
        self.message = message;
        cmd
    }
}

/// Pure phase-transition function: `(phase, derived state) -> (next phase,
/// command)`. All mission sequencing lives here so it can be tested without
/// an integrator in the loop.
pub fn transition(
    kind: MissionKind,
    phase: MissionPhase,
    cfg: &AutopilotConfig,
    tm: &Telemetry,
) -> (MissionPhase, GncCommand, String) {
    let (next, cmd, message) = transition_inner(kind, phase, cfg, tm);

    // Propellant exhaustion before the mission is done is an abort, not a
    // fault: the vehicle keeps flying ballistically.
    if !next.is_terminal() && tm.propulsion == StagingState::Exhausted {
        return (
            MissionPhase::Aborted,
            GncCommand::ballistic(cmd.attitude),
            "Propellant exhausted - mission abort".into(),
        );
    }
    (next, cmd, message)
}

fn transition_inner(
    kind: MissionKind,
    phase: MissionPhase,
    cfg: &AutopilotConfig,
    tm: &Telemetry,
) -> (MissionPhase, GncCommand, String) {
    match phase {
        MissionPhase::Idle => (
            MissionPhase::Launch,
            GncCommand::ballistic(tm.radial),
            "Auto-sequence start".into(),
        ),

        MissionPhase::Launch => {
            let cmd = GncCommand::burn(1.0, tm.radial);
            if tm.altitude > cfg.pitch_start_altitude {
                (MissionPhase::GravityTurn, cmd, "Pitchover".into())
            } else {
                (MissionPhase::Launch, cmd, "Liftoff".into())
            }
        }

        MissionPhase::GravityTurn => {
            let (attitude, prog) = pitch_program(cfg, tm);
            let cmd = GncCommand::burn(1.0, attitude);
            // Undefined apogee (escape) cannot satisfy the target yet
            let reached = tm
                .earth_elements
                .apoapsis_altitude(EARTH_RADIUS)
                .is_some_and(|apo| apo >= cfg.ascent_target_altitude);
            if reached {
                let next = match kind {
                    MissionKind::LunarMission => MissionPhase::ParkingOrbit,
                    _ => MissionPhase::Coast,
                };
                (next, GncCommand::ballistic(attitude), "Target apogee set - MECO".into())
            } else {
                let msg = format!("Gravity turn: {:.0}%", prog * 100.0);
                (MissionPhase::GravityTurn, cmd, msg)
            }
        }

        MissionPhase::Coast => {
            let cmd = GncCommand::ballistic(tm.prograde);
            if tm.radial_velocity.abs() < cfg.apogee_radial_cutoff
                || tm.radial_velocity < cfg.falling_radial_cutoff
            {
                (MissionPhase::Circularize, cmd, "Apogee - circularization".into())
            } else {
                let msg = format!("Coasting to apogee (v-rad {:.0} m/s)", tm.radial_velocity);
                (MissionPhase::Coast, cmd, msg)
            }
        }

        MissionPhase::Circularize => {
            let (cmd, _) = circularize_burn(tm, cfg);
            if tm.earth_elements.eccentricity < cfg.complete_eccentricity
                || tm.earth_elements.is_escape()
            {
                (
                    MissionPhase::Complete,
                    GncCommand::ballistic(tm.prograde),
                    "GSO stable".into(),
                )
            } else {
                let msg = format!("Circularizing (e={:.3})", tm.earth_elements.eccentricity);
                (MissionPhase::Circularize, cmd, msg)
            }
        }

        MissionPhase::ParkingOrbit => parking_orbit(cfg, tm),

        MissionPhase::TliBurn => {
            let cmd = GncCommand::burn(1.0, tm.prograde);
            // Safety cutoff: reaching escape energy ends the burn at once
            let done = tm.earth_elements.is_escape()
                || tm
                    .earth_elements
                    .apoapsis_altitude(EARTH_RADIUS)
                    .is_some_and(|apo| apo > cfg.tli_apogee_target);
            if done {
                (
                    MissionPhase::LunarCoast,
                    GncCommand::ballistic(tm.prograde),
                    "TLI complete".into(),
                )
            } else {
                (MissionPhase::TliBurn, cmd, "Trans-lunar injection burn".into())
            }
        }

        MissionPhase::LunarCoast => {
            let cmd = GncCommand::ballistic(tm.prograde);
            if tm.moon_distance < SOI_RADIUS {
                (MissionPhase::SoiTransition, cmd, "Entering lunar SOI".into())
            } else {
                let msg = format!("To the Moon ({:.0} km)", tm.moon_distance / 1000.0);
                (MissionPhase::LunarCoast, cmd, msg)
            }
        }

        MissionPhase::SoiTransition => {
            // Frame is already Moon-centric (SOI check); align retrograde
            // for the upcoming capture burn while falling toward perilune.
            let cmd = GncCommand::ballistic(tm.moon_retrograde);
            if tm.moon_distance < cfg.capture_trigger_distance || tm.moon_radial_velocity > 0.0 {
                (MissionPhase::CaptureBurn, cmd, "Capture burn ignition".into())
            } else {
                let msg = format!("Approaching perilune ({:.0} km)", tm.moon_distance / 1000.0);
                (MissionPhase::SoiTransition, cmd, msg)
            }
        }

        MissionPhase::CaptureBurn => {
            let v_circ = circular_velocity_mu(tm.moon_distance, MU_MOON);
            if tm.moon_rel_speed > v_circ {
                let dv = tm.moon_rel_speed - v_circ;
                let throttle = (dv / cfg.burn_gain).clamp(cfg.min_burn_throttle, 1.0);
                let msg = format!("Lunar orbit insertion (dv {:.0} m/s)", dv);
                (
                    MissionPhase::CaptureBurn,
                    GncCommand::burn(throttle, tm.moon_retrograde),
                    msg,
                )
            } else {
                (
                    MissionPhase::Complete,
                    GncCommand::ballistic(tm.moon_prograde),
                    "Low lunar orbit achieved".into(),
                )
            }
        }

        MissionPhase::Complete => {
            let attitude = match tm.frame {
                Frame::EarthCentric => tm.prograde,
                Frame::MoonCentric => tm.moon_prograde,
            };
            (
                MissionPhase::Complete,
                GncCommand::ballistic(attitude),
                "Mission complete".into(),
            )
        }

        MissionPhase::Aborted => (
            MissionPhase::Aborted,
            GncCommand::ballistic(tm.prograde),
            "Mission aborted".into(),
        ),
    }
}

// ---------------------------------------------------------------------------
// Phase control laws
// ---------------------------------------------------------------------------

/// Gravity-turn pitch program: blend attitude linearly from radial (up) to
/// prograde (horizontal) across the pitchover altitude band.
fn pitch_program(cfg: &AutopilotConfig, tm: &Telemetry) -> (UnitVector2<f64>, f64) {
    let span = cfg.pitch_end_altitude - cfg.pitch_start_altitude;
    let prog = ((tm.altitude - cfg.pitch_start_altitude) / span).clamp(0.0, 1.0);
    let angle = prog * FRAC_PI_2;
    let dir = tm.radial.into_inner() * angle.cos() + tm.prograde.into_inner() * angle.sin();
    (Unit::new_normalize(dir), prog)
}

/// Closed-loop circularization: vis-viva delta-v to circular speed at the
/// current radius, throttled proportionally.
fn circularize_burn(tm: &Telemetry, cfg: &AutopilotConfig) -> (GncCommand, f64) {
    let v_target = circular_velocity_mu(tm.radius, MU_EARTH);
    let dv = v_target - tm.speed;
    if dv > 0.0 {
        let throttle = (dv / cfg.burn_gain).clamp(cfg.min_burn_throttle, 1.0);
        (GncCommand::burn(throttle, tm.prograde), dv)
    } else {
        (GncCommand::ballistic(tm.prograde), dv)
    }
}

/// Parking-orbit hold: circularize at low orbit, keep station, then wait
/// for the transfer phase-angle window to open.
fn parking_orbit(
    cfg: &AutopilotConfig,
    tm: &Telemetry,
) -> (MissionPhase, GncCommand, String) {
    // Decaying below the floor: full prograde burn, no questions. The
    // climbing insertion coast also passes under the floor with its apogee
    // already set; only a descending vehicle is actually in trouble.
    if tm.altitude < cfg.station_keep_floor && tm.radial_velocity < 0.0 {
        return (
            MissionPhase::ParkingOrbit,
            GncCommand::burn(1.0, tm.prograde),
            "ALTITUDE WARNING - station keeping".into(),
        );
    }

    let peri_alt = tm.earth_elements.periapsis_altitude(EARTH_RADIUS);
    if peri_alt < cfg.park_periapsis_floor {
        // Not circular yet: coast to apogee, then raise the perigee
        let at_apogee = tm.radial_velocity.abs() < cfg.apogee_radial_cutoff
            || tm.radial_velocity < cfg.falling_radial_cutoff;
        if at_apogee {
            let (mut cmd, _) = circularize_burn(tm, cfg);
            if tm.radial_velocity < -10.0 {
                // Pitch up slightly to arrest the descent
                let dir = tm.prograde.into_inner() * (5.0_f64).to_radians().cos()
                    + tm.radial.into_inner() * (5.0_f64).to_radians().sin();
                cmd.attitude = Unit::new_normalize(dir);
            }
            let msg = format!("Parking burn (perigee {:.0} km)", peri_alt / 1000.0);
            (MissionPhase::ParkingOrbit, cmd, msg)
        } else {
            let msg = format!("Coasting to apogee (perigee {:.0} km)", peri_alt / 1000.0);
            (
                MissionPhase::ParkingOrbit,
                GncCommand::ballistic(tm.prograde),
                msg,
            )
        }
    } else {
        // Orbit accepted: wait for the Moon
        let deg = tm.phase_angle.to_degrees();
        let (lo, hi) = cfg.phase_window_deg;
        if deg > lo && deg < hi {
            (
                MissionPhase::TliBurn,
                GncCommand::burn(1.0, tm.prograde),
                "Transfer window open - TLI".into(),
            )
        } else {
            let msg = format!("Waiting for Moon (phase {:.0} deg, window {:.0}-{:.0})", deg, lo, hi);
            (
                MissionPhase::ParkingOrbit,
                GncCommand::ballistic(tm.prograde),
                msg,
            )
        }
    }
}
