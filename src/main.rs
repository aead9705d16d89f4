use std::env;
use std::process::ExitCode;

use cislunar_sim::gnc::{MissionKind, GSO_ALTITUDE};
use cislunar_sim::io::{self, MissionSummary};
use cislunar_sim::sim::{Simulation, MAX_TIME_WARP};
use cislunar_sim::types::SimConfig;
use cislunar_sim::vehicle::presets;

/// Snapshot logging interval, simulated seconds.
const LOG_INTERVAL: f64 = 60.0;
/// Console status interval, simulated seconds.
const STATUS_INTERVAL: f64 = 600.0;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let kind = match args.get(1).map(String::as_str) {
        Some("gso") | None => MissionKind::GsoInsertion,
        Some("lunar") => MissionKind::LunarMission,
        Some("manual") => MissionKind::Manual,
        Some(other) => {
            eprintln!("Unknown mission '{}'. Usage: cislunar-sim [gso|lunar|manual] [trajectory.csv]", other);
            return ExitCode::FAILURE;
        }
    };
    let csv_path = args.get(2).cloned();

    let rocket = presets::saturn_v();
    let mut sim = Simulation::new(kind, rocket, SimConfig::default());

    // -----------------------------------------------------------------------
    // Vehicle and mission
    // -----------------------------------------------------------------------
    println!();
    println!("====================================================================");
    println!("  CISLUNAR FLIGHT SIMULATION — {}", kind.name());
    println!("====================================================================");
    println!();
    println!("  Vehicle: {}", sim.rocket.name);
    println!("  ──────────────────────────────────────────────────────────────────");
    for (i, stage) in sim.rocket.stages.iter().enumerate() {
        println!(
            "  [{}] {:<10} dry {:>8.0} kg   prop {:>8.0} kg   thrust {:>10.0} N   Isp {:>4.0} s",
            i, stage.name, stage.dry_mass, stage.propellant_mass, stage.thrust, stage.isp
        );
    }
    println!(
        "  Total mass:    {:>10.0} kg   Ideal delta-v: {:>7.0} m/s",
        sim.rocket.total_mass(),
        sim.rocket.total_delta_v()
    );
    match kind {
        MissionKind::GsoInsertion => {
            println!("  Target:        circular orbit at {:.0} km altitude", GSO_ALTITUDE / 1000.0)
        }
        MissionKind::LunarMission => println!("  Target:        low lunar orbit"),
        MissionKind::Manual => println!("  Target:        none (manual control, ballistic demo)"),
    }
    println!();

    if kind == MissionKind::Manual {
        // No interactive input in a console run: hold the pad and exit
        println!("  Manual mode has no scripted mission; vehicle remains on the pad.");
        println!("  Drive `Simulation::set_manual_command` from an embedding UI instead.");
        return ExitCode::SUCCESS;
    }

    // -----------------------------------------------------------------------
    // Run mission
    // -----------------------------------------------------------------------
    println!("  Flight Log");
    println!("  ──────────────────────────────────────────────────────────────────");

    sim.set_time_warp(MAX_TIME_WARP);
    let mut snapshots = vec![sim.snapshot()];
    let mut printed_events = 0;
    let mut next_log = LOG_INTERVAL;
    let mut next_status = STATUS_INTERVAL;

    while !sim.finished() {
        sim.advance_frame();

        for ev in &sim.events[printed_events..] {
            println!("  {}", ev.describe());
        }
        printed_events = sim.events.len();

        if sim.state.time >= next_log {
            snapshots.push(sim.snapshot());
            next_log = sim.state.time + LOG_INTERVAL;
        }
        if sim.state.time >= next_status {
            let s = sim.snapshot();
            println!(
                "  T+{:9.0} s  {:<14} alt {:>9.0} km  vel {:>7.0} m/s  {}",
                s.time,
                s.phase,
                s.altitude / 1000.0,
                s.speed,
                s.status
            );
            next_status = sim.state.time + STATUS_INTERVAL;
        }
    }
    snapshots.push(sim.snapshot());

    // -----------------------------------------------------------------------
    // Summary
    // -----------------------------------------------------------------------
    let summary = MissionSummary::from_snapshots(&snapshots, &sim.events);
    let last = sim.snapshot();
    println!();
    println!("  Mission Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  Outcome:        {}", last.phase);
    println!("  Flight time:    {:>10.0} s  ({:.1} h)", last.time, last.time / 3600.0);
    println!("  Frame:          {}", last.frame);
    println!("  Altitude:       {:>10.0} km", last.altitude / 1000.0);
    println!("  Speed:          {:>10.0} m/s", last.speed);
    println!("  Eccentricity:   {:>10.3}", last.eccentricity);
    match last.apoapsis_altitude {
        Some(apo) => println!(
            "  Orbit:          {:.0} x {:.0} km",
            last.periapsis_altitude / 1000.0,
            apo / 1000.0
        ),
        None => println!("  Orbit:          escape trajectory"),
    }
    println!("  Moon distance:  {:>10.0} km", last.moon_distance / 1000.0);
    println!("  Final mass:     {:>10.0} kg  (stage {})", last.mass, last.stage_name);
    println!("  Max speed:      {:>10.0} m/s", summary.max_speed);
    println!("  Peak altitude:  {:>10.0} km  at T+{:.0} s", summary.apogee_altitude / 1000.0, summary.apogee_time);
    println!("  Stagings:       {:>10}", summary.stagings);
    println!();

    if let Some(path) = csv_path {
        match io::write_trajectory_file(&path, &snapshots) {
            Ok(()) => println!("  Trajectory written to {}", path),
            Err(e) => {
                eprintln!("  Failed to write {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
