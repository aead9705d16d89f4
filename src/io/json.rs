use std::io::{self, Write};

use crate::sim::{SimEvent, Snapshot};
use crate::vehicle::Rocket;

/// Summary statistics computed from a flight's snapshot log.
#[derive(Debug, Clone)]
pub struct MissionSummary {
    pub apogee_altitude: f64,
    pub apogee_time: f64,
    pub max_speed: f64,
    pub final_altitude: f64,
    pub final_eccentricity: f64,
    pub final_phase: String,
    pub flight_time: f64,
    pub stagings: usize,
}

impl MissionSummary {
    /// Compute summary from the snapshot log. Empty logs yield zeros.
    pub fn from_snapshots(snapshots: &[Snapshot], events: &[SimEvent]) -> Self {
        let (apogee_altitude, apogee_time) = snapshots
            .iter()
            .map(|s| (s.altitude, s.time))
            .fold((0.0_f64, 0.0), |best, cur| if cur.0 > best.0 { cur } else { best });

        let max_speed = snapshots.iter().map(|s| s.speed).fold(0.0_f64, f64::max);

        let stagings = events
            .iter()
            .filter(|e| matches!(e.kind, crate::sim::EventKind::Staging { .. }))
            .count();

        match snapshots.last() {
            Some(last) => MissionSummary {
                apogee_altitude,
                apogee_time,
                max_speed,
                final_altitude: last.altitude,
                final_eccentricity: last.eccentricity,
                final_phase: last.phase.clone(),
                flight_time: last.time,
                stagings,
            },
            None => MissionSummary {
                apogee_altitude: 0.0,
                apogee_time: 0.0,
                max_speed: 0.0,
                final_altitude: 0.0,
                final_eccentricity: 0.0,
                final_phase: String::new(),
                flight_time: 0.0,
                stagings: 0,
            },
        }
    }
}

/// Write mission summary as JSON to a writer.
pub fn write_summary<W: Write>(
    writer: &mut W,
    rocket: &Rocket,
    summary: &MissionSummary,
) -> io::Result<()> {
    writeln!(writer, "{{")?;
    writeln!(writer, "  \"vehicle\": {{")?;
    writeln!(writer, "    \"name\": \"{}\",", rocket.name)?;
    writeln!(writer, "    \"stages\": {},", rocket.stages.len())?;
    writeln!(writer, "    \"total_delta_v_ms\": {:.1}", rocket.total_delta_v())?;
    writeln!(writer, "  }},")?;
    writeln!(writer, "  \"mission\": {{")?;
    writeln!(writer, "    \"final_phase\": \"{}\",", summary.final_phase)?;
    writeln!(writer, "    \"flight_time_s\": {:.1},", summary.flight_time)?;
    writeln!(writer, "    \"stagings\": {},", summary.stagings)?;
    writeln!(writer, "    \"apogee_altitude_m\": {:.1},", summary.apogee_altitude)?;
    writeln!(writer, "    \"apogee_time_s\": {:.1},", summary.apogee_time)?;
    writeln!(writer, "    \"max_speed_ms\": {:.2},", summary.max_speed)?;
    writeln!(writer, "    \"final_altitude_m\": {:.1},", summary.final_altitude)?;
    writeln!(writer, "    \"final_eccentricity\": {:.4}", summary.final_eccentricity)?;
    writeln!(writer, "  }}")?;
    writeln!(writer, "}}")?;
    Ok(())
}

/// Write mission summary JSON to a file.
pub fn write_summary_file(
    path: &str,
    rocket: &Rocket,
    summary: &MissionSummary,
) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, rocket, summary)
}
