use std::io::{self, Write};

use crate::sim::Snapshot;

/// Write trajectory data to CSV format.
///
/// Columns: time, pos_x, pos_y, vel_x, vel_y, mass, stage,
///          throttle, altitude, speed, phase, frame
pub fn write_trajectory<W: Write>(writer: &mut W, trajectory: &[Snapshot]) -> io::Result<()> {
    writeln!(
        writer,
        "time,pos_x,pos_y,vel_x,vel_y,mass,stage,throttle,altitude,speed,phase,frame"
    )?;

    for s in trajectory {
        writeln!(
            writer,
            "{:.1},{:.1},{:.1},{:.3},{:.3},{:.1},{},{:.2},{:.1},{:.2},{},{}",
            s.time,
            s.pos.x,
            s.pos.y,
            s.vel.x,
            s.vel.y,
            s.mass,
            s.stage_idx,
            s.throttle,
            s.altitude,
            s.speed,
            s.phase,
            s.frame,
        )?;
    }

    Ok(())
}

/// Write trajectory to a CSV file at the given path.
pub fn write_trajectory_file(path: &str, trajectory: &[Snapshot]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_trajectory(&mut file, trajectory)
}
