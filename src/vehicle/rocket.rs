use super::stage::{Stage, StageBuilder};

/// Residual propellant below this is treated as burnout, kg.
pub const PROP_EPSILON: f64 = 0.01;

// ---------------------------------------------------------------------------
// Staging state machine
// ---------------------------------------------------------------------------

/// Propulsion availability derived from the active stage and remaining
/// propellant. `Exhausted` means the vehicle is ballistic: every remaining
/// stage is inert or dry. Thrust commands in that state are no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagingState {
    Active { stage: usize },
    Exhausted,
}

// ---------------------------------------------------------------------------
// Rocket: ordered stage stack, consumed in burn order
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Rocket {
    pub name: String,
    pub stages: Vec<Stage>,
}

impl Rocket {
    /// Total wet mass of all stages at liftoff.
    pub fn total_mass(&self) -> f64 {
        self.stages.iter().map(|s| s.total_mass()).sum()
    }

    /// Wet mass of everything stacked above the given stage.
    pub fn upper_mass(&self, stage_idx: usize) -> f64 {
        match self.stages.get(stage_idx + 1..) {
            Some(upper) => upper.iter().map(|s| s.total_mass()).sum(),
            None => 0.0,
        }
    }

    /// Propellant left in the active stage, derived from the integrated
    /// vehicle mass: everything that is not upper-stack wet mass or the
    /// active stage's dry structure.
    pub fn remaining_propellant(&self, vehicle_mass: f64, stage_idx: usize) -> f64 {
        match self.stages.get(stage_idx) {
            Some(stage) => (vehicle_mass - stage.dry_mass - self.upper_mass(stage_idx)).max(0.0),
            None => 0.0,
        }
    }

    /// Staging state for the given vehicle mass and active stage.
    pub fn propulsion(&self, vehicle_mass: f64, stage_idx: usize) -> StagingState {
        match self.stages.get(stage_idx) {
            Some(stage)
                if stage.thrust > 0.0
                    && self.remaining_propellant(vehicle_mass, stage_idx) > PROP_EPSILON =>
            {
                StagingState::Active { stage: stage_idx }
            }
            _ => StagingState::Exhausted,
        }
    }

    /// Drag coefficient and reference area while the given stage is active.
    /// Past the last stage the final (payload) geometry applies.
    pub fn drag_reference(&self, stage_idx: usize) -> Option<(f64, f64)> {
        let last = self.stages.len().checked_sub(1)?;
        let s = &self.stages[stage_idx.min(last)];
        Some((s.cd, s.area))
    }

    /// Total ideal delta-v (each stage computed with upper stack as payload).
    pub fn total_delta_v(&self) -> f64 {
        (0..self.stages.len())
            .map(|i| self.stages[i].delta_v(self.upper_mass(i)))
            .sum()
    }
}

// ---------------------------------------------------------------------------
// Preset vehicles
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;

    /// Saturn V-class three-stage launcher with an inert payload, in burn
    /// order (first stage first). Sized so both reference missions (GSO
    /// direct ascent, lunar transfer and capture) close with margin at the
    /// physical mass flow rate.
    pub fn saturn_v() -> Rocket {
        Rocket {
            name: "Saturn V".into(),
            stages: vec![
                StageBuilder::new("S-IC")
                    .dry_mass(12_000.0)
                    .propellant_mass(380_000.0)
                    .thrust(16_000_000.0)
                    .isp(300.0)
                    .cd(0.5)
                    .area(80.0)
                    .build(),
                StageBuilder::new("S-II")
                    .dry_mass(4_500.0)
                    .propellant_mass(110_000.0)
                    .thrust(2_800_000.0)
                    .isp(360.0)
                    .cd(0.5)
                    .area(80.0)
                    .build(),
                StageBuilder::new("S-IVB")
                    .dry_mass(2_500.0)
                    .propellant_mass(48_000.0)
                    .thrust(450_000.0)
                    .isp(450.0)
                    .cd(0.4)
                    .area(34.0)
                    .build(),
                StageBuilder::new("Payload")
                    .dry_mass(4_000.0)
                    .cd(0.3)
                    .area(12.0)
                    .build(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_mass_budget() {
        let r = presets::saturn_v();
        assert_eq!(r.stages.len(), 4);
        assert!((r.total_mass() - 561_000.0).abs() < 1.0);
        // Upper stack above the first stage
        assert!((r.upper_mass(0) - 169_000.0).abs() < 1.0);
        assert_eq!(r.upper_mass(3), 0.0);
    }

    #[test]
    fn propellant_derived_from_vehicle_mass() {
        let r = presets::saturn_v();
        let full = r.total_mass();
        assert!((r.remaining_propellant(full, 0) - 380_000.0).abs() < 1e-6);
        // Half the first-stage propellant burned
        assert!((r.remaining_propellant(full - 190_000.0, 0) - 190_000.0).abs() < 1e-6);
        // Dry first stage
        assert_eq!(r.remaining_propellant(r.stages[0].dry_mass + r.upper_mass(0), 0), 0.0);
    }

    #[test]
    fn propulsion_state_transitions() {
        let r = presets::saturn_v();
        assert_eq!(r.propulsion(r.total_mass(), 0), StagingState::Active { stage: 0 });
        // Burned out first stage
        let dry = r.stages[0].dry_mass + r.upper_mass(0);
        assert_eq!(r.propulsion(dry, 0), StagingState::Exhausted);
        // Inert payload never has thrust
        assert_eq!(r.propulsion(4_000.0, 3), StagingState::Exhausted);
        // Past the end of the stack
        assert_eq!(r.propulsion(4_000.0, 9), StagingState::Exhausted);
    }

    #[test]
    fn total_delta_v_is_plausible_for_tli() {
        let r = presets::saturn_v();
        let dv = r.total_delta_v();
        assert!(
            (dv - 16_427.0).abs() < 25.0,
            "Stack delta-v should be ~16.4 km/s, got {:.0} m/s",
            dv
        );
        // Enough for ascent with losses, transfer injection, and capture
        assert!(dv > 15_000.0);
    }

    #[test]
    fn drag_reference_falls_back_to_payload() {
        let r = presets::saturn_v();
        assert_eq!(r.drag_reference(0), Some((0.5, 80.0)));
        assert_eq!(r.drag_reference(99), Some((0.3, 12.0)));
    }
}
