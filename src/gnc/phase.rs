use std::fmt;

// ---------------------------------------------------------------------------
// Mission phases
// ---------------------------------------------------------------------------

/// Guidance FSM phase. Exactly one is active at a time; transitions are
/// strictly forward except the two holding phases (`ParkingOrbit`,
/// `LunarCoast`), which self-loop until their exit condition holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionPhase {
    Idle,
    Launch,
    GravityTurn,
    Coast,
    Circularize,
    ParkingOrbit,
    TliBurn,
    LunarCoast,
    SoiTransition,
    CaptureBurn,
    Complete,
    Aborted,
}

impl MissionPhase {
    pub fn name(&self) -> &'static str {
        match self {
            MissionPhase::Idle => "IDLE",
            MissionPhase::Launch => "LAUNCH",
            MissionPhase::GravityTurn => "GRAVITY TURN",
            MissionPhase::Coast => "COAST",
            MissionPhase::Circularize => "CIRCULARIZE",
            MissionPhase::ParkingOrbit => "PARKING ORBIT",
            MissionPhase::TliBurn => "TLI BURN",
            MissionPhase::LunarCoast => "LUNAR COAST",
            MissionPhase::SoiTransition => "SOI TRANSITION",
            MissionPhase::CaptureBurn => "CAPTURE BURN",
            MissionPhase::Complete => "COMPLETE",
            MissionPhase::Aborted => "ABORTED",
        }
    }

    /// Mission over: no further guidance output changes.
    pub fn is_terminal(&self) -> bool {
        matches!(self, MissionPhase::Complete | MissionPhase::Aborted)
    }

    /// Waiting phase that may loop indefinitely until a condition is met.
    pub fn is_holding(&self) -> bool {
        matches!(self, MissionPhase::ParkingOrbit | MissionPhase::LunarCoast)
    }
}

impl fmt::Display for MissionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_and_holding_are_disjoint() {
        for p in [
            MissionPhase::Idle,
            MissionPhase::Launch,
            MissionPhase::GravityTurn,
            MissionPhase::Coast,
            MissionPhase::Circularize,
            MissionPhase::ParkingOrbit,
            MissionPhase::TliBurn,
            MissionPhase::LunarCoast,
            MissionPhase::SoiTransition,
            MissionPhase::CaptureBurn,
            MissionPhase::Complete,
            MissionPhase::Aborted,
        ] {
            assert!(!(p.is_terminal() && p.is_holding()), "{} both?", p);
        }
        assert!(MissionPhase::Aborted.is_terminal());
        assert!(MissionPhase::ParkingOrbit.is_holding());
    }
}
