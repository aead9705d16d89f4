/// Discrete occurrences worth reporting during a run. Continuous dynamics
/// never appear here, only edges.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Liftoff,
    Staging { from: String, to: String },
    PhaseChange { from: String, to: String },
    SoiEntry,
    SoiExit,
    Impact { body: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimEvent {
    pub time: f64,
    pub kind: EventKind,
}

impl SimEvent {
    pub fn describe(&self) -> String {
        let what = match &self.kind {
            EventKind::Liftoff => "Liftoff".to_string(),
            EventKind::Staging { from, to } => format!("Staging: {} -> {}", from, to),
            EventKind::PhaseChange { from, to } => format!("Phase: {} -> {}", from, to),
            EventKind::SoiEntry => "Entered lunar sphere of influence".to_string(),
            EventKind::SoiExit => "Left lunar sphere of influence".to_string(),
            EventKind::Impact { body } => format!("Surface contact: {}", body),
        };
        format!("T+{:9.1} s  {}", self.time, what)
    }
}
