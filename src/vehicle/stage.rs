use crate::dynamics::state::G0;

// ---------------------------------------------------------------------------
// Stage definition (one stage of a multi-stage rocket)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Stage {
    pub name: String,
    pub dry_mass: f64,        // kg
    pub propellant_mass: f64, // kg, loaded at liftoff
    pub thrust: f64,          // N (0 for inert payload)
    pub isp: f64,             // s
    pub cd: f64,              // drag coefficient while this stage is active
    pub area: f64,            // aerodynamic reference area, m^2
}

impl Stage {
    /// Propellant mass flow rate at full throttle: mdot = F / (Isp * g0).
    pub fn mass_flow(&self) -> f64 {
        if self.isp > 0.0 {
            self.thrust / (self.isp * G0)
        } else {
            0.0
        }
    }

    pub fn exhaust_velocity(&self) -> f64 {
        self.isp * G0
    }

    /// Wet mass (dry structure plus loaded propellant).
    pub fn total_mass(&self) -> f64 {
        self.dry_mass + self.propellant_mass
    }

    /// Self-consistent burn time at full throttle.
    pub fn burn_time(&self) -> f64 {
        let mdot = self.mass_flow();
        if mdot > 0.0 {
            self.propellant_mass / mdot
        } else {
            0.0
        }
    }

    /// Ideal delta-v with the given payload riding on top (Tsiolkovsky).
    pub fn delta_v(&self, payload_mass: f64) -> f64 {
        if self.isp <= 0.0 || self.propellant_mass <= 0.0 {
            return 0.0;
        }
        let m0 = self.total_mass() + payload_mass;
        let mf = self.dry_mass + payload_mass;
        self.exhaust_velocity() * (m0 / mf).ln()
    }
}

// ---------------------------------------------------------------------------
// Stage builder
// ---------------------------------------------------------------------------

pub struct StageBuilder {
    name: String,
    dry_mass: f64,
    propellant_mass: f64,
    thrust: f64,
    isp: f64,
    cd: f64,
    area: f64,
}

impl StageBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dry_mass: 1000.0,
            propellant_mass: 0.0,
            thrust: 0.0,
            isp: 0.0,
            cd: 0.5,
            area: 10.0,
        }
    }

    pub fn dry_mass(mut self, v: f64) -> Self { self.dry_mass = v; self }
    pub fn propellant_mass(mut self, v: f64) -> Self { self.propellant_mass = v; self }
    pub fn thrust(mut self, v: f64) -> Self { self.thrust = v; self }
    pub fn isp(mut self, v: f64) -> Self { self.isp = v; self }
    pub fn cd(mut self, v: f64) -> Self { self.cd = v; self }
    pub fn area(mut self, v: f64) -> Self { self.area = v; self }

    pub fn build(self) -> Stage {
        Stage {
            name: self.name,
            dry_mass: self.dry_mass,
            propellant_mass: self.propellant_mass,
            thrust: self.thrust,
            isp: self.isp,
            cd: self.cd,
            area: self.area,
        }
    }
}
