use nalgebra::Vector2;

use crate::bodies::BodySet;

/// Radius of the Moon's sphere of influence, m. Inside it, lunar gravity is
/// treated as dominant for frame and element purposes.
pub const SOI_RADIUS: f64 = 6.6e7;

// ---------------------------------------------------------------------------
// Reference frames
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    EarthCentric,
    MoonCentric,
}

impl Frame {
    /// Which body dominates gravity at this position (SOI check).
    pub fn dominant(pos: &Vector2<f64>, bodies: &BodySet) -> Frame {
        if (pos - bodies.moon.position).norm() < SOI_RADIUS {
            Frame::MoonCentric
        } else {
            Frame::EarthCentric
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Frame::EarthCentric => "Earth-centric",
            Frame::MoonCentric => "Moon-centric",
        }
    }
}

/// Position/velocity re-expressed relative to a frame's central body.
#[derive(Debug, Clone, Copy)]
pub struct RelativeState {
    pub frame: Frame,
    pub pos: Vector2<f64>,
    pub vel: Vector2<f64>,
}

impl RelativeState {
    pub fn of(pos: &Vector2<f64>, vel: &Vector2<f64>, frame: Frame, bodies: &BodySet) -> Self {
        let center = match frame {
            Frame::EarthCentric => &bodies.earth,
            Frame::MoonCentric => &bodies.moon,
        };
        RelativeState {
            frame,
            pos: pos - center.position,
            vel: vel - center.velocity,
        }
    }

    pub fn radius(&self) -> f64 {
        self.pos.norm()
    }

    pub fn speed(&self) -> f64 {
        self.vel.norm()
    }

    /// Radial velocity component (positive = climbing away from the body).
    pub fn radial_velocity(&self) -> f64 {
        let r = self.pos.norm();
        if r < 1.0 {
            return 0.0;
        }
        self.pos.dot(&self.vel) / r
    }
}

// ---------------------------------------------------------------------------
// Planar vector helpers
// ---------------------------------------------------------------------------

/// 90-degree counterclockwise rotation.
pub fn perp(v: &Vector2<f64>) -> Vector2<f64> {
    Vector2::new(-v.y, v.x)
}

/// Signed angle from `from` to `to`, in (-pi, pi]. Positive = counterclockwise.
pub fn signed_angle(from: &Vector2<f64>, to: &Vector2<f64>) -> f64 {
    let cross = from.x * to.y - from.y * to.x;
    let dot = from.dot(to);
    cross.atan2(dot)
}
