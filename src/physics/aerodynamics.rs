use nalgebra::Vector2;

/// Aerodynamic drag acceleration: quadratic in speed, opposing velocity.
///
/// Returns zero for zero density (above the atmosphere cutoff) or
/// negligible speed, so it is safe to call unconditionally.
pub fn drag_accel(vel: &Vector2<f64>, density: f64, cd: f64, area: f64, mass: f64) -> Vector2<f64> {
    let speed = vel.norm();
    if density <= 0.0 || speed < 1e-6 || mass <= 0.0 {
        return Vector2::zeros();
    }
    let q_dyn = 0.5 * density * speed * speed;
    -vel.normalize() * (q_dyn * cd * area / mass)
}
