//! Closed-form lead calculation: the horizontal shot direction that
//! compensates for the turret's own motion.

use nalgebra::{Vector2, Vector3};

use crate::constants::GEOMETRY_EPSILON;
use crate::error::FiringError;

/// Unit horizontal direction `(u, v)` such that the projectile's net
/// horizontal velocity (turret velocity plus `power * sin(angle)` along
/// `(u, v)`) points at the target.
///
/// The lead quadratic has two roots ("lead ahead" vs "lead behind"); the
/// root is picked by requiring the net velocity's sign to match the
/// target direction's sign on each horizontal axis independently,
/// flipping when the first choice disagrees.
///
/// `angle` is the launch angle measured from vertical, so
/// `c = power * sin(angle)` is the horizontal launch speed. A vanishing
/// `c`, a target on the turret's vertical axis, or a turret velocity the
/// quadratic cannot compensate all surface as
/// [`FiringError::DegenerateAimingGeometry`].
pub fn shot_direction(
    turret: Vector3<f64>,
    target: Vector3<f64>,
    turret_velocity: Vector2<f64>,
    angle: f64,
    power: f64,
) -> Result<Vector2<f64>, FiringError> {
    let d = target - turret;
    let (dx, dy) = (d.x, d.y);
    let (vx, vy) = (turret_velocity.x, turret_velocity.y);
    let c = power * angle.sin();

    let denominator = c * c * (dx * dx + dy * dy);
    if !denominator.is_finite() || denominator.abs() < GEOMETRY_EPSILON {
        return Err(FiringError::DegenerateAimingGeometry {
            detail: format!(
                "horizontal lead denominator c^2*(dx^2+dy^2) = {denominator} \
                 (target on the vertical axis or no horizontal launch speed)"
            ),
        });
    }

    let discriminant = c * c
        * dx
        * dx
        * (-vx * vx * dy * dy + 2.0 * vx * vy * dx * dy - vy * vy * dx * dx
            + c * c * (dx * dx + dy * dy));
    if !discriminant.is_finite() || discriminant < 0.0 {
        return Err(FiringError::DegenerateAimingGeometry {
            detail: format!("lead discriminant {discriminant} has no real root"),
        });
    }
    let root = discriminant.sqrt();
    let offset = -vx * c * dy * dy + vy * c * dx * dy;

    let mut u = (root + offset) / denominator;
    if (vx + c * u).is_sign_negative() != dx.is_sign_negative() {
        u = (-root + offset) / denominator;
    }

    // |u| > 1 means the turret outruns what this launch speed can offset.
    if u * u > 1.0 + GEOMETRY_EPSILON {
        return Err(FiringError::DegenerateAimingGeometry {
            detail: format!("lead component u = {u} exceeds the unit circle"),
        });
    }
    // Rounding can leak u*u past 1 by an ulp; the square root must not see it.
    let mut v = (1.0 - u * u).max(0.0).sqrt();
    if (vy + c * v).is_sign_negative() != dy.is_sign_negative() {
        v = -v;
    }

    Ok(Vector2::new(u, v))
}

/// Full 3-D launch velocity for a shot at `angle` (measured from
/// vertical) and speed `power`, inheriting the turret's horizontal
/// velocity.
pub fn launch_velocity(
    turret: Vector3<f64>,
    target: Vector3<f64>,
    turret_velocity: Vector2<f64>,
    angle: f64,
    power: f64,
) -> Result<Vector3<f64>, FiringError> {
    let direction = shot_direction(turret, target, turret_velocity, angle, power)?;
    let horizontal = power * angle.sin();
    Ok(Vector3::new(
        turret_velocity.x + horizontal * direction.x,
        turret_velocity.y + horizontal * direction.y,
        power * angle.cos(),
    ))
}
