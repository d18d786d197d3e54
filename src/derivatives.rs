//! Time-derivative of the projectile state under quadratic drag and
//! gravity.

use nalgebra::Vector6;

/// Projectile integration state, ordered `(x, vx, y, vy, z, vz)`.
///
/// The interleaved per-axis order is a fixed invariant shared with
/// [`drag_gravity`] and the simulation driver; reordering the components
/// silently changes the physics.
pub type ProjectileState = Vector6<f64>;

/// Derivative of a [`ProjectileState`]: each velocity component
/// decelerates by `km * |v| * v_component` (quadratic aerodynamic drag),
/// and gravity `g` pulls along the negative z axis only.
pub fn drag_gravity(state: &ProjectileState, km: f64, g: f64) -> ProjectileState {
    let (vx, vy, vz) = (state[1], state[3], state[5]);
    let v = (vx * vx + vy * vy + vz * vz).sqrt();

    Vector6::new(
        vx,
        -km * v * vx,
        vy,
        -km * v * vy,
        vz,
        -km * v * vz - g,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DRAG_COEFFICIENT, GRAVITY_MPS2};

    #[test]
    fn velocity_components_pass_through() {
        let state = Vector6::new(0.0, 10.0, 0.0, -4.0, 0.0, 3.0);
        let d = drag_gravity(&state, DRAG_COEFFICIENT, GRAVITY_MPS2);
        assert_eq!(d[0], 10.0);
        assert_eq!(d[2], -4.0);
        assert_eq!(d[4], 3.0);
    }

    #[test]
    fn drag_opposes_motion_on_every_axis() {
        let state = Vector6::new(0.0, 10.0, 0.0, -4.0, 0.0, 3.0);
        let d = drag_gravity(&state, DRAG_COEFFICIENT, GRAVITY_MPS2);
        let v = (10.0_f64 * 10.0 + 4.0 * 4.0 + 3.0 * 3.0).sqrt();

        assert!((d[1] - (-DRAG_COEFFICIENT * v * 10.0)).abs() < 1e-12);
        assert!((d[3] - (DRAG_COEFFICIENT * v * 4.0)).abs() < 1e-12);
        assert!((d[5] - (-DRAG_COEFFICIENT * v * 3.0 - GRAVITY_MPS2)).abs() < 1e-12);
    }

    #[test]
    fn at_rest_only_gravity_remains() {
        let state = Vector6::new(5.0, 0.0, -2.0, 0.0, 100.0, 0.0);
        let d = drag_gravity(&state, DRAG_COEFFICIENT, GRAVITY_MPS2);
        assert_eq!(d, Vector6::new(0.0, 0.0, 0.0, 0.0, 0.0, -GRAVITY_MPS2));
    }
}
