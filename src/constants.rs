//! Physical and numerical constants used by the firing solver.

use std::f64::consts::PI;

/// Quadratic drag constant `km`: each velocity component decelerates by
/// `km * |v| * v_component`.
pub const DRAG_COEFFICIENT: f64 = 0.2041;

/// Gravitational acceleration in m/s², acting along the negative z axis.
pub const GRAVITY_MPS2: f64 = 9.81;

/// Local-error tolerance handed to the adaptive trajectory integrator.
pub const SIM_TOLERANCE: f64 = 0.01;

/// Hard cap on accepted integration steps per simulation run.
pub const MAX_SIM_STEPS: usize = 1000;

/// Landing-error target for the angle search, in squared-length units.
pub const CONVERGENCE_TOLERANCE: f64 = 0.01;

/// Hard cap on secant iterations in the angle search.
pub const MAX_SECANT_ITERATIONS: usize = 10;

/// Perturbation applied to the direct angle to seed the secant search (radians).
pub const INITIAL_ANGLE_STEP: f64 = -0.3 * PI / 180.0;

/// Step size the adaptive integrator starts from.
pub const INITIAL_STEP_SIZE: f64 = 1e-5;

/// Safety factor in the step-size rescale `0.84 * (tol / error)^0.25`.
pub const STEP_SAFETY_FACTOR: f64 = 0.84;

/// Exponent in the step-size rescale, 1/(order + 1) for the embedded 4(5) pair.
pub const STEP_EXPONENT: f64 = 0.25;

/// Upper bound on the step-size growth factor. Also stands in for the
/// rescale factor when the error estimate is exactly zero, where the
/// rescale formula would divide by zero.
pub const STEP_GROWTH_LIMIT: f64 = 4.0;

/// Threshold below which the aiming denominator counts as degenerate.
pub const GEOMETRY_EPSILON: f64 = 1e-9;
