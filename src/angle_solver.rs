//! Secant search over the launch angle, driving the simulated landing
//! error to zero.

use nalgebra::Vector3;

use crate::error::FiringError;
use crate::solver::SolverConfig;

/// Result of an angle search, converged or budget-exhausted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleSearch {
    /// Final launch angle in radians, measured from vertical.
    pub angle_rad: f64,
    /// Secant updates performed. Zero when the seed samples already met
    /// the tolerance.
    pub iterations_used: usize,
    /// Landing error at `angle_rad`, in squared-length units.
    pub final_error: f64,
    pub converged: bool,
}

/// Launch angle that points straight at the target, ignoring drag and
/// gravity: `pi/2 - atan2(dz, horizontal distance)`.
pub fn direct_angle(turret: Vector3<f64>, target: Vector3<f64>) -> f64 {
    let d = target - turret;
    std::f64::consts::FRAC_PI_2 - d.z.atan2((d.x * d.x + d.y * d.y).sqrt())
}

/// Secant-method search for the angle whose landing error falls below
/// `config.convergence_tolerance`.
///
/// Two phases: the initial sample evaluates `initial_angle` unmodified;
/// the search then perturbs by `config.initial_angle_step` and iterates
/// the secant update, carrying the two most recent (angle, error) pairs.
/// The iteration cap is a hard ceiling. A vanishing or non-finite secant
/// denominator ends the search immediately with the current angle: the
/// update direction is undefined there and anything further would be
/// noise.
pub fn solve_angle<E>(
    mut objective: E,
    initial_angle: f64,
    config: &SolverConfig,
) -> Result<AngleSearch, FiringError>
where
    E: FnMut(f64) -> Result<f64, FiringError>,
{
    // Initial phase: straight at the target.
    let mut prev_angle = initial_angle;
    let mut prev_error = objective(prev_angle)?;

    // Iterating phase, seeded with a perturbed second sample.
    let mut angle = initial_angle + config.initial_angle_step;
    let mut error = objective(angle)?;

    let mut iterations = 0;
    while iterations < config.max_iterations && error >= config.convergence_tolerance {
        let denominator = error - prev_error;
        if denominator == 0.0 || !denominator.is_finite() {
            break;
        }
        let next = angle - error * (angle - prev_angle) / denominator;
        prev_angle = angle;
        prev_error = error;
        angle = next;
        error = objective(angle)?;
        iterations += 1;
    }

    Ok(AngleSearch {
        angle_rad: angle,
        iterations_used: iterations,
        final_error: error,
        converged: error < config.convergence_tolerance,
    })
}
