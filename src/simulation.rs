//! Trajectory simulation driver: integrates a launch until the
//! projectile stops closing on the target, then interpolates the
//! crossing of the target's z plane.

use nalgebra::{Vector3, Vector6};

use crate::derivatives::{drag_gravity, ProjectileState};
use crate::error::FiringError;
use crate::integrator::{Rkf45, StepOutcome};
use crate::solver::SolverConfig;
use crate::trace::TraceSink;

/// Outcome of one simulated launch.
#[derive(Debug, Clone, Copy)]
pub struct Impact {
    /// Squared distance from the target to the endpoint of the last
    /// accepted step, not to the interpolated intercept. This is the
    /// angle search's objective.
    pub miss_distance_sq: f64,
    /// Time at the interpolated crossing of the target's z plane.
    pub intercept_time: f64,
    /// Interpolated crossing point; its z equals the target's z whenever
    /// the crossing lies inside the final step.
    pub intercept: Vector3<f64>,
    /// Accepted integration steps taken.
    pub steps: usize,
    /// Whether the step cap, rather than the closest-approach test, ended
    /// the run.
    pub step_limited: bool,
}

fn position(state: &ProjectileState) -> Vector3<f64> {
    Vector3::new(state[0], state[2], state[4])
}

/// Integrate a launch from `turret` with the given initial `velocity`
/// until the squared distance to `target` stops shrinking, or
/// `config.max_steps` accepted steps have run.
///
/// Only accepted steps count toward the cap and the stopping test;
/// rejected attempts retry the same instant with the shrunken step.
/// When a sink is given, each accepted position is recorded before its
/// step, followed by one terminal sample at the interpolated intercept;
/// `None` keeps tracing entirely off the integration path.
pub fn simulate_impact(
    turret: Vector3<f64>,
    target: Vector3<f64>,
    velocity: Vector3<f64>,
    config: &SolverConfig,
    mut trace: Option<&mut dyn TraceSink>,
) -> Result<Impact, FiringError> {
    let initial = Vector6::new(
        turret.x, velocity.x, turret.y, velocity.y, turret.z, velocity.z,
    );
    let km = config.drag_coefficient;
    let g = config.gravity;
    let mut integrator = Rkf45::new(
        initial,
        0.0,
        move |_t, s: &ProjectileState| drag_gravity(s, km, g),
        config.sim_tolerance,
    );

    let mut last_distance = (target - position(integrator.state())).norm_squared();
    let mut steps = 0;
    let mut step_limited = false;
    let last_pos;
    let last_t;

    loop {
        let pos = position(integrator.state());
        let t = integrator.time();
        if let Some(sink) = trace.as_deref_mut() {
            sink.record(t, pos);
        }

        // Retry rejected attempts until one lands; a non-finite error
        // estimate means the step size can no longer recover.
        loop {
            match integrator.step() {
                StepOutcome::Accepted { .. } => break,
                StepOutcome::Rejected { error } if !error.is_finite() => {
                    return Err(FiringError::IntegrationDivergence {
                        time: integrator.time(),
                    });
                }
                StepOutcome::Rejected { .. } => {}
            }
        }
        steps += 1;

        if !integrator.state().iter().all(|c| c.is_finite()) {
            return Err(FiringError::IntegrationDivergence {
                time: integrator.time(),
            });
        }

        let new_distance = (target - position(integrator.state())).norm_squared();
        let improvement = last_distance - new_distance;
        last_distance = new_distance;

        if improvement < 0.0 {
            last_pos = pos;
            last_t = t;
            break;
        }
        if steps >= config.max_steps {
            step_limited = true;
            last_pos = pos;
            last_t = t;
            break;
        }
    }

    let end_pos = position(integrator.state());
    let end_t = integrator.time();

    // Fraction along the final step at which z crosses the target plane,
    // clamped so an arc that never reaches the plane stays on the step.
    let z_span = end_pos.z - last_pos.z;
    let fraction = if z_span.abs() > f64::EPSILON {
        ((target.z - last_pos.z) / z_span).clamp(0.0, 1.0)
    } else {
        1.0
    };
    let intercept = last_pos + (end_pos - last_pos) * fraction;
    let intercept_time = last_t + (end_t - last_t) * fraction;

    if let Some(sink) = trace.as_deref_mut() {
        sink.record(intercept_time, intercept);
    }

    Ok(Impact {
        miss_distance_sq: last_distance,
        intercept_time,
        intercept,
        steps,
        step_limited,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::Trace;

    fn vacuum_config() -> SolverConfig {
        SolverConfig {
            drag_coefficient: 0.0,
            ..SolverConfig::default()
        }
    }

    #[test]
    fn interpolated_intercept_sits_on_the_target_plane() {
        // Drag-free arc: (vx, vz) = (10, 10) lands at x = 2*vx*vz/g.
        let g = SolverConfig::default().gravity;
        let range = 2.0 * 10.0 * 10.0 / g;
        let turret = Vector3::new(0.0, 0.0, 0.0);
        let target = Vector3::new(range, 0.0, 0.0);
        let velocity = Vector3::new(10.0, 0.0, 10.0);

        let mut trace = Trace::new();
        let impact =
            simulate_impact(turret, target, velocity, &vacuum_config(), Some(&mut trace))
                .unwrap();

        assert!(!impact.step_limited);
        assert!(
            impact.intercept.z.abs() < 1e-9,
            "intercept z = {}",
            impact.intercept.z
        );
        // The terminal trace sample is the interpolated point.
        let last = trace.samples().last().unwrap();
        assert_eq!(last.position, impact.intercept);
        assert_eq!(last.time, impact.intercept_time);
    }

    #[test]
    fn trace_starts_at_the_turret_at_time_zero() {
        let turret = Vector3::new(1.0, 2.0, 3.0);
        let target = Vector3::new(9.0, 2.0, 3.0);
        let velocity = Vector3::new(20.0, 0.0, 5.0);

        let mut trace = Trace::new();
        simulate_impact(
            turret,
            target,
            velocity,
            &SolverConfig::default(),
            Some(&mut trace),
        )
        .unwrap();

        let first = trace.samples().first().unwrap();
        assert_eq!(first.time, 0.0);
        assert_eq!(first.position, turret);
    }

    #[test]
    fn step_cap_is_a_hard_ceiling() {
        let config = SolverConfig {
            max_steps: 5,
            ..SolverConfig::default()
        };
        // A target a megameter out keeps the distance shrinking far
        // longer than five steps.
        let turret = Vector3::new(0.0, 0.0, 0.0);
        let target = Vector3::new(1.0e6, 0.0, 0.0);
        let velocity = Vector3::new(30.0, 0.0, 30.0);

        let mut trace = Trace::new();
        let impact =
            simulate_impact(turret, target, velocity, &config, Some(&mut trace)).unwrap();

        assert!(impact.step_limited);
        assert_eq!(impact.steps, 5);
        // One sample per accepted step plus the interpolated terminal one.
        assert_eq!(trace.samples().len(), 6);
    }

    #[test]
    fn miss_distance_is_measured_at_the_last_step_endpoint() {
        // With the step cap at 1 the endpoint is one accepted step from
        // the turret, and the miss must be the distance from there.
        let config = SolverConfig {
            max_steps: 1,
            ..SolverConfig::default()
        };
        let turret = Vector3::new(0.0, 0.0, 0.0);
        let target = Vector3::new(50.0, 0.0, 0.0);
        let velocity = Vector3::new(10.0, 0.0, 0.0);

        let impact = simulate_impact(turret, target, velocity, &config, None).unwrap();
        assert_eq!(impact.steps, 1);
        assert!(impact.miss_distance_sq < 50.0 * 50.0);
        assert!(impact.miss_distance_sq > 0.0);
    }
}
