//! Firing-solution orchestration: scenario inputs, tunable
//! configuration, and the trace/search/trace pipeline.

use nalgebra::{Vector2, Vector3};
use serde::Serialize;

use crate::aiming::launch_velocity;
use crate::angle_solver::{direct_angle, solve_angle};
use crate::constants::{
    CONVERGENCE_TOLERANCE, DRAG_COEFFICIENT, GRAVITY_MPS2, INITIAL_ANGLE_STEP,
    MAX_SECANT_ITERATIONS, MAX_SIM_STEPS, SIM_TOLERANCE,
};
use crate::error::FiringError;
use crate::simulation::{simulate_impact, Impact};
use crate::trace::TraceSink;

/// Scenario geometry and launch power.
#[derive(Debug, Clone, Copy)]
pub struct FiringInputs {
    pub turret: Vector3<f64>,
    pub target: Vector3<f64>,
    /// The turret's own horizontal velocity, inherited by the projectile.
    pub turret_velocity: Vector2<f64>,
    /// Fixed projectile launch speed.
    pub power: f64,
}

/// Tunable physics and search parameters. `Default` is the stock
/// constant set from [`crate::constants`].
#[derive(Debug, Clone, Copy)]
pub struct SolverConfig {
    pub drag_coefficient: f64,
    pub gravity: f64,
    /// Local-error tolerance for the trajectory integrator.
    pub sim_tolerance: f64,
    /// Hard cap on accepted integration steps per simulation.
    pub max_steps: usize,
    /// Landing-error target, in squared-length units.
    pub convergence_tolerance: f64,
    /// Hard cap on secant iterations.
    pub max_iterations: usize,
    /// Perturbation seeding the secant search, radians.
    pub initial_angle_step: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            drag_coefficient: DRAG_COEFFICIENT,
            gravity: GRAVITY_MPS2,
            sim_tolerance: SIM_TOLERANCE,
            max_steps: MAX_SIM_STEPS,
            convergence_tolerance: CONVERGENCE_TOLERANCE,
            max_iterations: MAX_SECANT_ITERATIONS,
            initial_angle_step: INITIAL_ANGLE_STEP,
        }
    }
}

/// Firing solution for one scenario, converged or budget-exhausted.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FiringSolution {
    /// Angle that points straight at the target, radians from vertical.
    pub initial_angle_rad: f64,
    /// Final launch angle, radians from vertical.
    pub angle_rad: f64,
    /// Secant updates performed.
    pub iterations_used: usize,
    /// Squared miss distance at the final angle.
    pub landing_error: f64,
    pub converged: bool,
    /// Time of the interpolated intercept at the final angle.
    pub intercept_time_s: f64,
    /// Interpolated intercept point, `[x, y, z]`.
    pub intercept_point: [f64; 3],
}

impl FiringSolution {
    /// Elevation above the horizon in degrees. The launch angle itself is
    /// stored as measured from vertical.
    pub fn elevation_deg(&self) -> f64 {
        90.0 - self.angle_rad.to_degrees()
    }
}

/// Computes firing solutions for one scenario.
pub struct FiringSolver {
    inputs: FiringInputs,
    config: SolverConfig,
}

impl FiringSolver {
    pub fn new(inputs: FiringInputs) -> Self {
        Self::with_config(inputs, SolverConfig::default())
    }

    pub fn with_config(inputs: FiringInputs, config: SolverConfig) -> Self {
        FiringSolver { inputs, config }
    }

    pub fn inputs(&self) -> &FiringInputs {
        &self.inputs
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Landing error (squared miss distance) for one candidate angle.
    fn landing_error(&self, angle: f64) -> Result<f64, FiringError> {
        Ok(self.run(angle, None)?.miss_distance_sq)
    }

    fn run(
        &self,
        angle: f64,
        trace: Option<&mut dyn TraceSink>,
    ) -> Result<Impact, FiringError> {
        let velocity = launch_velocity(
            self.inputs.turret,
            self.inputs.target,
            self.inputs.turret_velocity,
            angle,
            self.inputs.power,
        )?;
        simulate_impact(
            self.inputs.turret,
            self.inputs.target,
            velocity,
            &self.config,
            trace,
        )
    }

    /// Solve without emitting traces.
    pub fn solve(&self) -> Result<FiringSolution, FiringError> {
        self.solve_traced(None, None)
    }

    /// Solve, emitting the full trajectory at the direct angle to
    /// `initial_trace` and at the final angle to `final_trace`.
    ///
    /// The trace runs bracket the search and play no part in it; the
    /// final run also supplies the intercept the solution reports.
    pub fn solve_traced(
        &self,
        initial_trace: Option<&mut dyn TraceSink>,
        final_trace: Option<&mut dyn TraceSink>,
    ) -> Result<FiringSolution, FiringError> {
        let initial_angle = direct_angle(self.inputs.turret, self.inputs.target);

        if initial_trace.is_some() {
            self.run(initial_angle, initial_trace)?;
        }

        let search = solve_angle(
            |angle| self.landing_error(angle),
            initial_angle,
            &self.config,
        )?;

        let impact = self.run(search.angle_rad, final_trace)?;

        Ok(FiringSolution {
            initial_angle_rad: initial_angle,
            angle_rad: search.angle_rad,
            iterations_used: search.iterations_used,
            landing_error: search.final_error,
            converged: search.converged,
            intercept_time_s: impact.intercept_time,
            intercept_point: [impact.intercept.x, impact.intercept.y, impact.intercept.z],
        })
    }
}
