//! # Turret Ballistics
//!
//! Drag-aware ballistic firing solutions for a moving turret.
//!
//! Given a turret position, a target position, the turret's own
//! horizontal velocity and a fixed launch speed, the crate finds the
//! launch angle at which a projectile under quadratic aerodynamic drag
//! and gravity hits the target. The pieces: an adaptive
//! Runge–Kutta–Fehlberg 4(5) integrator, the drag/gravity model, a
//! closed-form lead calculation offsetting the turret's motion, and a
//! secant search over the launch angle.

// Re-export the main types and functions
pub use angle_solver::{direct_angle, solve_angle, AngleSearch};
pub use error::FiringError;
pub use simulation::{simulate_impact, Impact};
pub use solver::{FiringInputs, FiringSolution, FiringSolver, SolverConfig};
pub use trace::{write_trace, write_trace_file, Trace, TraceSample, TraceSink};

// Module declarations
pub mod aiming;
pub mod angle_solver;
pub mod constants;
pub mod derivatives;
mod error;
pub mod integrator;
pub mod simulation;
pub mod solver;
pub mod trace;
