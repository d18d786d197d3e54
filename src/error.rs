use std::error::Error;
use std::fmt;

/// Failure modes of the firing solver.
///
/// The hazards that used to surface as silent NaN propagation or a
/// quietly unconverged answer are explicit kinds here: degenerate aiming
/// geometry, a diverging integration state, and an exhausted angle
/// search.
#[derive(Debug, Clone, PartialEq)]
pub enum FiringError {
    /// The lead quadratic has no usable solution: the target sits on the
    /// turret's vertical axis, the horizontal launch speed vanishes, or
    /// the turret's own motion cannot be compensated at this power.
    DegenerateAimingGeometry {
        /// What made the geometry unusable.
        detail: String,
    },
    /// The integration state or error estimate became non-finite.
    IntegrationDivergence {
        /// Simulation time at which the divergence was detected.
        time: f64,
    },
    /// The angle search exhausted its iteration budget with the landing
    /// error still at or above tolerance. The last angle is still usable;
    /// callers decide whether to warn or fail.
    RootFinderNonConvergence {
        iterations: usize,
        /// Squared miss distance after the final iteration.
        residual: f64,
    },
}

impl fmt::Display for FiringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FiringError::DegenerateAimingGeometry { detail } => {
                write!(f, "degenerate aiming geometry: {detail}")
            }
            FiringError::IntegrationDivergence { time } => {
                write!(f, "integration state became non-finite at t = {time}")
            }
            FiringError::RootFinderNonConvergence { iterations, residual } => {
                write!(
                    f,
                    "angle search did not converge after {iterations} iterations \
                     (residual squared miss distance {residual})"
                )
            }
        }
    }
}

impl Error for FiringError {}
