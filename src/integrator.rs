//! Embedded Runge–Kutta–Fehlberg 4(5) stepping with adaptive step-size
//! control, plus a fixed-step three-stage reference integrator.
//!
//! Both integrators are agnostic of the physics being integrated: the
//! derivative is a caller-supplied closure `f(t, state) -> dstate/dt`
//! over a compile-time-sized state vector, so the same stepper serves any
//! model without allocating on the hot path.

use nalgebra::SVector;

use crate::constants::{INITIAL_STEP_SIZE, STEP_EXPONENT, STEP_GROWTH_LIMIT, STEP_SAFETY_FACTOR};

/// Result of a single adaptive step attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// The local error passed the tolerance; state and time advanced.
    Accepted { t: f64, error: f64 },
    /// The local error failed the tolerance; state and time are
    /// untouched, but the step size has been reduced for the retry.
    Rejected { error: f64 },
}

/// Adaptive RKF45 integrator.
///
/// Owns the current state, time and step size; [`Rkf45::step`] mutates
/// all three in place. The step size is rescaled after every attempt,
/// accepted or rejected, and is never reset from outside.
pub struct Rkf45<F, const N: usize> {
    state: SVector<f64, N>,
    t: f64,
    h: f64,
    tol: f64,
    deriv: F,
}

impl<F, const N: usize> Rkf45<F, N>
where
    F: FnMut(f64, &SVector<f64, N>) -> SVector<f64, N>,
{
    pub fn new(initial_state: SVector<f64, N>, t0: f64, deriv: F, tol: f64) -> Self {
        Self::with_initial_step(initial_state, t0, deriv, tol, INITIAL_STEP_SIZE)
    }

    pub fn with_initial_step(
        initial_state: SVector<f64, N>,
        t0: f64,
        deriv: F,
        tol: f64,
        h0: f64,
    ) -> Self {
        Rkf45 {
            state: initial_state,
            t: t0,
            h: h0,
            tol,
            deriv,
        }
    }

    pub fn state(&self) -> &SVector<f64, N> {
        &self.state
    }

    pub fn time(&self) -> f64 {
        self.t
    }

    pub fn step_size(&self) -> f64 {
        self.h
    }

    /// Attempt a single step of the current size.
    ///
    /// Six derivative evaluations at the Fehlberg nodes produce a
    /// 4th-order and an embedded 5th-order estimate; their difference is
    /// the local error, measured in the infinity norm. An accepted step
    /// advances the state with the 5th-order combination.
    pub fn step(&mut self) -> StepOutcome {
        let (t, h, y) = (self.t, self.h, self.state);

        let k1 = (self.deriv)(t, &y) * h;
        let k2 = (self.deriv)(t + h / 4.0, &(y + k1 * (1.0 / 4.0))) * h;
        let k3 = (self.deriv)(
            t + h * (3.0 / 8.0),
            &(y + k1 * (3.0 / 32.0) + k2 * (9.0 / 32.0)),
        ) * h;
        let k4 = (self.deriv)(
            t + h * (12.0 / 13.0),
            &(y + k1 * (1932.0 / 2197.0) - k2 * (7200.0 / 2197.0) + k3 * (7296.0 / 2197.0)),
        ) * h;
        let k5 = (self.deriv)(
            t + h,
            &(y + k1 * (439.0 / 216.0) - k2 * 8.0 + k3 * (3680.0 / 513.0)
                - k4 * (845.0 / 4104.0)),
        ) * h;
        let k6 = (self.deriv)(
            t + h / 2.0,
            &(y - k1 * (8.0 / 27.0) + k2 * 2.0 + k3 * (3544.0 / 2565.0) + k4 * (1859.0 / 4104.0)
                - k5 * (11.0 / 40.0)),
        ) * h;

        // Difference between the embedded estimates; k2 drops out.
        let error_vec = k1 * (1.0 / 360.0) - k3 * (128.0 / 4275.0) - k4 * (2197.0 / 75240.0)
            + k5 * (1.0 / 50.0)
            + k6 * (2.0 / 55.0);
        let error = error_vec.amax();

        self.h = h * rescale_factor(self.tol, error);

        if error <= self.tol {
            self.state = y
                + k1 * (16.0 / 135.0)
                + k3 * (6656.0 / 12825.0)
                + k4 * (28561.0 / 56430.0)
                - k5 * (9.0 / 50.0)
                + k6 * (2.0 / 55.0);
            self.t = t + h;
            StepOutcome::Accepted { t: self.t, error }
        } else {
            StepOutcome::Rejected { error }
        }
    }
}

/// Step-size rescale `0.84 * (tol / error)^0.25`, capped so a vanishing
/// error estimate cannot blow the step up through the division.
fn rescale_factor(tol: f64, error: f64) -> f64 {
    if error > 0.0 {
        (STEP_SAFETY_FACTOR * (tol / error).powf(STEP_EXPONENT)).min(STEP_GROWTH_LIMIT)
    } else {
        STEP_GROWTH_LIMIT
    }
}

/// Fixed-step three-stage Runge–Kutta integrator.
///
/// The non-adaptive counterpart of [`Rkf45`]: same derivative interface,
/// constant step size, no error control. Useful as a reference stepper
/// when adaptivity is not wanted.
pub struct FixedStep<F, const N: usize> {
    state: SVector<f64, N>,
    t: f64,
    h: f64,
    deriv: F,
}

impl<F, const N: usize> FixedStep<F, N>
where
    F: FnMut(f64, &SVector<f64, N>) -> SVector<f64, N>,
{
    pub fn new(initial_state: SVector<f64, N>, t0: f64, deriv: F, h: f64) -> Self {
        FixedStep {
            state: initial_state,
            t: t0,
            h,
            deriv,
        }
    }

    pub fn state(&self) -> &SVector<f64, N> {
        &self.state
    }

    pub fn time(&self) -> f64 {
        self.t
    }

    /// Advance exactly one step of size `h`.
    pub fn step(&mut self) {
        let (t, h, y) = (self.t, self.h, self.state);
        let k1 = (self.deriv)(t, &y);
        let k2 = (self.deriv)(t + h / 2.0, &(y + k1 * (h / 2.0)));
        let k3 = (self.deriv)(t + h, &(y - k1 * h + k2 * (2.0 * h)));
        self.state = y + (k1 + k2 * 4.0 + k3) * (h / 6.0);
        self.t = t + h;
    }
}
