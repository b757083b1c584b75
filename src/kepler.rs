//! Kepler equation solvers and anomaly conversions.
//!
//! The elliptic equation `M = E - e sin E` and the hyperbolic equation
//! `M = e sinh H - H` are solved with Newton-Raphson under a bounded
//! iteration count. A solve that runs out of iterations still returns its
//! last iterate; [`KeplerSolution::converged`] tells the caller whether
//! the tolerance was met.

use core::f64::consts::{PI, TAU};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ConvergenceWarning;

/// The maximum number of iterations for the numerical approach algorithms.
///
/// This is used to prevent infinite loops in case the method fails to converge.
pub const NUMERIC_MAX_ITERS: u32 = 1000;

/// Default convergence tolerance on the Newton step, in radians.
pub const DEFAULT_TOLERANCE: f64 = 1e-12;

/// Above this eccentricity the elliptic solver starts from `E = π`
/// instead of `E = M`.
const HIGH_ECCENTRICITY_SEED: f64 = 0.8;

/// Settings for the Newton-Raphson Kepler solvers.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct KeplerSolver {
    /// Iteration stops once the Newton step is smaller than this.
    pub tolerance: f64,
    /// Upper bound on iterations. The last iterate is kept when it is hit.
    pub max_iterations: u32,
}

impl Default for KeplerSolver {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: NUMERIC_MAX_ITERS,
        }
    }
}

/// The outcome of one Kepler solve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeplerSolution {
    /// Eccentric anomaly `E` (elliptic) or hyperbolic anomaly `H`.
    pub anomaly: f64,
    /// Newton iterations performed.
    pub iterations: u32,
    /// Magnitude of the last Newton step.
    pub residual: f64,
    /// Whether `residual` dropped below the tolerance.
    pub converged: bool,
}

impl KeplerSolution {
    /// The warning to attach to results derived from this solution, if any.
    pub fn warning(&self) -> Option<ConvergenceWarning> {
        if self.converged {
            None
        } else {
            Some(ConvergenceWarning {
                iterations: self.iterations,
                residual: self.residual,
            })
        }
    }
}

#[inline]
fn keplers_equation(mean_anomaly: f64, eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    eccentric_anomaly - (eccentricity * eccentric_anomaly.sin()) - mean_anomaly
}
#[inline]
fn keplers_equation_derivative(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    1.0 - (eccentricity * eccentric_anomaly.cos())
}

#[inline]
fn hyperbolic_keplers_equation(mean_anomaly: f64, hyperbolic_anomaly: f64, eccentricity: f64) -> f64 {
    let (sinh, _) = sinhcosh(hyperbolic_anomaly);
    eccentricity * sinh - hyperbolic_anomaly - mean_anomaly
}
#[inline]
fn hyperbolic_keplers_equation_derivative(hyperbolic_anomaly: f64, eccentricity: f64) -> f64 {
    let (_, cosh) = sinhcosh(hyperbolic_anomaly);
    eccentricity * cosh - 1.0
}

/// Get the hyperbolic sine and cosine of a number.
///
/// Usually faster than calling `x.sinh()` and `x.cosh()` separately.
///
/// Returns a tuple which contains:
/// - 0: The hyperbolic sine of the number.
/// - 1: The hyperbolic cosine of the number.
pub fn sinhcosh(x: f64) -> (f64, f64) {
    let e_x = x.exp();
    let e_neg_x = (-x).exp();

    ((e_x - e_neg_x) * 0.5, (e_x + e_neg_x) * 0.5)
}

/// Wraps an angle into `[0, 2π)`.
#[inline]
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Solves the elliptic Kepler equation `M = E - e sin E` for `E`.
///
/// The mean anomaly is wrapped into `[0, 2π)` first, so the returned
/// eccentric anomaly lies near that range as well.
///
/// # Example
/// ```
/// use trajectory_sim::{solve_elliptic, KeplerSolver};
///
/// let solution = solve_elliptic(1.0, 0.1, &KeplerSolver::default());
/// assert!(solution.converged);
/// let e = solution.anomaly;
/// assert!((e - 0.1 * e.sin() - 1.0).abs() < 1e-12);
/// ```
pub fn solve_elliptic(mean_anomaly: f64, eccentricity: f64, solver: &KeplerSolver) -> KeplerSolution {
    let mean_anomaly = wrap_angle(mean_anomaly);

    let seed = if eccentricity < HIGH_ECCENTRICITY_SEED {
        mean_anomaly
    } else {
        PI
    };

    newton(
        seed,
        solver,
        |e_anom| keplers_equation(mean_anomaly, e_anom, eccentricity),
        |e_anom| keplers_equation_derivative(e_anom, eccentricity),
    )
}

/// Solves the hyperbolic Kepler equation `M = e sinh H - H` for `H`.
///
/// No wrapping is applied; the hyperbolic anomaly is unbounded.
pub fn solve_hyperbolic(mean_anomaly: f64, eccentricity: f64, solver: &KeplerSolver) -> KeplerSolution {
    // Rough logarithmic seed, exact in the limit of large |M|
    let seed = (2.0 * mean_anomaly.abs() / eccentricity + 1.8)
        .ln()
        .copysign(mean_anomaly);

    newton(
        seed,
        solver,
        |h_anom| hyperbolic_keplers_equation(mean_anomaly, h_anom, eccentricity),
        |h_anom| hyperbolic_keplers_equation_derivative(h_anom, eccentricity),
    )
}

fn newton(
    seed: f64,
    solver: &KeplerSolver,
    f: impl Fn(f64) -> f64,
    fp: impl Fn(f64) -> f64,
) -> KeplerSolution {
    let mut x = seed;
    let mut residual = f64::INFINITY;

    for iteration in 1..=solver.max_iterations {
        let derivative = fp(x);
        if derivative == 0.0 || !derivative.is_finite() {
            // dangerously close to div-by-zero, break out
            return KeplerSolution {
                anomaly: x,
                iterations: iteration,
                residual,
                converged: false,
            };
        }

        let delta = f(x) / derivative;
        x -= delta;
        residual = delta.abs();

        if residual < solver.tolerance {
            return KeplerSolution {
                anomaly: x,
                iterations: iteration,
                residual,
                converged: true,
            };
        }
    }

    KeplerSolution {
        anomaly: x,
        iterations: solver.max_iterations,
        residual,
        converged: false,
    }
}

/// Converts an eccentric (elliptic) or hyperbolic anomaly into the true anomaly.
pub fn true_anomaly_at_eccentric_anomaly(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    if eccentricity < 1.0 {
        let (s, c) = (eccentric_anomaly * 0.5).sin_cos();
        2.0 * ((1.0 + eccentricity).sqrt() * s).atan2((1.0 - eccentricity).sqrt() * c)
    } else {
        // tan(f/2) = sqrt((e+1)/(e-1))*tanh(H/2)
        2.0 * (((eccentricity + 1.0) / (eccentricity - 1.0)).sqrt()
            * (eccentric_anomaly * 0.5).tanh())
        .atan()
    }
}

/// Converts a true anomaly into the eccentric (elliptic) or hyperbolic anomaly.
pub fn eccentric_anomaly_at_true_anomaly(true_anomaly: f64, eccentricity: f64) -> f64 {
    if eccentricity < 1.0 {
        let (s, c) = (true_anomaly * 0.5).sin_cos();
        2.0 * ((1.0 - eccentricity).sqrt() * s).atan2((1.0 + eccentricity).sqrt() * c)
    } else {
        2.0 * (((eccentricity - 1.0) / (eccentricity + 1.0)).sqrt() * (true_anomaly * 0.5).tan())
            .atanh()
    }
}

/// Mean anomaly from an eccentric (elliptic) or hyperbolic anomaly.
///
/// Elliptic results are wrapped into `[0, 2π)`.
pub fn mean_anomaly_at_eccentric_anomaly(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    if eccentricity < 1.0 {
        wrap_angle(eccentric_anomaly - eccentricity * eccentric_anomaly.sin())
    } else {
        let (sinh, _) = sinhcosh(eccentric_anomaly);
        eccentricity * sinh - eccentric_anomaly
    }
}
