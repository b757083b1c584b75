//! # Trajectory Prediction
//! This library crate predicts where a powered spacecraft will be, moving
//! under the gravity of a single dominant body and changing course through
//! scheduled burns.
//!
//! Between burns the spacecraft coasts on a Keplerian conic, which can be
//! evaluated at any time directly by solving Kepler's equation, with no time
//! stepping. During a burn, gravity and thrust act together and the state is
//! integrated numerically. A [`FlightPath`] stitches both kinds of segment
//! into one continuous timeline that can be queried at any instant.
//!
//! ## Getting started
//! This crate provides these main structs:
//! - [`Orbit`]: An osculating elliptic or hyperbolic orbit. It is derived
//!   from a state vector or from classical elements, and propagated with
//!   [`Orbit::predict`].
//! - [`Body`] and [`System`]: Gravitating bodies arranged in a tree. The root
//!   of the system is the gravity source for flight paths.
//! - [`PerformanceData`] and [`Maneuver`]: An engine and a burn scheduled with
//!   it, sized by the rocket equation.
//! - [`FlightPath`]: An initial state plus scheduled maneuvers, answering
//!   [`predict`][FlightPath::predict] and
//!   [`predict_orbit`][FlightPath::predict_orbit] queries.
//!
//! We also provide a [`body_presets`] module with the Sun and the Earth.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use trajectory_sim::{body_presets, FlightPath, System, Vector3};
//!
//! # fn main() {
//! let system = Arc::new(System::new(body_presets::the_sun()));
//! let r = Vector3::new(617244712358.0, -431694791368.0, -12036457087.0);
//! let v = Vector3::new(7320.0, 11329.0, -211.0);
//!
//! let path = FlightPath::new(system, r, v, 0.0).unwrap();
//! let period = path.predict_orbit(0.0).unwrap().orbit.period().unwrap();
//! let back_home = path.predict(period).unwrap();
//! assert!((back_home.position - r).length() < 1.0);
//! # }
//! ```
//!
//! ## Logging
//! The crate emits [`tracing`] events and never installs a subscriber.
//! Kepler solves that run out of iterations are reported at `WARN`,
//! scheduling at `DEBUG` and burn integration at `TRACE`.

#![warn(missing_docs)]

mod body;
pub mod body_presets;
mod error;
mod integrator;
pub mod kepler;
mod maneuver;
mod orbit;
mod path;
mod system;
mod vector;

#[cfg(test)]
mod tests;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use body::{Body, BodyId};
pub use error::{
    ConvergenceWarning, DomainError, InvalidOrbitError, ManeuverError, OverlapError, PathError,
    SystemError,
};
pub use integrator::{BurnIntegrator, BurnState};
pub use kepler::{solve_elliptic, solve_hyperbolic, KeplerSolution, KeplerSolver};
pub use maneuver::{Maneuver, ManeuverType, PerformanceData};
pub use orbit::{Orbit, OrbitKind, OrbitalElements, PARABOLIC_TOLERANCE};
pub use path::{FlightPath, OrbitData, PathConfig};
pub use system::{BodyRelation, System};
pub use vector::{angle_between, is_finite_vector, unit_or_zero, Vector2, Vector3};

/// The gravitational constant `G`, in m^3 kg^-1 s^-2.
pub const GRAVITATIONAL_CONSTANT: f64 = 6.673e-11;

/// A struct representing a 3x2 matrix.
///
/// This struct is used to store the transformation matrix
/// for transforming a 2D vector into a 3D vector.
///
/// Namely, it is used to tilt a position or velocity in the orbital plane
/// (the perifocal frame) into 3D, using the orbital parameters.
///
/// Each element is named `eXY`, where `X` is the row and `Y` is the column.
///
/// # Example
/// ```
/// use trajectory_sim::{Matrix3x2, Vector2, Vector3};
///
/// let matrix = Matrix3x2 {
///    e11: 1.0, e12: 0.0,
///    e21: 0.0, e22: 1.0,
///    e31: 1.0, e32: 1.0,
/// };
///
/// let result = matrix.dot_vec(Vector2::new(1.0, 2.0));
///
/// assert_eq!(result, Vector3::new(1.0, 2.0, 3.0));
/// ```
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Matrix3x2 {
    // Element XY
    pub e11: f64,
    pub e12: f64,
    pub e21: f64,
    pub e22: f64,
    pub e31: f64,
    pub e32: f64,
}

impl Matrix3x2 {
    /// Computes a dot product between this matrix and a 2D vector.
    pub fn dot_vec(&self, vec: Vector2) -> Vector3 {
        Vector3::new(
            vec.x * self.e11 + vec.y * self.e12,
            vec.x * self.e21 + vec.y * self.e22,
            vec.x * self.e31 + vec.y * self.e32,
        )
    }
}

/// A position and velocity at one instant.
///
/// The position vector is in meters, while the velocity vector is in
/// meters per second.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KinematicData {
    /// The 3D position relative to the primary, in meters.
    pub position: Vector3,
    /// The 3D velocity, in meters per second.
    pub velocity: Vector3,
}

impl KinematicData {
    /// Derives the orbit through this state around a primary with
    /// gravitational parameter `mu`.
    ///
    /// See [`Orbit::from_state_vectors`].
    pub fn to_orbit(&self, mu: f64) -> Result<Orbit, InvalidOrbitError> {
        Orbit::from_state_vectors(mu, self.position, self.velocity)
    }
}
