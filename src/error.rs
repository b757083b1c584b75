//! Error types raised by orbit construction, maneuver scheduling and
//! flight path queries.
//!
//! Non-convergence of the Kepler solvers is not an error; see
//! [`ConvergenceWarning`].

use core::fmt;

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::BodyId;

/// A state vector or element set that does not describe a usable conic.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum InvalidOrbitError {
    /// The gravitational parameter was zero, negative or not finite.
    #[error("gravitational parameter must be positive and finite, got {0}")]
    InvalidGravitationalParameter(f64),
    /// A position or velocity component was NaN or infinite.
    #[error("state vector contains non-finite components")]
    NonFiniteState,
    /// The position vector sits at the centre of the primary.
    #[error("position vector has zero length")]
    ZeroPosition,
    /// Position and velocity are (anti)parallel, so there is no orbital plane.
    #[error("specific angular momentum is zero; the trajectory is radial")]
    ZeroAngularMomentum,
    /// The eccentricity is too close to 1 to be handled as an ellipse or a hyperbola.
    #[error("eccentricity {eccentricity} is on the parabolic boundary")]
    Parabolic {
        /// The offending eccentricity.
        eccentricity: f64,
    },
    /// An element passed to [`Orbit::from_elements`][crate::Orbit::from_elements]
    /// is out of range.
    #[error("orbital element `{element}` is out of range: {value}")]
    InvalidElement {
        /// Name of the element.
        element: &'static str,
        /// The rejected value.
        value: f64,
    },
}

/// A property was queried that is undefined for the orbit's regime.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum DomainError {
    /// Period and apoapsis only exist for closed (elliptic) orbits.
    #[error("property is only defined for elliptic orbits, eccentricity is {eccentricity}")]
    NotElliptic {
        /// The eccentricity of the orbit that was queried.
        eccentricity: f64,
    },
}

/// Invalid propulsion or burn parameters.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ManeuverError {
    /// Exhaust velocity must be positive and finite.
    #[error("exhaust velocity must be positive and finite, got {0}")]
    InvalidExhaustVelocity(f64),
    /// Thrust must be positive and finite.
    #[error("thrust must be positive and finite, got {0}")]
    InvalidThrust(f64),
    /// Delta-v must be positive and finite.
    #[error("delta-v must be positive and finite, got {0}")]
    InvalidDeltaV(f64),
    /// Initial mass must be positive and finite.
    #[error("initial mass must be positive and finite, got {0}")]
    InvalidMass(f64),
    /// Start time must be finite.
    #[error("start time must be finite, got {0}")]
    InvalidStartTime(f64),
    /// The rocket equation leaves no representable mass after the burn.
    #[error(
        "delta-v {delta_v} would burn the entire mass at exhaust velocity {exhaust_velocity}"
    )]
    PropellantExhausted {
        /// Requested delta-v.
        delta_v: f64,
        /// Exhaust velocity of the engine.
        exhaust_velocity: f64,
    },
    /// A burn-only quantity was requested outside the burn window.
    #[error("time {time} is outside the burn window [{start}, {end}]")]
    OutsideBurn {
        /// The requested time.
        time: f64,
        /// Burn start.
        start: f64,
        /// Burn end.
        end: f64,
    },
}

/// A maneuver's burn window intersects one that is already scheduled.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error(
    "burn window [{}, {}] overlaps scheduled burn [{}, {}]",
    rejected.0, rejected.1, existing.0, existing.1
)]
pub struct OverlapError {
    /// `(t0, t1)` of the maneuver already in the flight path.
    pub existing: (f64, f64),
    /// `(t0, t1)` of the maneuver that was refused.
    pub rejected: (f64, f64),
}

/// Errors raised while building a [`System`][crate::System].
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SystemError {
    /// No body with the given id is part of the system.
    #[error("there is no body with id {0} in the system")]
    ParentNotFound(BodyId),
    /// A body with the same id has already been added.
    #[error("a body with id {0} is already part of the system")]
    DuplicateBody(BodyId),
}

/// Errors raised by [`FlightPath`][crate::FlightPath].
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum PathError {
    /// The initial state or a post-burn state is degenerate.
    #[error(transparent)]
    InvalidOrbit(#[from] InvalidOrbitError),
    /// The maneuver overlaps an already scheduled one.
    #[error(transparent)]
    Overlap(#[from] OverlapError),
    /// The maneuver was scheduled before the path begins.
    #[error("maneuver starts at {maneuver_start}, before the path start at {path_start}")]
    BeforeStart {
        /// Start of the rejected maneuver.
        maneuver_start: f64,
        /// Start of the flight path.
        path_start: f64,
    },
    /// The query time was NaN or infinite.
    #[error("query time must be finite, got {0}")]
    InvalidTime(f64),
    /// A maneuver-level failure.
    #[error(transparent)]
    Maneuver(#[from] ManeuverError),
}

/// Signals that a Kepler solve hit its iteration bound before meeting
/// its tolerance.
///
/// The anomaly produced by the last iteration is still used, so the
/// orbit carrying this warning is a best estimate with degraded precision.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConvergenceWarning {
    /// Iterations performed.
    pub iterations: u32,
    /// Size of the last Newton step.
    pub residual: f64,
}

impl fmt::Display for ConvergenceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Kepler solver did not converge after {} iterations (last step {:e})",
            self.iterations, self.residual
        )
    }
}
