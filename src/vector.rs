//! Vector helpers on top of [`glam`].
//!
//! [`Vector3`] is glam's double-precision `DVec3`, which already provides
//! addition, scaling, dot and cross products and norms. This module adds the
//! few conventions the rest of the crate relies on.

use glam::{DVec2, DVec3};

/// A three-dimensional vector in meters (positions) or meters per second
/// (velocities).
pub type Vector3 = DVec3;

/// A two-dimensional vector, used for positions and velocities in the
/// perifocal (PQW) frame.
pub type Vector2 = DVec2;

/// Returns the unit vector along `v`, or the zero vector if `v` has zero
/// or non-finite length.
///
/// Unlike [`DVec3::normalize`], this never produces NaN.
///
/// # Example
/// ```
/// use trajectory_sim::{unit_or_zero, Vector3};
///
/// assert_eq!(unit_or_zero(Vector3::new(0.0, 3.0, 4.0)), Vector3::new(0.0, 0.6, 0.8));
/// assert_eq!(unit_or_zero(Vector3::ZERO), Vector3::ZERO);
/// ```
#[inline]
pub fn unit_or_zero(v: Vector3) -> Vector3 {
    v.normalize_or_zero()
}

/// Whether every component of `v` is finite.
#[inline]
pub fn is_finite_vector(v: Vector3) -> bool {
    v.is_finite()
}

/// The angle between two vectors in radians, in `[0, π]`.
///
/// Returns zero if either vector has zero length.
pub fn angle_between(a: Vector3, b: Vector3) -> f64 {
    let denom = a.length() * b.length();
    if denom == 0.0 {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos()
}
