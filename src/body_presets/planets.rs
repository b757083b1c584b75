//! This module contains presets for planets.

use crate::{Body, InvalidOrbitError, Orbit, OrbitalElements};

/// Returns the Earth on its orbit around the Sun.
///
/// `parent_mu`: The gravitational parameter of the Sun.
///
/// # Errors
/// Fails if `parent_mu` is not a valid gravitational parameter.
pub fn earth(parent_mu: f64) -> Result<Body, InvalidOrbitError> {
    let orbit = Orbit::from_elements(
        parent_mu,
        OrbitalElements {
            semi_major_axis: 1.49598023e11,
            eccentricity: 0.0167086,
            inclination: 0.0,
            long_asc_node: 0.0,
            arg_pe: 1.99330,
            true_anomaly: 0.0,
        },
    )?;

    Ok(Body::from_mass(5.972e24, 6.371e6)
        .with_name("Earth")
        .with_orbit(orbit))
}
